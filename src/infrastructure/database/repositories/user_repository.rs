use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, Statement,
};
use tracing::debug;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, SortOrder, User, UserQuery,
    UserRepositoryInterface,
};
use crate::infrastructure::database::entities::user;
use crate::shared::PaginatedResult;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password: model.password,
        role: model.role,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Escape LIKE wildcards so the search text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            email: Set(dto.email),
            password: Set(dto.password),
            role: Set(dto.role),
            ..Default::default()
        };

        let model = new_user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::DuplicateEmail,
            _ => db_err(e),
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Password.eq(password))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn list_users(&self, query: &UserQuery) -> DomainResult<PaginatedResult<User>> {
        let mut select = user::Entity::find();

        // Apply role filter
        if let Some(ref role) = query.role {
            select = select.filter(user::Column::Role.eq(role.as_str()));
        }

        // Apply search filter (email, case-insensitive)
        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", escape_like(search));
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Email)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        // Count total
        let total = select.clone().count(&self.db).await.map_err(db_err)?;

        // Apply sorting
        select = match query.sort {
            SortOrder::Asc => select.order_by_asc(user::Column::Id),
            SortOrder::Desc => select.order_by_desc(user::Column::Id),
        };

        // Paginate
        let models = select
            .offset(query.offset())
            .limit(query.page_size)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        debug!(total, returned = models.len(), "Listed users");

        let items: Vec<User> = models.into_iter().map(user_model_to_domain).collect();

        Ok(PaginatedResult::new(items, total, query.page, query.page_size))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::ROLE_ADMIN;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository};

    async fn repo() -> UserRepository {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    async fn seed(repo: &UserRepository, email: &str, role: &str) -> User {
        repo.create_user(CreateUserDto {
            email: email.to_string(),
            password: "pw".to_string(),
            role: role.to_string(),
        })
        .await
        .unwrap()
    }

    fn query() -> UserQuery {
        UserQuery {
            role: None,
            search: None,
            sort: SortOrder::Asc,
            page: 1,
            page_size: 10,
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b%c\\d"), "a\\_b\\%c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn ids_are_assigned_in_insert_order() {
        let repo = repo().await;
        let a = seed(&repo, "a@x.com", "user").await;
        let b = seed(&repo, "b@x.com", "user").await;
        assert!(b.id > a.id);
        assert_eq!(repo.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unique_email_violation_maps_to_duplicate() {
        let repo = repo().await;
        seed(&repo, "a@x.com", "user").await;

        let err = repo
            .create_user(CreateUserDto::registration("a@x.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEmail));
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn credentials_must_match_exactly() {
        let repo = repo().await;
        seed(&repo, "a@x.com", "user").await;

        assert!(repo.email_exists("a@x.com").await.unwrap());
        assert!(!repo.email_exists("A@x.com").await.unwrap());
        assert!(repo.find_by_credentials("a@x.com", "pw").await.unwrap().is_some());
        assert!(repo.find_by_credentials("a@x.com", "PW").await.unwrap().is_none());
        assert!(repo.find_by_credentials("A@X.COM", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_filters_searches_and_counts() {
        let repo = repo().await;
        seed(&repo, "a@x.com", "user").await;
        seed(&repo, "b@x.com", ROLE_ADMIN).await;
        seed(&repo, "ab@x.com", "user").await;

        let page = repo
            .list_users(&UserQuery {
                role: Some("user".into()),
                search: Some("a".into()),
                ..query()
            })
            .await
            .unwrap();

        let emails: Vec<_> = page.items.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "ab@x.com"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let repo = repo().await;
        seed(&repo, "alice@example.com", "user").await;
        seed(&repo, "a_b@example.com", "user").await;
        seed(&repo, "axb@example.com", "user").await;

        let page = repo
            .list_users(&UserQuery {
                search: Some("alice".into()),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = repo
            .list_users(&UserQuery {
                search: Some("a_b".into()),
                ..query()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].email, "a_b@example.com");
    }

    #[tokio::test]
    async fn descending_order_and_pagination() {
        let repo = repo().await;
        for i in 0..25 {
            seed(&repo, &format!("user{i}@x.com"), "user").await;
        }

        let page = repo
            .list_users(&UserQuery {
                sort: SortOrder::Desc,
                page: 3,
                page_size: 10,
                ..query()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
        let ids: Vec<i32> = page.items.iter().map(|u| u.id).collect();
        assert!(ids.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test]
    async fn largest_page_size_is_bindable() {
        let repo = repo().await;
        seed(&repo, "a@x.com", "user").await;

        for page in [1, 2] {
            let result = repo
                .list_users(&UserQuery {
                    page,
                    page_size: i64::MAX as u64,
                    ..query()
                })
                .await
                .unwrap();
            assert_eq!(result.total, 1);
            assert_eq!(result.items.len(), if page == 1 { 1 } else { 0 });
        }
    }

    #[tokio::test]
    async fn non_ascii_search_agrees_with_in_memory_store() {
        let stores: Vec<(&str, Box<dyn UserRepositoryInterface>)> = vec![
            ("sql", Box::new(repo().await)),
            ("memory", Box::new(InMemoryUserRepository::new())),
        ];

        for (name, store) in &stores {
            store
                .create_user(CreateUserDto::registration("ÉLISE@x.com", "pw"))
                .await
                .unwrap();

            for (search, expected) in [("Élise", 1), ("ÉLISE", 1), ("élise", 0)] {
                let page = store
                    .list_users(&UserQuery {
                        search: Some(search.to_ascii_lowercase()),
                        ..query()
                    })
                    .await
                    .unwrap();
                assert_eq!(page.total, expected, "{name} store, search {search:?}");
            }
        }
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_connection() {
        let repo = repo().await;
        repo.ping().await.unwrap();
    }
}
