//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, SortOrder, User, UserQuery,
    UserRepositoryInterface,
};
use crate::shared::PaginatedResult;

/// In-memory user store for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<i32, User>,
    /// email -> id; the entry API makes the uniqueness check and the insert atomic
    emails: DashMap<String, i32>,
    id_counter: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        match self.emails.entry(dto.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
                let user = User {
                    id,
                    email: dto.email,
                    password: dto.password,
                    role: dto.role,
                };
                self.users.insert(id, user.clone());
                slot.insert(id);
                Ok(user)
            }
        }
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        Ok(self.emails.contains_key(email))
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self
            .users
            .get(&id)
            .filter(|u| u.password == password)
            .map(|u| u.value().clone()))
    }

    async fn list_users(&self, query: &UserQuery) -> DomainResult<PaginatedResult<User>> {
        let mut matching: Vec<User> = self
            .users
            .iter()
            .filter(|u| query.matches(u.value()))
            .map(|u| u.value().clone())
            .collect();

        let total = matching.len() as u64;

        match query.sort {
            SortOrder::Asc => matching.sort_by_key(|u| u.id),
            SortOrder::Desc => matching.sort_by_key(|u| std::cmp::Reverse(u.id)),
        }

        let items: Vec<User> = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.page_size).unwrap_or(usize::MAX))
            .collect();

        Ok(PaginatedResult::new(items, total, query.page, query.page_size))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn query() -> UserQuery {
        UserQuery {
            role: None,
            search: None,
            sort: SortOrder::Asc,
            page: 1,
            page_size: 10,
        }
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let repo = InMemoryUserRepository::new();
        let a = repo
            .create_user(CreateUserDto::registration("a@x.com", "pw"))
            .await
            .unwrap();
        let b = repo
            .create_user(CreateUserDto::registration("b@x.com", "pw"))
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn concurrent_registrations_of_one_email_create_one_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.create_user(CreateUserDto::registration("same@x.com", format!("pw{i}")))
                    .await
            }));
        }

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::DuplicateEmail) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn wrong_password_finds_nothing() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(CreateUserDto::registration("a@x.com", "pw"))
            .await
            .unwrap();

        assert!(repo.find_by_credentials("a@x.com", "pw").await.unwrap().is_some());
        assert!(repo.find_by_credentials("a@x.com", "nope").await.unwrap().is_none());
        assert!(repo.find_by_credentials("b@x.com", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let repo = InMemoryUserRepository::new();
        for i in 0..3 {
            repo.create_user(CreateUserDto::registration(format!("u{i}@x.com"), "pw"))
                .await
                .unwrap();
        }

        let page = repo
            .list_users(&UserQuery {
                page: 5,
                page_size: 2,
                ..query()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
    }
}
