use async_trait::async_trait;

use super::{CreateUserDto, User, UserQuery};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// Credential store
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a user and return it with its store-assigned id.
    ///
    /// Fails with `DomainError::DuplicateEmail` when the store itself
    /// rejects the email as already taken.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn email_exists(&self, email: &str) -> DomainResult<bool>;
    async fn find_by_credentials(&self, email: &str, password: &str)
        -> DomainResult<Option<User>>;

    async fn list_users(&self, query: &UserQuery) -> DomainResult<PaginatedResult<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> DomainResult<()>;
}
