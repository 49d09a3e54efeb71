pub mod error;
pub mod user;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use user::{
    CreateUserDto, GetUserDto, SortOrder, User, UserQuery, UserRepositoryInterface, ROLE_ADMIN,
    ROLE_USER,
};
