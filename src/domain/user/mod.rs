//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_get;

// Re-export model types
pub use model::{User, ROLE_ADMIN, ROLE_USER};

// Re-export DTOs
pub use dto_create::CreateUserDto;
pub use dto_get::{GetUserDto, SortOrder, UserQuery};

// Re-export repository trait
pub use repository::UserRepositoryInterface;
