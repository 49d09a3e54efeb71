/// Role assigned to self-registered users.
pub const ROLE_USER: &str = "user";

/// Role required for administrative endpoints.
pub const ROLE_ADMIN: &str = "admin";

/// User model
///
/// Roles are plain strings: filtering and authorization compare them
/// verbatim, so any value the store holds round-trips unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Stored verbatim. Sign-in compares it literally.
    pub password: String,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
