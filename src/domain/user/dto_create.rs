use super::ROLE_USER;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl CreateUserDto {
    /// A self-registration: always gets the default role.
    pub fn registration(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: ROLE_USER.to_string(),
        }
    }
}
