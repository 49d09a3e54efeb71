//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{GetUserDto, User, ROLE_USER};

/// User API representation. The password never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserModel {
    pub id: i32,
    pub email: String,
    pub role: String,
}

impl From<User> for UserModel {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            role: u.role,
        }
    }
}

/// List users query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Exact role to keep; empty disables the filter. Default: `user`
    #[serde(default = "default_role_filter")]
    pub role_filter: Option<String>,
    /// Case-insensitive substring of the email
    #[serde(default)]
    pub search: String,
    /// `desc` for descending id order, anything else ascending
    #[serde(default = "default_sort")]
    pub sort: String,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_role_filter() -> Option<String> {
    Some(ROLE_USER.to_string())
}
fn default_sort() -> String {
    "asc".to_string()
}
fn default_page() -> i64 {
    1
}
fn default_page_size() -> i64 {
    10
}

impl From<ListUsersParams> for GetUserDto {
    fn from(p: ListUsersParams) -> Self {
        Self {
            role_filter: p.role_filter,
            search: p.search,
            sort: p.sort,
            page: p.page,
            page_size: p.page_size,
        }
    }
}
