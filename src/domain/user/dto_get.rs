use super::{User, ROLE_USER};

/// Listing parameters as supplied by the caller.
///
/// Defaults mirror the public API: only regular users, no search,
/// ascending by id, first page of ten.
#[derive(Debug, Clone)]
pub struct GetUserDto {
    pub role_filter: Option<String>,
    pub search: String,
    pub sort: String,
    pub page: i64,
    pub page_size: i64,
}

impl Default for GetUserDto {
    fn default() -> Self {
        Self {
            role_filter: Some(ROLE_USER.to_string()),
            search: String::new(),
            sort: "asc".to_string(),
            page: 1,
            page_size: 10,
        }
    }
}

/// Ordering by user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` in any letter case selects descending; everything else,
    /// including garbage, falls back to ascending.
    pub fn parse(value: &str) -> Self {
        if value.to_lowercase() == "desc" {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Normalized listing query, ready to run against a user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    /// Exact, case-sensitive role match. `None` disables the filter.
    pub role: Option<String>,
    /// ASCII lower-cased substring to look for in the email. `None` when blank.
    pub search: Option<String>,
    pub sort: SortOrder,
    /// 1-based
    pub page: u64,
    pub page_size: u64,
}

impl UserQuery {
    /// Rows skipped before this page. Saturates instead of overflowing.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Role and search predicates, as evaluated by stores that filter in memory.
    ///
    /// Email case folding is ASCII-only so the result agrees with SQL `LOWER`.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = &self.role {
            if &user.role != role {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !user.email.to_ascii_lowercase().contains(search.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32, email: &str, role: &str) -> User {
        User {
            id,
            email: email.to_string(),
            password: "pw".to_string(),
            role: role.to_string(),
        }
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
    fn sort_parsing_only_recognizes_desc() {
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("DeSc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse(""), SortOrder::Asc);
        assert_eq!(SortOrder::parse("descending"), SortOrder::Asc);
        assert_eq!(SortOrder::parse(" desc"), SortOrder::Asc);
    }

    #[test]
    fn role_filter_is_case_sensitive() {
        let q = UserQuery {
            role: Some("user".into()),
            ..query()
        };
        assert!(q.matches(&user(1, "a@x.com", "user")));
        assert!(!q.matches(&user(2, "b@x.com", "User")));
        assert!(!q.matches(&user(3, "c@x.com", "admin")));
    }

    #[test]
    fn search_ignores_email_case() {
        let q = UserQuery {
            search: Some("alice".into()),
            ..query()
        };
        assert!(q.matches(&user(1, "Alice@Example.com", "user")));
        assert!(!q.matches(&user(2, "bob@example.com", "user")));
    }

    #[test]
    fn offset_skips_previous_pages() {
        let q = UserQuery {
            page: 3,
            page_size: 10,
            ..query()
        };
        assert_eq!(q.offset(), 20);
        assert_eq!(query().offset(), 0);
    }

    #[test]
    fn offset_saturates_on_huge_pages() {
        let q = UserQuery {
            page: 4,
            page_size: u64::MAX / 2,
            ..query()
        };
        assert_eq!(q.offset(), u64::MAX);
    }

    #[test]
    fn search_folding_leaves_non_ascii_alone() {
        let q = UserQuery {
            search: Some("Élise".into()),
            ..query()
        };
        assert!(q.matches(&user(1, "ÉLISE@x.com", "user")));

        let q = UserQuery {
            search: Some("élise".into()),
            ..query()
        };
        assert!(!q.matches(&user(1, "ÉLISE@x.com", "user")));
    }
}
