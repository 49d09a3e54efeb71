//! User listing queries
//!
//! Turns caller-supplied listing parameters into a [`UserQuery`] the
//! stores can execute.

use crate::domain::{DomainError, DomainResult, GetUserDto, SortOrder, UserQuery};

/// Validate and normalize listing parameters.
///
/// - an empty role filter disables role filtering
/// - a blank (empty or whitespace-only) search disables searching; otherwise
///   it is ASCII lower-cased (the same folding SQL `LOWER` applies), not trimmed
/// - `page` and `page_size` must both be at least 1, and the rows skipped
///   before the page must fit a signed 64-bit SQL offset
pub fn build_user_query(dto: GetUserDto) -> DomainResult<UserQuery> {
    if dto.page < 1 {
        return Err(DomainError::Validation(format!(
            "page must be at least 1, got {}",
            dto.page
        )));
    }
    if dto.page_size < 1 {
        return Err(DomainError::Validation(format!(
            "pageSize must be at least 1, got {}",
            dto.page_size
        )));
    }

    if (dto.page - 1).checked_mul(dto.page_size).is_none() {
        return Err(DomainError::Validation(format!(
            "page {} with pageSize {} is out of range",
            dto.page, dto.page_size
        )));
    }

    let role = dto.role_filter.filter(|r| !r.is_empty());
    let search = if dto.search.trim().is_empty() {
        None
    } else {
        Some(dto.search.to_ascii_lowercase())
    };

    Ok(UserQuery {
        role,
        search,
        sort: SortOrder::parse(&dto.sort),
        page: dto.page as u64,
        page_size: dto.page_size as u64,
    })
}
