//! Pagination parameters shared by every list endpoint.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// `?page=&per_page=`; out-of-range values are rejected, not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[param(minimum = 1)]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100)]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Rows to skip: `(page - 1) * per_page`
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// Rows to fetch, never above the maximum page size
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_page_and_size() {
        assert_eq!(PaginationParams::new(1, 3).offset(), 0);
        assert_eq!(PaginationParams::new(3, 3).offset(), 6);
        assert_eq!(PaginationParams::new(2, 10).limit(), 10);
    }

    #[test]
    fn defaults_apply_when_absent() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::new(1, 10));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        assert!(PaginationParams::new(0, 10).validate().is_err());
        assert!(PaginationParams::new(1, 0).validate().is_err());
        assert!(PaginationParams::new(1, 101).validate().is_err());
        assert!(PaginationParams::new(1, 100).validate().is_ok());
    }
}
