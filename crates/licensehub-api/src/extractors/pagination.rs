//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};
use validator::Validate;

use licensehub_core::types::pagination::PageRequest;

/// Query parameters for the license list: `?page&size&name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub size: Option<u64>,
    /// Name substring filter.
    #[validate(length(max = 128))]
    pub name: Option<String>,
}

impl ListQuery {
    /// Converts to a `PageRequest`, using `default_size` when none was given.
    pub fn page_request(&self, default_size: u64) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.size.unwrap_or(default_size))
    }
}
