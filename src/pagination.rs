//! Pagination primitives used by list queries and list responses.

use serde::{Deserialize, Serialize};

/// Page size applied when a request does not specify one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;

/// 1-based page request forwarded to repository queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// A single page of items plus the metadata clients need to render pagers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Assemble a page from loaded items and the unpaginated total.
    pub fn new(items: Vec<T>, page: usize, total: usize, per_page: usize) -> Self {
        Self {
            items,
            page,
            pages: total.div_ceil(per_page.max(1)),
            total,
        }
    }
}
