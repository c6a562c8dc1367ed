//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_LIMIT: u64 = 50;
/// Maximum page size.
const MAX_LIMIT: u64 = 200;

/// Limit/offset window for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

impl PageRequest {
    /// Create a new page request, clamping the limit to the allowed range.
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items in this window.
    pub items: Vec<T>,
    /// Window limit that produced this page.
    pub limit: u64,
    /// Window offset that produced this page.
    pub offset: u64,
    /// Total number of items matching the query.
    pub total: u64,
    /// Whether items exist beyond this window.
    pub has_more: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: PageRequest, total: u64) -> Self {
        let has_more = page.offset + (items.len() as u64) < total;
        Self {
            items,
            limit: page.limit,
            offset: page.offset,
            total,
            has_more,
        }
    }
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}
