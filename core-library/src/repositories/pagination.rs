//! Pagination helper types for repository queries

use serde::{Deserialize, Serialize};

/// Pagination request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub limit: u32,
}

impl PageRequest {
    /// Create a new page request
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::PageRequest;
    ///
    /// let request = PageRequest::new(2, 10);
    /// assert_eq!(request.offset(), 10);
    /// assert_eq!(request.limit(), 10);
    /// ```
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// SQL OFFSET for this page, `(page - 1) * limit`.
    ///
    /// Page 0 is clamped to the first page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Get the LIMIT value
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// `(offset, limit)` pair ready to bind into a windowed select.
    pub fn window(&self) -> (u64, u32) {
        (self.offset(), self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Global 1-based rank of the row at `position` within a page starting at `offset`.
///
/// ```
/// use core_library::repositories::record_index;
///
/// assert_eq!(record_index(0, 0), 1);
/// assert_eq!(record_index(0, 10), 11);
/// ```
pub fn record_index(position: usize, offset: u64) -> u64 {
    1 + position as u64 + offset
}

/// Envelope describing where a page sits in the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Pagination {
    /// Build the envelope for a page holding `result_count` rows.
    ///
    /// Returns `None` when the page is empty; callers rely on the envelope
    /// being absent rather than zeroed.
    pub fn for_results(result_count: usize, total: u64, request: PageRequest) -> Option<Self> {
        if result_count == 0 {
            return None;
        }

        let total_pages = if request.limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(request.limit))
        };

        Some(Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        })
    }
}

/// Paginated response: the rows of one page plus its envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current page
    pub data: Vec<T>,
    /// Envelope, absent when `data` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Create a new paginated response
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::{Page, PageRequest};
    ///
    /// let page = Page::new(vec![1, 2], 6, PageRequest::new(1, 2));
    /// assert_eq!(page.pagination.unwrap().total_pages, 3);
    ///
    /// let empty: Page<i32> = Page::new(vec![], 6, PageRequest::new(9, 2));
    /// assert!(empty.pagination.is_none());
    /// ```
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        let pagination = Pagination::for_results(data.len(), total, request);
        Self { data, pagination }
    }
}
