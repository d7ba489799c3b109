//! Offset pagination helpers.

use serde::Serialize;

/// Default page size when the client does not pass `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized page request (1-based page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Clamp raw query values into a usable page request.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        let limit = i64::from(request.limit);
        let total_pages = ((total.max(0) + limit - 1) / limit) as u32;
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }

    /// Convert every item, keeping the totals.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(Page::<u8>::new(vec![], 0, req).total_pages, 0);
        assert_eq!(Page::<u8>::new(vec![], 10, req).total_pages, 1);
        assert_eq!(Page::<u8>::new(vec![], 11, req).total_pages, 2);
    }

    #[test]
    fn test_map_keeps_totals() {
        let page = Page::new(vec![1, 2], 12, PageRequest::new(Some(2), Some(2)));
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.data, vec![10, 20]);
        assert_eq!(mapped.total, 12);
        assert_eq!(mapped.total_pages, 6);
        assert_eq!(mapped.page, 2);
    }
}
