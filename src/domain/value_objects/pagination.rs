//! Page requests and paginated result envelopes.

use serde::Serialize;

/// Page used when the query string does not name one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the query string does not name one.
pub const DEFAULT_LIMIT: u32 = 10;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page request; both values must be positive and the
    /// resulting offset must fit a signed 64-bit `OFFSET`.
    pub fn new(page: u32, limit: u32) -> Option<Self> {
        if page == 0 || limit == 0 {
            return None;
        }
        let skipped = u64::from(page - 1) * u64::from(limit);
        i64::try_from(skipped).ok()?;
        Some(Self { page, limit })
    }

    /// Parse raw query values, falling back to the defaults when absent.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Option<Self> {
        let page = match page {
            Some(raw) => raw.trim().parse().ok()?,
            None => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(raw) => raw.trim().parse().ok()?,
            None => DEFAULT_LIMIT,
        };
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of items plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.limit())),
            current_page: request.page(),
            data,
        }
    }

    /// Transform the items, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
