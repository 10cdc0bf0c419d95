//! Lenient page/limit parsing and in-memory result windowing.

use serde::Deserialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

/// Raw page/limit query parameters, shared by every paginated listing that
/// takes nothing else.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// 1-indexed pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: usize,
    pub limit: usize,
}

impl PageParams {
    /// Parse raw query values. Non-numeric or out-of-range input falls back
    /// to the defaults instead of failing the request.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    pub fn skip(&self) -> usize {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Window a fully sorted result set: returns the requested page and the
/// total size of the set before pagination. Both come from the same scan,
/// so the count can never disagree with the page contents.
pub fn window<T>(items: Vec<T>, params: &PageParams) -> (Vec<T>, usize) {
    let total = items.len();
    let page = items
        .into_iter()
        .skip(params.skip())
        .take(params.limit)
        .collect();
    (page, total)
}
