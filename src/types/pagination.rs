//! Pagination types for list endpoints.

use serde::Deserialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// Pagination query parameters, implicit on every filterable list endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Resolved pagination window over a known result count.
///
/// `last_page` is `count/page_size` rounded up; the requested page is
/// clamped to `[1, last_page]` (an empty result set keeps `last_page` at 0
/// but still displays page 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub count: u64,
    pub last_page: u64,
    pub page: u64,
    pub page_size: u64,
    pub offset: u64,
    pub bound: u64,
}

impl PageWindow {
    pub fn new(count: u64, params: PageParams) -> Self {
        let page_size = params.page_size.max(1);
        let last_page = count / page_size + u64::from(count % page_size != 0);

        let page = if params.page < last_page {
            params.page
        } else {
            last_page
        };
        let page = page.max(1);

        let offset = (page - 1) * page_size;
        let bound = (page_size * page).min(count);

        Self {
            count,
            last_page,
            page,
            page_size,
            offset,
            bound,
        }
    }
}

/// One page of results together with its window metadata.
#[derive(Debug)]
pub struct PageSlice<M> {
    pub items: Vec<M>,
    pub total: u64,
    pub pages: u64,
    pub quantity: u64,
}

impl<M> PageSlice<M> {
    pub fn new(items: Vec<M>, window: PageWindow) -> Self {
        Self {
            items,
            total: window.count,
            pages: window.last_page,
            quantity: window.page_size,
        }
    }

    pub fn map<T>(self, f: impl FnMut(M) -> T) -> PageSlice<T> {
        PageSlice {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pages: self.pages,
            quantity: self.quantity,
        }
    }
}
