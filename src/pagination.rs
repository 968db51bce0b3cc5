use serde::{Deserialize, Serialize};

use crate::config;

/// Query-string pagination parameters, `?page=2&page_size=20`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn limit(&self) -> i64 {
        self.size as i64
    }

    pub fn offset(&self) -> i64 {
        (self.number as i64 - 1) * self.size as i64
    }
}

impl PageQuery {
    /// Resolve to a concrete page: pages are 1-based, size defaults to the
    /// configured page size and is clamped to the configured maximum.
    pub fn resolve(&self) -> Page {
        let api = &config::config().api;
        let number = self.page.unwrap_or(1).max(1);
        let size = self
            .page_size
            .unwrap_or(api.page_size)
            .clamp(1, api.max_page_size);
        Page { number, size }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(count: i64, page: Page, results: Vec<T>) -> Self {
        Self {
            count,
            page: page.number,
            page_size: page.size,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_with_configured_size() {
        let page = PageQuery::default().resolve();
        assert_eq!(page.number, 1);
        assert_eq!(page.size, config::config().api.page_size);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn clamps_size_and_floors_page() {
        let page = PageQuery { page: Some(0), page_size: Some(10_000) }.resolve();
        assert_eq!(page.number, 1);
        assert_eq!(page.size, config::config().api.max_page_size);

        let page = PageQuery { page: Some(3), page_size: Some(20) }.resolve();
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }
}
