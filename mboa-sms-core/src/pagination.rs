//! Paged list responses and query parameters.

use serde::{Deserialize, Serialize};

/// Default page size used by the dashboard tables.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(alias = "items", alias = "results")]
    pub data: Vec<T>,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl<T> Page<T> {
    /// Number of pages for `total` at this page size.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }

    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Map the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Paging, search and filter parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Free-text search.
    pub search: Option<String>,
    /// Endpoint-specific filters, sent verbatim.
    pub filters: Vec<(String, String)>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            filters: Vec::new(),
        }
    }
}

impl PageQuery {
    /// Create a query for the first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number (clamped to at least 1).
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the search text. Blank text clears it.
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.trim().to_string())
        };
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Render as query string pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_deserialize_aliases() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"items":[1,2,3],"total":45,"page":2,"limit":20}"#).unwrap();
        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());

        let page: Page<u32> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert!(!page.has_next());
    }

    #[test]
    fn test_query_pairs() {
        let query = PageQuery::new()
            .page(0)
            .limit(50)
            .search("  douala ")
            .filter("status", "pending");

        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "50".to_string()),
                ("search".to_string(), "douala".to_string()),
                ("status".to_string(), "pending".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_is_dropped() {
        assert_eq!(PageQuery::new().search("   ").search, None);
    }
}
