//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// The first page.
pub const DEFAULT_PAGE: u32 = 1;

/// Items per page when the caller does not choose.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// A `page` / `per_page` pair for list endpoints.
///
/// # Examples
///
/// ```
/// use ocean_client::Page;
///
/// assert_eq!(Page::default().apply("/actions"), "/actions?page=1&per_page=25");
/// assert_eq!(
///     Page::new(3, 50).apply("/droplets?tag_name=web"),
///     "/droplets?tag_name=web&page=3&per_page=50"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number.
    pub page: u32,
    /// Number of items per page.
    pub per_page: u32,
}

impl Page {
    /// Creates a page selector.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Renders the selector as a query string, without the leading `?`.
    pub fn query(&self) -> String {
        format!("page={}&per_page={}", self.page, self.per_page)
    }

    /// Appends the selector to a path that may already carry a query string.
    pub fn apply(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", path, separator, self.query())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

/// The `meta` object of a list envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Page::default();
        assert_eq!(page.page, DEFAULT_PAGE);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.query(), "page=1&per_page=25");
    }

    #[test]
    fn test_meta_total_optional() {
        let meta: Meta = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.total, 0);

        let meta: Meta = serde_json::from_str(r#"{"total": 62}"#).unwrap();
        assert_eq!(meta.total, 62);
    }
}
