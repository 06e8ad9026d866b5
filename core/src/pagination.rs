//! Paginator bundles and the current-page source.

use serde::Serialize;

/// Supplies the requested page and the base path for link generation,
/// usually from the ambient request.
pub trait PageResolver: Send + Sync {
    /// Page requested under `page_name`, if any.
    fn resolve_current_page(&self, page_name: &str) -> Option<usize>;

    /// Base path links are generated against.
    fn resolve_current_path(&self) -> String {
        "/".to_owned()
    }
}

/// Resolver for code running outside any request: never yields a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequestContext;

impl PageResolver for NoRequestContext {
    fn resolve_current_page(&self, _page_name: &str) -> Option<usize> {
        None
    }
}

/// Resolver serving a fixed page and path.
#[derive(Debug, Clone)]
pub struct StaticPageResolver {
    pub page_name: String,
    pub page: usize,
    pub path: String,
}

impl StaticPageResolver {
    pub fn new(page_name: impl Into<String>, page: usize, path: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            page,
            path: path.into(),
        }
    }
}

impl PageResolver for StaticPageResolver {
    fn resolve_current_page(&self, page_name: &str) -> Option<usize> {
        (page_name == self.page_name).then_some(self.page)
    }

    fn resolve_current_path(&self) -> String {
        self.path.clone()
    }
}

/// Link metadata shared by both paginator flavors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub path: String,
    pub page_name: String,
}

impl PageLinks {
    pub fn url(&self, page: usize) -> String {
        let page = page.max(1);
        let sep = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.path, sep, self.page_name, page)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct LengthAwarePaginator<T> {
    #[serde(rename = "data")]
    items: Vec<T>,
    total: usize,
    per_page: usize,
    current_page: usize,
    #[serde(flatten)]
    links: PageLinks,
}

impl<T> LengthAwarePaginator<T> {
    pub fn new(
        items: Vec<T>,
        total: usize,
        per_page: usize,
        current_page: usize,
        links: PageLinks,
    ) -> Self {
        Self {
            items,
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            links,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub const fn total(&self) -> usize {
        self.total
    }

    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn last_page(&self) -> usize {
        let pages = self.total.div_ceil(self.per_page);
        if pages == 0 { 1 } else { pages }
    }

    pub const fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    pub const fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn links(&self) -> &PageLinks {
        &self.links
    }

    pub fn url(&self, page: usize) -> String {
        self.links.url(page)
    }

    pub fn next_page_url(&self) -> Option<String> {
        self.has_more_pages()
            .then(|| self.url(self.current_page.saturating_add(1)))
    }

    pub fn previous_page_url(&self) -> Option<String> {
        (!self.on_first_page()).then(|| self.url(self.current_page - 1))
    }
}

/// One page of results without a total.
#[derive(Debug, Clone, Serialize)]
pub struct Paginator<T> {
    #[serde(rename = "data")]
    items: Vec<T>,
    per_page: usize,
    current_page: usize,
    #[serde(flatten)]
    links: PageLinks,
}

impl<T> Paginator<T> {
    pub fn new(items: Vec<T>, per_page: usize, current_page: usize, links: PageLinks) -> Self {
        Self {
            items,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            links,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// A full page suggests another one follows.
    pub fn has_more_pages(&self) -> bool {
        self.items.len() >= self.per_page
    }

    pub const fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn links(&self) -> &PageLinks {
        &self.links
    }

    pub fn url(&self, page: usize) -> String {
        self.links.url(page)
    }

    pub fn next_page_url(&self) -> Option<String> {
        self.has_more_pages()
            .then(|| self.url(self.current_page.saturating_add(1)))
    }

    pub fn previous_page_url(&self) -> Option<String> {
        (!self.on_first_page()).then(|| self.url(self.current_page - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> PageLinks {
        PageLinks {
            path: "/posts".into(),
            page_name: "page".into(),
        }
    }

    #[test]
    fn last_page_rounds_up() {
        let p = LengthAwarePaginator::new(vec![1; 10], 35, 10, 1, links());
        assert_eq!(p.last_page(), 4);
        assert!(p.has_more_pages());
        assert!(p.on_first_page());
        assert_eq!(p.next_page_url().as_deref(), Some("/posts?page=2"));
        assert_eq!(p.previous_page_url(), None);
    }

    #[test]
    fn empty_result_has_one_page() {
        let p = LengthAwarePaginator::<u8>::new(vec![], 0, 15, 1, links());
        assert_eq!(p.last_page(), 1);
        assert!(!p.has_more_pages());
    }

    #[test]
    fn last_page_has_no_next() {
        let p = LengthAwarePaginator::new(vec![1; 5], 35, 10, 4, links());
        assert!(!p.has_more_pages());
        assert_eq!(p.previous_page_url().as_deref(), Some("/posts?page=3"));
    }

    #[test]
    fn url_appends_to_existing_query_string() {
        let links = PageLinks {
            path: "/posts?sort=new".into(),
            page_name: "p".into(),
        };
        assert_eq!(links.url(3), "/posts?sort=new&p=3");
    }

    #[test]
    fn simple_paginator_infers_more_from_full_page() {
        let full = Paginator::new(vec![1; 10], 10, 2, links());
        assert!(full.has_more_pages());
        assert!(!full.on_first_page());

        let partial = Paginator::new(vec![1; 3], 10, 3, links());
        assert!(!partial.has_more_pages());
        assert_eq!(partial.next_page_url(), None);
    }

    #[test]
    fn next_page_saturates_at_the_largest_page() {
        let full = Paginator::new(vec![1; 2], 2, usize::MAX, links());
        let expected = format!("/posts?page={}", usize::MAX);
        assert_eq!(full.next_page_url(), Some(expected));
    }

    #[test]
    fn serializes_like_a_page_payload() {
        let p = LengthAwarePaginator::new(vec!["a", "b"], 2, 15, 1, links());
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
        assert_eq!(json["total"], 2);
        assert_eq!(json["per_page"], 15);
        assert_eq!(json["current_page"], 1);
        assert_eq!(json["path"], "/posts");
        assert_eq!(json["page_name"], "page");
    }

    #[test]
    fn static_resolver_matches_page_name() {
        let r = StaticPageResolver::new("page", 3, "/x");
        assert_eq!(r.resolve_current_page("page"), Some(3));
        assert_eq!(r.resolve_current_page("other"), None);
        assert_eq!(r.resolve_current_path(), "/x");
        assert_eq!(NoRequestContext.resolve_current_page("page"), None);
    }
}
