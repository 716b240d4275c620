//! List query parameters: name filter plus page number.

use serde::Deserialize;

pub const PAGE_SIZE: usize = 20;

/// Query string accepted by every list page: `?q=<substring>&p=<page>`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_page")]
    pub p: usize,
}

fn default_page() -> usize {
    1
}

impl ListQuery {
    /// Case-insensitive substring match; an empty query matches all.
    pub fn matches(&self, name: &str) -> bool {
        self.q.is_empty() || name.to_lowercase().contains(&self.q.to_lowercase())
    }
}

/// One page of a filtered list, plus the navigation state the
/// pagination partial needs.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Slice `items` down to the requested page. A page past the end
    /// clamps to the last page rather than coming back empty.
    pub fn paginate(items: Vec<T>, requested: usize) -> Self {
        let total_items = items.len();
        let total_pages = total_items.div_ceil(PAGE_SIZE);
        let current = requested.max(1).min(total_pages.max(1));

        let start = (current - 1) * PAGE_SIZE;
        let items = items
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect();

        Page {
            items,
            current,
            total_pages,
            total_items,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn prev(&self) -> usize {
        self.current.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> usize {
        (self.current + 1).min(self.total_pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_case_insensitive() {
        let query = ListQuery {
            q: "TEAM".to_string(),
            p: 1,
        };
        assert!(query.matches("rip-and-tear-team01"));
        assert!(!query.matches("worker-1"));
        assert!(ListQuery::default().matches("anything"));
    }

    #[test]
    fn paginates_twenty_per_page() {
        let page = Page::paginate((0..45).collect(), 2);
        assert_eq!(page.items, (20..40).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 45);
        assert!(page.has_prev());
        assert!(page.has_next());
    }

    #[test]
    fn page_past_the_end_clamps_to_last() {
        let page = Page::paginate((0..45).collect(), 99);
        assert_eq!(page.current, 3);
        assert_eq!(page.items, (40..45).collect::<Vec<_>>());
        assert!(!page.has_next());
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let page = Page::paginate((0..5).collect(), 0);
        assert_eq!(page.current, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn empty_list_stays_on_page_one() {
        let page = Page::paginate(Vec::<u32>::new(), 4);
        assert_eq!(page.current, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }
}
