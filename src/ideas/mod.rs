//! Scraped-idea curation: search and page slicing.
//!
//! Pure helpers over the list returned by `GET /scraped-data`, mirroring
//! the dashboard's client-side filtering and fixed-size pagination.

pub mod generator;

use crate::models::idea::ScrapedIdea;

/// Ideas shown per page in listings.
pub const IDEAS_PER_PAGE: usize = 3;

/// Case-insensitive title filter.
#[must_use]
pub fn filter_by_title<'a>(ideas: &'a [ScrapedIdea], query: &str) -> Vec<&'a ScrapedIdea> {
    let needle = query.to_lowercase();
    ideas
        .iter()
        .filter(|idea| idea.title.to_lowercase().contains(&needle))
        .collect()
}

/// Fixed-size page slice, 1-based page numbers.
///
/// Pages past the end are empty; a partial final page is returned as-is.
#[must_use]
pub fn page<T>(items: &[T], page_number: usize, per_page: usize) -> &[T] {
    if page_number == 0 || per_page == 0 {
        return &[];
    }
    let start = (page_number - 1) * per_page;
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items.
#[must_use]
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}
