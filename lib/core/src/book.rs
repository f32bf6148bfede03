use crate::text::normalize;
use serde::{Deserialize, Serialize};

/// One row of the catalog table
///
/// Raw fields are what clients see. The `*_clean` fields hold the
/// normalized variants used only for matching; rows that arrive without
/// them are filled in by [`Book::fill_normalized`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default = "empty_column")]
    pub thumbnail: Option<String>,
    #[serde(default = "empty_column")]
    pub preview_link: Option<String>,
    #[serde(default)]
    pub title_clean: Option<String>,
    #[serde(default)]
    pub authors_clean: Option<String>,
    #[serde(default)]
    pub categories_clean: Option<String>,
}

/// Absent display columns read as an empty string, not as a missing value
fn empty_column() -> Option<String> {
    Some(String::new())
}

impl Book {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: None,
            categories: None,
            thumbnail: empty_column(),
            preview_link: empty_column(),
            title_clean: None,
            authors_clean: None,
            categories_clean: None,
        }
    }

    #[must_use]
    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = Some(categories.into());
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    #[must_use]
    pub fn with_preview_link(mut self, link: impl Into<String>) -> Self {
        self.preview_link = Some(link.into());
        self
    }

    /// Derive any missing normalized field from its raw counterpart
    pub fn fill_normalized(&mut self) {
        if self.title_clean.is_none() {
            self.title_clean = Some(normalize(&self.title));
        }
        if self.authors_clean.is_none() {
            self.authors_clean = self.authors.as_deref().map(normalize);
        }
        if self.categories_clean.is_none() {
            self.categories_clean = self.categories.as_deref().map(normalize);
        }
    }

    #[inline]
    pub fn title_matches(&self, normalized: &str) -> bool {
        self.title_clean.as_deref() == Some(normalized)
    }

    #[inline]
    pub fn title_contains(&self, normalized: &str) -> bool {
        contains(self.title_clean.as_deref(), normalized)
    }

    #[inline]
    pub fn authors_contain(&self, normalized: &str) -> bool {
        contains(self.authors_clean.as_deref(), normalized)
    }

    #[inline]
    pub fn categories_contain(&self, normalized: &str) -> bool {
        contains(self.categories_clean.as_deref(), normalized)
    }
}

// A missing field never matches, not even the empty query
#[inline]
fn contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.contains(needle))
}
