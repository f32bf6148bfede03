use crate::text::{normalize, secure_thumbnail};
use crate::{Book, CsrMatrix, Error, NeighborIndex, Result, SparseRow, TfidfVectorizer};
use serde::Serialize;
use std::collections::BTreeSet;

/// A neighbor of the queried book
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub authors: Option<String>,
    pub thumbnail: Option<String>,
    pub preview_link: Option<String>,
    pub similarity: f32,
}

/// A row matched by author, or by category through the unified search
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookSummary {
    pub title: String,
    pub authors: Option<String>,
    pub thumbnail: Option<String>,
    pub preview_link: Option<String>,
}

/// A row matched by the category lookup, carrying the raw categories
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryMatch {
    pub title: String,
    pub authors: Option<String>,
    pub categories: Option<String>,
    pub thumbnail: Option<String>,
    pub preview_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TitleEntry {
    pub title: String,
}

/// Which branch of [`Catalog::unified_search`] answered
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Similar(Vec<Recommendation>),
    ByAuthor(Vec<BookSummary>),
    ByCategory(Vec<BookSummary>),
    NoMatch,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            authors: book.authors.clone(),
            thumbnail: secure_thumbnail(book.thumbnail.as_deref()),
            preview_link: book.preview_link.clone(),
        }
    }
}

impl From<&Book> for CategoryMatch {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            authors: book.authors.clone(),
            categories: book.categories.clone(),
            thumbnail: secure_thumbnail(book.thumbnail.as_deref()),
            preview_link: book.preview_link.clone(),
        }
    }
}

/// The loaded, immutable artifact set
///
/// Row `i` of the table, of the feature matrix and of the neighbor index
/// all describe the same book. [`Catalog::new`] refuses artifacts that
/// break this alignment.
#[derive(Debug)]
pub struct Catalog {
    books: Vec<Book>,
    features: CsrMatrix,
    index: NeighborIndex,
    vectorizer: TfidfVectorizer,
    titles: Vec<String>,
}

impl Catalog {
    pub fn new(
        mut books: Vec<Book>,
        features: CsrMatrix,
        index: NeighborIndex,
        vectorizer: TfidfVectorizer,
    ) -> Result<Self> {
        features.validate()?;
        check_aligned("feature matrix", "rows", books.len(), features.n_rows())?;
        check_aligned("neighbor index", "rows", books.len(), index.len())?;
        check_aligned("feature matrix", "columns", vectorizer.n_features(), features.n_cols())?;
        check_aligned("neighbor index", "columns", vectorizer.n_features(), index.n_features())?;

        for book in &mut books {
            book.fill_normalized();
        }

        let titles = books
            .iter()
            .map(|b| b.title.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            books,
            features,
            index,
            vectorizer,
            titles,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    #[inline]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    #[inline]
    pub fn index(&self) -> &NeighborIndex {
        &self.index
    }

    #[inline]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// The `n` nearest books to the book at `row`, excluding that book
    ///
    /// One extra neighbor is requested since a row is always its own
    /// closest match.
    pub fn similar_to_row(&self, row: usize, n: usize) -> Result<Vec<Recommendation>> {
        let query = self.features.row(row).ok_or(Error::RowOutOfRange {
            row,
            len: self.len(),
        })?;
        Ok(self.neighbors_of(row, &query, n))
    }

    /// Books similar to the first book whose normalized title equals `title`.
    /// `None` when no such book exists.
    pub fn recommend_by_title(&self, title: &str, n: usize) -> Option<Vec<Recommendation>> {
        let wanted = normalize(title);
        let (row, query) = self.first_row_where(|b| b.title_matches(&wanted))?;
        Some(self.neighbors_of(row, &query, n))
    }

    /// First `n` books, in table order, whose authors contain `name`.
    /// `None` when no book matches at all.
    pub fn recommend_by_author(&self, name: &str, n: usize) -> Option<Vec<BookSummary>> {
        let wanted = normalize(name);
        self.head_matching(|b| b.authors_contain(&wanted), n)
            .map(|books| books.into_iter().map(BookSummary::from).collect())
    }

    /// First `n` books, in table order, whose categories contain `name`.
    /// `None` when no book matches at all.
    pub fn recommend_by_category(&self, name: &str, n: usize) -> Option<Vec<CategoryMatch>> {
        let wanted = normalize(name);
        self.head_matching(|b| b.categories_contain(&wanted), n)
            .map(|books| books.into_iter().map(CategoryMatch::from).collect())
    }

    /// Distinct titles in ascending order
    pub fn list_titles(&self) -> Vec<TitleEntry> {
        self.titles
            .iter()
            .map(|title| TitleEntry { title: title.clone() })
            .collect()
    }

    /// Try title, then author, then category; the first branch with any
    /// match answers and the rest are skipped.
    ///
    /// The title branch uses substring containment and expands only the first
    /// matching row, unlike the exact lookup of [`Catalog::recommend_by_title`].
    pub fn unified_search(&self, query: &str, n: usize) -> SearchOutcome {
        let wanted = normalize(query);

        if let Some((row, query)) = self.first_row_where(|b| b.title_contains(&wanted)) {
            return SearchOutcome::Similar(self.neighbors_of(row, &query, n));
        }

        if let Some(books) = self.head_matching(|b| b.authors_contain(&wanted), n) {
            return SearchOutcome::ByAuthor(books.into_iter().map(BookSummary::from).collect());
        }

        if let Some(books) = self.head_matching(|b| b.categories_contain(&wanted), n) {
            return SearchOutcome::ByCategory(books.into_iter().map(BookSummary::from).collect());
        }

        SearchOutcome::NoMatch
    }

    fn neighbors_of(&self, row: usize, query: &SparseRow<'_>, n: usize) -> Vec<Recommendation> {
        self.index
            .kneighbors(query, n.saturating_add(1))
            .into_iter()
            .filter(|neighbor| neighbor.row != row)
            .take(n)
            .map(|neighbor| {
                let book = &self.books[neighbor.row];
                Recommendation {
                    title: book.title.clone(),
                    authors: book.authors.clone(),
                    thumbnail: secure_thumbnail(book.thumbnail.as_deref()),
                    preview_link: book.preview_link.clone(),
                    similarity: neighbor.similarity(),
                }
            })
            .collect()
    }

    // First row in table order satisfying `predicate`, with its feature row.
    // Books and feature rows have equal length once `Catalog::new` succeeds.
    fn first_row_where<F>(&self, predicate: F) -> Option<(usize, SparseRow<'_>)>
    where
        F: Fn(&Book) -> bool,
    {
        self.books
            .iter()
            .zip(self.features.rows())
            .enumerate()
            .find(|(_, (book, _))| predicate(book))
            .map(|(row, (_, query))| (row, query))
    }

    // Linear scan in table order. `None` only when nothing matches, so a
    // match with `n == 0` still yields an empty list.
    fn head_matching<F>(&self, predicate: F, n: usize) -> Option<Vec<&Book>>
    where
        F: Fn(&Book) -> bool,
    {
        let mut hits = self.books.iter().filter(|b| predicate(b)).peekable();
        hits.peek()?;
        Some(hits.take(n).collect())
    }
}

fn check_aligned(
    artifact: &'static str,
    unit: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::Misaligned {
            artifact,
            unit,
            expected,
            actual,
        })
    }
}
