//! # bookrec Core
//!
//! Core library for the bookrec recommendation service.
//!
//! This crate provides the catalog data structures and the read paths:
//!
//! - [`Book`] - One row of the catalog table with its normalized match fields
//! - [`CsrMatrix`] - Sparse document-term feature matrix
//! - [`TfidfVectorizer`] - Fitted vocabulary defining the feature columns
//! - [`NeighborIndex`] - Exact k-nearest-neighbor index over sparse rows
//! - [`Catalog`] - The aligned artifact set and its lookup operations
//!
//! ## Example
//!
//! ```rust
//! use bookrec_core::{Book, Catalog, CsrMatrix, Distance, NeighborIndex, TfidfVectorizer};
//! use std::collections::HashMap;
//!
//! let books = vec![
//!     Book::new("The Hobbit").with_authors("J.R.R. Tolkien"),
//!     Book::new("The Silmarillion").with_authors("J.R.R. Tolkien"),
//! ];
//! let features = CsrMatrix::from_rows(1, &[vec![(0, 1.0)], vec![(0, 0.5)]]).unwrap();
//! let index = NeighborIndex::new(Distance::Cosine, features.clone()).unwrap();
//! let vocabulary: HashMap<String, u32, ahash::RandomState> =
//!     [("tolkien".to_string(), 0)].into_iter().collect();
//! let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0]).unwrap();
//!
//! let catalog = Catalog::new(books, features, index, vectorizer).unwrap();
//! let similar = catalog.recommend_by_title("the hobbit", 5).unwrap();
//! assert_eq!(similar[0].title, "The Silmarillion");
//! ```

pub mod book;
pub mod catalog;
pub mod error;
pub mod neighbors;
pub mod sparse;
pub mod text;
pub mod vectorizer;

pub use book::Book;
pub use catalog::{BookSummary, Catalog, CategoryMatch, Recommendation, SearchOutcome, TitleEntry};
pub use error::{Error, Result};
pub use neighbors::{Distance, FittedIndex, Neighbor, NeighborIndex};
pub use sparse::{CsrMatrix, SparseRow};
pub use text::{normalize, secure_thumbnail};
pub use vectorizer::TfidfVectorizer;
