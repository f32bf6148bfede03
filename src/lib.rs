//! # bookrec
//!
//! A read-only book recommendation service.
//!
//! bookrec loads four frozen artifacts produced by an offline pipeline (a
//! fitted nearest-neighbor index, a TF-IDF vocabulary, the document-term
//! feature matrix and the book table) and answers lookups by title, author
//! and category, plus a unified search that falls back from one to the next.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! bookrec --artifacts-dir ./artifacts --http-port 8000
//! curl 'http://localhost:8000/recommend?title=The%20Hobbit&n=5'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use bookrec::prelude::*;
//!
//! let loader = CatalogLoader::new(ArtifactPaths::in_dir("./artifacts"));
//! let catalog = loader.load().unwrap();
//!
//! if let Some(similar) = catalog.recommend_by_title("The Hobbit", 5) {
//!     for book in similar {
//!         println!("{} ({:.3})", book.title, book.similarity);
//!     }
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `bookrec-core` - Book table, sparse features, neighbor index, catalog lookups
//! - `bookrec-storage` - Artifact locations and the startup loader
//! - `bookrec-api` - actix-web REST endpoints and CORS policy

// Re-export core types
pub use bookrec_core::{
    Book, BookSummary, Catalog, CategoryMatch, CsrMatrix, Distance, Error, NeighborIndex,
    Recommendation, Result, SearchOutcome, TfidfVectorizer, TitleEntry,
};

// Re-export storage
pub use bookrec_storage::{ArtifactPaths, CatalogLoader};

// Re-export API
pub use bookrec_api::{HttpConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactPaths, Book, Catalog, CatalogLoader, CsrMatrix, Distance, Error, HttpConfig,
        NeighborIndex, Result, RestApi, SearchOutcome, TfidfVectorizer,
    };
}

/// Text normalization used for every match
pub mod text {
    pub use bookrec_core::text::{normalize, secure_thumbnail};
}
