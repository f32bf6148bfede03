pub mod loader;
pub mod paths;

pub use loader::CatalogLoader;
pub use paths::{ArtifactPaths, INDEX_FILE, MATRIX_FILE, TABLE_FILE, VECTORIZER_FILE};
