use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "knn.bin";
pub const VECTORIZER_FILE: &str = "tfidf.json";
pub const MATRIX_FILE: &str = "tfidf_matrix.bin";
pub const TABLE_FILE: &str = "books.json";

/// Locations of the four startup artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub index: PathBuf,
    pub vectorizer: PathBuf,
    pub matrix: PathBuf,
    pub table: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            index: dir.join(INDEX_FILE),
            vectorizer: dir.join(VECTORIZER_FILE),
            matrix: dir.join(MATRIX_FILE),
            table: dir.join(TABLE_FILE),
        }
    }

    #[must_use]
    pub fn with_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.index = path.into();
        self
    }

    #[must_use]
    pub fn with_vectorizer(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectorizer = path.into();
        self
    }

    #[must_use]
    pub fn with_matrix(mut self, path: impl Into<PathBuf>) -> Self {
        self.matrix = path.into();
        self
    }

    #[must_use]
    pub fn with_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.table = path.into();
        self
    }

    pub fn all(&self) -> [&Path; 4] {
        [&self.index, &self.vectorizer, &self.matrix, &self.table]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let paths = ArtifactPaths::in_dir("/data").with_table("/elsewhere/catalog.json");
        assert_eq!(paths.index, PathBuf::from("/data/knn.bin"));
        assert_eq!(paths.vectorizer, PathBuf::from("/data/tfidf.json"));
        assert_eq!(paths.matrix, PathBuf::from("/data/tfidf_matrix.bin"));
        assert_eq!(paths.table, PathBuf::from("/elsewhere/catalog.json"));
    }
}
