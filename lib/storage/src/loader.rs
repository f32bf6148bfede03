use crate::paths::ArtifactPaths;
use bookrec_core::{Book, Catalog, CsrMatrix, Error, NeighborIndex, Result, TfidfVectorizer};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Loads the frozen artifact set produced by the offline pipeline
///
/// Loading is all-or-nothing: any missing, undecodable or misaligned
/// artifact fails the whole load and no [`Catalog`] is produced.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    paths: ArtifactPaths,
}

impl CatalogLoader {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn load(&self) -> Result<Catalog> {
        let started = Instant::now();

        for path in self.paths.all() {
            if !path.is_file() {
                return Err(Error::ArtifactNotFound(path.to_path_buf()));
            }
        }

        let index: NeighborIndex = read_bincode(&self.paths.index)?;
        info!(
            "Loaded neighbor index: {} rows, {:?} distance",
            index.len(),
            index.distance()
        );

        let vectorizer: TfidfVectorizer = read_json(&self.paths.vectorizer)?;
        vectorizer.validate()?;
        info!("Loaded vectorizer: {} terms", vectorizer.n_features());

        let features: CsrMatrix = read_bincode(&self.paths.matrix)?;
        info!(
            "Loaded feature matrix: {} x {}, {} non-zeros",
            features.n_rows(),
            features.n_cols(),
            features.nnz()
        );

        let books: Vec<Book> = read_json(&self.paths.table)?;
        info!("Loaded book table: {} rows", books.len());

        let catalog = Catalog::new(books, features, index, vectorizer)?;
        info!("Catalog ready in {:?}", started.elapsed());
        Ok(catalog)
    }
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading {:?}", path);
    let reader = BufReader::new(File::open(path)?);
    bincode::deserialize_from(reader).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading {:?}", path);
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
