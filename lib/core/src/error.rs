use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Malformed feature matrix: {0}")]
    MalformedMatrix(String),

    #[error("Artifacts misaligned: {artifact} has {actual} {unit}, expected {expected}")]
    Misaligned {
        artifact: &'static str,
        unit: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Row out of range: {row} (catalog has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
