use anyhow::Context;
use bookrec_api::{HttpConfig, RestApi};
use bookrec_storage::{ArtifactPaths, CatalogLoader};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use bookrec_core::Catalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Read-only book recommendation API over precomputed artifacts
#[derive(Parser, Debug)]
#[command(name = "bookrec")]
#[command(about = "Serve book recommendations from a frozen similarity index", long_about = None)]
struct Args {
    /// Directory holding knn.bin, tfidf.json, tfidf_matrix.bin and books.json
    #[arg(short, long, default_value = "./artifacts")]
    artifacts_dir: PathBuf,

    /// Neighbor index file (overrides the artifacts directory)
    #[arg(long)]
    index: Option<PathBuf>,

    /// Vectorizer vocabulary file
    #[arg(long)]
    vectorizer: Option<PathBuf>,

    /// Feature matrix file
    #[arg(long)]
    matrix: Option<PathBuf>,

    /// Book table file
    #[arg(long)]
    table: Option<PathBuf>,

    /// Address to bind the HTTP API to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Number of HTTP worker threads (defaults to the number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Browser origin allowed to call the API with credentials
    #[arg(long, default_value = "http://localhost:3000")]
    cors_origin: String,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn artifact_paths(&self) -> ArtifactPaths {
        let mut paths = ArtifactPaths::in_dir(&self.artifacts_dir);
        if let Some(index) = &self.index {
            paths = paths.with_index(index);
        }
        if let Some(vectorizer) = &self.vectorizer {
            paths = paths.with_vectorizer(vectorizer);
        }
        if let Some(matrix) = &self.matrix {
            paths = paths.with_matrix(matrix);
        }
        if let Some(table) = &self.table {
            paths = paths.with_table(table);
        }
        paths
    }

    fn http_config(&self) -> HttpConfig {
        HttpConfig {
            host: self.host.clone(),
            port: self.http_port,
            workers: self.workers,
            cors_origin: self.cors_origin.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting bookrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Artifacts directory: {:?}", args.artifacts_dir);
    bookrec_api::check_origin(&args.cors_origin).context("invalid --cors-origin")?;

    let paths = args.artifact_paths();
    let catalog = tokio::task::spawn_blocking(move || CatalogLoader::new(paths).load())
        .await?
        .context("failed to load artifacts")?;
    let catalog = Arc::new(catalog);
    info!("Catalog loaded: {} books", catalog.len());

    let config = args.http_config();
    let http_port = config.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        serve_http(catalog, config)
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            joined?
                .map_err(|_| anyhow::anyhow!("HTTP server thread panicked"))?
                .context("HTTP server failed")?;
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

/// Runs the REST API on its own actix system until it stops or fails
fn serve_http(catalog: Arc<Catalog>, config: HttpConfig) -> std::io::Result<()> {
    actix_web::rt::System::new().block_on(RestApi::start(catalog, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrec_core::{Book, CsrMatrix, Distance, NeighborIndex, TfidfVectorizer};
    use std::collections::HashMap;
    use std::net::TcpListener;

    fn catalog() -> Arc<Catalog> {
        let features = CsrMatrix::from_rows(1, &[vec![(0, 1.0)]]).unwrap();
        let index = NeighborIndex::new(Distance::Cosine, features.clone()).unwrap();
        let vocabulary: HashMap<String, u32, ahash::RandomState> =
            [("ring".to_string(), 0)].into_iter().collect();
        let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0]).unwrap();
        let books = vec![Book::new("The Hobbit")];
        Arc::new(Catalog::new(books, features, index, vectorizer).unwrap())
    }

    #[test]
    fn test_serve_http_reports_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = HttpConfig {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            ..HttpConfig::default()
        };

        let err = serve_http(catalog(), config).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
    }

    #[test]
    fn test_defaults_parse() {
        let args = Args::parse_from(["bookrec"]);
        assert_eq!(args.http_port, 8000);
        assert!(bookrec_api::check_origin(&args.cors_origin).is_ok());
        assert_eq!(args.artifact_paths().table, PathBuf::from("./artifacts/books.json"));
    }
}
