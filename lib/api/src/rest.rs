use actix_cors::Cors;
use actix_web::http::Uri;
use actix_web::{
    error, middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult,
};
use bookrec_core::{Catalog, SearchOutcome};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_LIMIT: usize = 10;
const HOME_MESSAGE: &str = "Book Recommendation API Running 🚀";
const BOOK_NOT_FOUND: &str = "Book not found";
const NO_BOOKS_FOUND: &str = "No books found";

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Deserialize)]
struct TitleQuery {
    title: String,
    #[serde(default = "default_limit")]
    n: usize,
}

#[derive(Deserialize)]
struct NameQuery {
    name: String,
    #[serde(default = "default_limit")]
    n: usize,
}

#[derive(Deserialize)]
struct SearchQuery {
    query: String,
    #[serde(default = "default_limit")]
    n: usize,
}

/// Listener and CORS settings for the REST server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub cors_origin: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(catalog: Arc<Catalog>, config: HttpConfig) -> std::io::Result<()> {
        check_origin(&config.cors_origin)?;
        let origin = config.cors_origin.clone();
        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(cors_policy(&origin))
                .wrap(middleware::Logger::default())
                .app_data(web::Data::new(catalog.clone()))
                .configure(configure)
        });

        if let Some(workers) = config.workers {
            server = server.workers(workers);
        }

        server
            .bind((config.host.as_str(), config.port))?
            .run()
            .await
    }
}

/// Accepts a bare `scheme://host[:port]` origin, the only form the CORS
/// policy can match against a browser's `Origin` header.
pub fn check_origin(origin: &str) -> std::io::Result<()> {
    let invalid = || {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid CORS origin {origin:?}, expected scheme://host[:port]"),
        )
    };

    let uri: Uri = origin.parse().map_err(|_| invalid())?;
    let bare = matches!(uri.path(), "" | "/") && uri.query().is_none();
    if uri.scheme().is_none() || uri.authority().is_none() || !bare {
        return Err(invalid());
    }
    Ok(())
}

/// One trusted browser origin; any method and header; credentials allowed
pub fn cors_policy(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Register routes. Expects `web::Data<Arc<Catalog>>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/", web::get().to(home))
        .route("/recommend", web::get().to(recommend_by_title))
        .route("/author", web::get().to(recommend_by_author))
        .route("/category", web::get().to(recommend_by_category))
        .route("/books", web::get().to(list_books))
        .route("/search", web::get().to(search_books));
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": err.to_string()
    }));
    error::InternalError::from_response(err, response).into()
}

async fn home() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": HOME_MESSAGE
    })))
}

async fn recommend_by_title(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<TitleQuery>,
) -> ActixResult<HttpResponse> {
    match catalog.recommend_by_title(&query.title, query.n) {
        Some(recommendations) => Ok(HttpResponse::Ok().json(recommendations)),
        None => {
            debug!("No exact title match for {:?}", query.title);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "error": BOOK_NOT_FOUND
            })))
        }
    }
}

async fn recommend_by_author(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<NameQuery>,
) -> ActixResult<HttpResponse> {
    match catalog.recommend_by_author(&query.name, query.n) {
        Some(books) => Ok(HttpResponse::Ok().json(books)),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({
            "error": NO_BOOKS_FOUND
        }))),
    }
}

async fn recommend_by_category(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<NameQuery>,
) -> ActixResult<HttpResponse> {
    match catalog.recommend_by_category(&query.name, query.n) {
        Some(books) => Ok(HttpResponse::Ok().json(books)),
        None => Ok(HttpResponse::Ok().json(serde_json::json!({
            "error": NO_BOOKS_FOUND
        }))),
    }
}

async fn list_books(catalog: web::Data<Arc<Catalog>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(catalog.list_titles()))
}

async fn search_books(
    catalog: web::Data<Arc<Catalog>>,
    query: web::Query<SearchQuery>,
) -> ActixResult<HttpResponse> {
    let response = match catalog.unified_search(&query.query, query.n) {
        SearchOutcome::Similar(recommendations) => {
            debug!("Search {:?} answered by title", query.query);
            HttpResponse::Ok().json(recommendations)
        }
        SearchOutcome::ByAuthor(books) => {
            debug!("Search {:?} answered by author", query.query);
            HttpResponse::Ok().json(books)
        }
        SearchOutcome::ByCategory(books) => {
            debug!("Search {:?} answered by category", query.query);
            HttpResponse::Ok().json(books)
        }
        SearchOutcome::NoMatch => HttpResponse::Ok().json(serde_json::json!({
            "message": NO_BOOKS_FOUND
        })),
    };
    Ok(response)
}
