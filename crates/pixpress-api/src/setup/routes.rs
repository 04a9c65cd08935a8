//! Route configuration and setup

mod health;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, DOCS_PATH, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, MatchedPath},
    http::{HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use pixpress_core::Config;
use pixpress_infra::{
    request_id_middleware, security_headers_middleware, RequestId, SecurityHeadersConfig,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Request span carrying the route and the id set by the request-id middleware
#[derive(Clone, Copy, Debug, Default)]
struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let uri = request.uri().path();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(|mp| mp.as_str())
            .unwrap_or(uri);
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or_default();

        tracing::info_span!(
            "http_request",
            http.method = %request.method(),
            http.route = %route,
            http.target = %uri,
            request_id = %request_id,
        )
    }
}

fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_024)
        .max(1);

    let photo_routes = Router::new()
        .route("/", get(handlers::index::index))
        .route(&api_path("/"), get(handlers::index::index))
        .route(&api_path("/upload"), post(handlers::upload::upload_files))
        .route(&api_path("/compress"), post(handlers::compress::compress_files))
        .route(
            &api_path("/download/{filename}"),
            get(handlers::download::download_file),
        )
        .route(&api_path("/cleanup"), post(handlers::cleanup::cleanup_files))
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    let app = photo_routes
        .merge(RapiDoc::with_openapi(OPENAPI_PATH, ApiDoc::openapi()).path(DOCS_PATH))
        // Multipart bodies are bounded by RequestBodyLimitLayer instead
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    tracing::debug!(http_concurrency_limit, "Routes configured");

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
