//! HTTP server.
//!
//! Embeds an axum server that executes GraphQL at `/graphql` and serves the
//! prebuilt frontend bundle on every other path.

use crate::config::Config;
use crate::error::AppError;
use crate::graphql::ScraperSchema;
use async_graphql::http::{parse_query_string, GraphiQLSource};
use async_graphql_axum::{GraphQLBatchRequest, GraphQLResponse};
use axum::body::Body;
use axum::extract::{RawQuery, State};
use axum::http::{Request, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub const GRAPHQL_PATH: &str = "/graphql";

/// Build the full router:
/// 1. `POST /graphql` executes single or batched queries, `GET /graphql`
///    executes `?query=` requests and otherwise serves GraphiQL
/// 2. A single fallback handler that:
///    - Returns 404 for unmatched `/graphql/*` paths
///    - Tries to serve a static file from the bundle directory
///    - Falls back to `index.html` for client-side routes
pub fn router(schema: ScraperSchema, frontend_dist: PathBuf) -> Router {
    // Read index.html once at startup for the SPA fallback.
    let index_html: Option<Arc<str>> = match std::fs::read_to_string(frontend_dist.join("index.html")) {
        Ok(html) => Some(html.into()),
        Err(e) => {
            log::warn!(
                "[server] No index.html in {}: {}",
                frontend_dist.display(),
                e
            );
            None
        }
    };

    let graphql = Router::new()
        .route(GRAPHQL_PATH, get(graphql_get).post(graphql_handler))
        .layer(CorsLayer::permissive())
        .with_state(schema);

    Router::new().merge(graphql).fallback(move |uri: Uri| {
        let html = index_html.clone();
        let dist = frontend_dist.clone();
        async move { spa_fallback(uri, &dist, html.as_deref()).await }
    })
}

async fn graphql_handler(
    State(schema): State<ScraperSchema>,
    request: GraphQLBatchRequest,
) -> GraphQLResponse {
    schema.execute_batch(request.into_inner()).await.into()
}

/// `GET /graphql`: run the query carried in the query string, or serve
/// GraphiQL when there is none.
async fn graphql_get(State(schema): State<ScraperSchema>, RawQuery(query): RawQuery) -> Response {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return graphiql().into_response();
    };

    match parse_query_string(&query) {
        Ok(request) => GraphQLResponse::from(schema.execute(request).await).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

/// SPA-aware fallback handler.
///
/// 1. Sub-paths of the GraphQL endpoint get a plain 404.
/// 2. Try to serve a static file from the bundle directory.
/// 3. If no file matches, return `index.html` so the frontend router can
///    handle the path.
async fn spa_fallback(uri: Uri, dist: &Path, index_html: Option<&str>) -> Response {
    if uri.path().starts_with("/graphql/") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let req = match Request::builder().uri(&uri).body(Body::empty()) {
        Ok(req) => req,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match ServeDir::new(dist).oneshot(req).await {
        Ok(res) if res.status() != StatusCode::NOT_FOUND => res.into_response(),
        _ => match index_html {
            Some(html) => Html(html.to_owned()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

/// Bind the configured port and serve until `shutdown` is cancelled.
pub async fn serve(
    config: &Config,
    schema: ScraperSchema,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let app = router(schema, config.frontend_dist.clone());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to port {}: {}", config.port, e)))?;

    log::info!("[server] Listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    log::info!("[server] Server stopped");
    Ok(())
}
