use anyhow::{Context, Result};
use axum::{extract::{Query, State}, http::StatusCode, routing::get, Json, Router};
use recsys::{load_index, Columns, QueryService, Recommendation, VectorizerOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const NOT_FOUND: &str = "Movie not found in dataset.";
const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct RecommendParams {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 5 }

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<Recommendation>,
}

#[derive(Serialize)]
pub struct TitlesResponse {
    pub count: usize,
    pub titles: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    /// Sorted distinct titles, computed once at startup
    pub titles: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(service: QueryService) -> Self {
        let titles = service.index().titles();
        Self { service: Arc::new(service), titles: Arc::new(titles) }
    }
}

/// Load the dataset, build the index and wire up the router.
pub fn build_app<P: AsRef<Path>>(data: P, columns: &Columns) -> Result<Router> {
    let data = data.as_ref();
    let (index, dropped) = load_index(data, columns, VectorizerOptions::default())
        .with_context(|| format!("building similarity index from {}", data.display()))?;
    tracing::info!(dropped, "dataset indexed");
    Ok(router(AppState::new(QueryService::new(index))))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/titles", get(titles_handler))
        .route("/recommend", get(recommend_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn titles_handler(State(state): State<AppState>) -> Json<TitlesResponse> {
    Json(TitlesResponse { count: state.titles.len(), titles: state.titles.as_ref().clone() })
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let query = params.title.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please select a movie title.".into()));
    }
    let k = params.k.clamp(1, MAX_K);
    match state.service.recommend_scored(&query, k) {
        Some(results) => {
            let took_s = start.elapsed().as_secs_f64();
            Ok(Json(RecommendResponse { query, took_s, results }))
        }
        None => Err((StatusCode::NOT_FOUND, NOT_FOUND.into())),
    }
}
