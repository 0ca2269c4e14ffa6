use crate::document::{Document, DocumentType};
use crate::engine::{DocumentFilter, DocumentMatch, SearchEngine, SearchIndex};
use crate::index::IndexStats;
use crate::ranking::MatchDetail;
use anyhow::anyhow;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared server state: the facade behind a lock that is only held long
/// enough to clone or swap the current snapshot.
pub struct AppState {
    engine: RwLock<SearchEngine>,
}

impl AppState {
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    fn snapshot(&self) -> Result<Arc<SearchIndex>, AppError> {
        let engine = self
            .engine
            .read()
            .map_err(|_| anyhow!("search engine lock poisoned"))?;
        Ok(engine.snapshot())
    }

    fn default_limit(&self) -> Result<usize, AppError> {
        let engine = self
            .engine
            .read()
            .map_err(|_| anyhow!("search engine lock poisoned"))?;
        Ok(engine.config().default_limit)
    }

    fn replace(&self, documents: Vec<Document>) -> Result<usize, AppError> {
        let config = {
            let engine = self
                .engine
                .read()
                .map_err(|_| anyhow!("search engine lock poisoned"))?;
            engine.config().clone()
        };

        // Build outside the write lock so searches keep running meanwhile
        let snapshot = SearchIndex::with_config(documents, &config);
        let indexed = snapshot.index().total_documents();

        self.engine
            .write()
            .map_err(|_| anyhow!("search engine lock poisoned"))?
            .install(snapshot);
        Ok(indexed)
    }
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub document_type: Option<DocumentType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub document: Document,
    pub score: f64,
    pub matches: Vec<MatchDetail>,
}

impl From<DocumentMatch<'_>> for MatchResponse {
    fn from(m: DocumentMatch<'_>) -> Self {
        Self {
            document: m.document.clone(),
            score: m.score,
            matches: m.matches,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<MatchResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceResponse {
    pub received: usize,
    pub indexed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub supplied_documents: usize,
    #[serde(flatten)]
    pub index: IndexStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(message)),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn list_documents(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot()?;
    Ok(Json(ApiResponse::success(snapshot.documents().to_vec())))
}

async fn replace_documents(
    State(state): State<Arc<AppState>>,
    Json(documents): Json<Vec<Document>>,
) -> Result<impl IntoResponse, AppError> {
    let received = documents.len();
    let indexed = state.replace(documents)?;
    tracing::info!(received, indexed, "document set replaced");

    Ok(Json(ApiResponse::success(ReplaceResponse { received, indexed })))
}

async fn search_documents(
    State(state): State<Arc<AppState>>,
    Query(req): Query<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let limit = match req.limit {
        Some(limit) => limit,
        None => state.default_limit()?,
    };
    let filter = DocumentFilter {
        category: req.category,
        document_type: req.document_type,
    };

    let snapshot = state.snapshot()?;
    let results: Vec<MatchResponse> = filter
        .apply(snapshot.search(&req.q, limit))
        .into_iter()
        .map(MatchResponse::from)
        .collect();

    tracing::info!(query = %req.q, results = results.len(), "search");

    Ok(Json(ApiResponse::success(SearchResponse {
        query: req.q,
        total: results.len(),
        results,
    })))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot()?;

    Ok(Json(ApiResponse::success(StatsResponse {
        supplied_documents: snapshot.documents().len(),
        index: snapshot.stats(),
    })))
}

// ========== Router ==========

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/documents", get(list_documents).put(replace_documents))
        .route("/search", get(search_documents))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app() -> Router {
        let mut engine = SearchEngine::new();
        engine.set_documents(vec![
            Document::new(1, "Password Policy", "Rotate passwords every 90 days.")
                .with_category("Authentication")
                .with_tags(["password", "security"]),
            Document::new(2, "VPN Setup Guide", "Configure the company VPN.")
                .with_category("Technical Guides")
                .with_type(DocumentType::Onboarding),
        ]);
        create_router(Arc::new(AppState::new(engine)))
    }

    async fn send<T: DeserializeOwned>(app: Router, request: Request<Body>) -> (StatusCode, T) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body): (_, ApiResponse<String>) = send(app(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.as_deref(), Some("OK"));
    }

    #[tokio::test]
    async fn test_search() {
        let (status, body): (_, ApiResponse<SearchResponse>) =
            send(app(), get_request("/search?q=password&limit=5")).await;
        assert_eq!(status, StatusCode::OK);

        let data = body.data.unwrap();
        assert_eq!(data.total, 1);
        assert_eq!(data.results[0].document.id, 1);
        assert!(data.results[0].score > 0.0);
        assert!(!data.results[0].matches.is_empty());
    }

    #[tokio::test]
    async fn test_search_filters() {
        let (_, body): (_, ApiResponse<SearchResponse>) =
            send(app(), get_request("/search?q=password%20vpn&type=onboarding")).await;
        let data = body.data.unwrap();
        assert_eq!(data.total, 1);
        assert_eq!(data.results[0].document.id, 2);

        let (_, body): (_, ApiResponse<SearchResponse>) = send(
            app(),
            get_request("/search?q=password%20vpn&category=AUTHENTICATION"),
        )
        .await;
        let data = body.data.unwrap();
        assert_eq!(data.total, 1);
        assert_eq!(data.results[0].document.id, 1);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let response = app().oneshot(get_request("/search")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_replace_documents() {
        let app = app();
        let body = serde_json::to_vec(&vec![
            Document::new(5, "Incident Response", "Report within 2 hours."),
            Document::new(6, "Old Incident Process", "").with_active(false),
        ])
        .unwrap();
        let request = Request::builder()
            .method("PUT")
            .uri("/documents")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let (status, body): (_, ApiResponse<ReplaceResponse>) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        let data = body.data.unwrap();
        assert_eq!((data.received, data.indexed), (2, 1));

        let (_, body): (_, ApiResponse<SearchResponse>) =
            send(app.clone(), get_request("/search?q=incident")).await;
        let data = body.data.unwrap();
        assert_eq!(data.total, 1);
        assert_eq!(data.results[0].document.id, 5);

        let (_, body): (_, ApiResponse<StatsResponse>) = send(app, get_request("/stats")).await;
        let data = body.data.unwrap();
        assert_eq!(data.supplied_documents, 2);
        assert_eq!(data.index.total_documents, 1);
    }
}
