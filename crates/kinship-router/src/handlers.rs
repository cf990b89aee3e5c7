//! HTTP request handlers for the relationship service.
//!
//! Store calls are synchronous SQLite work and run on the blocking pool.

use crate::error::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use kinship_domain::traits::{PersonDirectory, RelationshipGraphStore};
use kinship_domain::{
    EdgeStatus, KinshipError, PersonId, RelationshipEdge, RelationshipRequest,
    RelationshipTypeCatalog, RelationshipTypeDefinition, RequestId, Suggestion, SuggestionId,
};
use kinship_store::SqliteStore;
use kinship_workflow::{SuggestionPolicy, SuggestionStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Backing store
    pub store: Arc<SqliteStore>,
    /// Suggestion service, which also owns the request workflow
    pub suggestions: Arc<SuggestionStore<SqliteStore>>,
}

impl AppState {
    /// Build state over `store` with the given suggestion policy
    pub fn new(store: Arc<SqliteStore>, policy: SuggestionPolicy) -> Self {
        let suggestions = Arc::new(SuggestionStore::with_policy(Arc::clone(&store), policy));
        Self { store, suggestions }
    }
}

/// Suggestion generation request
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Subject to generate suggestions for
    pub person_id: PersonId,
}

/// Relationship request creation body
#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    /// Person proposing the relationship
    pub requester_id: PersonId,
    /// Person asked to confirm it
    pub target_id: PersonId,
    /// What the target is to the requester
    pub type_code: String,
    /// Free-text note for the target
    #[serde(default)]
    pub message: String,
}

/// Optional status filter for relationship listings
#[derive(Debug, Deserialize)]
pub struct RelationshipsQuery {
    /// `pending`, `accepted` or `rejected`; all statuses when absent
    pub status: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of known people
    pub people: usize,
}

async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> kinship_domain::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

fn parse_suggestion_id(raw: &str) -> Result<SuggestionId, AppError> {
    SuggestionId::from_string(raw).map_err(AppError::BadRequest)
}

fn parse_request_id(raw: &str) -> Result<RequestId, AppError> {
    RequestId::from_string(raw).map_err(AppError::BadRequest)
}

/// Refresh both ends of a newly confirmed edge
///
/// The confirmation already succeeded; a failed refresh is only logged.
fn regenerate_parties(suggestions: &SuggestionStore<SqliteStore>, edge: &RelationshipEdge) {
    for person in [edge.from_person_id, edge.to_person_id] {
        if let Err(e) = suggestions.generate_for(person) {
            warn!(%person, error = %e, "Failed to regenerate suggestions after confirmation");
        }
    }
}

/// GET /health - Store reachability
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>, AppError> {
    let store = Arc::clone(&state.store);
    let people = blocking(move || store.person_ids()).await?.len();
    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        people,
    }))
}

/// GET /relationship-types - The catalog
async fn relationship_types() -> Json<Vec<RelationshipTypeDefinition>> {
    Json(
        RelationshipTypeCatalog::standard()
            .definitions()
            .cloned()
            .collect(),
    )
}

/// GET /people/:id/relationships - Edges touching a person
async fn relationships(
    State(state): State<AppState>,
    Path(person): Path<u64>,
    Query(query): Query<RelationshipsQuery>,
) -> Result<Json<Vec<RelationshipEdge>>, AppError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            EdgeStatus::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown edge status '{}'", raw)))?,
        ),
        None => None,
    };
    let store = Arc::clone(&state.store);
    let edges = blocking(move || store.edges_of(PersonId::new(person), status)).await?;
    Ok(Json(edges))
}

/// POST /suggestions/generate - Regenerate suggestions for one person
async fn generate_suggestions(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    let AppState { store, suggestions } = state;
    let subject = body.person_id;
    let stored = blocking(move || {
        store
            .get_person(subject)?
            .ok_or_else(|| KinshipError::NotFound(format!("person {}", subject)))?;
        suggestions.generate_for(subject)
    })
    .await?;
    Ok(Json(stored))
}

/// GET /people/:id/suggestions - Pending suggestions, highest confidence first
async fn pending_suggestions(
    State(state): State<AppState>,
    Path(person): Path<u64>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    let suggestions = state.suggestions;
    let pending = blocking(move || suggestions.pending_for(PersonId::new(person))).await?;
    Ok(Json(pending))
}

/// POST /suggestions/:id/accept - Confirm a suggestion
async fn accept_suggestion(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<RelationshipEdge>, AppError> {
    let id = parse_suggestion_id(&raw)?;
    let suggestions = state.suggestions;
    let edge = blocking(move || {
        let edge = suggestions.accept(id)?;
        regenerate_parties(&suggestions, &edge);
        Ok(edge)
    })
    .await?;
    Ok(Json(edge))
}

/// POST /suggestions/:id/dismiss - Dismiss a suggestion
async fn dismiss_suggestion(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Suggestion>, AppError> {
    let id = parse_suggestion_id(&raw)?;
    let suggestions = state.suggestions;
    let dismissed = blocking(move || suggestions.dismiss(id)).await?;
    Ok(Json(dismissed))
}

/// POST /requests - Propose a relationship
async fn create_request(
    State(state): State<AppState>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<RelationshipRequest>), AppError> {
    let workflow = state.suggestions.requests().clone();
    let request = blocking(move || {
        workflow.create(body.requester_id, body.target_id, &body.type_code, &body.message)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /requests/:id - Look up a request
async fn get_request(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<RelationshipRequest>, AppError> {
    let id = parse_request_id(&raw)?;
    let workflow = state.suggestions.requests().clone();
    let request = blocking(move || workflow.get(id)).await?;
    Ok(Json(request))
}

/// GET /people/:id/requests - Incoming pending requests
async fn incoming_requests(
    State(state): State<AppState>,
    Path(person): Path<u64>,
) -> Result<Json<Vec<RelationshipRequest>>, AppError> {
    let workflow = state.suggestions.requests().clone();
    let pending = blocking(move || workflow.pending_for(PersonId::new(person))).await?;
    Ok(Json(pending))
}

/// POST /requests/:id/accept - Accept a request
async fn accept_request(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<RelationshipEdge>, AppError> {
    let id = parse_request_id(&raw)?;
    let suggestions = state.suggestions;
    let edge = blocking(move || {
        let edge = suggestions.requests().accept(id)?;
        regenerate_parties(&suggestions, &edge);
        Ok(edge)
    })
    .await?;
    Ok(Json(edge))
}

/// POST /requests/:id/reject - Reject a request
async fn reject_request(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<RelationshipRequest>, AppError> {
    let id = parse_request_id(&raw)?;
    let workflow = state.suggestions.requests().clone();
    let rejected = blocking(move || workflow.reject(id)).await?;
    Ok(Json(rejected))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/relationship-types", get(relationship_types))
        .route("/people/:id/relationships", get(relationships))
        .route("/people/:id/suggestions", get(pending_suggestions))
        .route("/people/:id/requests", get(incoming_requests))
        .route("/suggestions/generate", post(generate_suggestions))
        .route("/suggestions/:id/accept", post(accept_suggestion))
        .route("/suggestions/:id/dismiss", post(dismiss_suggestion))
        .route("/requests", post(create_request))
        .route("/requests/:id", get(get_request))
        .route("/requests/:id/accept", post(accept_request))
        .route("/requests/:id/reject", post(reject_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = Arc::new(SqliteStore::new(":memory:").unwrap());
        AppState::new(store, SuggestionPolicy::default())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_suggestion_id() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/suggestions/not-a-uuid/accept")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_status_filter() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/people/1/relationships?status=maybe")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
