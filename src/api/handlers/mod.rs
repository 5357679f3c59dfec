use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{DescriptorSet, ResolutionResult};
use crate::render;
use crate::resolver::{ResolveError, Resolver};

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub smiles: Option<String>,
}

impl LookupQuery {
    /// The submitted structure, if any non-blank one was given.
    fn smiles(&self) -> Option<&str> {
        self.smiles.as_deref().filter(|s| !s.trim().is_empty())
    }
}

// ============================================================
// Error Handling
// ============================================================

fn error_body(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

/// Invalid structures are the caller's fault; nothing else reaches here.
fn invalid_input(e: ResolveError) -> ApiError {
    tracing::warn!("Rejected lookup: {:?}", e);
    error_body(StatusCode::BAD_REQUEST, e)
}

fn required_smiles(query: &LookupQuery) -> Result<&str, ApiError> {
    query
        .smiles()
        .ok_or_else(|| error_body(StatusCode::BAD_REQUEST, "Missing query parameter: smiles"))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Page
// ============================================================

pub async fn index(
    State(resolver): State<Arc<Resolver>>,
    Query(query): Query<LookupQuery>,
) -> Html<String> {
    match query.smiles() {
        Some(smiles) => {
            let outcome = resolver.resolve(smiles).await;
            Html(render::render_page(smiles, Some(&outcome)))
        }
        None => Html(render::render_page("", None)),
    }
}

// ============================================================
// Lookups
// ============================================================

pub async fn resolve_molecule(
    State(resolver): State<Arc<Resolver>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ResolutionResult>, ApiError> {
    let smiles = required_smiles(&query)?;
    resolver
        .resolve(smiles)
        .await
        .map(Json)
        .map_err(invalid_input)
}

pub async fn compute_descriptors(
    State(resolver): State<Arc<Resolver>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<DescriptorSet>, ApiError> {
    let smiles = required_smiles(&query)?;
    resolver.descriptors(smiles).map(Json).map_err(invalid_input)
}
