//! HTTP Handlers
//!
//! Request handlers for the peer cache path and the operational endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use prost::Message;

use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, StatsResponse};
use crate::pb;

use super::HttpPool;

/// Handler for GET `<base_path>:group/:key`
///
/// Resolves the group on this node, runs the full read path and returns
/// the value as a protobuf-encoded octet stream. Axum has already
/// percent-decoded both path segments.
pub async fn serve_handler(
    State(pool): State<Arc<HttpPool>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let group = pool
        .registry()
        .get(&group_name)
        .ok_or_else(|| CacheError::NoSuchGroup(group_name.clone()))?;

    let view = group.get(&key).await?;

    let body = pb::Response {
        value: view.byte_slice(),
    }
    .encode_to_vec();

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], body))
}

/// Handler for GET /stats
///
/// Returns a snapshot of every group's counters on this node.
pub async fn stats_handler(State(pool): State<Arc<HttpPool>>) -> Json<StatsResponse> {
    Json(StatsResponse::new(pool.registry().stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
