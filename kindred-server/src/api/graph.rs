//! Family graph endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::ServerResult, state::AppState};

/// Render the whole family as `{ nodes, edges }`
///
/// Each node carries the member's label and dates, each edge the child's
/// rank among its siblings. Identical records always produce identical bytes.
#[utoipa::path(
    get,
    path = "/api/graph",
    tag = "graph",
    responses(
        (status = 200, description = "Render-ready family graph", body = serde_json::Value, content_type = "application/json"),
    )
)]
pub async fn get_graph(State(state): State<Arc<AppState>>) -> ServerResult<Response> {
    let payload = state.family_manager.get_graph().await?;
    let body = payload.to_json_bytes()?;

    tracing::debug!(
        nodes = payload.nodes.len(),
        edges = payload.edges.len(),
        "Rendered family graph"
    );

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
