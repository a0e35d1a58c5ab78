//! API implementation for the Kindred HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post, put},
};
use kindred::storage::BaseStore;
use utoipa::OpenApi;

use crate::state::AppState;

pub mod dto;
mod dto_tests;
pub mod graph;
pub mod members;
pub mod partnerships;
pub mod relationships;

use dto::HealthResponse;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        members::order_children,
        members::get_ancestors,
        members::get_descendants,
        relationships::list_relationships,
        relationships::get_relationship,
        relationships::create_relationship,
        relationships::validate_relationship,
        relationships::validate_removal,
        relationships::update_relationship,
        relationships::delete_relationship,
        partnerships::list_partnerships,
        partnerships::create_partnership,
        partnerships::delete_partnership,
        graph::get_graph,
    ),
    components(
        schemas(
            dto::MemberDto,
            dto::CreateMemberRequest,
            dto::UpdateMemberRequest,
            dto::RelationshipDto,
            dto::CreateRelationshipRequest,
            dto::ChangeChildRequest,
            dto::ValidationResponse,
            dto::PartnershipDto,
            dto::CreatePartnershipRequest,
            dto::HealthResponse,
            dto::HateoasLinks,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "familymembers", description = "Family member management and traversal endpoints"),
        (name = "relationships", description = "Parent/child relationship management and validation endpoints"),
        (name = "partnerships", description = "Partnership management endpoints"),
        (name = "graph", description = "Render-ready family graph"),
    ),
    info(
        title = "Kindred Genealogy API",
        version = "1.0.0",
        description = "RESTful API for the Kindred genealogical graph engine. Every relationship write is checked for self-parenting, duplicates, the parent cap and cycles before it is stored.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "API base path")
    )
)]
pub struct ApiDoc;

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        // Family member endpoints
        .route(
            "/familymembers",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/familymembers/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route(
            "/familymembers/{id}/children",
            get(members::order_children),
        )
        .route(
            "/familymembers/{id}/ancestors",
            get(members::get_ancestors),
        )
        .route(
            "/familymembers/{id}/descendants",
            get(members::get_descendants),
        )
        // Relationship endpoints
        .route(
            "/relationships",
            get(relationships::list_relationships).post(relationships::create_relationship),
        )
        .route(
            "/relationships/validate",
            post(relationships::validate_relationship),
        )
        .route(
            "/relationships/parent/{parent_id}/child/{child_id}",
            get(relationships::get_relationship),
        )
        .route(
            "/relationships/{parent_id}/{child_id}",
            put(relationships::update_relationship).delete(relationships::delete_relationship),
        )
        .route(
            "/relationships/{parent_id}/{child_id}/removal",
            get(relationships::validate_removal),
        )
        // Partnership endpoints
        .route(
            "/partnerships",
            get(partnerships::list_partnerships).post(partnerships::create_partnership),
        )
        .route(
            "/partnerships/{a}/{b}",
            axum::routing::delete(partnerships::delete_partnership),
        )
        // Graph endpoint
        .route("/graph", get(graph::get_graph))
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Health check endpoint with storage metadata
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.family_manager.store();
    let healthy = store.health_check().await.unwrap_or(false);
    let storage = store.get_metadata().await.unwrap_or_default();

    Json(HealthResponse {
        status: if healthy { "OK" } else { "DEGRADED" }.to_string(),
        version: kindred::VERSION.to_string(),
        storage,
    })
}
