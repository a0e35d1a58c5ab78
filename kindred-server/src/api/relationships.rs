//! Relationship management API endpoints

use std::sync::Arc;

use axum::{
    Json as JsonExtractor,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use kindred::KindredError;
use kindred::models::MemberId;
use kindred::storage::RelationshipFilter;

use crate::{
    api::dto::{
        ChangeChildRequest, CreateRelationshipRequest, RelationshipDto, ValidationResponse,
    },
    error::ServerResult,
    state::AppState,
};

/// Query parameters for listing relationships
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRelationshipsParams {
    /// Filter by parent member ID
    pub parent_id: Option<i64>,

    /// Filter by child member ID
    pub child_id: Option<i64>,
}

impl From<ListRelationshipsParams> for RelationshipFilter {
    fn from(params: ListRelationshipsParams) -> Self {
        Self {
            parent_id: params.parent_id.map(MemberId),
            child_id: params.child_id.map(MemberId),
        }
    }
}

/// List relationships in insertion order
#[utoipa::path(
    get,
    path = "/api/relationships",
    tag = "relationships",
    params(ListRelationshipsParams),
    responses(
        (status = 200, description = "List of relationships", body = Vec<RelationshipDto>),
    )
)]
pub async fn list_relationships(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRelationshipsParams>,
) -> ServerResult<Json<Vec<RelationshipDto>>> {
    let relationships = state
        .family_manager
        .list_relationships(Some(params.into()))
        .await?;

    Ok(Json(
        relationships
            .into_iter()
            .map(RelationshipDto::from)
            .collect(),
    ))
}

/// Get a specific relationship
#[utoipa::path(
    get,
    path = "/api/relationships/parent/{parent_id}/child/{child_id}",
    tag = "relationships",
    params(
        ("parent_id" = i64, Path, description = "Parent member ID"),
        ("child_id" = i64, Path, description = "Child member ID")
    ),
    responses(
        (status = 200, description = "Relationship details", body = RelationshipDto),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_relationship(
    State(state): State<Arc<AppState>>,
    Path((parent_id, child_id)): Path<(i64, i64)>,
) -> ServerResult<Json<RelationshipDto>> {
    let relationship = state
        .family_manager
        .get_relationship(MemberId(parent_id), MemberId(child_id))
        .await?;
    Ok(Json(RelationshipDto::from(relationship)))
}

/// Create a new relationship
#[utoipa::path(
    post,
    path = "/api/relationships",
    tag = "relationships",
    request_body = CreateRelationshipRequest,
    responses(
        (status = 201, description = "Relationship created successfully", body = RelationshipDto),
        (status = 404, description = "Parent or child not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Relationship rejected", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_relationship(
    State(state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreateRelationshipRequest>,
) -> ServerResult<(StatusCode, Json<RelationshipDto>)> {
    let (parent_id, child_id) = request.ids();
    let created = state
        .family_manager
        .add_relationship(parent_id, child_id)
        .await?;

    Ok((StatusCode::CREATED, Json(RelationshipDto::from(created))))
}

/// Check whether a relationship could be added without writing it
#[utoipa::path(
    post,
    path = "/api/relationships/validate",
    tag = "relationships",
    request_body = CreateRelationshipRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidationResponse),
    )
)]
pub async fn validate_relationship(
    State(state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreateRelationshipRequest>,
) -> ServerResult<Json<ValidationResponse>> {
    let (parent_id, child_id) = request.ids();
    match state
        .family_manager
        .validate_new_relationship(parent_id, child_id)
        .await
    {
        Ok(()) => Ok(Json(ValidationResponse::ok())),
        Err(KindredError::Rejected(rejection)) => {
            Ok(Json(ValidationResponse::rejected(rejection.code())))
        }
        Err(e) => Err(e.into()),
    }
}

/// Check that a relationship exists and may be removed
#[utoipa::path(
    get,
    path = "/api/relationships/{parent_id}/{child_id}/removal",
    tag = "relationships",
    params(
        ("parent_id" = i64, Path, description = "Parent member ID"),
        ("child_id" = i64, Path, description = "Child member ID")
    ),
    responses(
        (status = 200, description = "Relationship may be removed", body = ValidationResponse),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn validate_removal(
    State(state): State<Arc<AppState>>,
    Path((parent_id, child_id)): Path<(i64, i64)>,
) -> ServerResult<Json<ValidationResponse>> {
    state
        .family_manager
        .validate_relationship_removal(MemberId(parent_id), MemberId(child_id))
        .await?;
    Ok(Json(ValidationResponse::ok()))
}

/// Point an existing relationship at a different child
#[utoipa::path(
    put,
    path = "/api/relationships/{parent_id}/{child_id}",
    tag = "relationships",
    params(
        ("parent_id" = i64, Path, description = "Parent member ID"),
        ("child_id" = i64, Path, description = "Current child member ID")
    ),
    request_body = ChangeChildRequest,
    responses(
        (status = 200, description = "Relationship updated successfully", body = RelationshipDto),
        (status = 404, description = "Relationship or new child not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Relationship rejected", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_relationship(
    State(state): State<Arc<AppState>>,
    Path((parent_id, child_id)): Path<(i64, i64)>,
    JsonExtractor(request): JsonExtractor<ChangeChildRequest>,
) -> ServerResult<Json<RelationshipDto>> {
    let updated = state
        .family_manager
        .change_child(
            MemberId(parent_id),
            MemberId(child_id),
            MemberId(request.new_child_id),
        )
        .await?;
    Ok(Json(RelationshipDto::from(updated)))
}

/// Delete a relationship
#[utoipa::path(
    delete,
    path = "/api/relationships/{parent_id}/{child_id}",
    tag = "relationships",
    params(
        ("parent_id" = i64, Path, description = "Parent member ID"),
        ("child_id" = i64, Path, description = "Child member ID")
    ),
    responses(
        (status = 204, description = "Relationship deleted successfully"),
        (status = 404, description = "Relationship not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_relationship(
    State(state): State<Arc<AppState>>,
    Path((parent_id, child_id)): Path<(i64, i64)>,
) -> ServerResult<StatusCode> {
    state
        .family_manager
        .remove_relationship(MemberId(parent_id), MemberId(child_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
