//! Partnership API endpoints

use std::sync::Arc;

use axum::{
    Json as JsonExtractor,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use kindred::models::MemberId;

use crate::{
    api::dto::{CreatePartnershipRequest, PartnershipDto},
    error::ServerResult,
    state::AppState,
};

/// List partnerships
#[utoipa::path(
    get,
    path = "/api/partnerships",
    tag = "partnerships",
    responses(
        (status = 200, description = "List of partnerships", body = Vec<PartnershipDto>),
    )
)]
pub async fn list_partnerships(
    State(state): State<Arc<AppState>>,
) -> ServerResult<Json<Vec<PartnershipDto>>> {
    let partnerships = state.family_manager.list_partnerships().await?;
    Ok(Json(
        partnerships.into_iter().map(PartnershipDto::from).collect(),
    ))
}

/// Record a partnership between two members
#[utoipa::path(
    post,
    path = "/api/partnerships",
    tag = "partnerships",
    request_body = CreatePartnershipRequest,
    responses(
        (status = 201, description = "Partnership created successfully", body = PartnershipDto),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Partnership rejected", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_partnership(
    State(state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreatePartnershipRequest>,
) -> ServerResult<(StatusCode, Json<PartnershipDto>)> {
    let created = state
        .family_manager
        .add_partnership(MemberId(request.partner1_id), MemberId(request.partner2_id))
        .await?;
    Ok((StatusCode::CREATED, Json(PartnershipDto::from(created))))
}

/// Delete a partnership; the pair may be given in either order
#[utoipa::path(
    delete,
    path = "/api/partnerships/{a}/{b}",
    tag = "partnerships",
    params(
        ("a" = i64, Path, description = "First partner ID"),
        ("b" = i64, Path, description = "Second partner ID")
    ),
    responses(
        (status = 204, description = "Partnership deleted successfully"),
        (status = 404, description = "Partnership not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_partnership(
    State(state): State<Arc<AppState>>,
    Path((a, b)): Path<(i64, i64)>,
) -> ServerResult<StatusCode> {
    state
        .family_manager
        .remove_partnership(MemberId(a), MemberId(b))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
