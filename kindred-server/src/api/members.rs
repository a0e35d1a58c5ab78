//! Family member API endpoints

use std::sync::Arc;

use axum::{
    Json as JsonExtractor,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use kindred::models::MemberId;

use crate::{
    api::dto::{CreateMemberRequest, MemberDto, UpdateMemberRequest},
    error::ServerResult,
    state::AppState,
};

/// List family members ordered by id
#[utoipa::path(
    get,
    path = "/api/familymembers",
    tag = "familymembers",
    responses(
        (status = 200, description = "List of family members", body = Vec<MemberDto>),
    )
)]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> ServerResult<Json<Vec<MemberDto>>> {
    let members = state.family_manager.list_members().await?;
    Ok(Json(members.into_iter().map(MemberDto::from).collect()))
}

/// Get a specific family member
#[utoipa::path(
    get,
    path = "/api/familymembers/{id}",
    tag = "familymembers",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = MemberDto),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ServerResult<Json<MemberDto>> {
    let member = state.family_manager.get_member(MemberId(id)).await?;
    Ok(Json(MemberDto::from(member)))
}

/// Create a new family member
#[utoipa::path(
    post,
    path = "/api/familymembers",
    tag = "familymembers",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created successfully", body = MemberDto),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<CreateMemberRequest>,
) -> ServerResult<(StatusCode, Json<MemberDto>)> {
    let member = state.family_manager.create_member(request.into()).await?;
    Ok((StatusCode::CREATED, Json(MemberDto::from(member))))
}

/// Update a family member
#[utoipa::path(
    put,
    path = "/api/familymembers/{id}",
    tag = "familymembers",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated successfully", body = MemberDto),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<UpdateMemberRequest>,
) -> ServerResult<Json<MemberDto>> {
    let member = state
        .family_manager
        .update_member(MemberId(id), request.into())
        .await?;
    Ok(Json(MemberDto::from(member)))
}

/// Delete a family member
///
/// Under the default `restrict` policy a member who still has relationships
/// or partnerships cannot be deleted (409).
#[utoipa::path(
    delete,
    path = "/api/familymembers/{id}",
    tag = "familymembers",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 204, description = "Member deleted successfully"),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Member still has relationships", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ServerResult<StatusCode> {
    state.family_manager.delete_member(MemberId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Children of a member ordered by date of birth, undated last
#[utoipa::path(
    get,
    path = "/api/familymembers/{id}/children",
    tag = "familymembers",
    params(
        ("id" = i64, Path, description = "Parent member ID")
    ),
    responses(
        (status = 200, description = "Child ids, oldest first", body = Vec<i64>),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn order_children(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Vec<i64>>> {
    let children = state.family_manager.order_children(MemberId(id)).await?;
    Ok(Json(children.into_iter().map(MemberId::get).collect()))
}

/// Every ancestor of a member, nearest generation first
#[utoipa::path(
    get,
    path = "/api/familymembers/{id}/ancestors",
    tag = "familymembers",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Ancestors", body = Vec<MemberDto>),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_ancestors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Vec<MemberDto>>> {
    let ancestors = state.family_manager.ancestors(MemberId(id)).await?;
    Ok(Json(ancestors.into_iter().map(MemberDto::from).collect()))
}

/// Every descendant of a member, nearest generation first
#[utoipa::path(
    get,
    path = "/api/familymembers/{id}/descendants",
    tag = "familymembers",
    params(
        ("id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Descendants", body = Vec<MemberDto>),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_descendants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Vec<MemberDto>>> {
    let descendants = state.family_manager.descendants(MemberId(id)).await?;
    Ok(Json(descendants.into_iter().map(MemberDto::from).collect()))
}
