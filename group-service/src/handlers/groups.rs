use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

use crate::AppState;
use crate::dtos::groups::{
    AddGroupMemberRequest, CreateGroupRequest, CreateGroupResponse, GroupMembersResponse,
    SearchGroupsQuery, SearchGroupsResponse,
};
use crate::models::GroupType;
use crate::services::graph::MembershipAck;

/// GET /groups/search?search=&top=
pub async fn search_groups(
    State(state): State<AppState>,
    Query(params): Query<SearchGroupsQuery>,
) -> Result<Json<SearchGroupsResponse>, AppError> {
    let groups = state.graph.search_groups(&params.search, params.top).await?;
    Ok(Json(SearchGroupsResponse {
        count: groups.len(),
        groups,
    }))
}

/// GET /groups/:groupId/members
pub async fn get_group_members(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupMembersResponse>, AppError> {
    let members = state.graph.get_group_members(&group_id).await?;
    Ok(Json(GroupMembersResponse {
        group_id,
        count: members.len(),
        members,
    }))
}

/// POST /groups
///
/// Validation is local and short-circuits: an invalid request never reaches
/// the directory.
pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), AppError> {
    req.validate()?;
    let group_type = GroupType::parse(&req.group_type).ok_or_else(|| {
        AppError::FieldValidation {
            field: "type".to_string(),
            message: "Group type must be 'Security' or 'Microsoft365'".to_string(),
        }
    })?;

    let group = state
        .graph
        .create_group(&req.name, &req.description, group_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            message: "Group created successfully".to_string(),
            group,
        }),
    ))
}

/// POST /groups/:groupId/members
pub async fn add_group_member(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(req): Json<AddGroupMemberRequest>,
) -> Result<(StatusCode, Json<MembershipAck>), AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::FieldValidation {
            field: "userId".to_string(),
            message: "userId is required".to_string(),
        });
    }

    let ack = state.graph.add_group_member(&group_id, &req.user_id).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}
