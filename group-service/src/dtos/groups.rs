use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{GroupSummary, MemberSummary};

/// Every group created through this service carries this display-name
/// prefix. Case-sensitive.
pub const GROUP_NAME_PREFIX: &str = "AAD.TA.";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Group name is required"),
        custom(function = validate_group_name_prefix)
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Group description is required"))]
    pub description: String,

    /// `Security` or `Microsoft365`; defaults to `Security` when omitted.
    #[serde(rename = "type", default = "default_group_type")]
    pub group_type: String,
}

fn default_group_type() -> String {
    "Security".to_string()
}

fn validate_group_name_prefix(name: &str) -> Result<(), ValidationError> {
    // Empty names are reported by the length rule; don't double up here.
    if name.is_empty() || name.starts_with(GROUP_NAME_PREFIX) {
        Ok(())
    } else {
        let mut err = ValidationError::new("prefix");
        err.message = Some("Group name must start with 'AAD.TA.' (case sensitive)".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupMemberRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchGroupsQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_top")]
    pub top: u32,
}

fn default_top() -> u32 {
    100
}

#[derive(Debug, Serialize)]
pub struct SearchGroupsResponse {
    pub groups: Vec<GroupSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembersResponse {
    pub group_id: String,
    pub members: Vec<MemberSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupResponse {
    pub message: String,
    pub group: GroupSummary,
}
