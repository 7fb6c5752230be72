//! Directory operations against Microsoft Graph.
//!
//! Each operation wraps one remote call, shapes the response into the
//! service's own types, and translates remote failures into `ServiceError`.

mod auth;
mod client;

pub use auth::TokenCache;
pub use client::{GraphClient, ODataResponse};

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::config::AzureAdConfig;
use crate::models::{GroupSummary, GroupType, MemberSummary, PrincipalType};
use crate::services::error::ServiceError;
use crate::services::metrics::record_directory_operation;

/// Fields requested from the directory for every group read.
const GROUP_SELECT_FIELDS: &str = "id,displayName,description,mailEnabled,securityEnabled";

/// Group record as it comes off the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphGroup {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mail_enabled: Option<bool>,
    #[serde(default)]
    security_enabled: Option<bool>,
}

/// Heterogeneous member record; the discriminator tells the principal kind.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDirectoryObject {
    #[serde(rename = "@odata.type", default)]
    odata_type: Option<String>,
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphOrganization {
    #[serde(default)]
    display_name: Option<String>,
}

/// Outcome of the connectivity probe. Always a payload, never an error.
#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        self.status == "connected"
    }
}

/// Acknowledgement returned by the membership-add operation. Graph answers
/// the reference-add with 204 No Content, so the ack is shaped locally.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipAck {
    pub message: String,
    pub group_id: String,
    pub user_id: String,
}

/// Directory client, constructed once at startup and shared by every
/// handler through `AppState`. Cloning is cheap; internals are shared.
#[derive(Debug, Clone)]
pub struct GraphService {
    client: GraphClient,
    tenant_id: String,
}

impl GraphService {
    /// Builds the client stack. No network call happens here; credentials
    /// are exercised on first use.
    pub fn new(config: &AzureAdConfig) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to create HTTP client: {e}")))?;

        let token_cache = Arc::new(TokenCache::new(config.clone(), http_client.clone()));
        let client = GraphClient::new(token_cache, config.graph_api_base(), http_client);

        Ok(Self {
            client,
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Probes directory connectivity by listing organization info. Failures
    /// are folded into the status payload instead of surfacing as errors, so
    /// the probe endpoint stays non-disruptive.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> ConnectionStatus {
        info!("Testing directory connection");

        let result = self
            .client
            .get::<ODataResponse<GraphOrganization>>("/organization", &[])
            .await;

        match result {
            Ok(page) => {
                record_directory_operation("test_connection", "success");
                match page.value.into_iter().next() {
                    Some(org) => ConnectionStatus {
                        status: "connected".to_string(),
                        tenant_id: Some(self.tenant_id.clone()),
                        organization: Some(
                            org.display_name.unwrap_or_else(|| "Unknown".to_string()),
                        ),
                        error: None,
                        message: "Successfully connected to Azure AD and MS Graph API"
                            .to_string(),
                    },
                    None => ConnectionStatus {
                        status: "connected".to_string(),
                        tenant_id: Some(self.tenant_id.clone()),
                        organization: None,
                        error: None,
                        message: "Connected but could not retrieve organization info".to_string(),
                    },
                }
            }
            Err(e) => {
                record_directory_operation("test_connection", "error");
                error!(error = %e, "Directory connection test failed");
                ConnectionStatus {
                    status: "failed".to_string(),
                    tenant_id: None,
                    organization: None,
                    error: Some(e.to_string()),
                    message: "Failed to connect to Azure AD".to_string(),
                }
            }
        }
    }

    /// Searches directory groups. A non-empty term becomes a
    /// `startswith(displayName, ...)` filter; results keep remote order and
    /// are capped at `top`.
    #[instrument(skip(self))]
    pub async fn search_groups(
        &self,
        search_term: &str,
        top: u32,
    ) -> Result<Vec<GroupSummary>, ServiceError> {
        info!(search_term, top, "Searching directory groups");

        let mut query: Vec<(&str, String)> = vec![
            ("$select", GROUP_SELECT_FIELDS.to_string()),
            ("$top", top.to_string()),
        ];
        if !search_term.is_empty() {
            query.push((
                "$filter",
                format!(
                    "startswith(displayName, '{}')",
                    escape_odata_literal(search_term)
                ),
            ));
        }

        let result = self
            .client
            .get::<ODataResponse<GraphGroup>>("/groups", &query)
            .await;
        record_outcome("search_groups", &result);

        let groups: Vec<GroupSummary> = result?.value.into_iter().map(map_group).collect();
        info!(count = groups.len(), "Group search completed");
        Ok(groups)
    }

    /// Fetches the direct members of a group. An unknown group id is a
    /// remote failure; no local existence pre-check is made.
    #[instrument(skip(self))]
    pub async fn get_group_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<MemberSummary>, ServiceError> {
        info!(group_id, "Fetching group members");

        let result = self
            .client
            .get::<ODataResponse<GraphDirectoryObject>>(
                &format!("/groups/{group_id}/members"),
                &[],
            )
            .await;
        record_outcome("get_group_members", &result);

        let members: Vec<MemberSummary> = result?.value.into_iter().map(map_member).collect();
        info!(group_id, count = members.len(), "Fetched group members");
        Ok(members)
    }

    /// Creates a directory group after checking the name is unused.
    ///
    /// The existence check and the create are two separate remote calls; a
    /// concurrent creator can still slip a duplicate in between them.
    #[instrument(skip(self, description))]
    pub async fn create_group(
        &self,
        name: &str,
        description: &str,
        group_type: GroupType,
    ) -> Result<GroupSummary, ServiceError> {
        info!(name, group_type = %group_type, "Creating directory group");

        let filter = format!("displayName eq '{}'", escape_odata_literal(name));
        let existing = self
            .client
            .get::<ODataResponse<GraphGroup>>("/groups", &[("$filter", filter)])
            .await;
        if existing.is_err() {
            record_directory_operation("create_group", "error");
        }
        if !existing?.value.is_empty() {
            record_directory_operation("create_group", "duplicate");
            return Err(ServiceError::DuplicateGroup(name.to_string()));
        }

        let payload = build_group_payload(name, description, group_type);
        let result = self.client.post::<GraphGroup>("/groups", &payload).await;
        record_outcome("create_group", &result);

        let created = result?;
        info!(id = %created.id, "Group created");
        Ok(map_group(created))
    }

    /// Adds a principal to a group via the reference-add endpoint.
    #[instrument(skip(self))]
    pub async fn add_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<MembershipAck, ServiceError> {
        info!(group_id, user_id, "Adding group member");

        let reference = json!({
            "@odata.id": format!("{}/directoryObjects/{}", self.client.base_url(), user_id),
        });

        let result = self
            .client
            .post_no_content(&format!("/groups/{group_id}/members/$ref"), &reference)
            .await;
        record_outcome("add_group_member", &result);
        result?;

        Ok(MembershipAck {
            message: "Member added successfully".to_string(),
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

fn record_outcome<T>(operation: &str, result: &Result<T, ServiceError>) {
    let outcome = if result.is_ok() { "success" } else { "error" };
    record_directory_operation(operation, outcome);
}

/// OData string literals escape embedded quotes by doubling them.
fn escape_odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Mail nicknames cannot contain dots or spaces; both become dashes.
fn mail_nickname(name: &str) -> String {
    name.replace(['.', ' '], "-")
}

fn build_group_payload(
    name: &str,
    description: &str,
    group_type: GroupType,
) -> serde_json::Value {
    let mut payload = json!({
        "displayName": name,
        "description": description,
        "mailNickname": mail_nickname(name),
    });

    match group_type {
        GroupType::Security => {
            payload["securityEnabled"] = json!(true);
            payload["mailEnabled"] = json!(false);
        }
        GroupType::Microsoft365 => {
            payload["securityEnabled"] = json!(false);
            payload["mailEnabled"] = json!(true);
            payload["groupTypes"] = json!(["Unified"]);
            payload["visibility"] = json!("Public");
        }
    }

    payload
}

fn map_group(raw: GraphGroup) -> GroupSummary {
    GroupSummary {
        id: raw.id,
        display_name: raw.display_name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        mail_enabled: raw.mail_enabled.unwrap_or(false),
        security_enabled: raw.security_enabled.unwrap_or(false),
    }
}

fn map_member(raw: GraphDirectoryObject) -> MemberSummary {
    MemberSummary {
        member_type: PrincipalType::from_odata_type(raw.odata_type.as_deref()),
        id: raw.id,
        display_name: raw.display_name.unwrap_or_else(|| "N/A".to_string()),
        user_principal_name: raw.user_principal_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_nickname_replaces_dots_and_spaces() {
        assert_eq!(
            mail_nickname("AAD.TA.DM.DEVOPS.ENGINEER"),
            "AAD-TA-DM-DEVOPS-ENGINEER"
        );
        assert_eq!(mail_nickname("AAD.TA.Two Words"), "AAD-TA-Two-Words");
    }

    #[test]
    fn odata_literal_doubles_quotes() {
        assert_eq!(escape_odata_literal("O'Brien"), "O''Brien");
        assert_eq!(escape_odata_literal("plain"), "plain");
    }

    #[test]
    fn security_group_payload() {
        let payload = build_group_payload("AAD.TA.X", "desc", GroupType::Security);
        assert_eq!(payload["displayName"], "AAD.TA.X");
        assert_eq!(payload["mailNickname"], "AAD-TA-X");
        assert_eq!(payload["securityEnabled"], true);
        assert_eq!(payload["mailEnabled"], false);
        assert!(payload.get("groupTypes").is_none());
        assert!(payload.get("visibility").is_none());
    }

    #[test]
    fn unified_group_payload() {
        let payload = build_group_payload("AAD.TA.Y", "desc", GroupType::Microsoft365);
        assert_eq!(payload["securityEnabled"], false);
        assert_eq!(payload["mailEnabled"], true);
        assert_eq!(payload["groupTypes"], json!(["Unified"]));
        assert_eq!(payload["visibility"], "Public");
    }

    #[test]
    fn group_mapping_defaults_missing_fields() {
        let raw: GraphGroup = serde_json::from_value(json!({ "id": "g-1" })).unwrap();
        let group = map_group(raw);
        assert_eq!(group.description, "");
        assert!(!group.mail_enabled);
        assert!(!group.security_enabled);
    }

    #[test]
    fn member_mapping_defaults_display_name() {
        let raw: GraphDirectoryObject = serde_json::from_value(json!({
            "@odata.type": "#microsoft.graph.user",
            "id": "u-1",
            "userPrincipalName": "u1@contoso.com",
        }))
        .unwrap();
        let member = map_member(raw);
        assert_eq!(member.display_name, "N/A");
        assert_eq!(member.member_type, PrincipalType::User);
        assert_eq!(
            member.user_principal_name.as_deref(),
            Some("u1@contoso.com")
        );
    }
}
