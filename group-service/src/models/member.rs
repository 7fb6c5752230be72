use serde::{Serialize, Serializer};

/// Kind of directory principal appearing in a membership list, derived from
/// the remote `@odata.type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalType {
    User,
    Group,
    ServicePrincipal,
    /// A principal kind this service does not model explicitly; carries the
    /// raw discriminator segment (e.g. `device`).
    Other(String),
    /// The record exposed no discriminator at all.
    Unknown,
}

impl PrincipalType {
    /// Maps a discriminator such as `#microsoft.graph.user` to a principal
    /// kind using its last dotted segment.
    pub fn from_odata_type(odata_type: Option<&str>) -> Self {
        let Some(odata_type) = odata_type else {
            return Self::Unknown;
        };
        let segment = odata_type.rsplit('.').next().unwrap_or(odata_type);
        match segment {
            "user" => Self::User,
            "group" => Self::Group,
            "servicePrincipal" => Self::ServicePrincipal,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::ServicePrincipal => "servicePrincipal",
            Self::Other(segment) => segment,
            Self::Unknown => "Unknown",
        }
    }
}

impl Serialize for PrincipalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Group member as surfaced by the membership listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: String,
    /// `"N/A"` when the directory record has no display name.
    pub display_name: String,
    #[serde(rename = "type")]
    pub member_type: PrincipalType,
    /// Present only for user principals that expose one; omitted entirely
    /// (not null) otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
}
