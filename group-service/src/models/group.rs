use std::fmt;

use serde::{Deserialize, Serialize};

/// Group record as surfaced by the read and create operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub display_name: String,
    /// Empty string when the directory record carries no description.
    #[serde(default)]
    pub description: String,
    pub mail_enabled: bool,
    pub security_enabled: bool,
}

/// The two group kinds this service is allowed to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupType {
    /// Pure security group: `securityEnabled`, not mail-enabled.
    Security,
    /// Unified collaboration group: mail-enabled, public visibility.
    Microsoft365,
}

impl GroupType {
    /// Parses the API-facing type string. Case-sensitive; anything but the
    /// two enumerated values is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Security" => Some(Self::Security),
            "Microsoft365" => Some(Self::Microsoft365),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Microsoft365 => "Microsoft365",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
