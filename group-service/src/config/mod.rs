use secrecy::SecretString;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Full configuration for the group service, assembled once at startup and
/// handed to every component by reference. There is no hidden global cache.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub azure: AzureAdConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(format!("Unknown environment '{other}', expected dev or prod")),
        }
    }
}

/// Azure AD app registration plus endpoint overrides. The base URLs default
/// to the public cloud; tests point them at a local mock.
#[derive(Debug, Clone)]
pub struct AzureAdConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Graph origin, e.g. `https://graph.microsoft.com`.
    pub graph_base_url: String,
    pub graph_api_version: String,
    /// Login authority, e.g. `https://login.microsoftonline.com`.
    pub login_base_url: String,
}

impl AzureAdConfig {
    /// Versioned API base, e.g. `https://graph.microsoft.com/v1.0`.
    pub fn graph_api_base(&self) -> String {
        format!(
            "{}/{}",
            self.graph_base_url.trim_end_matches('/'),
            self.graph_api_version
        )
    }

    /// OAuth2 scope for the client-credentials grant.
    pub fn graph_scope(&self) -> String {
        format!("{}/.default", self.graph_base_url.trim_end_matches('/'))
    }
}

impl GroupConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        Ok(GroupConfig {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", Some("group-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            azure: AzureAdConfig {
                tenant_id: require_env("AZURE_TENANT_ID")?,
                client_id: require_env("AZURE_CLIENT_ID")?,
                client_secret: SecretString::new(require_env("AZURE_CLIENT_SECRET")?),
                graph_base_url: get_env(
                    "GRAPH_BASE_URL",
                    Some("https://graph.microsoft.com"),
                    is_prod,
                )?,
                graph_api_version: get_env("GRAPH_API_VERSION", Some("v1.0"), is_prod)?,
                login_base_url: get_env(
                    "AZURE_LOGIN_BASE_URL",
                    Some("https://login.microsoftonline.com"),
                    is_prod,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Credentials are required in every environment and must be non-empty.
fn require_env(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} environment variable is required",
            key
        ))),
    }
}
