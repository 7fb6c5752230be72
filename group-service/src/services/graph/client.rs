//! Low-level Microsoft Graph HTTP client: bearer-token injection, OData
//! envelope decoding, and error translation. Nothing above this layer sees a
//! raw `reqwest` response.

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use service_core::observability::inject_trace_context;
use std::sync::Arc;

use crate::services::error::ServiceError;

use super::auth::TokenCache;

/// OData error response body from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
}

/// Single-page envelope for Graph collection endpoints.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_cache: Arc<TokenCache>,
    base_url: String,
}

impl GraphClient {
    pub fn new(token_cache: Arc<TokenCache>, base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            token_cache,
            base_url,
        }
    }

    /// Base URL for Graph API requests, e.g. `https://graph.microsoft.com/v1.0`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a Graph resource, decoding the JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let response = self.send(Method::GET, path, query, None).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST a JSON body, decoding the JSON response into `T`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ServiceError> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST a JSON body where Graph acknowledges with an empty 2xx (the
    /// reference-add endpoints answer 204 No Content).
    pub async fn post_no_content(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<(), ServiceError> {
        self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ServiceError> {
        let token = self.token_cache.get_token().await?;
        let url = format!("{}{}", self.base_url, path);

        let mut headers = reqwest::header::HeaderMap::new();
        inject_trace_context(&mut headers);

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        metrics::counter!(
            "graph_http_requests_total",
            "method" => method.to_string(),
            "status" => response.status().as_u16().to_string()
        )
        .increment(1);

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::decode_error(response).await)
        }
    }

    /// Translates a non-2xx Graph response into a `ServiceError`, preferring
    /// the structured OData error body when one is present.
    async fn decode_error(response: reqwest::Response) -> ServiceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ODataError>(&body) {
            Ok(odata) => ServiceError::Graph {
                code: odata.error.code,
                message: odata.error.message,
            },
            Err(_) => ServiceError::Graph {
                code: status.as_u16().to_string(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            },
        }
    }
}
