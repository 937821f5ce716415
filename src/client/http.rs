//! HTTP implementation of [`PingOneApi`] over the PingOne management API.

use super::{ApiResponse, PingOneApi, TokenSource};
use crate::error::{ApiError, ApiResult};
use crate::model::{
    Application, BillOfMaterials, CreateEnvironmentRequest, Environment, EnvironmentId,
    IdentityCountQuery, OidcApplicationRequest, Population, PopulationRequest, TotalIdentities,
    UpdateEnvironmentRequest,
};
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// PingOne management API client.
///
/// Every request carries a bearer token from the configured [`TokenSource`].
/// List endpoints are unwrapped from PingOne's `_embedded` envelope.
pub struct HttpPingOneClient {
    http: reqwest::Client,
    api_base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpPingOneClient {
    /// Create a client for a regional API host, e.g. `https://api.pingone.com`.
    pub fn new(api_base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Use a preconfigured HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.api_base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        let url = self.url(path);
        let request = self.http.get(&url);
        self.execute(Method::GET, url, request).await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = self.url(path);
        let request = self.http.request(method.clone(), &url).json(body);
        self.execute(method, url, request).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: String,
        collection: &str,
    ) -> ApiResult<ApiResponse<Vec<T>>> {
        let response: ApiResponse<Value> = self.execute(Method::GET, url.clone(), request).await?;
        let status = response.status;

        let Some(mut body) = response.data else {
            return Ok(ApiResponse::empty(status));
        };

        let items = match body
            .get_mut("_embedded")
            .and_then(|embedded| embedded.get_mut(collection))
        {
            Some(items) => items.take(),
            None => Value::Array(Vec::new()),
        };

        let items = serde_json::from_value(items).map_err(|e| ApiError::Decode {
            method: Method::GET.to_string(),
            url,
            message: e.to_string(),
        })?;

        Ok(ApiResponse {
            status,
            data: Some(items),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        request: RequestBuilder,
    ) -> ApiResult<ApiResponse<T>> {
        let token = self.tokens.access_token().await?;
        debug!("PingOne API {} {}", method, url);

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                method: method.to_string(),
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse::empty(status.as_u16()));
        }

        let data = serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            method: method.to_string(),
            url,
            message: e.to_string(),
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            data: Some(data),
        })
    }
}

/// Pull PingOne's `message` (and first detail) out of an error body.
fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).into_owned();
    };

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("no error message");

    match value
        .get("details")
        .and_then(|details| details.get(0))
        .and_then(|detail| detail.get("message"))
        .and_then(Value::as_str)
    {
        Some(detail) => format!("{message} ({detail})"),
        None => message.to_string(),
    }
}

#[async_trait]
impl PingOneApi for HttpPingOneClient {
    async fn list_environments(&self) -> ApiResult<ApiResponse<Vec<Environment>>> {
        let url = self.url("/environments");
        let request = self.http.get(&url);
        self.list(request, url, "environments").await
    }

    async fn get_environment(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Environment>> {
        self.get(&format!("/environments/{environment_id}")).await
    }

    async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> ApiResult<ApiResponse<Environment>> {
        self.send_json(Method::POST, "/environments", request).await
    }

    async fn update_environment(
        &self,
        environment_id: &EnvironmentId,
        request: &UpdateEnvironmentRequest,
    ) -> ApiResult<ApiResponse<Environment>> {
        self.send_json(Method::PUT, &format!("/environments/{environment_id}"), request)
            .await
    }

    async fn get_environment_services(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<BillOfMaterials>> {
        self.get(&format!("/environments/{environment_id}/billOfMaterials"))
            .await
    }

    async fn update_environment_services(
        &self,
        environment_id: &EnvironmentId,
        services: &BillOfMaterials,
    ) -> ApiResult<ApiResponse<BillOfMaterials>> {
        self.send_json(
            Method::PUT,
            &format!("/environments/{environment_id}/billOfMaterials"),
            services,
        )
        .await
    }

    async fn list_applications(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Vec<Application>>> {
        let url = self.url(&format!("/environments/{environment_id}/applications"));
        let request = self.http.get(&url);
        self.list(request, url, "applications").await
    }

    async fn get_application(
        &self,
        environment_id: &EnvironmentId,
        application_id: &str,
    ) -> ApiResult<ApiResponse<Application>> {
        self.get(&format!(
            "/environments/{environment_id}/applications/{application_id}"
        ))
        .await
    }

    async fn create_oidc_application(
        &self,
        environment_id: &EnvironmentId,
        request: &OidcApplicationRequest,
    ) -> ApiResult<ApiResponse<Application>> {
        self.send_json(
            Method::POST,
            &format!("/environments/{environment_id}/applications"),
            request,
        )
        .await
    }

    async fn update_oidc_application(
        &self,
        environment_id: &EnvironmentId,
        application_id: &str,
        request: &OidcApplicationRequest,
    ) -> ApiResult<ApiResponse<Application>> {
        self.send_json(
            Method::PUT,
            &format!("/environments/{environment_id}/applications/{application_id}"),
            request,
        )
        .await
    }

    async fn list_populations(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Vec<Population>>> {
        let url = self.url(&format!("/environments/{environment_id}/populations"));
        let request = self.http.get(&url);
        self.list(request, url, "populations").await
    }

    async fn get_population(
        &self,
        environment_id: &EnvironmentId,
        population_id: &str,
    ) -> ApiResult<ApiResponse<Population>> {
        self.get(&format!(
            "/environments/{environment_id}/populations/{population_id}"
        ))
        .await
    }

    async fn create_population(
        &self,
        environment_id: &EnvironmentId,
        request: &PopulationRequest,
    ) -> ApiResult<ApiResponse<Population>> {
        self.send_json(
            Method::POST,
            &format!("/environments/{environment_id}/populations"),
            request,
        )
        .await
    }

    async fn update_population(
        &self,
        environment_id: &EnvironmentId,
        population_id: &str,
        request: &PopulationRequest,
    ) -> ApiResult<ApiResponse<Population>> {
        self.send_json(
            Method::PUT,
            &format!("/environments/{environment_id}/populations/{population_id}"),
            request,
        )
        .await
    }

    async fn get_total_identities(
        &self,
        environment_id: &EnvironmentId,
        query: &IdentityCountQuery,
    ) -> ApiResult<ApiResponse<Vec<TotalIdentities>>> {
        let url = self.url(&format!("/environments/{environment_id}/totalIdentities"));
        let request = self.http.get(&url).query(&[("filter", query.filter())]);
        self.list(request, url, "totalIdentities").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        let body = br#"{"code":"INVALID_DATA","message":"The request could not be completed.","details":[{"code":"INVALID_VALUE","message":"name must be unique"}]}"#;
        assert_eq!(
            error_message(body),
            "The request could not be completed. (name must be unique)"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message(b"Bad Gateway"), "Bad Gateway");
    }
}
