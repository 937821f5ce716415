//! PingOne management API access.
//!
//! Tool handlers and the environment validator never talk HTTP directly. They
//! ask a [`ClientProvider`] for an authenticated [`PingOneApi`] and call one
//! method on it. This keeps authentication failures distinct from API
//! failures and lets tests substitute [`InMemoryPingOne`].
//!
//! # Example
//!
//! ```rust
//! use pingone_mcp_server::client::{InMemoryPingOne, PingOneApi, StaticClientProvider};
//! use pingone_mcp_server::model::{Environment, EnvironmentId, EnvironmentType};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(InMemoryPingOne::new());
//! let id = EnvironmentId::generate();
//! api.insert_environment(Environment::new(id, "Dev", EnvironmentType::Sandbox)).await;
//!
//! let response = api.get_environment(&id).await?;
//! assert_eq!(response.data.map(|e| e.name), Some("Dev".to_string()));
//!
//! let _provider = StaticClientProvider::new(api);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod http;
pub mod in_memory;

pub use auth::{
    ClientCredentialsTokenSource, StaticTokenSource, TokenClientProvider, TokenSource,
};
pub use http::HttpPingOneClient;
pub use in_memory::InMemoryPingOne;

use crate::context::RequestContext;
use crate::error::{ApiResult, AuthError};
use crate::model::{
    Application, BillOfMaterials, CreateEnvironmentRequest, Environment, EnvironmentId,
    IdentityCountQuery, OidcApplicationRequest, Population, PopulationRequest, TotalIdentities,
    UpdateEnvironmentRequest,
};
use async_trait::async_trait;
use std::sync::Arc;

/// A successful API exchange.
///
/// `data` is `None` when the API answered with a success status but no entity
/// body; callers decide whether that is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// HTTP status code of the response
    pub status: u16,
    /// Decoded entity, if the response carried one
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A 200 response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            data: Some(data),
        }
    }

    /// A success response without an entity body.
    pub fn empty(status: u16) -> Self {
        Self { status, data: None }
    }

    /// Transform the entity while keeping the transport metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            data: self.data.map(f),
        }
    }
}

/// Operations against the PingOne management API.
#[async_trait]
pub trait PingOneApi: Send + Sync {
    /// List all environments visible to the worker application.
    async fn list_environments(&self) -> ApiResult<ApiResponse<Vec<Environment>>>;

    /// Retrieve one environment.
    async fn get_environment(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Environment>>;

    /// Create an environment.
    async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> ApiResult<ApiResponse<Environment>>;

    /// Replace an environment's mutable attributes.
    async fn update_environment(
        &self,
        environment_id: &EnvironmentId,
        request: &UpdateEnvironmentRequest,
    ) -> ApiResult<ApiResponse<Environment>>;

    /// Retrieve the products enabled in an environment.
    async fn get_environment_services(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<BillOfMaterials>>;

    /// Replace the products enabled in an environment.
    async fn update_environment_services(
        &self,
        environment_id: &EnvironmentId,
        services: &BillOfMaterials,
    ) -> ApiResult<ApiResponse<BillOfMaterials>>;

    /// List applications in an environment.
    async fn list_applications(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Vec<Application>>>;

    /// Retrieve one application.
    async fn get_application(
        &self,
        environment_id: &EnvironmentId,
        application_id: &str,
    ) -> ApiResult<ApiResponse<Application>>;

    /// Create an OpenID Connect application.
    async fn create_oidc_application(
        &self,
        environment_id: &EnvironmentId,
        request: &OidcApplicationRequest,
    ) -> ApiResult<ApiResponse<Application>>;

    /// Replace an OpenID Connect application.
    async fn update_oidc_application(
        &self,
        environment_id: &EnvironmentId,
        application_id: &str,
        request: &OidcApplicationRequest,
    ) -> ApiResult<ApiResponse<Application>>;

    /// List populations in an environment.
    async fn list_populations(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Vec<Population>>>;

    /// Retrieve one population.
    async fn get_population(
        &self,
        environment_id: &EnvironmentId,
        population_id: &str,
    ) -> ApiResult<ApiResponse<Population>>;

    /// Create a population.
    async fn create_population(
        &self,
        environment_id: &EnvironmentId,
        request: &PopulationRequest,
    ) -> ApiResult<ApiResponse<Population>>;

    /// Replace a population.
    async fn update_population(
        &self,
        environment_id: &EnvironmentId,
        population_id: &str,
        request: &PopulationRequest,
    ) -> ApiResult<ApiResponse<Population>>;

    /// Count identities in an environment over a reporting window.
    async fn get_total_identities(
        &self,
        environment_id: &EnvironmentId,
        query: &IdentityCountQuery,
    ) -> ApiResult<ApiResponse<Vec<TotalIdentities>>>;
}

/// Source of authenticated API clients.
///
/// Acquiring a client may involve fetching or refreshing an access token, so
/// it can fail independently of any API call.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Return a client ready to call the PingOne API.
    async fn client(&self, context: &RequestContext) -> Result<Arc<dyn PingOneApi>, AuthError>;
}

/// Provider that always hands out the same client.
#[derive(Clone)]
pub struct StaticClientProvider {
    client: Arc<dyn PingOneApi>,
}

impl StaticClientProvider {
    /// Wrap an existing client.
    pub fn new(client: Arc<dyn PingOneApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClientProvider for StaticClientProvider {
    async fn client(&self, _context: &RequestContext) -> Result<Arc<dyn PingOneApi>, AuthError> {
        Ok(Arc::clone(&self.client))
    }
}
