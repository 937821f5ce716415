//! In-memory implementation of [`PingOneApi`].
//!
//! Holds environments, applications and populations in maps guarded by async
//! locks. It exists for tests, benchmarks and local demos, so it also counts
//! environment lookups and can inject failures, empty responses and latency.
//!
//! # Example Usage
//!
//! ```rust
//! use pingone_mcp_server::client::{InMemoryPingOne, PingOneApi};
//! use pingone_mcp_server::model::{Environment, EnvironmentId, EnvironmentType};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = InMemoryPingOne::new();
//! let id = EnvironmentId::generate();
//! api.insert_environment(Environment::new(id, "Prod", EnvironmentType::Production)).await;
//!
//! api.get_environment(&id).await?;
//! assert_eq!(api.environment_lookups(&id).await, 1);
//! # Ok(())
//! # }
//! ```

use super::{ApiResponse, PingOneApi};
use crate::error::{ApiError, ApiResult};
use crate::model::{
    Application, BillOfMaterials, CreateEnvironmentRequest, Environment, EnvironmentId,
    EnvironmentType, IdentityCountQuery, OidcApplicationRequest, Population, PopulationRequest,
    TotalIdentities, UpdateEnvironmentRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct EnvironmentData {
    environment: Option<Environment>,
    services: BillOfMaterials,
    applications: Vec<Application>,
    populations: Vec<Population>,
    identity_counts: Vec<TotalIdentities>,
}

/// Thread-safe in-memory PingOne backend.
#[derive(Debug, Default)]
pub struct InMemoryPingOne {
    environments: RwLock<HashMap<EnvironmentId, EnvironmentData>>,
    lookups: RwLock<HashMap<EnvironmentId, usize>>,
    failures: RwLock<HashMap<EnvironmentId, String>>,
    empty_responses: RwLock<HashSet<EnvironmentId>>,
    latency: RwLock<Option<Duration>>,
}

impl InMemoryPingOne {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an environment.
    pub async fn insert_environment(&self, environment: Environment) {
        let mut environments = self.environments.write().await;
        let id = environment.id.clone();
        environments.entry(id).or_default().environment = Some(environment);
    }

    /// Change an environment's type in place, as a platform promotion would.
    pub async fn set_environment_type(
        &self,
        environment_id: &EnvironmentId,
        environment_type: EnvironmentType,
    ) {
        let mut environments = self.environments.write().await;
        if let Some(environment) = environments
            .get_mut(environment_id)
            .and_then(|data| data.environment.as_mut())
        {
            environment.environment_type = environment_type;
        }
    }

    /// Remove an environment and everything in it.
    pub async fn delete_environment(&self, environment_id: &EnvironmentId) {
        self.environments.write().await.remove(environment_id);
    }

    /// Add an application to an environment.
    pub async fn insert_application(&self, environment_id: &EnvironmentId, application: Application) {
        let mut environments = self.environments.write().await;
        environments
            .entry(*environment_id)
            .or_default()
            .applications
            .push(application);
    }

    /// Add a population to an environment.
    pub async fn insert_population(&self, environment_id: &EnvironmentId, population: Population) {
        let mut environments = self.environments.write().await;
        environments
            .entry(*environment_id)
            .or_default()
            .populations
            .push(population);
    }

    /// Record an identity count for an environment.
    pub async fn insert_identity_count(
        &self,
        environment_id: &EnvironmentId,
        count: TotalIdentities,
    ) {
        let mut environments = self.environments.write().await;
        environments
            .entry(*environment_id)
            .or_default()
            .identity_counts
            .push(count);
    }

    /// Make every call for this environment fail with a backend error.
    pub async fn fail_environment(&self, environment_id: &EnvironmentId, message: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(*environment_id, message.into());
    }

    /// Answer environment lookups for this ID with a success status and no body.
    pub async fn omit_environment_body(&self, environment_id: &EnvironmentId) {
        self.empty_responses.write().await.insert(*environment_id);
    }

    /// Delay every environment lookup.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    /// Number of `get_environment` calls made for this ID.
    pub async fn environment_lookups(&self, environment_id: &EnvironmentId) -> usize {
        self.lookups
            .read()
            .await
            .get(environment_id)
            .copied()
            .unwrap_or(0)
    }

    /// Total `get_environment` calls across all IDs.
    pub async fn total_environment_lookups(&self) -> usize {
        self.lookups.read().await.values().sum()
    }

    async fn check_failure(&self, environment_id: &EnvironmentId) -> ApiResult<()> {
        match self.failures.read().await.get(environment_id) {
            Some(message) => Err(ApiError::backend(message.clone())),
            None => Ok(()),
        }
    }

    fn not_found(kind: &str, id: &str) -> ApiError {
        ApiError::Status {
            method: "GET".to_string(),
            url: format!("memory://{kind}/{id}"),
            status: 404,
            message: format!("{kind} {id} not found"),
        }
    }

    async fn with_environment<T>(
        &self,
        environment_id: &EnvironmentId,
        f: impl FnOnce(&mut EnvironmentData) -> ApiResult<T>,
    ) -> ApiResult<ApiResponse<T>> {
        self.check_failure(environment_id).await?;
        let mut environments = self.environments.write().await;
        let data = environments
            .get_mut(environment_id)
            .filter(|data| data.environment.is_some())
            .ok_or_else(|| Self::not_found("environment", &environment_id.to_string()))?;
        f(data).map(ApiResponse::ok)
    }
}

#[async_trait]
impl PingOneApi for InMemoryPingOne {
    async fn list_environments(&self) -> ApiResult<ApiResponse<Vec<Environment>>> {
        let environments = self.environments.read().await;
        let mut list: Vec<Environment> = environments
            .values()
            .filter_map(|data| data.environment.clone())
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ApiResponse::ok(list))
    }

    async fn get_environment(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Environment>> {
        *self.lookups.write().await.entry(*environment_id).or_insert(0) += 1;

        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.check_failure(environment_id).await?;

        if self.empty_responses.read().await.contains(environment_id) {
            return Ok(ApiResponse::empty(200));
        }

        let environments = self.environments.read().await;
        environments
            .get(environment_id)
            .and_then(|data| data.environment.clone())
            .map(ApiResponse::ok)
            .ok_or_else(|| Self::not_found("environment", &environment_id.to_string()))
    }

    async fn create_environment(
        &self,
        request: &CreateEnvironmentRequest,
    ) -> ApiResult<ApiResponse<Environment>> {
        let mut environment = Environment::new(
            EnvironmentId::generate(),
            request.name.clone(),
            request.environment_type,
        );
        environment.description = request.description.clone();
        environment.region = Some(request.region.clone());
        environment.license = Some(request.license.clone());
        environment.created_at = Some(Utc::now());

        let data = EnvironmentData {
            environment: Some(environment.clone()),
            services: request.bill_of_materials.clone().unwrap_or_default(),
            ..Default::default()
        };
        self.environments.write().await.insert(environment.id, data);

        Ok(ApiResponse {
            status: 201,
            data: Some(environment),
        })
    }

    async fn update_environment(
        &self,
        environment_id: &EnvironmentId,
        request: &UpdateEnvironmentRequest,
    ) -> ApiResult<ApiResponse<Environment>> {
        self.with_environment(environment_id, |data| {
            let environment = data
                .environment
                .as_mut()
                .ok_or_else(|| ApiError::backend("environment missing"))?;
            if environment.environment_type == EnvironmentType::Production
                && request.environment_type == EnvironmentType::Sandbox
            {
                return Err(ApiError::Status {
                    method: "PUT".to_string(),
                    url: format!("memory://environment/{environment_id}"),
                    status: 400,
                    message: "PRODUCTION environments cannot be changed to SANDBOX".to_string(),
                });
            }
            environment.name = request.name.clone();
            environment.region = Some(request.region.clone());
            environment.environment_type = request.environment_type;
            environment.license = Some(request.license.clone());
            environment.description = request.description.clone();
            environment.updated_at = Some(Utc::now());
            Ok(environment.clone())
        })
        .await
    }

    async fn get_environment_services(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<BillOfMaterials>> {
        self.with_environment(environment_id, |data| Ok(data.services.clone()))
            .await
    }

    async fn update_environment_services(
        &self,
        environment_id: &EnvironmentId,
        services: &BillOfMaterials,
    ) -> ApiResult<ApiResponse<BillOfMaterials>> {
        self.with_environment(environment_id, |data| {
            data.services = services.clone();
            data.services.updated_at = Some(Utc::now());
            Ok(data.services.clone())
        })
        .await
    }

    async fn list_applications(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Vec<Application>>> {
        self.with_environment(environment_id, |data| Ok(data.applications.clone()))
            .await
    }

    async fn get_application(
        &self,
        environment_id: &EnvironmentId,
        application_id: &str,
    ) -> ApiResult<ApiResponse<Application>> {
        self.with_environment(environment_id, |data| {
            data.applications
                .iter()
                .find(|app| app.id == application_id)
                .cloned()
                .ok_or_else(|| Self::not_found("application", application_id))
        })
        .await
    }

    async fn create_oidc_application(
        &self,
        environment_id: &EnvironmentId,
        request: &OidcApplicationRequest,
    ) -> ApiResult<ApiResponse<Application>> {
        let application = application_from_request(Uuid::new_v4().to_string(), request);
        self.with_environment(environment_id, |data| {
            data.applications.push(application.clone());
            Ok(application)
        })
        .await
    }

    async fn update_oidc_application(
        &self,
        environment_id: &EnvironmentId,
        application_id: &str,
        request: &OidcApplicationRequest,
    ) -> ApiResult<ApiResponse<Application>> {
        self.with_environment(environment_id, |data| {
            let existing = data
                .applications
                .iter_mut()
                .find(|app| app.id == application_id)
                .ok_or_else(|| Self::not_found("application", application_id))?;
            let created_at = existing.created_at;
            *existing = application_from_request(application_id.to_string(), request);
            existing.created_at = created_at;
            existing.updated_at = Some(Utc::now());
            Ok(existing.clone())
        })
        .await
    }

    async fn list_populations(
        &self,
        environment_id: &EnvironmentId,
    ) -> ApiResult<ApiResponse<Vec<Population>>> {
        self.with_environment(environment_id, |data| Ok(data.populations.clone()))
            .await
    }

    async fn get_population(
        &self,
        environment_id: &EnvironmentId,
        population_id: &str,
    ) -> ApiResult<ApiResponse<Population>> {
        self.with_environment(environment_id, |data| {
            data.populations
                .iter()
                .find(|population| population.id == population_id)
                .cloned()
                .ok_or_else(|| Self::not_found("population", population_id))
        })
        .await
    }

    async fn create_population(
        &self,
        environment_id: &EnvironmentId,
        request: &PopulationRequest,
    ) -> ApiResult<ApiResponse<Population>> {
        let population = Population {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            user_count: 0,
            default: false,
            password_policy: request.password_policy.clone(),
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        self.with_environment(environment_id, |data| {
            data.populations.push(population.clone());
            Ok(population)
        })
        .await
    }

    async fn update_population(
        &self,
        environment_id: &EnvironmentId,
        population_id: &str,
        request: &PopulationRequest,
    ) -> ApiResult<ApiResponse<Population>> {
        self.with_environment(environment_id, |data| {
            let population = data
                .populations
                .iter_mut()
                .find(|population| population.id == population_id)
                .ok_or_else(|| Self::not_found("population", population_id))?;
            population.name = request.name.clone();
            population.description = request.description.clone();
            population.password_policy = request.password_policy.clone();
            population.updated_at = Some(Utc::now());
            Ok(population.clone())
        })
        .await
    }

    async fn get_total_identities(
        &self,
        environment_id: &EnvironmentId,
        query: &IdentityCountQuery,
    ) -> ApiResult<ApiResponse<Vec<TotalIdentities>>> {
        self.with_environment(environment_id, |data| {
            Ok(data
                .identity_counts
                .iter()
                .filter(|count| {
                    count.start_date >= query.start_date && count.start_date < query.end_date
                })
                .cloned()
                .collect())
        })
        .await
    }
}

fn application_from_request(id: String, request: &OidcApplicationRequest) -> Application {
    Application {
        id,
        name: request.name.clone(),
        description: request.description.clone(),
        enabled: request.enabled,
        protocol: Some(request.protocol.clone()),
        application_type: Some(request.application_type.clone()),
        grant_types: request.grant_types.clone(),
        response_types: request.response_types.clone(),
        redirect_uris: request.redirect_uris.clone(),
        token_endpoint_auth_method: request.token_endpoint_auth_method.clone(),
        created_at: Some(Utc::now()),
        updated_at: None,
    }
}
