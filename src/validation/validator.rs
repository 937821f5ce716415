//! Environment type resolution and production restriction.
//!
//! The validator answers one question: may this operation run against this
//! environment? It resolves the environment's type through the PingOne API,
//! remembering PRODUCTION environments for the lifetime of the validator,
//! and denies the call when the target is PRODUCTION.
//!
//! Only PRODUCTION results are cached. A SANDBOX environment is re-fetched on
//! every call so that a sandbox promoted to PRODUCTION is caught on the very
//! next request. Once an environment is PRODUCTION the platform does not let
//! it go back, so cached entries never go stale in the unsafe direction.
//!
//! Concurrent misses for the same environment each fetch independently; the
//! last writer wins, and both writers store the same PRODUCTION value.

use crate::client::ClientProvider;
use crate::context::RequestContext;
use crate::error::{ValidationError, ValidationResult};
use crate::model::{Environment, EnvironmentId};
use crate::validation::OperationType;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Decides whether an operation may target an environment.
#[async_trait]
pub trait EnvironmentGuard: Send + Sync {
    /// Succeed when the operation is permitted, or return the reason it is not.
    async fn validate_environment(
        &self,
        context: &RequestContext,
        environment_id: &EnvironmentId,
        operation: OperationType,
    ) -> ValidationResult<()>;
}

/// Production-blocking [`EnvironmentGuard`] backed by the PingOne API.
pub struct EnvironmentValidator {
    client_provider: Arc<dyn ClientProvider>,
    cache: RwLock<HashMap<EnvironmentId, Environment>>,
}

impl EnvironmentValidator {
    pub fn new(client_provider: Arc<dyn ClientProvider>) -> Self {
        Self {
            client_provider,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every cached environment.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        let evicted = cache.len();
        cache.clear();
        debug!("Cleared environment cache ({} entries)", evicted);
    }

    /// Drop one cached environment. Returns whether it was cached.
    pub async fn remove_from_cache(&self, environment_id: &EnvironmentId) -> bool {
        let removed = self.cache.write().await.remove(environment_id).is_some();
        if removed {
            debug!("Evicted environment {} from cache", environment_id);
        }
        removed
    }

    /// The cached copy of an environment, if any.
    pub async fn cached_environment(&self, environment_id: &EnvironmentId) -> Option<Environment> {
        self.cache.read().await.get(environment_id).cloned()
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn resolve(
        &self,
        context: &RequestContext,
        environment_id: &EnvironmentId,
    ) -> ValidationResult<Environment> {
        let cached = self.cache.read().await.get(environment_id).cloned();
        if let Some(environment) = cached {
            debug!(
                "Environment cache hit for {} (request {})",
                environment_id, context.request_id
            );
            return Ok(environment);
        }

        debug!(
            "Environment cache miss for {} (request {})",
            environment_id, context.request_id
        );

        let environment = tokio::select! {
            result = self.fetch(context, environment_id) => result?,
            _ = context.cancelled() => {
                return Err(ValidationError::Cancelled {
                    environment_id: environment_id.to_string(),
                });
            }
        };

        if environment.is_production() {
            self.cache
                .write()
                .await
                .insert(*environment_id, environment.clone());
            debug!("Cached PRODUCTION environment {}", environment_id);
        }

        Ok(environment)
    }

    async fn fetch(
        &self,
        context: &RequestContext,
        environment_id: &EnvironmentId,
    ) -> ValidationResult<Environment> {
        let client = self
            .client_provider
            .client(context)
            .await
            .map_err(ValidationError::Authentication)?;

        let response = client
            .get_environment(environment_id)
            .await
            .map_err(|source| ValidationError::Api {
                environment_id: environment_id.to_string(),
                source,
            })?;

        response.data.ok_or_else(|| ValidationError::NoEnvironmentData {
            environment_id: environment_id.to_string(),
        })
    }
}

/// Deny any operation against a PRODUCTION environment.
fn check_production_restriction(
    environment: &Environment,
    operation: OperationType,
) -> ValidationResult<()> {
    if environment.is_production() {
        return Err(ValidationError::production_blocked(
            operation,
            environment.id.to_string(),
            environment.name.clone(),
        ));
    }
    Ok(())
}

#[async_trait]
impl EnvironmentGuard for EnvironmentValidator {
    async fn validate_environment(
        &self,
        context: &RequestContext,
        environment_id: &EnvironmentId,
        operation: OperationType,
    ) -> ValidationResult<()> {
        let environment = self.resolve(context, environment_id).await?;
        let result = check_production_restriction(&environment, operation);
        if result.is_err() {
            warn!(
                "Blocked {} operation against PRODUCTION environment '{}' ({}) for request {}",
                operation, environment.name, environment_id, context.request_id
            );
        }
        result
    }
}
