//! PingOne environment entities.
//!
//! An environment is the tenant-scoped container every other PingOne resource
//! lives in. Its [`EnvironmentType`] drives the production protection rules:
//! the platform allows SANDBOX → PRODUCTION promotion but never the reverse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A validated PingOne environment identifier.
///
/// PingOne identifies environments by UUID; anything else is rejected at
/// construction so malformed IDs never reach the API or the validation cache.
///
/// ```rust
/// use pingone_mcp_server::model::EnvironmentId;
///
/// let id: EnvironmentId = "0b4d1f06-54a4-4f5c-a2cb-6b3a3e2d6f10".parse().unwrap();
/// assert_eq!(id.to_string(), "0b4d1f06-54a4-4f5c-a2cb-6b3a3e2d6f10");
/// assert!("env-42".parse::<EnvironmentId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(Uuid);

impl EnvironmentId {
    /// Wrap an already-parsed UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for EnvironmentId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EnvironmentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Environment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentType {
    #[default]
    Sandbox,
    Production,
}

impl EnvironmentType {
    /// Wire representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "SANDBOX",
            Self::Production => "PRODUCTION",
        }
    }
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to another entity by ID, as PingOne embeds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

/// A PingOne environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
    #[serde(rename = "type")]
    pub environment_type: EnvironmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Environment {
    /// Minimal environment, mostly useful for fakes and tests.
    pub fn new(id: EnvironmentId, name: impl Into<String>, environment_type: EnvironmentType) -> Self {
        Self {
            id,
            name: name.into(),
            environment_type,
            description: None,
            region: None,
            license: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether this environment is PRODUCTION.
    pub fn is_production(&self) -> bool {
        self.environment_type == EnvironmentType::Production
    }
}

/// A product enabled in an environment's bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The set of products (services) enabled in an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BillOfMaterials {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BillOfMaterials {
    /// Bill of materials enabling the given product types.
    pub fn with_products<I, S>(product_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            products: product_types
                .into_iter()
                .map(|product_type| Product {
                    id: None,
                    product_type: product_type.into(),
                    description: None,
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Body for creating an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentRequest {
    pub name: String,
    pub region: String,
    #[serde(rename = "type", default)]
    pub environment_type: EnvironmentType,
    pub license: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_of_materials: Option<BillOfMaterials>,
}

/// Body for replacing an environment's mutable attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentRequest {
    pub name: String,
    pub region: String,
    #[serde(rename = "type")]
    pub environment_type: EnvironmentType,
    pub license: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
