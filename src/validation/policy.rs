//! Per-tool production protection policy.
//!
//! Tools declare three independent flags. They are resolved once, when the
//! tool is defined, into a [`ProductionPolicy`] so the precedence rule
//! (not-applicable beats both allowances) lives in one place.

use super::OperationType;
use serde::{Deserialize, Serialize};

/// Production protection flags as a tool declares them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolValidationPolicy {
    /// Allow read calls against PRODUCTION environments
    #[serde(default)]
    pub allow_production_environment_read: bool,
    /// Allow write calls against PRODUCTION environments
    #[serde(default)]
    pub allow_production_environment_write: bool,
    /// The tool has no environment-scoped target; skip all checks
    #[serde(default)]
    pub production_environment_not_applicable: bool,
}

impl ToolValidationPolicy {
    pub fn not_applicable() -> Self {
        Self {
            production_environment_not_applicable: true,
            ..Self::default()
        }
    }

    pub fn allow_read() -> Self {
        Self {
            allow_production_environment_read: true,
            ..Self::default()
        }
    }

    pub fn allow_write() -> Self {
        Self {
            allow_production_environment_write: true,
            ..Self::default()
        }
    }
}

/// Resolved production protection for a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionPolicy {
    /// No environment target; validation never runs
    NotApplicable,
    /// Reads may target PRODUCTION
    ReadAllowed,
    /// Writes may target PRODUCTION
    WriteAllowed,
    /// Reads and writes may target PRODUCTION
    ReadAndWriteAllowed,
    /// PRODUCTION targets are denied
    #[default]
    Restricted,
}

impl ProductionPolicy {
    /// Whether a call of this operation type skips environment validation.
    pub fn permits(self, operation: OperationType) -> bool {
        match (self, operation) {
            (Self::NotApplicable, _) | (Self::ReadAndWriteAllowed, _) => true,
            (Self::ReadAllowed, OperationType::Read) => true,
            (Self::WriteAllowed, OperationType::Write) => true,
            _ => false,
        }
    }
}

impl From<ToolValidationPolicy> for ProductionPolicy {
    fn from(policy: ToolValidationPolicy) -> Self {
        if policy.production_environment_not_applicable {
            return Self::NotApplicable;
        }
        match (
            policy.allow_production_environment_read,
            policy.allow_production_environment_write,
        ) {
            (true, true) => Self::ReadAndWriteAllowed,
            (true, false) => Self::ReadAllowed,
            (false, true) => Self::WriteAllowed,
            (false, false) => Self::Restricted,
        }
    }
}

impl From<Option<ToolValidationPolicy>> for ProductionPolicy {
    fn from(policy: Option<ToolValidationPolicy>) -> Self {
        policy.map_or(Self::Restricted, Self::from)
    }
}
