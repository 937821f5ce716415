//! Directory statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity count for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalIdentities {
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub total_identities: u64,
}

/// Reporting window for identity counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCountQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl IdentityCountQuery {
    /// SCIM-style filter expression understood by the totalIdentities endpoint.
    pub fn filter(&self) -> String {
        format!(
            "startDate ge \"{}\" and endDate lt \"{}\"",
            self.start_date.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.end_date.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        )
    }
}
