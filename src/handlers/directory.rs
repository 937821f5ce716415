//! Directory statistics handler.

use super::{ToolFailure, ToolHandlers, ToolOutcome, parse_arguments};
use crate::context::RequestContext;
use crate::model::{EnvironmentId, IdentityCountQuery};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalIdentitiesArgs {
    environment_id: EnvironmentId,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

/// Identity counts per reporting period within `[startDate, endDate)`.
pub async fn get_total_identities(
    handlers: &ToolHandlers,
    context: &RequestContext,
    arguments: Value,
) -> ToolOutcome {
    let args: TotalIdentitiesArgs = parse_arguments(arguments)?;
    if args.end_date <= args.start_date {
        return Err(ToolFailure::invalid_arguments(
            "'endDate' must be later than 'startDate'",
        ));
    }

    let query = IdentityCountQuery {
        start_date: args.start_date,
        end_date: args.end_date,
    };

    let client = handlers.client(context).await?;
    let counts = client
        .get_total_identities(&args.environment_id, &query)
        .await?
        .data
        .unwrap_or_default();

    let periods: Vec<Value> = counts
        .iter()
        .map(|count| {
            json!({
                "startDate": count.start_date,
                "endDate": count.end_date,
                "totalIdentities": count.total_identities,
            })
        })
        .collect();

    Ok(json!({
        "environmentId": args.environment_id,
        "startDate": args.start_date,
        "endDate": args.end_date,
        "periods": periods,
        "count": counts.len(),
    }))
}
