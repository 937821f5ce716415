//! Pulls the target environment out of raw tool-call arguments.
//!
//! Only the `environmentId` field is decoded; the rest of the arguments stay
//! untouched for the tool handler to deserialize later.

use crate::error::ExtractionError;
use crate::model::EnvironmentId;
use serde_json::Value;

/// Argument name environment-scoped tools use for their target.
pub const ENVIRONMENT_ID_FIELD: &str = "environmentId";

/// Extract and parse `environmentId` from tool arguments.
///
/// Absent arguments, a missing field and an explicit `null` all count as
/// missing. A present value that is not a UUID string is malformed.
pub fn extract_environment_id(arguments: Option<&Value>) -> Result<EnvironmentId, ExtractionError> {
    let fields = match arguments {
        None | Some(Value::Null) => return Err(ExtractionError::MissingEnvironmentId),
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(ExtractionError::ArgumentsNotObject),
    };

    match fields.get(ENVIRONMENT_ID_FIELD) {
        None | Some(Value::Null) => Err(ExtractionError::MissingEnvironmentId),
        Some(Value::String(raw)) => raw
            .parse()
            .map_err(|_| ExtractionError::InvalidEnvironmentId { value: raw.clone() }),
        Some(other) => Err(ExtractionError::InvalidEnvironmentId {
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_extracts_well_formed_id() {
        let arguments = json!({
            "environmentId": "6f1c2a57-2f0e-4b8e-9a51-3c3f3d1b2a90",
            "name": "Customers"
        });
        let id = extract_environment_id(Some(&arguments)).unwrap();
        assert_eq!(id.to_string(), "6f1c2a57-2f0e-4b8e-9a51-3c3f3d1b2a90");
    }

    #[test]
    fn test_missing_field() {
        let arguments = json!({"name": "Customers"});
        assert!(matches!(
            extract_environment_id(Some(&arguments)),
            Err(ExtractionError::MissingEnvironmentId)
        ));
        assert!(matches!(
            extract_environment_id(None),
            Err(ExtractionError::MissingEnvironmentId)
        ));
        assert!(matches!(
            extract_environment_id(Some(&json!({"environmentId": null}))),
            Err(ExtractionError::MissingEnvironmentId)
        ));
    }

    #[test]
    fn test_malformed_values() {
        assert!(matches!(
            extract_environment_id(Some(&json!({"environmentId": "env-42"}))),
            Err(ExtractionError::InvalidEnvironmentId { value }) if value == "env-42"
        ));
        assert!(matches!(
            extract_environment_id(Some(&json!({"environmentId": 42}))),
            Err(ExtractionError::InvalidEnvironmentId { .. })
        ));
        assert!(matches!(
            extract_environment_id(Some(&json!(["environmentId"]))),
            Err(ExtractionError::ArgumentsNotObject)
        ));
    }

    proptest! {
        #[test]
        fn prop_any_uuid_is_extracted(raw in any::<u128>()) {
            let uuid = Uuid::from_u128(raw);
            let arguments = json!({ "environmentId": uuid.to_string() });
            let id = extract_environment_id(Some(&arguments)).unwrap();
            prop_assert_eq!(id.as_uuid(), &uuid);
        }

        #[test]
        fn prop_short_strings_are_rejected(value in "[a-z0-9-]{0,20}") {
            let arguments = json!({ "environmentId": value });
            let is_invalid = matches!(
                extract_environment_id(Some(&arguments)),
                Err(ExtractionError::InvalidEnvironmentId { .. })
            );
            prop_assert!(is_invalid);
        }
    }
}
