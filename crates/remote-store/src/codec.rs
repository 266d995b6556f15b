//! Gate encoding and decoding for the feature-flag HTTP API.
//!
//! | Gate | Request body | Response value → [`GateValue`] |
//! |------|--------------|--------------------------------|
//! | `boolean` | `{}` | `true` → `"true"`, anything else → absent |
//! | `groups` | `{"name": v}` | array of strings → set |
//! | `actors` | `{"flipper_id": v}` | array of strings → set |
//! | `percentage_of_*` | `{"percentage": v}` | number → its string form, `0` → `"0"` |

use std::collections::BTreeSet;

use flags::{GateKey, GateValue, StoreError};
use serde_json::{json, Value};

/// Builds the request body for changing `key` with `value`.
pub fn gate_request_body(key: GateKey, value: Value) -> Value {
    match key {
        GateKey::Boolean => json!({}),
        GateKey::Groups => json!({ "name": value }),
        GateKey::Actors => json!({ "flipper_id": value }),
        GateKey::PercentageOfActors | GateKey::PercentageOfTime => json!({ "percentage": value }),
    }
}

/// Decodes the raw `value` the API reports for gate `key`.
///
/// `null` decodes to the gate's empty value.
///
/// # Errors
///
/// [`StoreError::Decode`] if a set gate is not an array of strings or a
/// percentage gate is neither a number nor a string.
pub fn result_for_feature(key: GateKey, value: &Value) -> Result<GateValue, StoreError> {
    match key {
        GateKey::Boolean => Ok(GateValue::Boolean(
            (value.as_bool() == Some(true)).then(|| "true".to_string()),
        )),
        GateKey::Groups | GateKey::Actors => decode_set(key, value).map(GateValue::Set),
        GateKey::PercentageOfActors | GateKey::PercentageOfTime => {
            decode_percentage(key, value).map(GateValue::Percentage)
        }
    }
}

fn decode_set(key: GateKey, value: &Value) -> Result<BTreeSet<String>, StoreError> {
    match value {
        Value::Null => Ok(BTreeSet::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(StoreError::decode(format!(
                    "{key} member {other} is not a string"
                ))),
            })
            .collect(),
        other => Err(StoreError::decode(format!("{key} value {other} is not an array"))),
    }
}

fn decode_percentage(key: GateKey, value: &Value) -> Result<Option<String>, StoreError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(Some("0".to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(StoreError::decode(format!("{key} value {other} is not a percentage"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_body_is_empty_object() {
        assert_eq!(gate_request_body(GateKey::Boolean, json!("true")), json!({}));
    }

    #[test]
    fn set_bodies_name_the_member() {
        assert_eq!(
            gate_request_body(GateKey::Groups, json!("admins")),
            json!({ "name": "admins" })
        );
        assert_eq!(
            gate_request_body(GateKey::Actors, json!("User;22")),
            json!({ "flipper_id": "User;22" })
        );
    }

    #[test]
    fn percentage_bodies_carry_the_value_unchanged() {
        assert_eq!(
            gate_request_body(GateKey::PercentageOfActors, json!(10)),
            json!({ "percentage": 10 })
        );
        assert_eq!(
            gate_request_body(GateKey::PercentageOfTime, json!("25")),
            json!({ "percentage": "25" })
        );
    }

    #[test]
    fn boolean_decodes_only_true() {
        assert_eq!(
            result_for_feature(GateKey::Boolean, &json!(true)).unwrap(),
            GateValue::Boolean(Some("true".to_string()))
        );
        for raw in [json!(false), json!(null), json!("true"), json!(1)] {
            assert_eq!(
                result_for_feature(GateKey::Boolean, &raw).unwrap(),
                GateValue::Boolean(None),
                "raw value {raw}"
            );
        }
    }

    #[test]
    fn sets_decode_from_string_arrays() {
        let decoded = result_for_feature(GateKey::Actors, &json!(["22", "5", "22"])).unwrap();
        assert_eq!(
            decoded,
            GateValue::Set(BTreeSet::from(["22".to_string(), "5".to_string()]))
        );
        assert_eq!(
            result_for_feature(GateKey::Groups, &json!(null)).unwrap(),
            GateValue::Set(BTreeSet::new())
        );
    }

    #[test]
    fn sets_reject_non_string_members() {
        let err = result_for_feature(GateKey::Groups, &json!(["admins", 7])).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
        let err = result_for_feature(GateKey::Actors, &json!("22")).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn percentages_decode_to_strings() {
        assert_eq!(
            result_for_feature(GateKey::PercentageOfActors, &json!(0)).unwrap(),
            GateValue::Percentage(Some("0".to_string()))
        );
        assert_eq!(
            result_for_feature(GateKey::PercentageOfTime, &json!(0.0)).unwrap(),
            GateValue::Percentage(Some("0".to_string()))
        );
        assert_eq!(
            result_for_feature(GateKey::PercentageOfTime, &json!(35)).unwrap(),
            GateValue::Percentage(Some("35".to_string()))
        );
        assert_eq!(
            result_for_feature(GateKey::PercentageOfActors, &json!(12.5)).unwrap(),
            GateValue::Percentage(Some("12.5".to_string()))
        );
        assert_eq!(
            result_for_feature(GateKey::PercentageOfActors, &json!(null)).unwrap(),
            GateValue::Percentage(None)
        );
    }

    #[test]
    fn percentages_reject_other_shapes() {
        let err = result_for_feature(GateKey::PercentageOfTime, &json!([10])).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }
}
