//! Encode/decode boundary for the JSON-in-text columns of `scan_history`.
//!
//! | Column                 | Stored shape                       |
//! |------------------------|------------------------------------|
//! | `detected_ingredients` | JSON array of strings              |
//! | `detected_allergens`   | JSON array of strings              |
//! | `diet_warnings`        | JSON array of strings              |
//! | `analysis_payload`     | any JSON value (object in practice)|
//!
//! Decoding accepts the encoded text and also text whose JSON value is
//! itself a string holding the encoded form, which older writers produced.
//! Anything that does not match the expected shape decodes to the empty
//! default and logs a warning; one bad row never aborts a read.

use serde_json::Value;
use tracing::warn;

/// Encode a list column.
pub(crate) fn encode_string_list(items: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Encode the raw payload column.
pub(crate) fn encode_payload(payload: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(payload)
}

fn parse_structured(raw: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        Value::String(inner) => serde_json::from_str(&inner),
        other => Ok(other),
    }
}

fn strings_only(value: Value) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// Decode a list column, falling back to an empty list.
pub(crate) fn decode_string_list(raw: &str, record_id: i64, field: &'static str) -> Vec<String> {
    match parse_structured(raw) {
        Ok(value) => strings_only(value).unwrap_or_else(|| {
            warn!(record_id, field, "list column is not an array of strings; using empty list");
            Vec::new()
        }),
        Err(err) => {
            warn!(record_id, field, error = %err, "list column is not valid JSON; using empty list");
            Vec::new()
        }
    }
}

/// Decode the payload column, falling back to an empty object.
pub(crate) fn decode_payload(raw: &str, record_id: i64) -> Value {
    parse_structured(raw).unwrap_or_else(|err| {
        warn!(
            record_id,
            field = "analysis_payload",
            error = %err,
            "payload column is not valid JSON; using empty object"
        );
        Value::Object(serde_json::Map::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[rstest]
    fn encoded_list_decodes_back() {
        let encoded = encode_string_list(&names(&["egg", "milk"])).expect("encode list");
        assert_eq!(encoded, r#"["egg","milk"]"#);
        assert_eq!(
            decode_string_list(&encoded, 1, "detected_allergens"),
            names(&["egg", "milk"])
        );
    }

    #[rstest]
    fn double_encoded_list_is_accepted() {
        let inner = r#"["egg","milk"]"#;
        let double = serde_json::to_string(inner).expect("encode string");
        assert_eq!(
            decode_string_list(&double, 1, "detected_allergens"),
            names(&["egg", "milk"])
        );
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"egg": true}"#)]
    #[case(r#"["egg", 3]"#)]
    #[case(r#""also not json""#)]
    #[case("")]
    fn malformed_lists_fall_back_to_empty(#[case] raw: &str) {
        assert!(decode_string_list(raw, 9, "diet_warnings").is_empty());
    }

    #[rstest]
    fn payload_round_trips_nested_values() {
        let payload = json!({"status": "success", "analysis": {"nutrition": {"fat": 1.5}}});
        let encoded = encode_payload(&payload).expect("encode payload");
        assert_eq!(decode_payload(&encoded, 1), payload);
    }

    #[rstest]
    fn unreadable_payload_becomes_empty_object() {
        assert_eq!(decode_payload("{oops", 4), json!({}));
    }
}
