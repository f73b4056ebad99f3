//! Structured log line rendering.
//!
//! A line is `<tag> <payload>` where the payload is compact JSON. Rendering
//! never fails: a payload that cannot be serialized is replaced by
//! [`FALLBACK_PAYLOAD`] and a diagnostic is logged.

use serde::Serialize;

use crate::error::SerializationError;

/// Payload used when serialization fails.
pub const FALLBACK_PAYLOAD: &str = "{}";

/// Serialize a payload to compact JSON.
pub fn serialize_payload<P: Serialize + ?Sized>(
    payload: &P,
) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(payload)?)
}

/// Render `tag` and `payload` into one log line.
pub fn format<P: Serialize + ?Sized>(tag: &str, payload: &P) -> String {
    let rendered = match serialize_payload(payload) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(tag = %tag, error = %e, "Falling back to empty log payload");
            FALLBACK_PAYLOAD.to_string()
        }
    };
    format!("{} {}", tag, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyMap;
    use serde::Serializer;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_format_property_map() {
        let map = PropertyMap::new()
            .with("client_id", "abc")
            .with("x-transaction-id", "T1");
        assert_eq!(
            format("enter", &map),
            r#"enter {"client_id":"abc","x-transaction-id":"T1"}"#
        );
    }

    #[test]
    fn test_format_empty_map() {
        assert_eq!(format("exit", &PropertyMap::new()), "exit {}");
    }

    #[test]
    fn test_values_are_escaped() {
        let map = PropertyMap::new().with("note", "say \"hi\"");
        assert_eq!(format("enter", &map), r#"enter {"note":"say \"hi\""}"#);
    }

    #[test]
    fn test_serialize_payload_reports_failure() {
        let err = serialize_payload(&Unserializable).unwrap_err();
        assert!(err.to_string().contains("not representable"));
    }

    #[test]
    fn test_format_falls_back_on_failure() {
        assert_eq!(format("enter", &Unserializable), "enter {}");
    }
}
