//! Raw and Processed Field Values

use feature_schema::{DefaultValue, FieldKind};
use serde::{Deserialize, Serialize};

/// Sentinel some clients send instead of omitting an attribute
const UNKNOWN_SENTINEL: &str = "unknown";

/// Attribute value as received from a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    /// Whether the value counts as missing for any field.
    ///
    /// Null, empty text, `"unknown"`, and negative or non-finite numbers are missing.
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.is_empty() || s == UNKNOWN_SENTINEL,
            RawValue::Number(n) => !n.is_finite() || *n < 0.0,
        }
    }

    /// Missingness for a field of the given kind.
    ///
    /// Numeric fields also treat text holding a negative number as missing,
    /// since query strings carry numbers as text.
    pub fn is_missing_for(&self, kind: FieldKind) -> bool {
        if self.is_missing() {
            return true;
        }
        match (kind, self) {
            (FieldKind::Numeric, RawValue::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(|n| RawValue::Number(n).is_missing())
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl From<&DefaultValue> for RawValue {
    fn from(value: &DefaultValue) -> Self {
        match value {
            DefaultValue::Number(n) => RawValue::Number(*n),
            DefaultValue::Text(s) => RawValue::Text(s.clone()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Null)
    }
}

/// Value ready for encoding
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedValue {
    Float(f64),
    Bytes(Vec<u8>),
}

impl ProcessedValue {
    /// Kind this value encodes as
    pub fn kind(&self) -> FieldKind {
        match self {
            ProcessedValue::Float(_) => FieldKind::Numeric,
            ProcessedValue::Bytes(_) => FieldKind::Categorical,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ProcessedValue::Float(v) => Some(*v),
            ProcessedValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ProcessedValue::Float(_) => None,
            ProcessedValue::Bytes(b) => Some(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_values() {
        assert!(RawValue::Null.is_missing());
        assert!(RawValue::from("").is_missing());
        assert!(RawValue::from("unknown").is_missing());
        assert!(RawValue::from(-1.0).is_missing());
        assert!(RawValue::from(-0.5).is_missing());
        assert!(RawValue::from(None::<&str>).is_missing());
        assert!(RawValue::from(f64::NAN).is_missing());
        assert!(RawValue::from(f64::INFINITY).is_missing());
        assert!(RawValue::from(f64::NEG_INFINITY).is_missing());
    }

    #[test]
    fn test_infinite_text_missing_for_numeric() {
        for text in ["inf", "infinity", "1e400", "-inf"] {
            assert!(
                RawValue::from(text).is_missing_for(FieldKind::Numeric),
                "{} should be missing",
                text
            );
        }
        assert!(!RawValue::from("inf").is_missing_for(FieldKind::Categorical));
    }

    #[test]
    fn test_present_values() {
        assert!(!RawValue::from("us").is_missing());
        assert!(!RawValue::from("Unknown").is_missing());
        assert!(!RawValue::from(0.0).is_missing());
        assert!(!RawValue::from(67i64).is_missing());
        assert!(!RawValue::from("67").is_missing());
    }

    #[test]
    fn test_negative_text_only_missing_for_numeric() {
        let value = RawValue::from("-3");
        assert!(!value.is_missing());
        assert!(value.is_missing_for(FieldKind::Numeric));
        assert!(!value.is_missing_for(FieldKind::Categorical));
        assert!(!RawValue::from("abc").is_missing_for(FieldKind::Numeric));
    }

    #[test]
    fn test_deserialize_json_values() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[null, "us", 67, -1.5]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Null,
                RawValue::Text("us".to_string()),
                RawValue::Number(67.0),
                RawValue::Number(-1.5),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_negative_numbers_are_missing(n in f64::MIN..-f64::MIN_POSITIVE) {
            prop_assert!(RawValue::Number(n).is_missing());
            prop_assert!(RawValue::Text(n.to_string()).is_missing_for(FieldKind::Numeric));
        }

        #[test]
        fn prop_non_negative_numbers_are_present(n in 0.0f64..1e12) {
            prop_assert!(!RawValue::Number(n).is_missing());
        }

        #[test]
        fn prop_ordinary_text_is_present(s in "[a-zA-Z0-9]{1,12}") {
            prop_assume!(s != UNKNOWN_SENTINEL);
            prop_assert!(!RawValue::Text(s).is_missing());
        }
    }
}
