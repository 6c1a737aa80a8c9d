//! Normalization with Fixed Statistics

use crate::error::ValidationError;
use crate::record::{Imputed, ProcessedRecord, Record};
use crate::value::{ProcessedValue, RawValue};
use feature_schema::{FeatureSchema, FieldKind, SchemaField};

/// Largest magnitude at which every integer is exactly representable in f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert an imputed record into encodable values.
///
/// Numeric fields with statistics are z-scored once, other numeric fields
/// are only coerced to float, categorical fields become UTF-8 bytes.
pub fn normalize(
    record: Record<Imputed>,
    schema: &FeatureSchema,
) -> Result<ProcessedRecord, ValidationError> {
    let mut values = record.into_values();
    let mut processed = ProcessedRecord::new();

    for field in schema.fields() {
        let value = values
            .remove(field.name())
            .ok_or_else(|| ValidationError::MissingValue(field.name().to_string()))?;

        let out = match field.kind() {
            FieldKind::Numeric => ProcessedValue::Float(scale(field, &value)?),
            FieldKind::Categorical => ProcessedValue::Bytes(to_bytes(field, value)?),
        };
        processed.insert(field.name(), out);
    }

    Ok(processed)
}

fn scale(field: &SchemaField, value: &RawValue) -> Result<f64, ValidationError> {
    let number = coerce_float(field, value)?;
    Ok(match field.stats() {
        Some(stats) => stats.apply(number),
        None => number,
    })
}

fn coerce_float(field: &SchemaField, value: &RawValue) -> Result<f64, ValidationError> {
    match value {
        RawValue::Number(n) => Ok(*n),
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::NotNumeric {
                field: field.name().to_string(),
                value: s.clone(),
            }),
        RawValue::Null => Err(ValidationError::MissingValue(field.name().to_string())),
    }
}

fn to_bytes(field: &SchemaField, value: RawValue) -> Result<Vec<u8>, ValidationError> {
    match value {
        RawValue::Text(s) => Ok(s.into_bytes()),
        // ASNs and similar identifiers often arrive as JSON numbers
        RawValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => {
            Ok((n as i64).to_string().into_bytes())
        }
        RawValue::Number(n) => Ok(n.to_string().into_bytes()),
        RawValue::Null => Err(ValidationError::MissingValue(field.name().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imputer::fill_missing;
    use crate::indicator::add_missing_flags;
    use crate::record::{RawRecord, Selected};
    use feature_schema::SchemaVersion;
    use proptest::prelude::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::for_version(SchemaVersion::MwebJan2022V1).unwrap()
    }

    fn process(raw: &RawRecord) -> Result<ProcessedRecord, ValidationError> {
        let schema = schema();
        let flagged = add_missing_flags(Record::<Selected>::select(raw, &schema), &schema);
        normalize(fill_missing(flagged, &schema), &schema)
    }

    #[test]
    fn test_known_zscore() {
        let raw = RawRecord::new().with("browser_major_version", "67");
        let record = process(&raw).unwrap();
        let value = record.get("browser_major_version").unwrap().as_float().unwrap();
        assert!((value - 0.3457).abs() < 1e-4);
    }

    #[test]
    fn test_default_is_normalized_too() {
        let record = process(&RawRecord::new()).unwrap();
        let value = record.get("osmajor").unwrap().as_float().unwrap();
        let expected = (14.0 - 13.372263709715911) / 2.376855002582524;
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_categoricals_become_bytes() {
        let raw = RawRecord::new()
            .with("country_code", "us")
            .with("asn_number", 40793i64);
        let record = process(&raw).unwrap();
        assert_eq!(record.get("country_code").unwrap().as_bytes(), Some(&b"us"[..]));
        assert_eq!(record.get("asn_number").unwrap().as_bytes(), Some(&b"40793"[..]));
        assert_eq!(record.get("osmajor_na").unwrap().as_bytes(), Some(&b"True"[..]));
    }

    #[test]
    fn test_every_field_has_declared_type() {
        let schema = schema();
        let record = process(&RawRecord::new()).unwrap();
        assert_eq!(record.len(), schema.len());
        for field in schema.fields() {
            assert_eq!(record.get(field.name()).unwrap().kind(), field.kind());
        }
    }

    #[test]
    fn test_non_numeric_text_fails() {
        let raw = RawRecord::new().with("osmajor", "six");
        assert_eq!(
            process(&raw).unwrap_err(),
            ValidationError::NotNumeric {
                field: "osmajor".to_string(),
                value: "six".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_field_after_imputation_fails() {
        let schema = schema();
        let record = Record::<Imputed>::from_values(Default::default());
        assert_eq!(
            normalize(record, &schema).unwrap_err(),
            ValidationError::MissingValue("asn_number".to_string())
        );
    }

    proptest! {
        #[test]
        fn prop_zscore_inverts(v in 0.0f64..500.0) {
            let record = process(&RawRecord::new().with("browser_major_version", v)).unwrap();
            let z = record.get("browser_major_version").unwrap().as_float().unwrap();
            let back = z * 41.48294747389074 + 52.65782220933843;
            prop_assert!((back - v).abs() < 1e-9);
        }
    }
}
