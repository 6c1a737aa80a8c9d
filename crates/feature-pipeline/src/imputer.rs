//! Missing-Value Imputation

use crate::record::{Flagged, Imputed, Record};
use crate::value::RawValue;
use feature_schema::FeatureSchema;
use tracing::debug;

/// Replace every missing schema field with its default; present values pass
/// through unchanged.
pub fn fill_missing(record: Record<Flagged>, schema: &FeatureSchema) -> Record<Imputed> {
    let mut values = record.into_values();
    let mut filled = 0usize;

    for field in schema.fields() {
        let missing = values
            .get(field.name())
            .map_or(true, |value| value.is_missing_for(field.kind()));
        if missing {
            values.insert(field.name().to_string(), RawValue::from(field.default()));
            filled += 1;
        }
    }

    debug!("Imputed {} of {} fields", filled, schema.len());
    Record::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::add_missing_flags;
    use crate::record::{RawRecord, Selected};
    use feature_schema::SchemaVersion;

    fn impute(raw: &RawRecord) -> Record<Imputed> {
        let schema = FeatureSchema::for_version(SchemaVersion::MwebJan2022V1).unwrap();
        let flagged = add_missing_flags(Record::<Selected>::select(raw, &schema), &schema);
        fill_missing(flagged, &schema)
    }

    #[test]
    fn test_absent_country_code_gets_default() {
        let raw = RawRecord::new().with("browser_name", "chrome");
        let record = impute(&raw);
        assert_eq!(record.get("country_code"), Some(&RawValue::from("**")));
        assert_eq!(record.get("browser_name"), Some(&RawValue::from("chrome")));
    }

    #[test]
    fn test_numeric_defaults() {
        let raw = RawRecord::new()
            .with("browser_major_version", "")
            .with("osmajor", -2.0);
        let record = impute(&raw);
        assert_eq!(record.get("browser_major_version"), Some(&RawValue::Number(15.0)));
        assert_eq!(record.get("osmajor"), Some(&RawValue::Number(14.0)));
    }

    #[test]
    fn test_flag_survives_imputation() {
        let record = impute(&RawRecord::new());
        assert_eq!(record.get("osmajor"), Some(&RawValue::Number(14.0)));
        assert_eq!(record.get("osmajor_na"), Some(&RawValue::from("True")));
    }

    #[test]
    fn test_present_values_unchanged() {
        let raw = RawRecord::new()
            .with("asn_number", "40793")
            .with("osmajor", "6");
        let record = impute(&raw);
        assert_eq!(record.get("asn_number"), Some(&RawValue::from("40793")));
        assert_eq!(record.get("osmajor"), Some(&RawValue::from("6")));
        assert!(record.iter().all(|(_, v)| !v.is_missing()));
    }

    #[test]
    fn test_input_record_not_modified() {
        let raw = RawRecord::new().with("country_code", "unknown");
        let before = raw.clone();
        let record = impute(&raw);
        assert_eq!(raw, before);
        assert_eq!(record.get("country_code"), Some(&RawValue::from("**")));
    }
}
