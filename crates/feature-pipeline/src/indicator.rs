//! Missing-Value Indicator Synthesis

use crate::record::{Flagged, Record, Selected};
use crate::value::RawValue;
use feature_schema::{FeatureSchema, FieldKind};
use tracing::trace;

/// Flag value for an originally missing field
pub const FLAG_TRUE: &str = "True";
/// Flag value for an originally present field
pub const FLAG_FALSE: &str = "False";

/// Add a `<field>_na` flag for every NA-flagged numeric field of `schema`.
///
/// Only accepts a [`Selected`] record, so flags always see the values as
/// they arrived, before any default is substituted.
pub fn add_missing_flags(record: Record<Selected>, schema: &FeatureSchema) -> Record<Flagged> {
    let mut values = record.into_values();

    for (source, flag) in schema.indicator_pairs() {
        let missing = values
            .get(source)
            .map_or(true, |value| value.is_missing_for(FieldKind::Numeric));
        let text = if missing { FLAG_TRUE } else { FLAG_FALSE };
        trace!("{} = {}", flag, text);
        values.insert(flag.to_string(), RawValue::from(text));
    }

    Record::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;
    use feature_schema::SchemaVersion;

    fn flags_for(raw: &RawRecord) -> Record<Flagged> {
        let schema = FeatureSchema::for_version(SchemaVersion::MwebJan2022V1).unwrap();
        add_missing_flags(Record::<Selected>::select(raw, &schema), &schema)
    }

    #[test]
    fn test_present_values_flag_false() {
        let raw = RawRecord::new()
            .with("browser_major_version", "67")
            .with("osmajor", 6i64);
        let record = flags_for(&raw);
        assert_eq!(record.get("browser_major_version_na"), Some(&RawValue::from("False")));
        assert_eq!(record.get("osmajor_na"), Some(&RawValue::from("False")));
    }

    #[test]
    fn test_missing_values_flag_true() {
        let raw = RawRecord::new()
            .with("browser_major_version", "unknown")
            .with("osmajor", -1i64);
        let record = flags_for(&raw);
        assert_eq!(record.get("browser_major_version_na"), Some(&RawValue::from("True")));
        assert_eq!(record.get("osmajor_na"), Some(&RawValue::from("True")));
    }

    #[test]
    fn test_absent_field_flags_true_and_source_is_untouched() {
        let record = flags_for(&RawRecord::new());
        assert_eq!(record.get("osmajor_na"), Some(&RawValue::from("True")));
        assert_eq!(record.get("osmajor"), Some(&RawValue::Null));
    }

    #[test]
    fn test_only_designated_fields_are_flagged() {
        let record = flags_for(&RawRecord::new());
        assert_eq!(record.len(), 8);
        assert!(record.get("country_code_na").is_none());
    }
}
