//! Built-in Model Generations

use crate::error::SchemaError;
use crate::schema::{FeatureSchema, FieldDefinition, NormalizationStats, SchemaDefinition};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default for every categorical input of the built-in schemas
const UNKNOWN_CATEGORY: &str = "**";

const BROWSER_VERSION_STATS: NormalizationStats =
    NormalizationStats::new(52.65782220933843, 41.48294747389074);
const OS_MAJOR_STATS: NormalizationStats =
    NormalizationStats::new(13.372263709715911, 2.376855002582524);

const BROWSER_VERSION_DEFAULT: f64 = 15.0;
const OS_MAJOR_DEFAULT: f64 = 14.0;

/// Model generation a schema belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Mobile web model, January 2022
    #[serde(rename = "mweb-jan-2022-v1")]
    MwebJan2022V1,
    /// Edge-served mobile web model with datacenter and PoP inputs
    #[serde(rename = "mweb-edge-2022-v2")]
    MwebEdge2022V2,
}

impl SchemaVersion {
    /// All built-in versions
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::MwebJan2022V1, SchemaVersion::MwebEdge2022V2];

    /// Version identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::MwebJan2022V1 => "mweb-jan-2022-v1",
            SchemaVersion::MwebEdge2022V2 => "mweb-edge-2022-v2",
        }
    }

    /// Field declarations of this version
    pub fn definition(&self) -> SchemaDefinition {
        let fields = match self {
            SchemaVersion::MwebJan2022V1 => vec![
                FieldDefinition::categorical("asn_number", UNKNOWN_CATEGORY),
                FieldDefinition::indicated_numeric(
                    "browser_major_version",
                    BROWSER_VERSION_DEFAULT,
                    BROWSER_VERSION_STATS,
                ),
                FieldDefinition::categorical("browser_name", UNKNOWN_CATEGORY),
                FieldDefinition::categorical("country_code", UNKNOWN_CATEGORY),
                FieldDefinition::categorical("osfamily", UNKNOWN_CATEGORY),
                FieldDefinition::indicated_numeric("osmajor", OS_MAJOR_DEFAULT, OS_MAJOR_STATS),
            ],
            SchemaVersion::MwebEdge2022V2 => vec![
                FieldDefinition::categorical("asn", UNKNOWN_CATEGORY),
                FieldDefinition::indicated_numeric(
                    "browser_major_version",
                    BROWSER_VERSION_DEFAULT,
                    BROWSER_VERSION_STATS,
                ),
                FieldDefinition::categorical("browser_name", UNKNOWN_CATEGORY),
                FieldDefinition::categorical("country_code", UNKNOWN_CATEGORY),
                FieldDefinition::categorical("datacenter", UNKNOWN_CATEGORY),
                FieldDefinition::categorical("osFamily", UNKNOWN_CATEGORY),
                FieldDefinition::indicated_numeric("osMajor", OS_MAJOR_DEFAULT, OS_MAJOR_STATS),
                FieldDefinition::categorical("pop", UNKNOWN_CATEGORY),
            ],
        };

        SchemaDefinition {
            name: self.as_str().to_string(),
            fields,
            classes: vec![0, 1],
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownVersion(s.to_string()))
    }
}

impl FeatureSchema {
    /// Schema of a built-in model generation
    pub fn for_version(version: SchemaVersion) -> Result<Self, SchemaError> {
        Self::from_definition(version.definition())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DefaultValue, FieldKind};

    #[test]
    fn test_jan_2022_field_order() {
        let schema = FeatureSchema::for_version(SchemaVersion::MwebJan2022V1).unwrap();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(
            names,
            vec![
                "asn_number",
                "browser_major_version",
                "browser_major_version_na",
                "browser_name",
                "country_code",
                "osfamily",
                "osmajor",
                "osmajor_na",
            ]
        );
    }

    #[test]
    fn test_jan_2022_defaults_and_stats() {
        let schema = FeatureSchema::for_version(SchemaVersion::MwebJan2022V1).unwrap();
        assert_eq!(
            schema.default_for("browser_major_version").unwrap(),
            &DefaultValue::Number(15.0)
        );
        assert_eq!(schema.default_for("osmajor").unwrap(), &DefaultValue::Number(14.0));
        assert_eq!(
            schema.default_for("country_code").unwrap(),
            &DefaultValue::Text("**".to_string())
        );

        let stats = schema.stats("osmajor").unwrap().unwrap();
        assert!((stats.mean - 13.372263709715911).abs() < 1e-12);
        assert!((stats.std_dev - 2.376855002582524).abs() < 1e-12);
        assert!(schema.stats("browser_name").is_err());
    }

    #[test]
    fn test_edge_schema_has_datacenter_and_pop() {
        let schema = FeatureSchema::for_version(SchemaVersion::MwebEdge2022V2).unwrap();
        assert_eq!(schema.field("datacenter").unwrap().kind(), FieldKind::Categorical);
        assert_eq!(schema.field("pop").unwrap().kind(), FieldKind::Categorical);
        assert!(schema.field("osMajor_na").is_some());
        assert!(schema.field("osmajor").is_none());
        assert_eq!(schema.len(), 10);
    }

    #[test]
    fn test_version_round_trip_through_str() {
        for version in SchemaVersion::ALL {
            assert_eq!(version.as_str().parse::<SchemaVersion>().unwrap(), version);
        }
        assert_eq!(
            "mweb-2019".parse::<SchemaVersion>(),
            Err(SchemaError::UnknownVersion("mweb-2019".to_string()))
        );
    }
}
