//! Feature Schema Definition

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Suffix appended to a numeric field name to form its missing-value flag
pub const INDICATOR_SUFFIX: &str = "_na";

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Encoded as a float list
    Numeric,
    /// Encoded as a bytes list
    Categorical,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Numeric => f.write_str("numeric"),
            FieldKind::Categorical => f.write_str("categorical"),
        }
    }
}

/// Value substituted for a missing input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Number(f64),
    Text(String),
}

impl DefaultValue {
    fn kind(&self) -> FieldKind {
        match self {
            DefaultValue::Number(_) => FieldKind::Numeric,
            DefaultValue::Text(_) => FieldKind::Categorical,
        }
    }
}

/// Fixed mean / standard deviation pair computed at training time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalizationStats {
    /// Create a statistics pair
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Z-score of `value`
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }

    fn is_usable(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite() && self.std_dev > 0.0
    }
}

/// One input field of a [`SchemaDefinition`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    pub default: DefaultValue,
    /// Z-score statistics (numeric fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<NormalizationStats>,
    /// Emit a `<name>_na` flag recording original missingness (numeric fields only)
    #[serde(default)]
    pub missing_indicator: bool,
}

impl FieldDefinition {
    /// Categorical field with a text default
    pub fn categorical(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical,
            default: DefaultValue::Text(default.to_string()),
            stats: None,
            missing_indicator: false,
        }
    }

    /// Numeric field with a default, normalization statistics and a missing-value flag
    pub fn indicated_numeric(name: &str, default: f64, stats: NormalizationStats) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
            default: DefaultValue::Number(default),
            stats: Some(stats),
            missing_indicator: true,
        }
    }
}

/// Serializable description of a model generation's inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    /// Class indices in the order the model emits probabilities
    #[serde(default = "default_classes")]
    pub classes: Vec<u32>,
}

fn default_classes() -> Vec<u32> {
    vec![0, 1]
}

/// A field of a built [`FeatureSchema`], either a raw input or a synthesized flag
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    name: String,
    kind: FieldKind,
    default: DefaultValue,
    stats: Option<NormalizationStats>,
    indicator: Option<String>,
    indicator_of: Option<String>,
}

impl SchemaField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::Numeric
    }

    pub fn default(&self) -> &DefaultValue {
        &self.default
    }

    pub fn stats(&self) -> Option<NormalizationStats> {
        self.stats
    }

    /// Name of the flag field tracking this field's missingness
    pub fn indicator(&self) -> Option<&str> {
        self.indicator.as_deref()
    }

    /// Source field when this field is a synthesized flag
    pub fn indicator_of(&self) -> Option<&str> {
        self.indicator_of.as_deref()
    }

    /// Whether the value comes from the raw request rather than synthesis
    pub fn is_input(&self) -> bool {
        self.indicator_of.is_none()
    }
}

/// Immutable, validated schema of one model generation
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    name: String,
    fields: Vec<SchemaField>,
    index: HashMap<String, usize>,
    classes: Vec<u32>,
}

impl FeatureSchema {
    /// Build and validate a schema from its definition.
    ///
    /// Flag fields are placed directly after the numeric field they track.
    pub fn from_definition(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let SchemaDefinition {
            name,
            fields: definitions,
            classes,
        } = definition;

        if definitions.is_empty() {
            return Err(SchemaError::Empty(name));
        }
        validate_classes(&classes)?;

        let mut fields = Vec::with_capacity(definitions.len() + 2);
        for def in definitions {
            if def.default.kind() != def.kind {
                return Err(SchemaError::DefaultTypeMismatch {
                    field: def.name,
                    expected: def.kind,
                });
            }
            if def.kind != FieldKind::Numeric && (def.stats.is_some() || def.missing_indicator) {
                return Err(SchemaError::NotNumeric(def.name));
            }
            if let Some(stats) = def.stats {
                if !stats.is_usable() {
                    return Err(SchemaError::InvalidStats {
                        field: def.name,
                        mean: stats.mean,
                        std_dev: stats.std_dev,
                    });
                }
            }

            let indicator = def
                .missing_indicator
                .then(|| format!("{}{}", def.name, INDICATOR_SUFFIX));
            let source = def.name.clone();
            fields.push(SchemaField {
                name: def.name,
                kind: def.kind,
                default: def.default,
                stats: def.stats,
                indicator: indicator.clone(),
                indicator_of: None,
            });
            if let Some(flag) = indicator {
                fields.push(SchemaField {
                    name: flag,
                    kind: FieldKind::Categorical,
                    default: DefaultValue::Text("False".to_string()),
                    stats: None,
                    indicator: None,
                    indicator_of: Some(source),
                });
            }
        }

        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        debug!("Built feature schema {} with {} fields", name, fields.len());

        Ok(Self {
            name,
            fields,
            index,
            classes,
        })
    }

    /// Schema name (the version identifier for built-in schemas)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields in declaration order, flags included
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Fields read from the raw request
    pub fn input_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| f.is_input())
    }

    /// `(source, flag)` name pairs for every NA-flagged numeric field
    pub fn indicator_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|f| f.indicator().map(|flag| (f.name.as_str(), flag)))
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Number of fields, flags included
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Default value of a declared field
    pub fn default_for(&self, name: &str) -> Result<&DefaultValue, SchemaError> {
        self.field(name)
            .map(SchemaField::default)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))
    }

    /// Normalization statistics of a numeric field.
    ///
    /// `Ok(None)` means the field is numeric but passed through unscaled.
    pub fn stats(&self, name: &str) -> Result<Option<NormalizationStats>, SchemaError> {
        let field = self
            .field(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        if !field.is_numeric() {
            return Err(SchemaError::NotNumeric(name.to_string()));
        }
        Ok(field.stats)
    }

    /// Class indices in model output order
    pub fn classes(&self) -> &[u32] {
        &self.classes
    }
}

fn validate_classes(classes: &[u32]) -> Result<(), SchemaError> {
    if classes.is_empty() {
        return Err(SchemaError::InvalidClasses("no classes declared".to_string()));
    }
    let mut seen = classes.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != classes.len() {
        return Err(SchemaError::InvalidClasses(format!(
            "repeated class index in {:?}",
            classes
        )));
    }
    Ok(())
}
