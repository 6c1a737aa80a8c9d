//! Staged Records

use crate::value::{ProcessedValue, RawValue};
use feature_schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

/// Unordered attribute map supplied by a caller; never modified by the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(HashMap<String, RawValue>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Marker for how far a [`Record`] has progressed through preprocessing
pub trait Stage: sealed::Sealed {}

/// Schema inputs projected from the raw request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selected;
/// Missing-value flags added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flagged;
/// Every field holds a present value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Imputed;

impl sealed::Sealed for Selected {}
impl sealed::Sealed for Flagged {}
impl sealed::Sealed for Imputed {}
impl Stage for Selected {}
impl Stage for Flagged {}
impl Stage for Imputed {}

/// Field values at a given preprocessing stage
#[derive(Debug, Clone, PartialEq)]
pub struct Record<S: Stage> {
    values: BTreeMap<String, RawValue>,
    _stage: PhantomData<S>,
}

impl<S: Stage> Record<S> {
    pub(crate) fn from_values(values: BTreeMap<String, RawValue>) -> Self {
        Self {
            values,
            _stage: PhantomData,
        }
    }

    pub(crate) fn into_values(self) -> BTreeMap<String, RawValue> {
        self.values
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Record<Selected> {
    /// Copy every schema input out of `raw`; absent inputs become null and
    /// undeclared keys are dropped.
    pub fn select(raw: &RawRecord, schema: &FeatureSchema) -> Self {
        let values = schema
            .input_fields()
            .map(|field| {
                let value = raw.get(field.name()).cloned().unwrap_or(RawValue::Null);
                (field.name().to_string(), value)
            })
            .collect();
        Self::from_values(values)
    }
}

/// Fully processed record, one encodable value per schema field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedRecord(BTreeMap<String, ProcessedValue>);

impl ProcessedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ProcessedValue) {
        self.0.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<ProcessedValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ProcessedValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProcessedValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ProcessedValue)> for ProcessedRecord {
    fn from_iter<I: IntoIterator<Item = (K, ProcessedValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
