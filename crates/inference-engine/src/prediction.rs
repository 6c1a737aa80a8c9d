//! Prediction Result Decoding

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Page-load performance class predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceClass {
    /// Page load within budget (class 0)
    Good,
    /// Page load over budget; aggressive optimizations should be disabled (class 1)
    Bad,
}

impl PerformanceClass {
    /// Class for a model output index
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(PerformanceClass::Good),
            1 => Some(PerformanceClass::Bad),
            _ => None,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            PerformanceClass::Good => 0,
            PerformanceClass::Bad => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceClass::Good => "good",
            PerformanceClass::Bad => "bad",
        }
    }
}

impl fmt::Display for PerformanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceClass::Good => f.write_str("Good"),
            PerformanceClass::Bad => f.write_str("Bad"),
        }
    }
}

/// Most probable class and its probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Label {
    pub class: PerformanceClass,
    pub confidence: f32,
}

/// Class index → probability, in class index order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionResult {
    probabilities: BTreeMap<u32, f32>,
}

impl PredictionResult {
    /// Pair raw model scores with the schema's class order.
    ///
    /// Every score must be a finite probability and there must be exactly one
    /// per class.
    pub fn from_scores(classes: &[u32], scores: &[f32]) -> Result<Self, InferenceError> {
        if classes.len() != scores.len() {
            return Err(InferenceError::InvalidOutput(format!(
                "expected {} class scores, got {}",
                classes.len(),
                scores.len()
            )));
        }
        if let Some(bad) = scores
            .iter()
            .find(|s| !s.is_finite() || !(0.0..=1.0).contains(*s))
        {
            return Err(InferenceError::InvalidOutput(format!(
                "invalid confidence score {} in {:?}",
                bad, scores
            )));
        }

        Ok(Self {
            probabilities: classes.iter().copied().zip(scores.iter().copied()).collect(),
        })
    }

    /// Probability of a class index
    pub fn probability(&self, class: u32) -> Option<f32> {
        self.probabilities.get(&class).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.probabilities.iter().map(|(&k, &v)| (k, v))
    }

    pub fn classes(&self) -> impl Iterator<Item = u32> + '_ {
        self.probabilities.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Sum of all probabilities
    pub fn total(&self) -> f32 {
        self.probabilities.values().sum()
    }

    /// Most probable class; ties go to the higher class index.
    ///
    /// `None` if that index is not a known [`PerformanceClass`].
    pub fn label(&self) -> Option<Label> {
        let (index, confidence) = self
            .iter()
            .fold(None, |best: Option<(u32, f32)>, (class, p)| match best {
                Some((_, best_p)) if best_p > p => best,
                _ => Some((class, p)),
            })?;
        PerformanceClass::from_index(index).map(|class| Label { class, confidence })
    }

    pub fn into_map(self) -> BTreeMap<u32, f32> {
        self.probabilities
    }
}
