//! `tf.train.Example` message types
//!
//! Field numbers follow `tensorflow/core/example/{example,feature}.proto`.

use std::collections::BTreeMap;

/// Named features of one example
#[derive(Clone, PartialEq, prost::Message)]
pub struct Example {
    #[prost(message, optional, tag = "1")]
    pub features: Option<Features>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Features {
    /// Ordered map so identical records encode to identical bytes
    #[prost(btree_map = "string, message", tag = "1")]
    pub feature: BTreeMap<String, Feature>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Feature {
    #[prost(oneof = "feature::Kind", tags = "1, 2, 3")]
    pub kind: Option<feature::Kind>,
}

pub mod feature {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "1")]
        BytesList(super::BytesList),
        #[prost(message, tag = "2")]
        FloatList(super::FloatList),
        #[prost(message, tag = "3")]
        Int64List(super::Int64List),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BytesList {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub value: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FloatList {
    #[prost(float, repeated, tag = "1")]
    pub value: Vec<f32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Int64List {
    #[prost(int64, repeated, tag = "1")]
    pub value: Vec<i64>,
}

impl Feature {
    /// Single-element float list
    pub fn float(value: f32) -> Self {
        Self {
            kind: Some(feature::Kind::FloatList(FloatList { value: vec![value] })),
        }
    }

    /// Single-element bytes list
    pub fn bytes(value: Vec<u8>) -> Self {
        Self {
            kind: Some(feature::Kind::BytesList(BytesList { value: vec![value] })),
        }
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match &self.kind {
            Some(feature::Kind::FloatList(list)) => Some(&list.value),
            _ => None,
        }
    }

    pub fn as_bytes_list(&self) -> Option<&[Vec<u8>]> {
        match &self.kind {
            Some(feature::Kind::BytesList(list)) => Some(&list.value),
            _ => None,
        }
    }
}

impl Example {
    /// Look up a feature by name
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.as_ref().and_then(|f| f.feature.get(name))
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.as_ref().map_or(0, |f| f.feature.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
