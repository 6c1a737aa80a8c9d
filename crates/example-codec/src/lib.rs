//! Example Encoding
//!
//! Builds the structured record a model consumes: a protobuf message that is
//! wire-compatible with TensorFlow's `tf.train.Example`, one typed single
//! element list per schema field.

mod encoder;
mod error;
pub mod proto;

pub use encoder::{encode, EncodedExample};
pub use error::EncodingError;
