//! Route handlers

pub mod predictions;
