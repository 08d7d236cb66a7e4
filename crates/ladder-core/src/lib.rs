//! # ladder-core
//!
//! Shared primitives for the ladder crates.
//!
//! This crate provides:
//! - [`Error`] / [`Result`]: the single error type used across the workspace
//! - [`Cardinality`]: how many elements a dataset will produce
// - Error: every failure mode, from unreadable corpora to unknown handles
// - Cardinality: finite / infinite / unknown element counts

pub mod cardinality;
pub mod error;

pub use cardinality::Cardinality;
pub use error::{Error, Result};
