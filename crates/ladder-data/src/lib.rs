//! # ladder-data
//!
//! Corpus windowing and streaming dataset pipelines for ladder.
//!
//! This crate provides:
//! - [`Corpus`]: a text loaded once and addressed by character offsets
//! - [`WindowIter`] / [`WindowDataset`]: overlapping fixed-length windows
//! - [`Dataset`] trait: a re-openable stream of elements
//! - [`DatasetExt`]: shuffle, repeat, batch, map, take, prefetch
//! - [`PipelineConfig`]: the shuffle → repeat → batch → prefetch recipe
//   - Text transforms: Lowercase, CollapseWhitespace, Compose
//   - VecDataset for small in-memory inputs

pub mod combinators;
pub mod corpus;
pub mod dataset;
pub mod pipeline;
pub mod prefetch;
pub mod shuffle;
pub mod transform;
pub mod window;

pub use combinators::{
    BatchDataset, MapDataset, ParallelMapDataset, RepeatDataset, TakeDataset, VecDataset,
};
pub use corpus::Corpus;
pub use dataset::{BoxDataset, Dataset, DatasetExt, ElementStream};
pub use pipeline::PipelineConfig;
pub use prefetch::{PrefetchDataset, PrefetchStream};
pub use shuffle::ShuffleDataset;
pub use transform::{CollapseWhitespace, Compose, Lowercase, Transform};
pub use window::{windows, WindowDataset, WindowIter};

pub use ladder_core::{Cardinality, Error, Result};
