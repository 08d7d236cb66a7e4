//! # ladder
//!
//! Curriculum phases over windowed text streams, switched by opaque handles.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use ladder::prelude::*;
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `ladder-core` | Error, Result, Cardinality |
//! | `ladder-data` | Corpus, window generator, Dataset trait, shuffle/repeat/batch/prefetch |
//!
//! ## Modules
//!
//! - [`handle`]: one-shot iterators and the feedable, handle-keyed registry
//! - [`curriculum`]: phases, the step schedule, and the runner
//! - [`config`]: TOML curriculum files
//! - [`logging`]: tracing subscriber setup

/// Re-export core types.
pub use ladder_core::{bail, Cardinality, Error, Result};

/// Re-export the data pipeline.
pub mod data {
    pub use ladder_data::*;
}

/// Handles: opaque tokens selecting a registered stream.
pub mod handle;

/// Curriculum: one window length per phase, fed through a single consumer.
pub mod curriculum;

/// Config: curriculum description loaded from TOML.
pub mod config;

/// Logging: tracing subscriber initialisation.
pub mod logging;

pub use config::CurriculumConfig;
pub use curriculum::{Curriculum, Phase, PhaseSchedule, RunSummary};
pub use handle::{FeedableIterator, Handle, OneShotIterator};

/// Convenient imports for the common case.
pub mod prelude {
    pub use crate::config::CurriculumConfig;
    pub use crate::curriculum::{Curriculum, Phase, PhaseSchedule};
    pub use crate::handle::{FeedableIterator, Handle, OneShotIterator};
    pub use ladder_core::{Cardinality, Error, Result};
    pub use ladder_data::{
        Corpus, Dataset, DatasetExt, PipelineConfig, Transform, WindowDataset,
    };
}
