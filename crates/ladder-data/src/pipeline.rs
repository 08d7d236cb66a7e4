// PipelineConfig: the shuffle → repeat → batch → prefetch recipe

use serde::{Deserialize, Serialize};
use tracing::debug;

use ladder_core::{Error, Result};

use crate::dataset::{BoxDataset, Dataset, DatasetExt};

/// Configuration for turning a dataset into a stream of batches.
///
/// Deserializes from the `[pipeline]` table of a curriculum file; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Whether to shuffle elements before batching.
    pub shuffle: bool,
    /// Number of elements held in the shuffle buffer.
    pub shuffle_buffer: usize,
    /// Optional random seed for reproducible shuffling.
    pub seed: Option<u64>,
    /// Passes over the data; `None` repeats forever.
    pub repeat: Option<usize>,
    /// Number of elements per batch.
    pub batch_size: usize,
    /// Whether to drop the last incomplete batch.
    pub drop_remainder: bool,
    /// Batches produced ahead on a background thread (0 = no prefetch).
    pub prefetch: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            shuffle: true,
            shuffle_buffer: 1000,
            seed: None,
            repeat: None,
            batch_size: 32,
            drop_remainder: false,
            prefetch: 1,
        }
    }
}

impl PipelineConfig {
    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }

    pub fn shuffle_buffer(mut self, n: usize) -> Self {
        self.shuffle_buffer = n;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    pub fn repeat(mut self, count: Option<usize>) -> Self {
        self.repeat = count;
        self
    }

    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn drop_remainder(mut self, d: bool) -> Self {
        self.drop_remainder = d;
        self
    }

    pub fn prefetch(mut self, depth: usize) -> Self {
        self.prefetch = depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::invalid("batch_size must be positive"));
        }
        if self.shuffle && self.shuffle_buffer == 0 {
            return Err(Error::invalid(
                "shuffle_buffer must be positive when shuffling",
            ));
        }
        Ok(())
    }

    /// Wrap `dataset` in the configured stages.
    pub fn build<D>(&self, dataset: D) -> Result<BoxDataset<Vec<D::Item>>>
    where
        D: Dataset + 'static,
    {
        self.validate()?;
        debug!(
            dataset = dataset.name(),
            cardinality = %dataset.cardinality(),
            config = ?self,
            "building pipeline"
        );

        let mut ds: BoxDataset<D::Item> = dataset.boxed();
        if self.shuffle {
            ds = ds.shuffle(self.shuffle_buffer, self.seed)?.boxed();
        }
        let batched = ds
            .repeat(self.repeat)
            .batch(self.batch_size, self.drop_remainder)?
            .boxed();

        if self.prefetch > 0 {
            Ok(batched.prefetch(self.prefetch)?.boxed())
        } else {
            Ok(batched)
        }
    }
}
