// Dataset trait: a re-openable stream of elements

use std::sync::Arc;

use ladder_core::{Cardinality, Result};

use crate::combinators::{
    BatchDataset, MapDataset, ParallelMapDataset, RepeatDataset, TakeDataset,
};
use crate::prefetch::PrefetchDataset;
use crate::shuffle::ShuffleDataset;
use crate::transform::Transform;

/// One pass over a dataset. Errors from any upstream stage are yielded in
/// place and the stream may continue afterwards.
pub type ElementStream<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

/// A dataset that has been type-erased, e.g. the output of a pipeline.
pub type BoxDataset<T> = Box<dyn Dataset<Item = T>>;

/// A dataset is a recipe for streams.
///
/// Every call to [`iter`](Dataset::iter) starts a fresh pass from the
/// beginning, which is what lets `repeat` run several epochs and lets
/// `shuffle` produce a new order per epoch. Implementations must be
/// `Send + Sync` so streams can be driven from a prefetch thread.
pub trait Dataset: Send + Sync {
    type Item: Send + 'static;

    /// Start a new pass over the elements.
    fn iter(&self) -> Result<ElementStream<Self::Item>>;

    /// Number of elements one pass yields.
    fn cardinality(&self) -> Cardinality;

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "dataset"
    }
}

impl<D: Dataset + ?Sized> Dataset for Box<D> {
    type Item = D::Item;

    fn iter(&self) -> Result<ElementStream<Self::Item>> {
        (**self).iter()
    }

    fn cardinality(&self) -> Cardinality {
        (**self).cardinality()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<D: Dataset + ?Sized> Dataset for Arc<D> {
    type Item = D::Item;

    fn iter(&self) -> Result<ElementStream<Self::Item>> {
        (**self).iter()
    }

    fn cardinality(&self) -> Cardinality {
        (**self).cardinality()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Chainable transformations available on every dataset.
///
/// ```ignore
/// let batches = WindowDataset::new(corpus, 16)?
///     .shuffle(1000, Some(42))?
///     .repeat(None)
///     .batch(32, false)?
///     .prefetch(2)?;
/// ```
pub trait DatasetExt: Dataset + Sized + 'static {
    /// Shuffle through a buffer of `buffer_size` elements.
    fn shuffle(self, buffer_size: usize, seed: Option<u64>) -> Result<ShuffleDataset<Self>> {
        ShuffleDataset::new(self, buffer_size, seed)
    }

    /// Repeat `count` passes, or forever with `None`.
    fn repeat(self, count: Option<usize>) -> RepeatDataset<Self> {
        RepeatDataset::new(self, count)
    }

    /// Group consecutive elements into `Vec`s of `size`.
    fn batch(self, size: usize, drop_remainder: bool) -> Result<BatchDataset<Self>> {
        BatchDataset::new(self, size, drop_remainder)
    }

    /// Apply a transform to every element.
    fn map<U, F>(self, f: F) -> MapDataset<Self, U>
    where
        U: Send + 'static,
        F: Transform<Self::Item, U> + 'static,
    {
        MapDataset::new(self, Arc::new(f))
    }

    /// Apply a transform on the rayon pool, `num_parallel_calls` elements at a time.
    fn map_parallel<U, F>(
        self,
        f: F,
        num_parallel_calls: usize,
    ) -> Result<ParallelMapDataset<Self, U>>
    where
        U: Send + 'static,
        F: Transform<Self::Item, U> + 'static,
    {
        ParallelMapDataset::new(self, Arc::new(f), num_parallel_calls)
    }

    /// Keep only the first `count` elements of each pass.
    fn take(self, count: usize) -> TakeDataset<Self> {
        TakeDataset::new(self, count)
    }

    /// Produce up to `depth` elements ahead of the consumer on a background thread.
    fn prefetch(self, depth: usize) -> Result<PrefetchDataset<Self>> {
        PrefetchDataset::new(self, depth)
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxDataset<Self::Item> {
        Box::new(self)
    }
}

impl<D: Dataset + 'static> DatasetExt for D {}
