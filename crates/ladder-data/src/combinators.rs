// Dataset Combinators: repeat, batch, map, take, in-memory datasets

use std::collections::VecDeque;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use ladder_core::{Cardinality, Error, Result};

use crate::dataset::{Dataset, ElementStream};
use crate::transform::Transform;

// RepeatDataset: run several passes back to back

/// Restarts the inner dataset when a pass ends.
///
/// `count = None` repeats forever. A pass that yields no elements ends the
/// repetition, so repeating an empty dataset terminates instead of spinning.
pub struct RepeatDataset<D: Dataset> {
    inner: Arc<D>,
    count: Option<usize>,
}

impl<D: Dataset + 'static> RepeatDataset<D> {
    pub fn new(inner: D, count: Option<usize>) -> Self {
        Self {
            inner: Arc::new(inner),
            count,
        }
    }
}

impl<D: Dataset + 'static> Dataset for RepeatDataset<D> {
    type Item = D::Item;

    fn iter(&self) -> Result<ElementStream<D::Item>> {
        Ok(Box::new(RepeatStream {
            inner: self.inner.clone(),
            count: self.count,
            current: None,
            passes: 0,
            produced_this_pass: false,
            finished: false,
        }))
    }

    fn cardinality(&self) -> Cardinality {
        match (self.inner.cardinality(), self.count) {
            (Cardinality::Finite(0), _) | (_, Some(0)) => Cardinality::Finite(0),
            (Cardinality::Finite(n), Some(k)) => Cardinality::Finite(n.saturating_mul(k)),
            (Cardinality::Finite(_), None) | (Cardinality::Infinite, _) => Cardinality::Infinite,
            (Cardinality::Unknown, _) => Cardinality::Unknown,
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

struct RepeatStream<D: Dataset> {
    inner: Arc<D>,
    count: Option<usize>,
    current: Option<ElementStream<D::Item>>,
    passes: usize,
    produced_this_pass: bool,
    finished: bool,
}

impl<D: Dataset> Iterator for RepeatStream<D> {
    type Item = Result<D::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(stream) = self.current.as_mut() {
                match stream.next() {
                    Some(item) => {
                        self.produced_this_pass = true;
                        return Some(item);
                    }
                    None => {
                        self.current = None;
                        self.passes += 1;
                        if !self.produced_this_pass {
                            trace!(passes = self.passes, "repeat: empty pass, stopping");
                            self.finished = true;
                            return None;
                        }
                        self.produced_this_pass = false;
                    }
                }
            }

            if self.count.is_some_and(|c| self.passes >= c) {
                self.finished = true;
                return None;
            }

            match self.inner.iter() {
                Ok(stream) => {
                    debug!(
                        dataset = self.inner.name(),
                        pass = self.passes + 1,
                        "repeat: starting pass"
                    );
                    self.current = Some(stream);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

// BatchDataset: group consecutive elements

/// Groups consecutive elements into batches of `size`.
///
/// The last, smaller batch is emitted unless `drop_remainder` is set. An
/// upstream error is yielded as soon as it arrives; elements already pulled
/// for the interrupted batch are kept and completed by the elements after it.
pub struct BatchDataset<D: Dataset> {
    inner: D,
    size: usize,
    drop_remainder: bool,
}

impl<D: Dataset> BatchDataset<D> {
    pub fn new(inner: D, size: usize, drop_remainder: bool) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid("batch size must be positive"));
        }
        Ok(Self {
            inner,
            size,
            drop_remainder,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.size
    }
}

impl<D: Dataset> Dataset for BatchDataset<D> {
    type Item = Vec<D::Item>;

    fn iter(&self) -> Result<ElementStream<Vec<D::Item>>> {
        let mut upstream = self.inner.iter()?;
        let size = self.size;
        let drop_remainder = self.drop_remainder;

        let mut pending: Vec<D::Item> = Vec::with_capacity(size);

        Ok(Box::new(std::iter::from_fn(move || {
            while pending.len() < size {
                match upstream.next() {
                    Some(Ok(item)) => pending.push(item),
                    Some(Err(e)) => return Some(Err(e)),
                    None => break,
                }
            }
            let batch = std::mem::replace(&mut pending, Vec::with_capacity(size));
            if batch.is_empty() || (drop_remainder && batch.len() < size) {
                None
            } else {
                Some(Ok(batch))
            }
        })))
    }

    fn cardinality(&self) -> Cardinality {
        let size = self.size;
        if self.drop_remainder {
            self.inner.cardinality().map_finite(|n| n / size)
        } else {
            self.inner.cardinality().map_finite(|n| n.div_ceil(size))
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// MapDataset: apply a transform lazily

/// Wraps a dataset and applies a `Transform` lazily on each element.
pub struct MapDataset<D: Dataset, U> {
    inner: D,
    transform: Arc<dyn Transform<D::Item, U>>,
}

impl<D: Dataset, U: Send + 'static> MapDataset<D, U> {
    pub fn new(inner: D, transform: Arc<dyn Transform<D::Item, U>>) -> Self {
        Self { inner, transform }
    }
}

impl<D: Dataset, U: Send + 'static> Dataset for MapDataset<D, U> {
    type Item = U;

    fn iter(&self) -> Result<ElementStream<U>> {
        let transform = self.transform.clone();
        Ok(Box::new(
            self.inner
                .iter()?
                .map(move |item| item.map(|x| transform.apply(x))),
        ))
    }

    fn cardinality(&self) -> Cardinality {
        self.inner.cardinality()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// ParallelMapDataset: transform chunks on the rayon pool

/// Like [`MapDataset`] but pulls `num_parallel_calls` elements at a time and
/// transforms them in parallel. Output order matches input order.
pub struct ParallelMapDataset<D: Dataset, U> {
    inner: D,
    transform: Arc<dyn Transform<D::Item, U>>,
    num_parallel_calls: usize,
}

impl<D: Dataset, U: Send + 'static> ParallelMapDataset<D, U> {
    pub fn new(
        inner: D,
        transform: Arc<dyn Transform<D::Item, U>>,
        num_parallel_calls: usize,
    ) -> Result<Self> {
        if num_parallel_calls == 0 {
            return Err(Error::invalid("num_parallel_calls must be positive"));
        }
        Ok(Self {
            inner,
            transform,
            num_parallel_calls,
        })
    }
}

impl<D: Dataset, U: Send + 'static> Dataset for ParallelMapDataset<D, U> {
    type Item = U;

    fn iter(&self) -> Result<ElementStream<U>> {
        let mut upstream = self.inner.iter()?;
        let transform = self.transform.clone();
        let chunk = self.num_parallel_calls;
        let mut ready: VecDeque<Result<U>> = VecDeque::with_capacity(chunk);

        Ok(Box::new(std::iter::from_fn(move || {
            if ready.is_empty() {
                let pulled: Vec<Result<D::Item>> = upstream.by_ref().take(chunk).collect();
                let t = &transform;
                ready.extend(
                    pulled
                        .into_par_iter()
                        .map(|item| item.map(|x| t.apply(x)))
                        .collect::<Vec<_>>(),
                );
            }
            ready.pop_front()
        })))
    }

    fn cardinality(&self) -> Cardinality {
        self.inner.cardinality()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// TakeDataset: truncate each pass

pub struct TakeDataset<D: Dataset> {
    inner: D,
    count: usize,
}

impl<D: Dataset> TakeDataset<D> {
    pub fn new(inner: D, count: usize) -> Self {
        Self { inner, count }
    }
}

impl<D: Dataset> Dataset for TakeDataset<D> {
    type Item = D::Item;

    fn iter(&self) -> Result<ElementStream<D::Item>> {
        Ok(Box::new(self.inner.iter()?.take(self.count)))
    }

    fn cardinality(&self) -> Cardinality {
        match self.inner.cardinality() {
            Cardinality::Finite(n) => Cardinality::Finite(n.min(self.count)),
            Cardinality::Infinite => Cardinality::Finite(self.count),
            Cardinality::Unknown => Cardinality::Unknown,
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// VecDataset: in-memory dataset from a vector

/// A simple in-memory dataset backed by a shared slice.
///
/// Useful for building datasets programmatically and in tests.
pub struct VecDataset<T> {
    items: Arc<[T]>,
    dataset_name: String,
}

impl<T: Clone + Send + Sync + 'static> VecDataset<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
            dataset_name: "vec".to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.dataset_name = name.to_string();
        self
    }
}

impl<T: Clone + Send + Sync + 'static> Dataset for VecDataset<T> {
    type Item = T;

    fn iter(&self) -> Result<ElementStream<T>> {
        let items = self.items.clone();
        Ok(Box::new((0..items.len()).map(move |i| Ok(items[i].clone()))))
    }

    fn cardinality(&self) -> Cardinality {
        Cardinality::Finite(self.items.len())
    }

    fn name(&self) -> &str {
        &self.dataset_name
    }
}

// Tests
