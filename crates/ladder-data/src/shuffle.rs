// ShuffleDataset: buffer-based shuffling
//
// A buffer of up to `buffer_size` elements is filled from upstream; each
// output is drawn from a uniformly random slot and the slot is refilled on
// the next pull. With a buffer at least as large as the dataset this is a
// uniform permutation; a buffer of one preserves order.
//
// Every call to `iter()` bumps an epoch counter that is mixed into the seed,
// so a repeated pass is reshuffled while a fixed seed stays reproducible.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use ladder_core::{Cardinality, Error, Result};

use crate::dataset::{Dataset, ElementStream};

pub struct ShuffleDataset<D: Dataset> {
    inner: D,
    buffer_size: usize,
    seed: Option<u64>,
    epoch: AtomicU64,
}

impl<D: Dataset> ShuffleDataset<D> {
    pub fn new(inner: D, buffer_size: usize, seed: Option<u64>) -> Result<Self> {
        if buffer_size == 0 {
            return Err(Error::invalid("shuffle buffer size must be positive"));
        }
        Ok(Self {
            inner,
            buffer_size,
            seed,
            epoch: AtomicU64::new(0),
        })
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn epoch_rng(&self) -> StdRng {
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ epoch.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => StdRng::from_entropy(),
        }
    }
}

impl<D: Dataset> Dataset for ShuffleDataset<D> {
    type Item = D::Item;

    fn iter(&self) -> Result<ElementStream<D::Item>> {
        let upstream = self.inner.iter()?;
        Ok(Box::new(ShuffleStream {
            upstream,
            buffer: Vec::with_capacity(self.buffer_size.min(4096)),
            buffer_size: self.buffer_size,
            rng: self.epoch_rng(),
            exhausted: false,
        }))
    }

    fn cardinality(&self) -> Cardinality {
        self.inner.cardinality()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

struct ShuffleStream<T> {
    upstream: ElementStream<T>,
    buffer: Vec<T>,
    buffer_size: usize,
    rng: StdRng,
    exhausted: bool,
}

impl<T> Iterator for ShuffleStream<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        while !self.exhausted && self.buffer.len() < self.buffer_size {
            match self.upstream.next() {
                Some(Ok(item)) => self.buffer.push(item),
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    trace!(buffered = self.buffer.len(), "shuffle upstream exhausted");
                    self.exhausted = true;
                }
            }
        }

        if self.buffer.is_empty() {
            return None;
        }
        let slot = self.rng.gen_range(0..self.buffer.len());
        Some(Ok(self.buffer.swap_remove(slot)))
    }
}
