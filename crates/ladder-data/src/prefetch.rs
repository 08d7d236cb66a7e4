// PrefetchDataset: produce elements ahead of the consumer
//
// Each pass spawns one background thread that drives the upstream stream and
// pushes results into a bounded channel of `depth` slots. The consumer pulls
// ready elements from the channel, overlapping data preparation with
// whatever the consumer does between pulls.
//
// Dropping the stream drops the receiver first, so a worker blocked on a
// full channel (or about to produce from an infinite upstream) sees its next
// send fail and exits; the drop then joins it.

use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use ladder_core::{Cardinality, Error, Result};

use crate::dataset::{Dataset, ElementStream};

pub struct PrefetchDataset<D: Dataset> {
    inner: D,
    depth: usize,
}

impl<D: Dataset> PrefetchDataset<D> {
    pub fn new(inner: D, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(Error::invalid("prefetch depth must be positive"));
        }
        Ok(Self { inner, depth })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<D: Dataset> Dataset for PrefetchDataset<D> {
    type Item = D::Item;

    fn iter(&self) -> Result<ElementStream<D::Item>> {
        let upstream = self.inner.iter()?;
        Ok(Box::new(PrefetchStream::spawn(
            upstream,
            self.depth,
            self.inner.name(),
        )?))
    }

    fn cardinality(&self) -> Cardinality {
        self.inner.cardinality()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// An iterator that yields prefetched elements from a background worker.
///
/// The worker is joined when the stream is exhausted or dropped.
pub struct PrefetchStream<T> {
    rx: Option<mpsc::Receiver<Result<T>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<T: Send + 'static> PrefetchStream<T> {
    /// Start a worker draining `upstream` into a channel of `depth` slots.
    pub fn spawn(upstream: ElementStream<T>, depth: usize, name: &str) -> Result<Self> {
        let (tx, rx) = mpsc::sync_channel::<Result<T>>(depth);
        let handle = thread::Builder::new()
            .name(format!("ladder-prefetch-{name}"))
            .spawn(move || {
                for item in upstream {
                    // Receiver dropped: the consumer is gone
                    if tx.send(item).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| Error::msg(format!("failed to spawn prefetch worker: {e}")))?;
        debug!(dataset = name, depth, "prefetch worker started");

        Ok(Self {
            rx: Some(rx),
            handle: Some(handle),
        })
    }

    fn join(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(h) => h.join().map_err(|_| Error::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl<T: Send + 'static> Iterator for PrefetchStream<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        let rx = self.rx.as_ref()?;
        match rx.recv() {
            Ok(item) => Some(item),
            Err(_) => {
                // Channel closed: the worker finished or died
                self.rx = None;
                match self.join() {
                    Ok(()) => None,
                    Err(e) => {
                        warn!("prefetch worker panicked");
                        Some(Err(e))
                    }
                }
            }
        }
    }
}

impl<T> Drop for PrefetchStream<T> {
    fn drop(&mut self) {
        self.rx = None;
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}
