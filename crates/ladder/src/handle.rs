// Handles: switch one consumer between several streams
//
// Each phase's pipeline is turned into a one-shot iterator and registered
// under an opaque string handle. The consumer calls `get_next(handle)` and
// picks the stream by choosing which token to feed; streams it is not
// feeding keep their position untouched.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};
use uuid::Uuid;

use ladder_core::{Error, Result};
use ladder_data::{Dataset, ElementStream};

/// Opaque token naming a registered iterator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    /// A fresh, globally unique handle.
    pub fn generate() -> Self {
        Handle(format!("ladder-iterator-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Handle {
    fn from(s: String) -> Self {
        Handle(s)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A single pass over a dataset.
///
/// Once the pass ends, every further `get_next` returns
/// [`Error::EndOfSequence`].
pub struct OneShotIterator<T> {
    stream: Option<ElementStream<T>>,
    produced: usize,
    source: String,
}

impl<T: Send + 'static> OneShotIterator<T> {
    pub fn new<D: Dataset<Item = T>>(dataset: &D) -> Result<Self> {
        Ok(Self {
            stream: Some(dataset.iter()?),
            produced: 0,
            source: dataset.name().to_string(),
        })
    }

    /// The next element, or `EndOfSequence` once exhausted.
    pub fn get_next(&mut self) -> Result<T> {
        match self.stream.as_mut().and_then(|s| s.next()) {
            Some(item) => {
                self.produced += 1;
                item
            }
            None => {
                if self.stream.take().is_some() {
                    debug!(source = %self.source, produced = self.produced, "iterator exhausted");
                }
                Err(Error::EndOfSequence)
            }
        }
    }

    /// Elements (or errors) handed out so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn is_exhausted(&self) -> bool {
        self.stream.is_none()
    }

    /// Name of the dataset this iterator was made from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl<T: Send + 'static> Iterator for OneShotIterator<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        match self.get_next() {
            Err(Error::EndOfSequence) => None,
            other => Some(other),
        }
    }
}

/// A registry of iterators addressed by [`Handle`].
///
/// All registered iterators yield the same element type, so any handle can
/// be fed to the same consumer.
pub struct FeedableIterator<T> {
    iterators: HashMap<Handle, OneShotIterator<T>>,
}

impl<T: Send + 'static> Default for FeedableIterator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> FeedableIterator<T> {
    pub fn new() -> Self {
        Self {
            iterators: HashMap::new(),
        }
    }

    /// Register an iterator and return the handle that selects it.
    pub fn register(&mut self, iterator: OneShotIterator<T>) -> Handle {
        let handle = Handle::generate();
        debug!(%handle, source = iterator.source(), "registered iterator");
        self.iterators.insert(handle.clone(), iterator);
        handle
    }

    /// Make a one-shot iterator over `dataset` and register it.
    pub fn make_one_shot<D: Dataset<Item = T>>(&mut self, dataset: &D) -> Result<Handle> {
        let iterator = OneShotIterator::new(dataset)?;
        Ok(self.register(iterator))
    }

    /// Pull the next element from the iterator selected by `handle`.
    pub fn get_next(&mut self, handle: &str) -> Result<T> {
        let iterator = self
            .iterators
            .get_mut(handle)
            .ok_or_else(|| Error::UnknownHandle {
                handle: handle.to_string(),
            })?;
        trace!(handle, "get_next");
        iterator.get_next()
    }

    /// Drop the iterator behind `handle`, returning it if it was registered.
    pub fn release(&mut self, handle: &str) -> Option<OneShotIterator<T>> {
        self.iterators.remove(handle)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.iterators.contains_key(handle)
    }

    pub fn handles(&self) -> impl Iterator<Item = &Handle> {
        self.iterators.keys()
    }

    pub fn len(&self) -> usize {
        self.iterators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterators.is_empty()
    }
}
