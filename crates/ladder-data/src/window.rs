// Window generator: overlapping fixed-length slices of a corpus
//
// For a window length L the generator yields corpus[s..s+L] for
// s = 0, 1, ..., char_len - L - 1: every window has exactly L characters and
// consecutive windows share L - 1 of them.

use std::sync::Arc;

use tracing::{debug, warn};

use ladder_core::{Cardinality, Error, Result};

use crate::corpus::Corpus;
use crate::dataset::{Dataset, ElementStream};

/// Lazily yields the windows of one length, advancing the start by one.
#[derive(Debug, Clone)]
pub struct WindowIter {
    corpus: Arc<Corpus>,
    length: usize,
    next_start: usize,
    end: usize,
}

impl WindowIter {
    fn new(corpus: Arc<Corpus>, length: usize) -> Self {
        let end = corpus.num_windows(length);
        Self {
            corpus,
            length,
            next_start: 0,
            end,
        }
    }

    /// Start offset of the window the next call to `next` returns.
    pub fn start_index(&self) -> usize {
        self.next_start
    }

    pub fn window_length(&self) -> usize {
        self.length
    }
}

impl Iterator for WindowIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_start >= self.end {
            return None;
        }
        let window = self.corpus.window(self.next_start, self.length)?.to_owned();
        self.next_start += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next_start;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WindowIter {}

/// Create the window generator for `length` over `corpus`.
pub fn windows(corpus: Arc<Corpus>, length: usize) -> Result<WindowIter> {
    if length == 0 {
        return Err(Error::invalid("window length must be positive"));
    }
    Ok(WindowIter::new(corpus, length))
}

/// A dataset over every window of one length; each pass restarts at offset 0.
#[derive(Debug, Clone)]
pub struct WindowDataset {
    corpus: Arc<Corpus>,
    length: usize,
    name: String,
}

impl WindowDataset {
    pub fn new(corpus: Arc<Corpus>, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::invalid("window length must be positive"));
        }
        let count = corpus.num_windows(length);
        if count == 0 {
            warn!(
                length,
                chars = corpus.char_len(),
                "corpus too short for any window of this length"
            );
        } else {
            debug!(length, windows = count, "window dataset");
        }
        Ok(Self {
            corpus,
            length,
            name: format!("windows[{length}]"),
        })
    }

    pub fn window_length(&self) -> usize {
        self.length
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }
}

impl Dataset for WindowDataset {
    type Item = String;

    fn iter(&self) -> Result<ElementStream<String>> {
        Ok(Box::new(
            WindowIter::new(self.corpus.clone(), self.length).map(Ok),
        ))
    }

    fn cardinality(&self) -> Cardinality {
        Cardinality::Finite(self.corpus.num_windows(self.length))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
