// Corpus: a text held in memory and addressed by character offset
//
// Windows are measured in characters, not bytes, so a multi-byte corpus is
// sliced at char boundaries. For pure-ASCII text the byte offset equals the
// char offset and no boundary table is kept.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use ladder_core::{Error, Result};

/// A text corpus loaded once at construction.
#[derive(Debug, Clone)]
pub struct Corpus {
    text: String,
    /// Byte offset of every char start plus `text.len()`; empty for ASCII.
    boundaries: Vec<usize>,
    source: Option<PathBuf>,
}

impl Corpus {
    /// Read a UTF-8 file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut corpus = Self::from_text(text);
        corpus.source = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            chars = corpus.char_len(),
            bytes = corpus.text.len(),
            "loaded corpus"
        );
        Ok(corpus)
    }

    /// Build a corpus from text already in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = if text.is_ascii() {
            Vec::new()
        } else {
            text.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()))
                .collect()
        };
        Self {
            text,
            boundaries,
            source: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The file this corpus was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        if self.boundaries.is_empty() {
            self.text.len()
        } else {
            self.boundaries.len() - 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The `len` characters starting at character `start`, if they fit.
    pub fn window(&self, start: usize, len: usize) -> Option<&str> {
        let end = start.checked_add(len)?;
        if end > self.char_len() {
            return None;
        }
        Some(&self.text[self.byte_offset(start)..self.byte_offset(end)])
    }

    /// How many windows of `len` characters the generator yields.
    ///
    /// Start offsets run over `0..char_len - len`, so the count is
    /// `char_len - len`, or zero when the corpus is not longer than `len`.
    pub fn num_windows(&self, len: usize) -> usize {
        self.char_len().saturating_sub(len)
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        if self.boundaries.is_empty() {
            char_index
        } else {
            self.boundaries[char_index]
        }
    }
}
