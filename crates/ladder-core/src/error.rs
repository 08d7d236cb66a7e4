use std::path::PathBuf;

/// All errors that can occur within ladder.
///
/// Covers corpus loading, argument validation, stream exhaustion, handle
/// lookup and configuration parsing. Every crate in the workspace returns
/// this type so errors propagate with `?` from the corpus up to the demo.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The corpus (or another input file) could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A constructor or transformation received an unusable argument
    /// (zero window length, zero batch size, empty phase list, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The stream has no more elements.
    #[error("end of sequence")]
    EndOfSequence,

    /// A handle token was fed that no iterator is registered under.
    #[error("unknown iterator handle: {handle}")]
    UnknownHandle { handle: String },

    /// A configuration file could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A background prefetch worker panicked.
    #[error("prefetch worker panicked")]
    WorkerPanicked,

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }

    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid(s: impl Into<String>) -> Self {
        Error::InvalidArgument(s.into())
    }

    /// Whether this error only signals that a stream ran dry.
    pub fn is_end_of_sequence(&self) -> bool {
        matches!(self, Error::EndOfSequence)
    }
}

/// Convenience Result type used throughout ladder.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
