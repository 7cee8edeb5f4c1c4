use std::io;

use thiserror::Error;

#[doc = r#"
A set of errors that can occur while encoding the wire format
"#]
#[derive(Debug, Error)]
#[error("Writing at Position {position}, {kind}")]
pub struct WriterError {
    position: usize,
    pub(crate) kind: WriterErrorKind,
}

/// A kind of error that a writer can produce
#[derive(Debug, Error)]
pub enum WriterErrorKind {
    /// The track has more entries than an `i16` count can describe.
    #[error("Track of {0} entries exceeds the 16-bit count")]
    TrackTooLong(usize),
    /// A string or extension block is longer than a 7-bit encoded length allows.
    #[error("Length {0} exceeds the 7-bit encoded maximum")]
    LengthTooLarge(usize),
    /// The underlying stream failed.
    #[error("IO {0}")]
    Io(#[from] io::Error),
}

impl WriterError {
    /// Create a writer error from a position and kind
    pub const fn new(position: usize, kind: WriterErrorKind) -> Self {
        Self { position, kind }
    }
    /// Returns the error kind of the writer.
    pub fn error_kind(&self) -> &WriterErrorKind {
        &self.kind
    }
    /// Returns the position where the write error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Write Result type (see [`WriterError`])
pub type WriteResult<T> = Result<T, WriterError>;
