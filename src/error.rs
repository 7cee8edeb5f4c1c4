#![doc = r#"
Error types shared across the crate.

Each concern gets its own enum. Lower level errors are wrapped by the
higher level ones with `#[from]`, so `?` carries them outward:

```text
TrackError ──► ParseError ──► ReaderErrorKind ──► ReaderError ──┐
BlockError                                                       ├──► Error
                                  WriterError ───────────────────┤
                                  ImportError ───────────────────┘
```
"#]

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{reader::ReaderError, writer::WriterError};

/// Errors produced while filling or querying a [`TimedTrack`](crate::TimedTrack).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TrackError {
    /// Every slot of the track has been written.
    #[error("Track is full (capacity {capacity})")]
    Full {
        /// The fixed capacity of the track
        capacity: usize,
    },
    /// A bulk append would not fit into the remaining slots.
    #[error("Cannot append {requested} entries, only {remaining} slots remain")]
    Overflow {
        /// Number of entries in the batch
        requested: usize,
        /// Free slots left in the track
        remaining: usize,
    },
    /// The appended time precedes the time of the last entry.
    #[error("Entry at {time} precedes the last entry at {previous}")]
    OutOfOrder {
        /// Time of the current last entry
        previous: f64,
        /// Time that was rejected
        time: f64,
    },
    /// The appended time is NaN.
    #[error("Entry time must be a number")]
    InvalidTime,
    /// A track was declared with a negative length.
    #[error("Track capacity cannot be negative ({0})")]
    NegativeCapacity(i64),
    /// The track has no entries.
    #[error("Track is empty")]
    Empty,
}

/// Errors produced while accessing the extension blocks of a [`MetaFile`](crate::MetaFile).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// No block with this name exists.
    #[error("No extension block named {0:?}")]
    Missing(String),
    /// The destination buffer does not match the block's length.
    #[error("Destination holds {actual} bytes, block holds {expected}")]
    SizeMismatch {
        /// Length of the block data
        expected: usize,
        /// Length of the destination
        actual: usize,
    },
}

/// Structural problems found while decoding the wire format.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The stream does not start with [`MAGIC`](crate::MAGIC).
    #[error("Invalid magic {0:#010X}")]
    BadMagic(i32),
    /// The version field is not [`CURRENT_VERSION`](crate::CURRENT_VERSION).
    #[error("Unsupported version {0}")]
    UnsupportedVersion(i32),
    /// A block tag byte is not one of the known [`BlockTag`](crate::BlockTag)s.
    #[error("Unknown block tag {0:#04X}")]
    UnknownBlockTag(u8),
    /// A string's bytes are not valid UTF-8.
    #[error("String is not valid UTF-8")]
    InvalidUtf8,
    /// A 7-bit encoded integer is too long or out of range.
    #[error("Malformed variable-length integer")]
    InvalidVarInt,
    /// A decoded track violated a track invariant.
    #[error("Track: {0}")]
    Track(#[from] TrackError),
}

/// Errors reported by a [`MetaImporter`](crate::MetaImporter).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The importer does not accept this path.
    #[error("{path:?} is not a valid source for the {importer} importer")]
    InvalidPath {
        /// Display name of the importer
        importer: String,
        /// Rejected path
        path: PathBuf,
    },
    /// The foreign container could not be understood.
    #[error("Malformed source: {0}")]
    Malformed(String),
    /// [`MetaImporter::import`](crate::MetaImporter::import) was called before a successful populate.
    #[error("Importer has not been populated")]
    NotPopulated,
    /// A track built from the source was invalid.
    #[error("Track: {0}")]
    Track(#[from] TrackError),
    /// The source stream failed.
    #[error("IO: {0}")]
    Io(#[from] io::Error),
    /// The source contained wire-format data that failed to decode.
    #[error("{0}")]
    Read(#[from] ReaderError),
}

/// Any error the path-level entry points can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// The file does not exist.
    #[error("{0:?} does not exist")]
    NotFound(PathBuf),
    /// Decoding failed.
    #[error("{0}")]
    Read(#[from] ReaderError),
    /// Encoding failed.
    #[error("{0}")]
    Write(#[from] WriterError),
    /// The importer failed.
    #[error("Import: {0}")]
    Import(#[from] ImportError),
    /// Opening or creating the file failed.
    #[error("IO: {0}")]
    Io(#[from] io::Error),
}
