#![doc = r#"
Rusty representation of a [`MetaFile`]
"#]

/// Contains the [`MetaFileBuilder`] and the
/// wire-format block types.
pub mod builder;

mod extension;
pub use extension::*;

mod header;
pub use header::*;

use std::{
    collections::BTreeMap,
    io::{Cursor, Read, Write},
};

use crate::{
    BlockError, KeySignature, Tempo, TimeSignature, TimedTrack, TrackError, TrackView,
    file::builder::MetaFileBuilder,
    reader::{MetaReader, ReadResult},
    writer::{MetaWriter, WriteResult},
};

#[doc = r#"
Song metadata: descriptive fields, tempo/time signature/key signature
tracks, and named [`ExtensionBlock`]s.

A [`MetaFile`] is immutable. It is produced by decoding the wire format
([`MetaFile::parse`], [`MetaReader`]), by a [`MetaFileBuilder`], or by a
[`MetaImporter`](crate::MetaImporter).

# Example
```rust
# use opsm::prelude::*;
let mut keys = TimedTrack::with_capacity(2);
keys.append(0.0, KeySignature::major(PitchClass::C)).unwrap();
keys.append(32.0, KeySignature::minor(PitchClass::A)).unwrap();

let file = MetaFile::builder("Song").key_signatures(keys).build();
let bytes = file.to_bytes().unwrap();

let parsed = MetaFile::parse(&bytes).unwrap();
assert_eq!(parsed, file);
assert_eq!(
    parsed.key_signatures().try_find(40.0),
    Some(&KeySignature::minor(PitchClass::A))
);
```
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct MetaFile {
    pub(crate) header: MetaHeader,
    pub(crate) tempos: TimedTrack<Tempo>,
    pub(crate) time_signatures: TimedTrack<TimeSignature>,
    pub(crate) key_signatures: TimedTrack<KeySignature>,
    pub(crate) blocks: BTreeMap<String, ExtensionBlock>,
}

impl MetaFile {
    /// Start building a file with the required name
    pub fn builder(name: impl Into<String>) -> MetaFileBuilder {
        MetaFileBuilder::new(name)
    }

    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        Self::read_from(Cursor::new(bytes))
    }

    /// Decode a file from a stream
    pub fn read_from<R: Read>(reader: R) -> ReadResult<Self> {
        MetaReader::new(reader).read_meta_file()
    }

    /// Encode the file into a new buffer
    pub fn to_bytes(&self) -> WriteResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Encode the file into a stream.
    ///
    /// Pass `&mut stream` to keep ownership; the stream is flushed but
    /// never closed.
    pub fn write_to<W: Write>(&self, writer: W) -> WriteResult<()> {
        MetaWriter::new(writer).write_meta_file(self)
    }

    /// Returns header info
    pub fn header(&self) -> &MetaHeader {
        &self.header
    }

    /// The format version the file was produced with
    pub fn version(&self) -> i32 {
        self.header.version()
    }

    /// The document name
    pub fn name(&self) -> &str {
        self.header.name()
    }

    /// The song title, if any
    pub fn title(&self) -> Option<&str> {
        self.header.title()
    }

    /// The artist(s), if any
    pub fn artist(&self) -> Option<&str> {
        self.header.artist()
    }

    /// The album, if any
    pub fn album(&self) -> Option<&str> {
        self.header.album()
    }

    /// The tempo track
    pub fn tempos(&self) -> TrackView<'_, Tempo> {
        self.tempos.as_read_only()
    }

    /// The time signature track
    pub fn time_signatures(&self) -> TrackView<'_, TimeSignature> {
        self.time_signatures.as_read_only()
    }

    /// The key signature track
    pub fn key_signatures(&self) -> TrackView<'_, KeySignature> {
        self.key_signatures.as_read_only()
    }

    /// The tempo at the start of the song
    pub fn initial_tempo(&self) -> Result<Tempo, TrackError> {
        self.tempos.first_value().copied()
    }

    /// The time signature at the start of the song
    pub fn initial_time_signature(&self) -> Result<TimeSignature, TrackError> {
        self.time_signatures.first_value().copied()
    }

    /// The key signature at the start of the song
    pub fn initial_key_signature(&self) -> Result<KeySignature, TrackError> {
        self.key_signatures.first_value().copied()
    }

    /// Iterate over the extension blocks, ordered by name
    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &ExtensionBlock> {
        self.blocks.values()
    }

    /// True if an extension block with this name exists
    pub fn has_block(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// The extension block with this name.
    ///
    /// # Errors
    /// [`BlockError::Missing`] if there is none.
    pub fn block(&self, name: &str) -> Result<&ExtensionBlock, BlockError> {
        self.try_block(name)
            .ok_or_else(|| BlockError::Missing(name.to_owned()))
    }

    /// The extension block with this name, if any
    pub fn try_block(&self, name: &str) -> Option<&ExtensionBlock> {
        self.blocks.get(name)
    }

    /// Copy an extension block's data into `destination`.
    ///
    /// # Errors
    /// - [`BlockError::Missing`] if there is no such block
    /// - [`BlockError::SizeMismatch`] unless `destination` is exactly as
    ///   long as the data
    pub fn copy_block_to(&self, name: &str, destination: &mut [u8]) -> Result<(), BlockError> {
        self.block(name)?.copy_to(destination)
    }

    /// A fresh reader over an extension block's data.
    ///
    /// # Errors
    /// [`BlockError::Missing`] if there is no such block.
    pub fn open_block(&self, name: &str) -> Result<Cursor<&[u8]>, BlockError> {
        self.block(name).map(ExtensionBlock::open)
    }
}
