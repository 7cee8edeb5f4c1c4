mod block;
pub use block::*;

use std::collections::BTreeMap;

use super::{MetaFile, MetaHeader};
use crate::prelude::*;

/// A builder used to create a new [`MetaFile`].
///
/// The [`MetaReader`](crate::reader::MetaReader) feeds decoded blocks into
/// [`MetaFileBuilder::handle_block`]. Importers use the setters directly.
///
/// # Example
/// ```rust
/// # use opsm::prelude::*;
/// let mut tempos = TimedTrack::with_capacity(1);
/// tempos.append(0.0, Tempo::new(128.)).unwrap();
///
/// let file = MetaFileBuilder::new("Song")
///     .title("Title")
///     .tempos(tempos)
///     .extension(ExtensionBlock::new("notes", b"hello".to_vec()))
///     .build();
///
/// assert_eq!(file.title(), Some("Title"));
/// assert_eq!(file.initial_tempo(), Ok(Tempo::new(128.)));
/// assert!(file.has_block("notes"));
/// ```
#[derive(Debug, Clone)]
pub struct MetaFileBuilder {
    header: MetaHeader,
    tempos: TimedTrack<Tempo>,
    time_signatures: TimedTrack<TimeSignature>,
    key_signatures: TimedTrack<KeySignature>,
    blocks: BTreeMap<String, ExtensionBlock>,
}

impl MetaFileBuilder {
    /// Start a file with the required name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: MetaHeader::new(name),
            tempos: TimedTrack::empty(),
            time_signatures: TimedTrack::empty(),
            key_signatures: TimedTrack::empty(),
            blocks: BTreeMap::new(),
        }
    }

    /// Record the version read from the preamble
    pub(crate) fn version(mut self, version: i32) -> Self {
        self.header.version = version;
        self
    }

    /// Set the song title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.header.title = Some(title.into());
        self
    }

    /// Set the artist(s)
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.header.artist = Some(artist.into());
        self
    }

    /// Set the album
    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.header.album = Some(album.into());
        self
    }

    /// Set the tempo track
    pub fn tempos(mut self, tempos: TimedTrack<Tempo>) -> Self {
        self.tempos = tempos;
        self
    }

    /// Set the time signature track
    pub fn time_signatures(mut self, time_signatures: TimedTrack<TimeSignature>) -> Self {
        self.time_signatures = time_signatures;
        self
    }

    /// Set the key signature track
    pub fn key_signatures(mut self, key_signatures: TimedTrack<KeySignature>) -> Self {
        self.key_signatures = key_signatures;
        self
    }

    /// Add an extension block, replacing any block with the same name
    pub fn extension(mut self, block: ExtensionBlock) -> Self {
        self.insert_extension(block);
        self
    }

    fn insert_extension(&mut self, block: ExtensionBlock) {
        if let Some(_previous) = self.blocks.insert(block.name().to_owned(), block) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Duplicate extension block {:?}, keeping the last one",
                _previous.name()
            );
        }
    }

    /// Handles a decoded block of a file.
    ///
    /// Repeated fields overwrite earlier ones. [`Block::Dummy`] and
    /// [`Block::End`] are ignored.
    pub fn handle_block(&mut self, block: Block) {
        match block {
            Block::Title(title) => self.header.title = Some(title),
            Block::Artist(artist) => self.header.artist = Some(artist),
            Block::Album(album) => self.header.album = Some(album),
            Block::Tempo(track) => self.tempos = track,
            Block::TimeSignatures(track) => self.time_signatures = track,
            Block::KeySignatures(track) => self.key_signatures = track,
            Block::Extension(ext) => self.insert_extension(ext),
            Block::Dummy | Block::End => {}
        }
    }

    /// Finish the file
    pub fn build(self) -> MetaFile {
        MetaFile {
            header: self.header,
            tempos: self.tempos,
            time_signatures: self.time_signatures,
            key_signatures: self.key_signatures,
            blocks: self.blocks,
        }
    }
}

#[test]
fn last_extension_wins() {
    let mut builder = MetaFileBuilder::new("dup");
    builder.handle_block(Block::Extension(ExtensionBlock::new("x", vec![1u8])));
    builder.handle_block(Block::Dummy);
    builder.handle_block(Block::Extension(ExtensionBlock::new("x", vec![2u8])));
    let file = builder.build();

    assert_eq!(file.blocks().count(), 1);
    assert_eq!(file.block("x").unwrap().data(), &[2]);
}

#[test]
fn built_files_carry_the_current_version() {
    let file = MetaFileBuilder::new("V").title("T").build();
    assert_eq!(file.version(), crate::CURRENT_VERSION);

    let parsed = MetaFile::parse(&file.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, file);
}

#[test]
fn absent_tracks_are_empty() {
    let file = MetaFileBuilder::new("bare").build();
    assert!(file.tempos().is_empty());
    assert!(file.time_signatures().is_empty());
    assert!(file.key_signatures().is_empty());
    assert_eq!(file.initial_key_signature(), Err(TrackError::Empty));
}
