#![doc = r#"
Contains the block types of the wire format

# Overview

After the fixed preamble (magic, version and name), a file is a sequence of
blocks. Every block starts with a single [`BlockTag`] byte followed by a
payload whose shape depends on the tag. All numbers are little-endian.

| Tag | Byte | Payload |
|---|---|---|
| [`None`](BlockTag::None) | `0` | none, ends the file |
| [`Title`](BlockTag::Title) | `1` | string |
| [`Artist`](BlockTag::Artist) | `2` | string |
| [`Album`](BlockTag::Album) | `3` | string |
| [`Tempo`](BlockTag::Tempo) | `4` | `i16` count, then `count × (f64 time, f64 bpm)` |
| [`TimeSignatures`](BlockTag::TimeSignatures) | `5` | `i16` count, then `count × (f64 time, i16 numerator, i16 denominator)` |
| [`KeySignatures`](BlockTag::KeySignatures) | `6` | `i16` count, then `count × (f64 time, u8 root, u8 mode)` |
| [`Reserved`](BlockTag::Reserved) | `7` | none, ends the file |
| [`Dummy`](BlockTag::Dummy) | `8` | none, alignment filler |
| [`Extension`](BlockTag::Extension) | `9` | string name, 7-bit encoded length, raw bytes |

Strings are a 7-bit encoded byte length followed by UTF-8.

## Alignment

The name and every block except the fillers are followed by [`Dummy`](BlockTag::Dummy)
bytes until the position is one short of a multiple of [`ALIGNMENT`](crate::ALIGNMENT).
Usually the next tag byte fills that last slot and its payload starts on
the boundary.

When a field ends exactly on a multiple, nothing is written. The next tag
then sits on the boundary and its payload does not, so files are not
strictly aligned. This shortfall may be a defect in the format; it is
written as-is so output matches existing files.

# Example Structure

```text
[magic "OPSM"][version 1][name]     [Dummy × n]
[Title]["My Song"]                  [Dummy × n]
[Tempo][count][(t, bpm) …]          [Dummy × n]
[Extension]["cue-points"][len][…]   [Dummy × n]
[None]                              [Dummy × n]
```
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{ExtensionBlock, KeySignature, Tempo, TimeSignature, TimedTrack};

/// The tag byte that opens every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BlockTag {
    /// End of the block sequence
    None = 0,
    /// Song title
    Title = 1,
    /// Artist(s)
    Artist = 2,
    /// Album
    Album = 3,
    /// Tempo track
    Tempo = 4,
    /// Time signature track
    TimeSignatures = 5,
    /// Key signature track
    KeySignatures = 6,
    /// Reserved. Ends the block sequence
    Reserved = 7,
    /// Alignment filler without payload
    Dummy = 8,
    /// Named opaque data
    Extension = 9,
}

impl BlockTag {
    /// True for the tags that end the block sequence
    pub const fn is_terminator(&self) -> bool {
        matches!(self, Self::None | Self::Reserved)
    }
}

/// A decoded block: its tag along with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Song title
    Title(String),
    /// Artist(s)
    Artist(String),
    /// Album
    Album(String),
    /// Tempo track
    Tempo(TimedTrack<Tempo>),
    /// Time signature track
    TimeSignatures(TimedTrack<TimeSignature>),
    /// Key signature track
    KeySignatures(TimedTrack<KeySignature>),
    /// Named opaque data
    Extension(ExtensionBlock),
    /// Alignment filler
    Dummy,
    /// A terminator tag or the end of the stream
    End,
}

impl Block {
    /// The tag this block is written with.
    ///
    /// [`Block::End`] is written as [`BlockTag::None`].
    pub const fn tag(&self) -> BlockTag {
        match self {
            Self::Title(_) => BlockTag::Title,
            Self::Artist(_) => BlockTag::Artist,
            Self::Album(_) => BlockTag::Album,
            Self::Tempo(_) => BlockTag::Tempo,
            Self::TimeSignatures(_) => BlockTag::TimeSignatures,
            Self::KeySignatures(_) => BlockTag::KeySignatures,
            Self::Extension(_) => BlockTag::Extension,
            Self::Dummy => BlockTag::Dummy,
            Self::End => BlockTag::None,
        }
    }

    /// True if this block ends the sequence
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

#[test]
fn tags_match_wire_bytes() {
    assert_eq!(u8::from(BlockTag::None), 0);
    assert_eq!(u8::from(BlockTag::Extension), 9);
    assert_eq!(BlockTag::try_from(4).ok(), Some(BlockTag::Tempo));
    assert!(BlockTag::try_from(10).is_err());
    assert!(BlockTag::Reserved.is_terminator());
    assert!(!BlockTag::Dummy.is_terminator());
}

#[test]
fn blocks_report_their_tag() {
    let title = Block::Title("Title".to_owned());
    assert_eq!(title.tag(), BlockTag::Title);
    assert!(!title.is_end());

    let ext = Block::Extension(ExtensionBlock::new("x", Vec::new()));
    assert_eq!(ext.tag(), BlockTag::Extension);
    assert_eq!(Block::Tempo(TimedTrack::empty()).tag(), BlockTag::Tempo);

    assert_eq!(Block::End.tag(), BlockTag::None);
    assert!(Block::End.tag().is_terminator());
}
