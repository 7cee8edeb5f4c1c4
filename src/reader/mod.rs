#![doc = r#"
Decoding of the wire format.

[`MetaReader`] wraps any [`Read`] and decodes it primitive by primitive,
tracking the byte position so every [`ReaderError`] points at where
decoding failed.

Most callers want [`MetaFile::parse`] or [`MetaFile::read_from`]; the
reader is public for tools that walk the block sequence themselves:

```rust
# use opsm::prelude::*;
# let bytes = MetaFile::builder("Song").title("Title").build().to_bytes().unwrap();
let mut reader = MetaReader::new(bytes.as_slice());
reader.read_preamble().unwrap();
assert_eq!(reader.read_string().unwrap(), "Song");

loop {
    match reader.read_block().unwrap() {
        Block::End => break,
        Block::Title(title) => assert_eq!(title, "Title"),
        _ => {}
    }
}
```
"#]

mod error;
pub use error::*;

use std::io::{self, Read};

use crate::{
    CURRENT_VERSION, MAGIC, ParseError, TrackError,
    file::{
        ExtensionBlock, MetaFile,
        builder::{Block, BlockTag, MetaFileBuilder},
    },
    prelude::*,
};

/// Decodes [`MetaFile`]s from a byte stream.
///
/// The reader owns `R`. Pass `&mut stream` to keep the stream alive after
/// the reader is dropped.
pub struct MetaReader<R> {
    inner: R,
    position: usize,
}

impl<R: Read> MetaReader<R> {
    /// Wrap a stream. Positions are counted from here.
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed so far
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn error(&self, kind: impl Into<ReaderErrorKind>) -> ReaderError {
        ReaderError::new(self.position, kind.into())
    }

    /// Read exactly `N` bytes
    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut bytes = [0; N];
        let result = self.inner.read_exact(&mut bytes);
        result.map_err(|e| self.error(e))?;
        self.position += N;
        Ok(bytes)
    }

    /// Read one byte, or `None` at the end of the stream
    pub fn try_read_u8(&mut self) -> ReadResult<Option<u8>> {
        let mut byte = [0];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.error(e)),
            }
        }
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    /// Read a little-endian `i16`
    pub fn read_i16(&mut self) -> ReadResult<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Read a little-endian `i32`
    pub fn read_i32(&mut self) -> ReadResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    /// Read a little-endian `f64`
    pub fn read_f64(&mut self) -> ReadResult<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Read a 7-bit encoded length.
    ///
    /// Seven bits per byte, least significant group first, high bit set on
    /// every byte but the last. At most five bytes, and the value must fit
    /// in a non-negative `i32`.
    pub fn read_7bit_encoded_int(&mut self) -> ReadResult<usize> {
        let start = self.position;
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            if shift == 28 && byte > 0b1111 {
                break;
            }
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return i32::try_from(value)
                    .map(|v| v as usize)
                    .map_err(|_| ReaderError::parse(start, ParseError::InvalidVarInt));
            }
        }
        Err(ReaderError::parse(start, ParseError::InvalidVarInt))
    }

    /// Read exactly `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> ReadResult<Vec<u8>> {
        let mut data = Vec::new();
        let result = self.inner.by_ref().take(len as u64).read_to_end(&mut data);
        let read = result.map_err(|e| self.error(e))?;
        self.position += read;
        if read != len {
            return Err(ReaderError::oob(self.position));
        }
        Ok(data)
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> ReadResult<String> {
        let start = self.position;
        let len = self.read_7bit_encoded_int()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|_| ReaderError::parse(start, ParseError::InvalidUtf8))
    }

    /// Read a tempo
    pub fn read_tempo(&mut self) -> ReadResult<Tempo> {
        self.read_f64().map(Tempo::new)
    }

    /// Read a time signature
    pub fn read_time_signature(&mut self) -> ReadResult<TimeSignature> {
        let numerator = self.read_i16()?;
        let denominator = self.read_i16()?;
        Ok(TimeSignature::new(numerator, denominator))
    }

    /// Read a key signature
    pub fn read_key_signature(&mut self) -> ReadResult<KeySignature> {
        let root = PitchClass::from(self.read_u8()?);
        let mode = Mode::from(self.read_u8()?);
        Ok(KeySignature::new(root, mode))
    }

    fn read_track<T>(
        &mut self,
        mut read_value: impl FnMut(&mut Self) -> ReadResult<T>,
    ) -> ReadResult<TimedTrack<T>> {
        let start = self.position;
        let count = self.read_i16()?;
        let capacity = usize::try_from(count).map_err(|_| {
            ReaderError::new(
                start,
                ReaderErrorKind::track(TrackError::NegativeCapacity(count.into())),
            )
        })?;

        let mut track = TimedTrack::with_capacity(capacity);
        for _ in 0..capacity {
            let entry_start = self.position;
            let time = self.read_f64()?;
            let value = read_value(self)?;
            track
                .append(time, value)
                .map_err(|e| ReaderError::new(entry_start, ReaderErrorKind::track(e)))?;
        }
        Ok(track)
    }

    /// Read an `i16` count followed by that many timed tempos
    pub fn read_tempo_track(&mut self) -> ReadResult<TimedTrack<Tempo>> {
        self.read_track(Self::read_tempo)
    }

    /// Read an `i16` count followed by that many timed time signatures
    pub fn read_time_signature_track(&mut self) -> ReadResult<TimedTrack<TimeSignature>> {
        self.read_track(Self::read_time_signature)
    }

    /// Read an `i16` count followed by that many timed key signatures
    pub fn read_key_signature_track(&mut self) -> ReadResult<TimedTrack<KeySignature>> {
        self.read_track(Self::read_key_signature)
    }

    /// Read and check the magic number and version. Returns the version.
    ///
    /// # Errors
    /// - [`ParseError::BadMagic`] if the stream is not this format
    /// - [`ParseError::UnsupportedVersion`] for any version other than
    ///   [`CURRENT_VERSION`]
    pub fn read_preamble(&mut self) -> ReadResult<i32> {
        let start = self.position;
        let magic = self.read_i32()?;
        if magic != MAGIC {
            return Err(ReaderError::parse(start, ParseError::BadMagic(magic)));
        }

        let start = self.position;
        match self.read_i32()? {
            CURRENT_VERSION => Ok(CURRENT_VERSION),
            other => Err(ReaderError::parse(
                start,
                ParseError::UnsupportedVersion(other),
            )),
        }
    }

    /// Read the next block.
    ///
    /// Terminator tags and the end of the stream both yield [`Block::End`].
    ///
    /// # Errors
    /// [`ParseError::UnknownBlockTag`] for a tag byte outside [`BlockTag`],
    /// or any error from decoding the payload.
    pub fn read_block(&mut self) -> ReadResult<Block> {
        let start = self.position;
        let Some(byte) = self.try_read_u8()? else {
            return Ok(Block::End);
        };
        let tag = BlockTag::try_from(byte)
            .map_err(|e| ReaderError::parse(start, ParseError::UnknownBlockTag(e.number)))?;

        let block = match tag {
            BlockTag::None | BlockTag::Reserved => Block::End,
            BlockTag::Dummy => return Ok(Block::Dummy),
            BlockTag::Title => Block::Title(self.read_string()?),
            BlockTag::Artist => Block::Artist(self.read_string()?),
            BlockTag::Album => Block::Album(self.read_string()?),
            BlockTag::Tempo => Block::Tempo(self.read_tempo_track()?),
            BlockTag::TimeSignatures => Block::TimeSignatures(self.read_time_signature_track()?),
            BlockTag::KeySignatures => Block::KeySignatures(self.read_key_signature_track()?),
            BlockTag::Extension => {
                let name = self.read_string()?;
                let len = self.read_7bit_encoded_int()?;
                let data = self.read_bytes(len)?;
                Block::Extension(ExtensionBlock::new(name, data))
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(position = start, ?tag, "read block");
        Ok(block)
    }

    /// Decode a complete file.
    ///
    /// Nothing is returned unless the whole file decodes.
    pub fn read_meta_file(&mut self) -> ReadResult<MetaFile> {
        let version = self.read_preamble()?;
        let name = self.read_string()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(version, name = %name, "reading meta file");

        let mut builder = MetaFileBuilder::new(name).version(version);
        loop {
            let block = self.read_block()?;
            if block.is_end() {
                break;
            }
            builder.handle_block(block);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
fn reader(bytes: &[u8]) -> MetaReader<&[u8]> {
    MetaReader::new(bytes)
}

#[test]
fn seven_bit_lengths() {
    assert_eq!(reader(&[0x00]).read_7bit_encoded_int().unwrap(), 0);
    assert_eq!(reader(&[0x7F]).read_7bit_encoded_int().unwrap(), 127);
    assert_eq!(reader(&[0x80, 0x01]).read_7bit_encoded_int().unwrap(), 128);
    assert_eq!(reader(&[0xA5, 0x02]).read_7bit_encoded_int().unwrap(), 293);
    assert_eq!(
        reader(&[0xFF, 0xFF, 0xFF, 0xFF, 0x07])
            .read_7bit_encoded_int()
            .unwrap(),
        i32::MAX as usize
    );
}

#[test]
fn seven_bit_rejects_overlong_and_negative() {
    let err = reader(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F])
        .read_7bit_encoded_int()
        .unwrap_err();
    assert_eq!(err.parse_error(), Some(&ParseError::InvalidVarInt));

    // fits in u32 but would be a negative i32
    let err = reader(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F])
        .read_7bit_encoded_int()
        .unwrap_err();
    assert_eq!(err.parse_error(), Some(&ParseError::InvalidVarInt));
}

#[test]
fn end_of_stream_is_end_block() {
    let mut r = reader(&[8, 8, 0]);
    assert_eq!(r.read_block().unwrap(), Block::Dummy);
    assert_eq!(r.read_block().unwrap(), Block::Dummy);
    assert_eq!(r.read_block().unwrap(), Block::End);
    assert_eq!(r.read_block().unwrap(), Block::End);
    assert_eq!(r.position(), 3);
}

#[test]
fn unknown_tag_reports_position() {
    let mut r = reader(&[8, 0x42]);
    r.read_block().unwrap();
    let err = r.read_block().unwrap_err();
    assert_eq!(err.position(), 1);
    assert_eq!(err.parse_error(), Some(&ParseError::UnknownBlockTag(0x42)));
}

#[test]
fn negative_track_count() {
    let err = reader(&(-1i16).to_le_bytes())
        .read_tempo_track()
        .unwrap_err();
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Track(TrackError::NegativeCapacity(-1)))
    );
}

#[test]
fn short_track_is_out_of_bounds() {
    let mut bytes = 2i16.to_le_bytes().to_vec();
    bytes.extend(0f64.to_le_bytes());
    bytes.extend(120f64.to_le_bytes());

    let err = reader(&bytes).read_tempo_track().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 18);
}

#[test]
fn out_of_order_track_is_rejected() {
    let mut bytes = 2i16.to_le_bytes().to_vec();
    for time in [1.0f64, 0.0] {
        bytes.extend(time.to_le_bytes());
        bytes.extend(120f64.to_le_bytes());
    }
    let err = reader(&bytes).read_tempo_track().unwrap_err();
    assert_eq!(err.position(), 18);
    assert!(matches!(
        err.parse_error(),
        Some(ParseError::Track(TrackError::OutOfOrder { .. }))
    ));
}
