#![doc = r#"
Encoding of the wire format.

[`MetaWriter`] is the mirror image of [`MetaReader`](crate::reader::MetaReader):
one method per primitive, plus [`MetaWriter::write_meta_file`] for a
complete file. It counts the bytes it has written, and pads with
[`BlockTag::Dummy`] bytes relative to that count.
"#]

mod error;
pub use error::*;

use std::io::Write;

use crate::{
    ALIGNMENT, CURRENT_VERSION, MAGIC,
    file::{ExtensionBlock, MetaFile, builder::BlockTag},
    prelude::*,
};

/// Encodes [`MetaFile`]s into a byte stream.
///
/// The writer owns `W`. To keep a stream alive, hand it `&mut stream`:
/// the writer flushes at the end of every file but never closes anything.
pub struct MetaWriter<W> {
    inner: W,
    position: usize,
}

impl<W: Write> MetaWriter<W> {
    /// Wrap a stream. Positions, and therefore padding, are counted from here.
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes written so far
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn error(&self, kind: impl Into<WriterErrorKind>) -> WriterError {
        WriterError::new(self.position, kind.into())
    }

    /// Flush the underlying stream
    pub fn flush(&mut self) -> WriteResult<()> {
        let result = self.inner.flush();
        result.map_err(|e| self.error(e))
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> WriteResult<()> {
        let result = self.inner.write_all(bytes);
        result.map_err(|e| self.error(e))?;
        self.position += bytes.len();
        Ok(())
    }

    /// Write one byte
    pub fn write_u8(&mut self, value: u8) -> WriteResult<()> {
        self.write_bytes(&[value])
    }

    /// Write a little-endian `i16`
    pub fn write_i16(&mut self, value: i16) -> WriteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian `i32`
    pub fn write_i32(&mut self, value: i32) -> WriteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a little-endian `f64`
    pub fn write_f64(&mut self, value: f64) -> WriteResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write a 7-bit encoded length.
    ///
    /// # Errors
    /// [`WriterErrorKind::LengthTooLarge`] above `i32::MAX`.
    pub fn write_7bit_encoded_int(&mut self, value: usize) -> WriteResult<()> {
        let Ok(mut value) = u32::try_from(value) else {
            return Err(self.error(WriterErrorKind::LengthTooLarge(value)));
        };
        if value > i32::MAX as u32 {
            return Err(self.error(WriterErrorKind::LengthTooLarge(value as usize)));
        }

        let mut bytes = [0u8; 5];
        let mut len = 0;
        while value >= 0x80 {
            bytes[len] = (value as u8) | 0x80;
            value >>= 7;
            len += 1;
        }
        bytes[len] = value as u8;
        self.write_bytes(&bytes[..=len])
    }

    /// Write a length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: &str) -> WriteResult<()> {
        self.write_7bit_encoded_int(value.len())?;
        self.write_bytes(value.as_bytes())
    }

    /// Write a block tag
    pub fn write_tag(&mut self, tag: BlockTag) -> WriteResult<()> {
        self.write_u8(tag.into())
    }

    /// Pad with [`BlockTag::Dummy`] bytes until the position is one short of
    /// a multiple of [`ALIGNMENT`], or leave it if already on a multiple.
    pub fn pad(&mut self) -> WriteResult<()> {
        let count = ALIGNMENT - self.position % ALIGNMENT;
        if count == ALIGNMENT {
            return Ok(());
        }
        for _ in 1..count {
            self.write_tag(BlockTag::Dummy)?;
        }
        Ok(())
    }

    /// Write a tempo
    pub fn write_tempo(&mut self, tempo: &Tempo) -> WriteResult<()> {
        self.write_f64(tempo.beats_per_minute())
    }

    /// Write a time signature
    pub fn write_time_signature(&mut self, signature: &TimeSignature) -> WriteResult<()> {
        self.write_i16(signature.numerator())?;
        self.write_i16(signature.denominator())
    }

    /// Write a key signature
    pub fn write_key_signature(&mut self, key: &KeySignature) -> WriteResult<()> {
        self.write_u8(key.root().into())?;
        self.write_u8(key.mode().into())
    }

    fn write_track<T>(
        &mut self,
        track: TrackView<'_, T>,
        mut write_value: impl FnMut(&mut Self, &T) -> WriteResult<()>,
    ) -> WriteResult<()> {
        let Ok(count) = i16::try_from(track.len()) else {
            return Err(self.error(WriterErrorKind::TrackTooLong(track.len())));
        };
        self.write_i16(count)?;
        for entry in track {
            self.write_f64(entry.time())?;
            write_value(self, entry.value())?;
        }
        Ok(())
    }

    /// Write an `i16` count followed by the timed tempos
    pub fn write_tempo_track(&mut self, track: TrackView<'_, Tempo>) -> WriteResult<()> {
        self.write_track(track, Self::write_tempo)
    }

    /// Write an `i16` count followed by the timed time signatures
    pub fn write_time_signature_track(
        &mut self,
        track: TrackView<'_, TimeSignature>,
    ) -> WriteResult<()> {
        self.write_track(track, Self::write_time_signature)
    }

    /// Write an `i16` count followed by the timed key signatures
    pub fn write_key_signature_track(
        &mut self,
        track: TrackView<'_, KeySignature>,
    ) -> WriteResult<()> {
        self.write_track(track, Self::write_key_signature)
    }

    /// Write an extension block's name, length and data
    pub fn write_extension(&mut self, block: &ExtensionBlock) -> WriteResult<()> {
        self.write_string(block.name())?;
        self.write_7bit_encoded_int(block.len())?;
        self.write_bytes(block.data())
    }

    fn write_block(
        &mut self,
        tag: BlockTag,
        payload: impl FnOnce(&mut Self) -> WriteResult<()>,
    ) -> WriteResult<()> {
        #[cfg(feature = "tracing")]
        tracing::trace!(position = self.position, ?tag, "write block");
        self.write_tag(tag)?;
        payload(self)?;
        self.pad()
    }

    /// Encode a complete file and flush the stream.
    ///
    /// The file is always written as [`CURRENT_VERSION`]. Optional fields
    /// and empty tracks are omitted; extension blocks are written in name
    /// order.
    pub fn write_meta_file(&mut self, meta: &MetaFile) -> WriteResult<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!(name = meta.name(), "writing meta file");

        self.write_i32(MAGIC)?;
        self.write_i32(CURRENT_VERSION)?;
        self.write_string(meta.name())?;
        self.pad()?;

        let text = [
            (BlockTag::Title, meta.title()),
            (BlockTag::Artist, meta.artist()),
            (BlockTag::Album, meta.album()),
        ];
        for (tag, value) in text {
            if let Some(value) = value {
                self.write_block(tag, |w| w.write_string(value))?;
            }
        }

        if !meta.tempos().is_empty() {
            self.write_block(BlockTag::Tempo, |w| w.write_tempo_track(meta.tempos()))?;
        }
        if !meta.time_signatures().is_empty() {
            self.write_block(BlockTag::TimeSignatures, |w| {
                w.write_time_signature_track(meta.time_signatures())
            })?;
        }
        if !meta.key_signatures().is_empty() {
            self.write_block(BlockTag::KeySignatures, |w| {
                w.write_key_signature_track(meta.key_signatures())
            })?;
        }

        for block in meta.blocks() {
            self.write_block(BlockTag::Extension, |w| w.write_extension(block))?;
        }

        self.write_tag(BlockTag::None)?;
        self.pad()?;
        self.flush()
    }
}

#[cfg(test)]
fn written(f: impl FnOnce(&mut MetaWriter<Vec<u8>>) -> WriteResult<()>) -> Vec<u8> {
    let mut writer = MetaWriter::new(Vec::new());
    f(&mut writer).unwrap();
    writer.into_inner()
}

#[test]
fn seven_bit_encoding() {
    assert_eq!(written(|w| w.write_7bit_encoded_int(0)), [0x00]);
    assert_eq!(written(|w| w.write_7bit_encoded_int(127)), [0x7F]);
    assert_eq!(written(|w| w.write_7bit_encoded_int(128)), [0x80, 0x01]);
    assert_eq!(written(|w| w.write_7bit_encoded_int(293)), [0xA5, 0x02]);
    assert_eq!(
        written(|w| w.write_7bit_encoded_int(i32::MAX as usize)),
        [0xFF, 0xFF, 0xFF, 0xFF, 0x07]
    );
}

#[test]
fn seven_bit_rejects_large_lengths() {
    let mut writer = MetaWriter::new(Vec::new());
    let err = writer
        .write_7bit_encoded_int(i32::MAX as usize + 1)
        .unwrap_err();
    assert!(matches!(
        err.error_kind(),
        WriterErrorKind::LengthTooLarge(_)
    ));
}

#[test]
fn padding_stops_one_short_of_alignment() {
    let dummy = u8::from(BlockTag::Dummy);

    // already aligned: nothing
    assert!(written(|w| w.pad()).is_empty());

    let bytes = written(|w| {
        w.write_bytes(&[0xAA; 3])?;
        w.pad()
    });
    assert_eq!(bytes.len(), 15);
    assert!(bytes[3..].iter().all(|&b| b == dummy));

    // one short of a boundary: 16 - 15 = 1, so zero fillers
    let bytes = written(|w| {
        w.write_bytes(&[0xAA; 15])?;
        w.pad()
    });
    assert_eq!(bytes.len(), 15);

    let bytes = written(|w| {
        w.write_bytes(&[0xAA; 17])?;
        w.pad()
    });
    assert_eq!(bytes.len(), 31);
}

#[test]
fn overlong_track_is_rejected() {
    let track = TimedTrack::from_entries(
        (0..i16::MAX as usize + 1).map(|i| TimedValue::new(i as f64, Tempo::new(120.))),
    )
    .unwrap();
    let mut writer = MetaWriter::new(Vec::new());
    let err = writer.write_tempo_track(track.as_read_only()).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        WriterErrorKind::TrackTooLong(32768)
    ));
}
