#![warn(missing_docs)]
#![doc = r#"
Read and write Open Song Meta files.

An Open Song Meta file carries the non-audio description of a song: a
name, optional title/artist/album, and tracks of tempo, time signature and
key signature changes over time. Applications can attach their own data as
named extension blocks.

The crate is split along the life of a file:

- [`TimedTrack`]: time-ordered, capacity-bounded parameter tracks
- [`MetaFile`] and [`MetaFileBuilder`]: the immutable in-memory file
- [`MetaReader`](reader::MetaReader) and [`MetaWriter`](writer::MetaWriter):
  the little-endian, block-padded wire format
- [`import`](fn@import)/[`export`]: path level entry points, and the [`MetaImporter`]
  contract for foreign project formats

# Example
```rust
use opsm::prelude::*;

let mut tempos = TimedTrack::with_capacity(2);
tempos.append(0.0, Tempo::new(120.0)).unwrap();
tempos.append(16.0, Tempo::new(90.0)).unwrap();

let file = MetaFile::builder("Demo")
    .title("Demo Song")
    .tempos(tempos)
    .extension(ExtensionBlock::new("notes", b"verse".to_vec()))
    .build();

let bytes = file.to_bytes().unwrap();
assert_eq!(bytes.len(), 96);

let parsed = MetaFile::parse(&bytes).unwrap();
assert_eq!(parsed.title(), Some("Demo Song"));
assert_eq!(parsed.tempos().try_find(20.0).map(Tempo::beats_per_minute), Some(90.0));
assert_eq!(parsed.block("notes").unwrap().data(), b"verse");
```

# Features
- `tracing` (default): log decoding, encoding and import through [`tracing`](https://docs.rs/tracing)
- `serde`: derive `Serialize`/`Deserialize` on the value types
"#]

mod error;
pub use error::*;

mod track;
pub use track::*;

mod tempo;
pub use tempo::*;

mod signature;
pub use signature::*;

mod key;
pub use key::*;

pub mod file;
pub use file::{
    ExtensionBlock, MetaFile, MetaHeader,
    builder::{Block, BlockTag, MetaFileBuilder},
};

pub mod reader;
pub mod writer;

mod import;
pub use import::*;

/// Four-byte signature at the start of every file ("OPSM" read little-endian)
pub const MAGIC: i32 = 0x4D53504F;

/// The only format version this crate reads and writes
pub const CURRENT_VERSION: i32 = 1;

/// Blocks are padded relative to this boundary
pub const ALIGNMENT: usize = 16;

/// Commonly used types, re-exported in one place
pub mod prelude {
    pub use crate::{
        ALIGNMENT, CURRENT_VERSION, MAGIC,
        error::*,
        file::{
            ExtensionBlock, MetaFile, MetaHeader,
            builder::{Block, BlockTag, MetaFileBuilder},
        },
        import::*,
        key::*,
        reader::{MetaReader, ReadResult, ReaderError, ReaderErrorKind},
        signature::*,
        tempo::*,
        track::*,
        writer::{MetaWriter, WriteResult, WriterError, WriterErrorKind},
    };
}
