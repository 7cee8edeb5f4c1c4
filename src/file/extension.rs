use std::io::Cursor;

use crate::BlockError;

#[doc = r#"
Named, opaque data carried alongside the core metadata.

Tools can store anything the format has no field for (cue points, lyrics,
vendor state) in an extension block. Readers that do not understand a block
keep it intact, so it survives a decode/encode round trip.

# Example
```rust
# use opsm::prelude::*;
use std::io::Read;

let block = ExtensionBlock::new("lyrics", b"la la la".to_vec());

let mut text = String::new();
block.open().read_to_string(&mut text).unwrap();
assert_eq!(text, "la la la");
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtensionBlock {
    name: String,
    data: Vec<u8>,
}

impl ExtensionBlock {
    /// Create a new block
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// The block's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the data in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the block carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Ordinal comparison of the block's name
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }

    /// Copy the data into `destination`, which must be exactly as long as
    /// the data.
    ///
    /// # Errors
    /// [`BlockError::SizeMismatch`] if the lengths differ.
    pub fn copy_to(&self, destination: &mut [u8]) -> Result<(), BlockError> {
        if destination.len() != self.data.len() {
            return Err(BlockError::SizeMismatch {
                expected: self.data.len(),
                actual: destination.len(),
            });
        }
        destination.copy_from_slice(&self.data);
        Ok(())
    }

    /// A fresh reader over the data
    pub fn open(&self) -> Cursor<&[u8]> {
        Cursor::new(self.data.as_slice())
    }

    /// Split into `(name, data)`
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.data)
    }
}

#[test]
fn copy_requires_exact_length() {
    let block = ExtensionBlock::new("abc", vec![1u8, 2, 3]);

    let mut exact = [0; 3];
    block.copy_to(&mut exact).unwrap();
    assert_eq!(exact, [1, 2, 3]);

    let mut short = [0; 2];
    assert_eq!(
        block.copy_to(&mut short),
        Err(BlockError::SizeMismatch {
            expected: 3,
            actual: 2
        })
    );
    let mut long = [0; 4];
    assert!(block.copy_to(&mut long).is_err());
    assert_eq!(long, [0; 4]);
}

#[test]
fn into_parts_keeps_name_and_data() {
    let (name, data) = ExtensionBlock::new("state", b"on".to_vec()).into_parts();
    assert_eq!(name, "state");
    assert_eq!(data, b"on");
}
