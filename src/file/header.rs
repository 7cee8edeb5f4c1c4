use crate::CURRENT_VERSION;

#[doc = r#"
   The descriptive fields of a [`MetaFile`](super::MetaFile)
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaHeader {
    pub(crate) version: i32,
    pub(crate) name: String,
    pub(crate) title: Option<String>,
    pub(crate) artist: Option<String>,
    pub(crate) album: Option<String>,
}

impl MetaHeader {
    /// Create a header at [`CURRENT_VERSION`] with only the required name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: CURRENT_VERSION,
            name: name.into(),
            title: None,
            artist: None,
            album: None,
        }
    }
    /// The format version the file was produced with
    pub fn version(&self) -> i32 {
        self.version
    }
    /// The document name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The song title, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    /// The artist(s), if any
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }
    /// The album, if any
    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }
}
