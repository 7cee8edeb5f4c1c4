#![doc = r#"
Path-level entry points and the importer contract.

Decoding and encoding primitives report rich errors. The functions here
sit at the outermost edge: [`try_import`] and [`try_export`] still return
an [`Error`], while [`import`] and [`export`] reduce any failure to
`None`/`false` so a caller can fall back to another strategy.

# Importers

A [`MetaImporter`] converts a foreign project format into a [`MetaFile`].
[`import`] drives it in three stages, all of which must succeed:

```text
validate_path(path) ──► populate(opened file) ──► import() ──► MetaFile
```
"#]

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek},
    path::Path,
};

use crate::{Error, ImportError, file::MetaFile};

/// A seekable byte source handed to [`MetaImporter::populate`].
///
/// Implemented for every `Read + Seek`, since foreign project formats are
/// often zip archives that need random access.
pub trait ImportSource: Read + Seek {}

impl<T: Read + Seek + ?Sized> ImportSource for T {}

/// Converts a foreign project format into a [`MetaFile`].
///
/// Resources held by an importer are released on drop.
pub trait MetaImporter {
    /// Human readable name of the importer, e.g. `"Studio One"`
    fn name(&self) -> &str;

    /// True once [`MetaImporter::populate`] has succeeded
    fn is_populated(&self) -> bool;

    /// True if the importer accepts the file at `path`
    fn validate_path(&self, path: &Path) -> bool;

    /// Read the foreign container and remember everything needed for
    /// [`MetaImporter::import`].
    fn populate(&mut self, source: &mut dyn ImportSource) -> Result<(), ImportError>;

    /// Produce the file from the populated state.
    ///
    /// # Errors
    /// [`ImportError::NotPopulated`] if [`MetaImporter::populate`] has not
    /// succeeded.
    fn import(&mut self) -> Result<MetaFile, ImportError>;
}

/// Read a [`MetaFile`] from `path`.
///
/// Without an importer the file is decoded as the wire format. With an
/// importer the path is validated, the importer populates itself from the
/// opened file, and its result is returned.
pub fn try_import(
    path: impl AsRef<Path>,
    importer: Option<&mut dyn MetaImporter>,
) -> Result<MetaFile, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let Some(importer) = importer else {
        let file = BufReader::new(File::open(path)?);
        return Ok(MetaFile::read_from(file)?);
    };

    if !importer.validate_path(path) {
        return Err(ImportError::InvalidPath {
            importer: importer.name().to_owned(),
            path: path.to_path_buf(),
        }
        .into());
    }

    {
        let mut source = BufReader::new(File::open(path)?);
        importer.populate(&mut source)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(importer = importer.name(), ?path, "populated importer");
    Ok(importer.import()?)
}

/// Like [`try_import`], but reports only success or failure.
pub fn import(
    path: impl AsRef<Path>,
    importer: Option<&mut dyn MetaImporter>,
) -> Option<MetaFile> {
    match try_import(path, importer) {
        Ok(file) => Some(file),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "import failed");
            None
        }
    }
}

/// Encode `file` into `path`, creating or truncating it.
pub fn try_export(path: impl AsRef<Path>, file: &MetaFile) -> Result<(), Error> {
    let out = BufWriter::new(File::create(path)?);
    file.write_to(out)?;
    Ok(())
}

/// Like [`try_export`], but reports only success or failure.
pub fn export(path: impl AsRef<Path>, file: &MetaFile) -> bool {
    match try_export(path, file) {
        Ok(()) => true,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "export failed");
            false
        }
    }
}
