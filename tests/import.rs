use std::{fs, io::Read, path::Path};

use opsm::prelude::*;
use pretty_assertions::assert_eq;

/// Reads a tiny `key: value` text format:
///
/// ```text
/// name: Demo
/// title: Demo Song
/// tempo: 0 120
/// tempo: 16 90
/// ```
#[derive(Default)]
struct TextImporter {
    lines: Option<Vec<String>>,
}

impl MetaImporter for TextImporter {
    fn name(&self) -> &str {
        "Plain Text"
    }

    fn is_populated(&self) -> bool {
        self.lines.is_some()
    }

    fn validate_path(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "txt")
    }

    fn populate(&mut self, source: &mut dyn ImportSource) -> Result<(), ImportError> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        self.lines = Some(text.lines().map(str::to_owned).collect());
        Ok(())
    }

    fn import(&mut self) -> Result<MetaFile, ImportError> {
        let lines = self.lines.as_ref().ok_or(ImportError::NotPopulated)?;
        let fields: Vec<(&str, &str)> = lines
            .iter()
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect();

        let name = fields
            .iter()
            .find_map(|&(k, v)| (k == "name").then_some(v))
            .ok_or_else(|| ImportError::Malformed("missing name".to_owned()))?;
        let mut builder = MetaFile::builder(name);

        let tempo_lines: Vec<&str> = fields
            .iter()
            .filter_map(|&(k, v)| (k == "tempo").then_some(v))
            .collect();
        let mut tempos = TimedTrack::with_capacity(tempo_lines.len());
        for line in tempo_lines {
            let (time, bpm) = line
                .split_once(' ')
                .and_then(|(t, b)| Some((t.parse::<f64>().ok()?, b.parse::<f64>().ok()?)))
                .ok_or_else(|| ImportError::Malformed(format!("bad tempo {line:?}")))?;
            tempos.append(time, Tempo::new(bpm))?;
        }
        builder = builder.tempos(tempos);

        for &(k, v) in &fields {
            builder = match k {
                "title" => builder.title(v),
                "artist" => builder.artist(v),
                "album" => builder.album(v),
                _ => builder,
            };
        }
        Ok(builder.build())
    }
}

fn write(dir: &Path, file_name: &str, contents: impl AsRef<[u8]>) -> std::path::PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn export_then_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.opsm");

    let mut keys = TimedTrack::with_capacity(1);
    keys.append(0.0, KeySignature::minor(PitchClass::E)).unwrap();
    let file = MetaFile::builder("Song")
        .artist("Artist")
        .key_signatures(keys)
        .extension(ExtensionBlock::new("cue-points", vec![1u8, 2, 3]))
        .build();

    assert!(export(&path, &file));
    assert_eq!(fs::read(&path).unwrap().len() % ALIGNMENT, 0);
    assert_eq!(import(&path, None), Some(file));
}

#[test]
fn export_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "song.opsm", vec![0xABu8; 1000]);

    let file = MetaFile::builder("Small").build();
    try_export(&path, &file).unwrap();
    assert_eq!(fs::read(&path).unwrap(), file.to_bytes().unwrap());
}

#[test]
fn export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("song.opsm");

    assert!(!export(&path, &MetaFile::builder("Song").build()));
}

#[test]
fn missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nothing.opsm");

    assert_eq!(import(&path, None), None);
    assert!(matches!(
        try_import(&path, None),
        Err(Error::NotFound(p)) if p == path
    ));

    let mut importer = TextImporter::default();
    assert_eq!(import(&path, Some(&mut importer)), None);
    assert!(!importer.is_populated());
}

#[test]
fn corrupt_file_fails_to_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "song.opsm", b"not a meta file");

    assert_eq!(import(&path, None), None);
    let Err(Error::Read(err)) = try_import(&path, None) else {
        panic!("expected a read error");
    };
    assert!(matches!(err.parse_error(), Some(ParseError::BadMagic(_))));
}

#[test]
fn importer_builds_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "demo.txt",
        "name: Demo\ntitle: Demo Song\ntempo: 0 120\ntempo: 16 90\n",
    );

    let mut importer = TextImporter::default();
    let file = import(&path, Some(&mut importer)).unwrap();
    assert!(importer.is_populated());

    assert_eq!(file.name(), "Demo");
    assert_eq!(file.title(), Some("Demo Song"));
    assert_eq!(file.tempos().len(), 2);
    assert_eq!(file.tempos().try_find(20.0), Some(&Tempo::new(90.)));

    // imported files encode like any other
    assert_eq!(MetaFile::parse(&file.to_bytes().unwrap()).unwrap(), file);
}

#[test]
fn importer_rejects_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "demo.md", "name: Demo\n");

    let mut importer = TextImporter::default();
    let Err(Error::Import(ImportError::InvalidPath { importer: name, .. })) =
        try_import(&path, Some(&mut importer))
    else {
        panic!("expected an invalid path error");
    };
    assert_eq!(name, "Plain Text");
    assert!(!importer.is_populated());
}

#[test]
fn importer_populate_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "binary.txt", [0xFFu8, 0xFE, 0x00]);

    let mut importer = TextImporter::default();
    assert!(matches!(
        try_import(&path, Some(&mut importer)),
        Err(Error::Import(ImportError::Io(_)))
    ));
    assert!(!importer.is_populated());
}

#[test]
fn importer_track_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "back.txt", "name: Back\ntempo: 8 120\ntempo: 4 90\n");

    let mut importer = TextImporter::default();
    assert!(matches!(
        try_import(&path, Some(&mut importer)),
        Err(Error::Import(ImportError::Track(TrackError::OutOfOrder { .. })))
    ));
    assert_eq!(import(&path, Some(&mut importer)), None);
}

#[test]
fn import_before_populate() {
    let mut importer = TextImporter::default();
    assert!(matches!(importer.import(), Err(ImportError::NotPopulated)));
}
