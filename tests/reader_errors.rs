use opsm::prelude::*;
use pretty_assertions::assert_eq;

fn song_bytes() -> Vec<u8> {
    let mut tempos = TimedTrack::with_capacity(2);
    tempos.append(0.0, Tempo::new(120.)).unwrap();
    tempos.append(8.0, Tempo::new(60.)).unwrap();

    MetaFile::builder("Song")
        .title("Title")
        .tempos(tempos)
        .build()
        .to_bytes()
        .unwrap()
}

#[test]
fn bad_magic() {
    let mut bytes = song_bytes();
    bytes[0] = b'X';

    let err = MetaFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 0);
    assert!(matches!(err.parse_error(), Some(ParseError::BadMagic(_))));
}

#[test]
fn other_versions_are_rejected() {
    for version in [0i32, 2, -1] {
        let mut bytes = song_bytes();
        bytes[4..8].copy_from_slice(&version.to_le_bytes());

        let err = MetaFile::parse(&bytes).unwrap_err();
        assert_eq!(err.position(), 4);
        assert_eq!(
            err.parse_error(),
            Some(&ParseError::UnsupportedVersion(version))
        );
    }
}

#[test]
fn empty_input_is_out_of_bounds() {
    let err = MetaFile::parse(&[]).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn truncated_inside_a_block() {
    let bytes = song_bytes();

    // inside the tempo track
    let err = MetaFile::parse(&bytes[..40]).unwrap_err();
    assert!(err.is_out_of_bounds());

    // inside the name
    let err = MetaFile::parse(&bytes[..10]).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn truncated_between_blocks_ends_early() {
    let bytes = song_bytes();

    // the tempo block starts at 31, after the title block and its padding
    assert_eq!(bytes[31], u8::from(BlockTag::Tempo));
    let file = MetaFile::parse(&bytes[..31]).unwrap();
    assert_eq!(file.title(), Some("Title"));
    assert!(file.tempos().is_empty());
}

#[test]
fn unknown_tag() {
    let mut bytes = song_bytes();
    bytes[31] = 0x7F;

    let err = MetaFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 31);
    assert_eq!(err.parse_error(), Some(&ParseError::UnknownBlockTag(0x7F)));
}

#[test]
fn invalid_utf8_title() {
    let mut bytes = song_bytes();
    // "Title" occupies 17..22
    bytes[17] = 0xFF;

    let err = MetaFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), 16);
    assert_eq!(err.parse_error(), Some(&ParseError::InvalidUtf8));
}

#[test]
fn decreasing_tempo_times() {
    let mut bytes = song_bytes();
    // second entry time, after tag, count, first time and first tempo
    let second = 31 + 1 + 2 + 16;
    bytes[second..second + 8].copy_from_slice(&(-1f64).to_le_bytes());

    let err = MetaFile::parse(&bytes).unwrap_err();
    assert_eq!(err.position(), second);
    assert_eq!(
        err.parse_error(),
        Some(&ParseError::Track(TrackError::OutOfOrder {
            previous: 0.0,
            time: -1.0
        }))
    );
}

#[test]
fn nothing_is_returned_on_failure() {
    let mut bytes = song_bytes();
    let last = bytes.len() - 1;
    bytes.truncate(last - 20);

    // the failure surfaces as an error, never as a partial file
    assert!(MetaFile::parse(&bytes).is_err());
}
