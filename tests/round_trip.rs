use opsm::prelude::*;
use pretty_assertions::assert_eq;

fn song() -> MetaFile {
    let mut tempos = TimedTrack::with_capacity(1);
    tempos.append(0.0, Tempo::new(120.)).unwrap();

    let mut time_signatures = TimedTrack::with_capacity(1);
    time_signatures.append(0.0, TimeSignature::COMMON).unwrap();

    let mut key_signatures = TimedTrack::with_capacity(1);
    key_signatures
        .append(0.0, KeySignature::major(PitchClass::C))
        .unwrap();

    MetaFile::builder("Song")
        .title("Title")
        .tempos(tempos)
        .time_signatures(time_signatures)
        .key_signatures(key_signatures)
        .build()
}

#[test]
fn song_round_trips() {
    let file = song();
    let bytes = file.to_bytes().unwrap();

    assert_eq!(bytes.len(), 96);
    assert_eq!(bytes.len() % ALIGNMENT, 0);

    let parsed = MetaFile::parse(&bytes).unwrap();
    assert_eq!(parsed, file);
    assert_eq!(parsed.to_bytes().unwrap(), bytes);
}

#[test]
fn song_layout() {
    let bytes = song().to_bytes().unwrap();
    let dummy = u8::from(BlockTag::Dummy);

    assert_eq!(&bytes[0..4], b"OPSM");
    assert_eq!(&bytes[4..8], &CURRENT_VERSION.to_le_bytes());
    assert_eq!(bytes[8], 4);
    assert_eq!(&bytes[9..13], b"Song");
    assert_eq!(&bytes[13..15], &[dummy, dummy]);

    assert_eq!(bytes[15], u8::from(BlockTag::Title));
    assert_eq!(bytes[31], u8::from(BlockTag::Tempo));
    assert_eq!(&bytes[32..34], &1i16.to_le_bytes());
    assert_eq!(&bytes[42..50], &120f64.to_le_bytes());
    assert_eq!(bytes[63], u8::from(BlockTag::TimeSignatures));
    assert_eq!(bytes[79], u8::from(BlockTag::KeySignatures));
    // C major: root 0, mode 1
    assert_eq!(&bytes[90..92], &[0, 1]);
    assert_eq!(bytes[95], u8::from(BlockTag::None));
}

#[test]
fn full_file_round_trips() {
    let tempos = TimedTrack::from_entries([
        TimedValue::new(0.0, Tempo::new(96.)),
        TimedValue::new(64.0, Tempo::new(140.)),
        TimedValue::new(64.0, Tempo::new(141.5)),
    ])
    .unwrap();
    let time_signatures = TimedTrack::from_entries([
        TimedValue::new(0.0, TimeSignature::new(6, 8)),
        TimedValue::new(48.0, TimeSignature::CUT),
    ])
    .unwrap();
    let key_signatures = TimedTrack::from_entries([
        TimedValue::new(0.0, KeySignature::new(PitchClass::D, Mode::Dorian)),
        TimedValue::new(32.0, KeySignature::minor(PitchClass::FSharp)),
    ])
    .unwrap();

    let file = MetaFile::builder("Full")
        .title("Full Title")
        .artist("Some Artist, Another Artist")
        .album("Ünïcödé Album")
        .tempos(tempos)
        .time_signatures(time_signatures)
        .key_signatures(key_signatures)
        .extension(ExtensionBlock::new("zeta", vec![9u8; 200]))
        .extension(ExtensionBlock::new("alpha", Vec::new()))
        .build();

    let parsed = MetaFile::parse(&file.to_bytes().unwrap()).unwrap();
    assert_eq!(parsed, file);

    assert_eq!(parsed.version(), CURRENT_VERSION);
    assert_eq!(parsed.album(), Some("Ünïcödé Album"));
    assert_eq!(parsed.initial_tempo(), Ok(Tempo::new(96.)));
    assert_eq!(
        parsed.tempos().try_find(64.0),
        Some(&Tempo::new(141.5))
    );
    assert_eq!(parsed.time_signatures().try_find(-1.0), None);
    assert_eq!(
        parsed.key_signatures().try_find(1000.0),
        Some(&KeySignature::minor(PitchClass::FSharp))
    );

    let names: Vec<_> = parsed.blocks().map(ExtensionBlock::name).collect();
    assert_eq!(names, ["alpha", "zeta"]);
    assert!(parsed.block("alpha").unwrap().is_empty());
}

#[test]
fn optional_fields_are_omitted() {
    let file = MetaFile::builder("Bare").build();
    let bytes = file.to_bytes().unwrap();

    // preamble, name "Bare" and two dummies, then the terminator
    assert_eq!(bytes.len(), 16);
    assert_eq!(bytes[15], u8::from(BlockTag::None));

    let parsed = MetaFile::parse(&bytes).unwrap();
    assert_eq!(parsed.title(), None);
    assert_eq!(parsed.artist(), None);
    assert!(parsed.tempos().is_empty());
    assert_eq!(parsed.blocks().len(), 0);
}

#[test]
fn stream_stays_usable_after_write_and_read() {
    let file = song();

    let mut out = b"head".to_vec();
    file.write_to(&mut out).unwrap();
    out.extend_from_slice(b"tail");
    assert_eq!(&out[..4], b"head");
    assert_eq!(&out[out.len() - 4..], b"tail");

    let mut input = &out[4..];
    let parsed = MetaReader::new(&mut input).read_meta_file().unwrap();
    assert_eq!(parsed, file);
    assert_eq!(input, b"tail");
}

#[test]
fn unknown_key_bytes_decode_leniently() {
    let mut bytes = Vec::new();
    let mut writer = MetaWriter::new(&mut bytes);
    writer.write_i32(MAGIC).unwrap();
    writer.write_i32(CURRENT_VERSION).unwrap();
    writer.write_string("Odd").unwrap();
    writer.pad().unwrap();
    writer.write_tag(BlockTag::KeySignatures).unwrap();
    writer.write_i16(1).unwrap();
    writer.write_f64(0.0).unwrap();
    writer.write_u8(200).unwrap();
    writer.write_u8(42).unwrap();
    writer.write_tag(BlockTag::None).unwrap();

    let parsed = MetaFile::parse(&bytes).unwrap();
    let key = parsed.initial_key_signature().unwrap();
    assert_eq!(key.root(), PitchClass::Unknown);
    assert_eq!(key.mode(), Mode::Unknown);
    assert!(key.is_unknown());
}

#[test]
fn repeated_blocks_overwrite() {
    let mut bytes = Vec::new();
    let mut writer = MetaWriter::new(&mut bytes);
    writer.write_i32(MAGIC).unwrap();
    writer.write_i32(CURRENT_VERSION).unwrap();
    writer.write_string("Twice").unwrap();
    for title in ["First", "Second"] {
        writer.write_tag(BlockTag::Title).unwrap();
        writer.write_string(title).unwrap();
    }
    // end of stream without a terminator
    let parsed = MetaFile::parse(&bytes).unwrap();
    assert_eq!(parsed.title(), Some("Second"));
}

#[test]
fn reserved_tag_ends_the_file() {
    let mut bytes = MetaFile::builder("Short").build().to_bytes().unwrap();
    let terminator = bytes.len() - 1;
    bytes[terminator] = u8::from(BlockTag::Reserved);
    // anything after a terminator is never read
    bytes.extend_from_slice(&[0xEE; 8]);

    let parsed = MetaFile::parse(&bytes).unwrap();
    assert_eq!(parsed.name(), "Short");
}

#[test]
fn field_ending_on_a_boundary_is_not_padded() {
    // magic, version, length byte and 7 name bytes end exactly at 16
    let bytes = MetaFile::builder("1234567").build().to_bytes().unwrap();

    assert_eq!(bytes.len(), 31);
    assert_eq!(bytes[16], u8::from(BlockTag::None));
    assert!(bytes[17..].iter().all(|&b| b == u8::from(BlockTag::Dummy)));
    assert_eq!(MetaFile::parse(&bytes).unwrap().name(), "1234567");
}
