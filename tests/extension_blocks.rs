use std::io::Read;

use opsm::prelude::*;
use pretty_assertions::assert_eq;

fn cue_points() -> Vec<u8> {
    (0..37u8).map(|i| i.wrapping_mul(7)).collect()
}

fn file_with_cue_points() -> MetaFile {
    let parsed = MetaFile::builder("Cues")
        .extension(ExtensionBlock::new("cue-points", cue_points()))
        .build()
        .to_bytes()
        .unwrap();
    MetaFile::parse(&parsed).unwrap()
}

#[test]
fn cue_points_round_trip() {
    let file = file_with_cue_points();
    let block = file.block("cue-points").unwrap();

    assert_eq!(block.name(), "cue-points");
    assert!(block.has_name("cue-points"));
    assert!(!block.has_name("Cue-Points"));
    assert_eq!(block.len(), 37);
    assert_eq!(block.data(), cue_points().as_slice());
}

#[test]
fn copy_into_exact_buffer() {
    let file = file_with_cue_points();

    let mut exact = [0u8; 37];
    file.copy_block_to("cue-points", &mut exact).unwrap();
    assert_eq!(exact.as_slice(), cue_points().as_slice());

    let mut short = [0u8; 36];
    assert_eq!(
        file.copy_block_to("cue-points", &mut short),
        Err(BlockError::SizeMismatch {
            expected: 37,
            actual: 36
        })
    );
}

#[test]
fn open_block_as_stream() {
    let file = file_with_cue_points();

    let mut read = Vec::new();
    file.open_block("cue-points")
        .unwrap()
        .read_to_end(&mut read)
        .unwrap();
    assert_eq!(read, cue_points());

    // every open starts from the beginning
    let mut first = [0u8; 4];
    file.open_block("cue-points")
        .unwrap()
        .read_exact(&mut first)
        .unwrap();
    assert_eq!(first.as_slice(), &cue_points()[..4]);
}

#[test]
fn missing_block() {
    let file = file_with_cue_points();

    assert!(!file.has_block("lyrics"));
    assert!(file.try_block("lyrics").is_none());
    assert_eq!(
        file.block("lyrics"),
        Err(BlockError::Missing("lyrics".to_owned()))
    );
    assert!(file.open_block("lyrics").is_err());
    assert_eq!(
        file.copy_block_to("lyrics", &mut []),
        Err(BlockError::Missing("lyrics".to_owned()))
    );
}

#[test]
fn duplicate_names_on_the_wire_keep_the_last() {
    let mut bytes = Vec::new();
    let mut writer = MetaWriter::new(&mut bytes);
    writer.write_i32(MAGIC).unwrap();
    writer.write_i32(CURRENT_VERSION).unwrap();
    writer.write_string("Dup").unwrap();
    writer.pad().unwrap();
    for data in [b"old".as_slice(), b"new"] {
        writer.write_tag(BlockTag::Extension).unwrap();
        writer
            .write_extension(&ExtensionBlock::new("state", data))
            .unwrap();
        writer.pad().unwrap();
    }
    writer.write_tag(BlockTag::None).unwrap();

    let file = MetaFile::parse(&bytes).unwrap();
    assert_eq!(file.blocks().len(), 1);
    assert_eq!(file.block("state").unwrap().data(), b"new");
}

#[test]
fn unknown_blocks_survive_re_encoding() {
    let original = MetaFile::builder("Vendor")
        .extension(ExtensionBlock::new("vendor.a", vec![0xFFu8; 300]))
        .extension(ExtensionBlock::new("vendor.b", b"state".to_vec()))
        .build();

    let once = MetaFile::parse(&original.to_bytes().unwrap()).unwrap();
    let twice = MetaFile::parse(&once.to_bytes().unwrap()).unwrap();
    assert_eq!(twice, original);
}
