#![allow(dead_code)]

// Builders for hand-made Matroska streams.

use matroska_xml::specs::ids;
use matroska_xml::tools::Vint;
use matroska_xml::{convert, XmlOptions};

pub const TAGS: u64 = 0x1254C367;
pub const TAG: u64 = 0x7373;
pub const SIMPLE_TAG: u64 = 0x67C8;
pub const TAG_NAME: u64 = 0x45A3;
pub const VOID: u64 = 0xEC;
pub const TITLE: u64 = 0x7BA9;
pub const DATE_UTC: u64 = 0x4461;
pub const DURATION: u64 = 0x4489;
pub const EBML_VERSION: u64 = 0x4286;

pub fn id_bytes(id: u64) -> Vec<u8> {
    id.to_be_bytes().into_iter().skip_while(|b| *b == 0).collect()
}

pub fn element(id: u64, body: &[u8]) -> Vec<u8> {
    let size = (body.len() as u64).as_vint().expect("Fixture body should fit in a vint");
    [id_bytes(id), size, body.to_vec()].concat()
}

pub fn master(id: u64, children: &[Vec<u8>]) -> Vec<u8> {
    element(id, &children.concat())
}

///
/// Header of an element with the reserved "unknown" size, as live muxers write Segments and Clusters.
///
pub fn unknown_size(id: u64) -> Vec<u8> {
    [id_bytes(id), vec![0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]].concat()
}

pub fn uint(id: u64, value: u64) -> Vec<u8> {
    let bytes: Vec<u8> = value.to_be_bytes().into_iter().skip_while(|b| *b == 0).collect();
    if bytes.is_empty() {
        element(id, &[0])
    } else {
        element(id, &bytes)
    }
}

pub fn text(id: u64, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

pub fn float(id: u64, value: f64) -> Vec<u8> {
    element(id, &value.to_be_bytes())
}

pub fn ebml_header(doc_type: &str) -> Vec<u8> {
    master(ids::EBML, &[
        uint(EBML_VERSION, 1),
        uint(ids::EBML_READ_VERSION, 1),
        text(ids::DOC_TYPE, doc_type),
        uint(ids::DOC_TYPE_READ_VERSION, 2),
    ])
}

pub fn info(timecode_scale: u64) -> Vec<u8> {
    master(ids::INFO, &[uint(ids::TIMECODE_SCALE, timecode_scale)])
}

pub fn track_entry(number: u64, codec_id: &str, extra: &[Vec<u8>]) -> Vec<u8> {
    let mut children = vec![uint(ids::TRACK_NUMBER, number), text(ids::CODEC_ID, codec_id)];
    children.extend_from_slice(extra);
    master(ids::TRACK_ENTRY, &children)
}

pub fn header_removal(prefix: &[u8]) -> Vec<u8> {
    master(ids::CONTENT_ENCODINGS, &[
        master(ids::CONTENT_ENCODING, &[
            master(ids::CONTENT_COMPRESSION, &[
                uint(ids::CONTENT_COMP_ALGO, 3),
                element(ids::CONTENT_COMP_SETTINGS, prefix),
            ]),
        ]),
    ])
}

pub fn block_payload(track: u64, relative_timecode: i16, flags: u8, data: &[u8]) -> Vec<u8> {
    [
        track.as_vint().expect("Track number should fit in a vint"),
        relative_timecode.to_be_bytes().to_vec(),
        vec![flags],
        data.to_vec(),
    ].concat()
}

pub fn simple_block(track: u64, relative_timecode: i16, flags: u8, data: &[u8]) -> Vec<u8> {
    element(ids::SIMPLE_BLOCK, &block_payload(track, relative_timecode, flags, data))
}

pub fn block_group(track: u64, relative_timecode: i16, duration: u64, data: &[u8]) -> Vec<u8> {
    master(ids::BLOCK_GROUP, &[
        element(ids::BLOCK, &block_payload(track, relative_timecode, 0, data)),
        uint(ids::BLOCK_DURATION, duration),
    ])
}

///
/// Segment with one Cluster at timecode 1000 holding a keyframe of track 1, with a 1ms timecode scale.
///
pub fn single_block_stream() -> Vec<u8> {
    [
        unknown_size(ids::SEGMENT),
        info(1_000_000),
        unknown_size(ids::CLUSTER),
        uint(ids::TIMECODE, 1000),
        simple_block(1, 0, 0x80, &[0x01, 0x02]),
    ].concat()
}

pub fn to_xml(data: &[u8], options: XmlOptions) -> String {
    let output = convert(data, Vec::new(), options).expect("Conversion into memory shouldn't fail");
    String::from_utf8(output).expect("Output should be UTF-8")
}
