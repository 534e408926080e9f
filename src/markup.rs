//!
//! Text formatting for the values written by the [`TreeReconstructor`][`super::TreeReconstructor`].
//!
//! Everything here works on single values and returns the text that goes between an element's opening and closing tags.
//!

use chrono::{Duration, NaiveDate, Timelike};
use tracing::warn;

use super::block::Block;
use super::element::ElementValue;
use super::options::XmlOptions;

const CDATA_END: &str = "]]>";
const CDATA_END_ESCAPED: &str = "]]]]><![CDATA[>";

///
/// Escapes `&`, `<` and `>`.
///
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

///
/// Wraps text in a CDATA section, splitting any `]]>` it contains over two sections.
///
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace(CDATA_END, CDATA_END_ESCAPED))
}

///
/// Formats a float the shortest way that reads back to the same value.  Values below 1e-4 or from 1e16 up use an exponent with a sign and at least two digits (`1e+16`, `2.5e-07`).
///
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        },
        None => text,
    }
}

///
/// Formats a date given in nanoseconds since the start of 2001.  Microseconds are only shown when present.
///
pub fn format_date(nanoseconds: i64) -> String {
    let date = NaiveDate::from_ymd_opt(2001, 1, 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|epoch| epoch.checked_add_signed(Duration::microseconds(nanoseconds / 1000)));

    match date {
        Some(date) if date.nanosecond() != 0 => date.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        Some(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => nanoseconds.to_string(),
    }
}

///
/// Splits `text` into pieces of `length` characters.  A length of zero keeps it whole.
///
pub fn chunks(text: &str, length: usize) -> Vec<&str> {
    if length == 0 {
        return vec![text];
    }
    text.as_bytes()
        .chunks(length)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect()
}

///
/// Formats binary data as lowercase hex.  Hex longer than the inline limit is wrapped over indented lines.
///
pub fn format_binary(data: &[u8], indent: &str, options: &XmlOptions) -> String {
    let hex = hex::encode(data);
    if hex.len() <= options.inline_hex_limit {
        return hex;
    }

    let mut wrapped = String::with_capacity(hex.len() * 2);
    for chunk in chunks(&hex, options.chunk_length) {
        wrapped.push_str("\n  ");
        wrapped.push_str(indent);
        wrapped.push_str(chunk);
    }
    wrapped.push('\n');
    wrapped.push_str(indent);
    wrapped
}

///
/// Formats the content of a leaf element.
///
/// Blocks are not handled here since their layout depends on the track they belong to, see [`format_block`].
///
pub fn format_leaf(value: &ElementValue, indent: &str, options: &XmlOptions) -> String {
    match value {
        ElementValue::UnsignedInt(val) => val.to_string(),
        ElementValue::Integer(val) => val.to_string(),
        ElementValue::Float(val) => format_float(*val),
        ElementValue::Text(val) => escape_text(val),
        ElementValue::Binary(val) => format_binary(val, indent, options),
        ElementValue::Date(val) => format_date(*val),
        ElementValue::Master(_) | ElementValue::Block(_) | ElementValue::Flat => String::new(),
    }
}

///
/// Decodes subtitle bytes as UTF-8 for embedding as text.  Returns `None` (after logging) when they are not valid UTF-8.
///
pub fn decode_text(data: &[u8]) -> Option<&str> {
    match std::str::from_utf8(data) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!("UTF-8 decoding error, leaving as binary: {}", err);
            None
        }
    }
}

///
/// Formats the inside of a `<SimpleBlock>`, `<Block>` or `<block>` element.
///
/// Only `frames` are written, which lets callers write a block one frame at a time.  Frames of text tracks are embedded as text when they are valid UTF-8.
///
pub fn format_block(block: &Block, frames: &[Vec<u8>], indent: &str, text_track: bool, chunk_length: usize) -> String {
    let line = format!("\n  {}", indent);
    let mut body = String::new();

    body.push_str(&format!("{}<track>{}</track>", line, block.track));
    body.push_str(&format!("{}<timecode>{}</timecode>", line, format_float(block.timestamp)));
    if let Some(duration) = block.duration.filter(|duration| *duration != 0.0) {
        body.push_str(&format!("{}<duration>{}</duration>", line, format_float(duration)));
    }
    for (set, marker) in [(block.keyframe, "<keyframe/>"), (block.invisible, "<invisible/>"), (block.discardable, "<discardable/>")] {
        if set {
            body.push_str(&line);
            body.push_str(marker);
        }
    }

    for frame in frames {
        match text_track.then(|| decode_text(frame)).flatten() {
            Some(text) => {
                body.push_str(&format!("{}<data encoding=\"text\">{}</data>", line, cdata(&text.replace('\0', ""))));
            },
            None => {
                body.push_str(&line);
                body.push_str("<data>");
                for chunk in chunks(&hex::encode(frame), chunk_length) {
                    body.push_str(&line);
                    body.push_str("  ");
                    body.push_str(chunk);
                }
                body.push_str(&line);
                body.push_str("</data>");
            }
        }
    }

    body.push('\n');
    body.push_str(indent);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Lacing;

    fn block(frames: Vec<Vec<u8>>) -> Block {
        Block {
            track: 1,
            relative_timecode: 0,
            timestamp: 1.0,
            duration: None,
            keyframe: true,
            invisible: false,
            discardable: false,
            lacing: Lacing::None,
            frames,
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!("a &amp;&lt;b&gt;", escape_text("a &<b>"));
    }

    #[test]
    fn cdata_splits_end_marker() {
        assert_eq!("<![CDATA[x]]]]><![CDATA[>y]]>", cdata("x]]>y"));
    }

    #[test]
    fn floats_match_shortest_repr() {
        assert_eq!("1.0", format_float(1.0));
        assert_eq!("0.04", format_float(0.04));
        assert_eq!("123456789.0", format_float(123456789.0));
        assert_eq!("0.0001", format_float(0.0001));
        assert_eq!("1e-05", format_float(0.00001));
        assert_eq!("2.5e-07", format_float(0.00000025));
        assert_eq!("1e+16", format_float(1e16));
        assert_eq!("-1.5e+20", format_float(-1.5e20));
        assert_eq!("nan", format_float(f64::NAN));
        assert_eq!("inf", format_float(f64::INFINITY));
    }

    #[test]
    fn dates_start_in_2001() {
        assert_eq!("2001-01-01 00:00:00", format_date(0));
        assert_eq!("2001-01-02 00:00:01", format_date(86_401_000_000_000));
        assert_eq!("2001-01-01 00:00:00.001500", format_date(1_500_000));
        assert_eq!("2000-12-31 23:59:59", format_date(-1_000_000_000));
    }

    #[test]
    fn chunking() {
        assert_eq!(vec!["abc", "def", "g"], chunks("abcdefg", 3));
        assert_eq!(vec!["abcdefg"], chunks("abcdefg", 0));
        assert!(chunks("", 3).is_empty());
    }

    #[test]
    fn short_binary_is_inline() {
        assert_eq!("00ff10", format_binary(&[0x00, 0xff, 0x10], "  ", &XmlOptions::default()));
    }

    #[test]
    fn long_binary_is_wrapped() {
        let options = XmlOptions::default().with_chunk_length(16);
        let data = [0xabu8; 24];
        let expected = format!("\n    {}\n    {}\n    {}\n  ", "ab".repeat(8), "ab".repeat(8), "ab".repeat(8));
        assert_eq!(expected, format_binary(&data, "  ", &options));
    }

    #[test]
    fn leaf_values() {
        let options = XmlOptions::default();
        assert_eq!("42", format_leaf(&ElementValue::UnsignedInt(42), "", &options));
        assert_eq!("-3", format_leaf(&ElementValue::Integer(-3), "", &options));
        assert_eq!("48000.0", format_leaf(&ElementValue::Float(48000.0), "", &options));
        assert_eq!("R&amp;D", format_leaf(&ElementValue::Text(String::from("R&D")), "", &options));
        assert_eq!("", format_leaf(&ElementValue::Binary(Vec::new()), "", &options));
    }

    #[test]
    fn block_body_hex() {
        let block = block(vec![vec![0x01, 0x02, 0x03]]);
        let body = format_block(&block, &block.frames, "  ", false, 64);
        assert_eq!("\n    <track>1</track>\n    <timecode>1.0</timecode>\n    <keyframe/>\n    <data>\n      010203\n    </data>\n  ", body);
    }

    #[test]
    fn block_body_text_and_duration() {
        let mut block = block(vec![b"Hi\0]]>".to_vec()]);
        block.duration = Some(0.5);
        block.keyframe = false;
        block.discardable = true;
        let body = format_block(&block, &block.frames, "", true, 64);
        assert_eq!("\n  <track>1</track>\n  <timecode>1.0</timecode>\n  <duration>0.5</duration>\n  <discardable/>\n  <data encoding=\"text\"><![CDATA[Hi]]]]><![CDATA[>]]></data>\n", body);
    }

    #[test]
    fn block_body_invalid_text_falls_back_to_hex() {
        let block = block(vec![vec![0xff, 0xfe]]);
        let body = format_block(&block, &block.frames, "", true, 0);
        assert!(body.contains("<data>\n    fffe\n  </data>"));
    }

    #[test]
    fn zero_duration_is_omitted() {
        let mut block = block(Vec::new());
        block.duration = Some(0.0);
        assert!(!format_block(&block, &[], "", false, 64).contains("duration"));
    }
}
