//!
//! Track descriptors collected from a `Tracks` element.
//!

use std::collections::{HashMap, HashSet};

use super::element::Element;
use super::specs::ids;

const TEXT_SUBTITLE_CODEC_PREFIX: &str = "S_TEXT";
const HEADER_STRIPPING: u64 = 3;

///
/// What the parser and the markup writer need to know about a track.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub number: u64,
    pub codec_id: Option<String>,

    ///
    /// `true` when the codec id belongs to the `S_TEXT` family, whose frames are UTF-8 text.
    ///
    pub is_text: bool,

    ///
    /// Bytes removed from the start of every frame by header stripping compression.
    ///
    pub header_removal: Option<Vec<u8>>,
}

impl Track {
    ///
    /// Builds a track from a `TrackEntry` master.  Returns `None` if the entry has no `TrackNumber`.
    ///
    pub fn from_entry(entry: &Element) -> Option<Track> {
        let number = entry.child(ids::TRACK_NUMBER)?.as_unsigned_int()?;
        let codec_id = entry.child(ids::CODEC_ID).and_then(|c| c.as_text()).map(String::from);
        let is_text = codec_id.as_deref().map_or(false, |c| c.starts_with(TEXT_SUBTITLE_CODEC_PREFIX));

        Some(Track {
            number,
            codec_id,
            is_text,
            header_removal: header_removal_prefix(entry),
        })
    }
}

fn header_removal_prefix(entry: &Element) -> Option<Vec<u8>> {
    let encodings = entry.child(ids::CONTENT_ENCODINGS)?;
    encodings.children().iter()
        .filter(|e| e.id == ids::CONTENT_ENCODING)
        .filter(|e| e.child(ids::CONTENT_ENCODING_SCOPE).and_then(Element::as_unsigned_int).unwrap_or(1) & 1 == 1)
        .filter_map(|e| e.child(ids::CONTENT_COMPRESSION))
        .find(|c| c.child(ids::CONTENT_COMP_ALGO).and_then(Element::as_unsigned_int).unwrap_or(0) == HEADER_STRIPPING)
        .and_then(|c| c.child(ids::CONTENT_COMP_SETTINGS))
        .and_then(Element::as_binary)
        .map(<[u8]>::to_vec)
}

///
/// All tracks of a segment, keyed by track number.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackTable {
    tracks: HashMap<u64, Track>,
}

impl TrackTable {
    ///
    /// Collects every `TrackEntry` of a `Tracks` master.  Entries without a track number are ignored.
    ///
    pub fn from_tracks_element(tracks: &Element) -> Self {
        TrackTable {
            tracks: tracks.children().iter()
                .filter(|e| e.id == ids::TRACK_ENTRY)
                .filter_map(Track::from_entry)
                .map(|t| (t.number, t))
                .collect(),
        }
    }

    pub fn get(&self, number: u64) -> Option<&Track> {
        self.tracks.get(&number)
    }

    pub fn header_removal(&self, number: u64) -> Option<&[u8]> {
        self.get(number).and_then(|t| t.header_removal.as_deref())
    }

    ///
    /// Numbers of the tracks carrying text subtitles.
    ///
    pub fn text_tracks(&self) -> HashSet<u64> {
        self.tracks.values().filter(|t| t.is_text).map(|t| t.number).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl FromIterator<Track> for TrackTable {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        TrackTable {
            tracks: iter.into_iter().map(|t| (t.number, t)).collect(),
        }
    }
}
