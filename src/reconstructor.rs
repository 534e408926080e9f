use std::collections::HashSet;
use std::io::{Read, Write};

use tracing::{debug, warn};

use super::element::{Element, ElementValue};
use super::element_iterator::ElementIterator;
use super::errors::markup::MarkupError;
use super::markup;
use super::options::XmlOptions;
use super::specs::ids;
use super::tracks::TrackTable;

const ROOT: &str = "mkv2xml";

///
/// Names of the elements that may follow a Cluster's children without ending the Cluster.
///
const CLUSTER_CHILDREN: [&str; 11] = [
    "Timecode", "Timestamp", "SilentTracks", "Position", "PrevSize", "SimpleBlock",
    "BlockGroup", "Void", "CRC-32", "SignatureSlot", "EncryptedBlock",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TreeState {
    Document,
    Segment,
    Cluster { in_segment: bool },
}

///
/// Rebuilds the element tree from the flat sequence produced by an [`ElementIterator`] and writes it as markup to a destination implementing [`std::io::Write`].
///
/// The iterator reports Segment and Cluster only as markers, with their children following as separate elements.  The reconstructor reopens them as real parents: a Segment marker closes the previous Segment, and a Cluster stays open until an element that cannot live inside a Cluster shows up at the Cluster's depth (or the document ends).
///
/// ## Example
///
/// ```
/// use matroska_xml::{TreeReconstructor, XmlOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let reconstructor = TreeReconstructor::new(Vec::new(), XmlOptions::default())?;
/// let output = reconstructor.finish()?;
/// assert_eq!("<mkv2xml>\n</mkv2xml>\n", String::from_utf8(output)?);
/// # Ok(())
/// # }
/// ```
///
pub struct TreeReconstructor<W: Write>
{
    dest: W,
    options: XmlOptions,
    state: TreeState,
    text_tracks: HashSet<u64>,
    textual_codec_private: bool,
}

impl<W: Write> TreeReconstructor<W>
{
    ///
    /// Returns a new reconstructor after writing the opening root tag to `dest`.
    ///
    pub fn new(mut dest: W, options: XmlOptions) -> Result<Self, MarkupError> {
        writeln!(dest, "<{}>", ROOT)?;
        Ok(TreeReconstructor {
            dest,
            options,
            state: TreeState::Document,
            text_tracks: HashSet::new(),
            textual_codec_private: false,
        })
    }

    fn base_indent(&self) -> usize {
        match self.state {
            TreeState::Cluster { .. } => 1,
            _ => 0,
        }
    }

    ///
    /// Writes the next top-level element from the iterator.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::WriteError`] if the destination fails.
    ///
    pub fn push(&mut self, element: &Element) -> Result<(), MarkupError> {
        if self.options.no_cluster {
            self.write_standalone_blocks(element)?;
        }

        if element.id == ids::TRACKS {
            self.text_tracks = TrackTable::from_tracks_element(element).text_tracks();
            debug!("Text tracks: {:?}", self.text_tracks);
        }

        self.write_element(element, self.base_indent())
    }

    ///
    /// Closes everything still open and returns the destination.
    ///
    pub fn finish(mut self) -> Result<W, MarkupError> {
        self.close_cluster()?;
        self.close_segment()?;
        writeln!(self.dest, "</{}>", ROOT)?;
        self.dest.flush()?;
        Ok(self.dest)
    }

    fn close_cluster(&mut self) -> Result<(), MarkupError> {
        if let TreeState::Cluster { in_segment } = self.state {
            writeln!(self.dest, "</Cluster>")?;
            self.state = if in_segment { TreeState::Segment } else { TreeState::Document };
        }
        Ok(())
    }

    fn close_segment(&mut self) -> Result<(), MarkupError> {
        if self.state == TreeState::Segment {
            writeln!(self.dest, "</Segment>")?;
            self.state = TreeState::Document;
        }
        Ok(())
    }

    fn write_standalone_blocks(&mut self, element: &Element) -> Result<(), MarkupError> {
        let blocks: Vec<_> = match element.id {
            ids::SIMPLE_BLOCK => element.as_block().into_iter().collect(),
            ids::BLOCK_GROUP => element.children().iter()
                .filter(|c| c.id == ids::BLOCK)
                .filter_map(Element::as_block)
                .collect(),
            _ => return Ok(()),
        };

        for block in blocks {
            let text_track = self.text_tracks.contains(&block.track);
            for frame in &block.frames {
                let body = markup::format_block(block, std::slice::from_ref(frame), "", text_track, self.options.chunk_length);
                writeln!(self.dest, "<block>{}</block>", body)?;
            }
        }
        Ok(())
    }

    fn write_element(&mut self, element: &Element, mut indent: usize) -> Result<(), MarkupError> {
        if matches!(self.state, TreeState::Cluster { .. }) && indent == 1 && !CLUSTER_CHILDREN.contains(&element.name.as_ref()) {
            debug!("{} ends the open Cluster", element.name);
            self.close_cluster()?;
            indent = 0;
        }

        if element.id == ids::TRACK_NUMBER {
            self.textual_codec_private = element.as_unsigned_int().map_or(false, |n| self.text_tracks.contains(&n));
        }

        if self.options.is_denied(&element.name) {
            return Ok(());
        }

        let pad = "  ".repeat(indent);
        let name = element.name.as_ref();
        match &element.value {
            ElementValue::Master(children) => {
                writeln!(self.dest, "{}<{}>", pad, name)?;
                for child in children {
                    self.write_element(child, indent + 1)?;
                }
                writeln!(self.dest, "{}</{}>", pad, name)?;
            },
            ElementValue::Flat => self.open_flat(name)?,
            ElementValue::Block(block) => {
                let text_track = self.text_tracks.contains(&block.track);
                let body = markup::format_block(block, &block.frames, &pad, text_track, self.options.chunk_length);
                writeln!(self.dest, "{}<{}>{}</{}>", pad, name, body, name)?;
            },
            ElementValue::Binary(data) if element.id == ids::CODEC_PRIVATE && self.textual_codec_private && !data.is_empty() => {
                match markup::decode_text(data) {
                    Some(text) => writeln!(self.dest, "{}<{} encoding=\"text\">{}</{}>", pad, name, markup::cdata(text), name)?,
                    None => writeln!(self.dest, "{}<{}>{}</{}>", pad, name, markup::format_binary(data, &pad, &self.options), name)?,
                }
            },
            value => {
                writeln!(self.dest, "{}<{}>{}</{}>", pad, name, markup::format_leaf(value, &pad, &self.options), name)?;
            },
        }
        Ok(())
    }

    fn open_flat(&mut self, name: &str) -> Result<(), MarkupError> {
        match name {
            "Segment" => {
                self.close_cluster()?;
                self.close_segment()?;
                writeln!(self.dest, "<Segment>")?;
                self.state = TreeState::Segment;
            },
            "Cluster" => {
                self.close_cluster()?;
                writeln!(self.dest, "<Cluster>")?;
                self.state = TreeState::Cluster { in_segment: self.state == TreeState::Segment };
            },
            other => warn!("Unknown flat element {}", other),
        }
        Ok(())
    }
}

///
/// Reads a Matroska stream from `source` and writes its markup to `dest`, returning `dest` once the document is closed.
///
/// ## Example
///
/// ```no_run
/// use std::fs::File;
/// use std::io::stdout;
/// use matroska_xml::{convert, XmlOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("my_file.mkv")?;
/// convert(file, stdout().lock(), XmlOptions::default())?;
/// # Ok(())
/// # }
/// ```
///
pub fn convert<R: Read, W: Write>(source: R, dest: W, options: XmlOptions) -> Result<W, MarkupError> {
    let mut reconstructor = TreeReconstructor::new(dest, options)?;
    let elements: ElementIterator<R> = ElementIterator::new(source);
    for element in elements {
        reconstructor.push(&element?)?;
    }
    reconstructor.finish()
}
