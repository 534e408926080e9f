//! This crate converts [Matroska][mkv] files into an XML document that mirrors their [EBML][EBML] element tree.
//! 
//! [EBML][EBML] stands for Extensible Binary Meta-Language and is somewhat of a
//! binary version of XML. It's used for container formats like [WebM][webm] or
//! [MKV][mkv].
//! 
//! The work is split in two stages:
//! 
//! * [`ElementIterator`] reads the stream and emits one [`element::Element`] per top-level element.  Segment and Cluster are reported as flat markers with their children following as separate elements, which lets the iterator skip over damaged data and pick up at the next Cluster.  SimpleBlock and BlockGroup payloads are decoded into [`Block`]s with absolute timestamps.
//! * [`TreeReconstructor`] puts Segment and Cluster back around their children and writes the markup, formatted by [`markup`] according to [`XmlOptions`].
//! 
//! [`convert`] runs both stages over a reader.
//! 
//! ```
//! use matroska_xml::{convert, XmlOptions};
//! 
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Segment marker followed by an Info element with a TimecodeScale of 1000000
//! let data = [
//!     0x18, 0x53, 0x80, 0x67, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
//!     0x15, 0x49, 0xa9, 0x66, 0x87, 0x2a, 0xd7, 0xb1, 0x83, 0x0f, 0x42, 0x40,
//! ];
//! let output = convert(&data[..], Vec::new(), XmlOptions::default())?;
//! assert_eq!(
//!     "<mkv2xml>\n<Segment>\n<Info>\n  <TimecodeScale>1000000</TimecodeScale>\n</Info>\n</Segment>\n</mkv2xml>\n",
//!     String::from_utf8(output)?,
//! );
//! # Ok(())
//! # }
//! ```
//! 
//! # Known Limitations
//! Elements other than Segment and Cluster are buffered whole before being decoded, and cannot have an "Unknown Data Size" as defined in [RFC8794][rfc8794].  The iterator reports them and resyncs at the next Cluster.
//! 
//! [EBML]: http://ebml.sourceforge.net/
//! [mkv]: http://www.matroska.org/technical/specs/index.html
//! [webm]: https://www.webmproject.org/
//! [rfc8794]: https://datatracker.ietf.org/doc/rfc8794/
//! 

mod errors;
mod element_iterator;
mod reconstructor;
pub mod block;
pub mod element;
pub mod markup;
pub mod options;
pub mod specs;
pub mod tools;
pub mod tracks;

pub use self::block::{Block, Frame, Lacing};
pub use self::element_iterator::ElementIterator;
pub use self::options::XmlOptions;
pub use self::reconstructor::{convert, TreeReconstructor};

pub mod error {
    //!
    //! Potential errors that can occur when reading or writing.
    //!

    pub use super::errors::tool::ToolError;
    pub use super::errors::block::BlockError;
    pub use super::errors::element_iterator::{CorruptedDataError, ElementIteratorError};
    pub use super::errors::markup::MarkupError;
}
