//!
//! Contains the types produced by the [`ElementIterator`][`super::ElementIterator`].
//!

use std::borrow::Cow;

use super::block::Block;
use super::specs::{ElementSpec, ElementType};

///
/// One decoded EBML element.
///
/// Leaf elements carry their decoded value, master elements carry all of their children, and flat elements (Segment and Cluster) carry nothing: their children are reported as the elements that follow.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: u64,
    pub name: Cow<'static, str>,
    pub data_type: ElementType,
    pub value: ElementValue,
}

///
/// Contains the content of an element.
///
/// The variant normally follows the element's [`ElementType`], with two exceptions: SimpleBlock and Block payloads are decoded into [`ElementValue::Block`], and values that fail to decode as their declared type are kept as [`ElementValue::Binary`].
///
#[derive(Clone, Debug, PartialEq)]
pub enum ElementValue {
    Master(Vec<Element>),
    UnsignedInt(u64),
    Integer(i64),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),

    ///
    /// Nanoseconds since 2001-01-01T00:00:00 UTC.
    ///
    Date(i64),
    Block(Block),

    ///
    /// Marker for a Segment or Cluster whose children follow as separate elements.
    ///
    Flat,
}

impl Element {
    pub fn new(spec: &'static ElementSpec, value: ElementValue) -> Self {
        Element {
            id: spec.id,
            name: Cow::Borrowed(spec.name),
            data_type: spec.data_type,
            value,
        }
    }

    ///
    /// Creates an element for an id that the specification does not know.  Its content is kept as binary.
    ///
    pub fn unknown(id: u64, data: &[u8]) -> Self {
        Element {
            id,
            name: Cow::Owned(format!("unknown_{:x}", id)),
            data_type: ElementType::Binary,
            value: ElementValue::Binary(data.to_vec()),
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self.value, ElementValue::Flat)
    }

    pub fn children(&self) -> &[Element] {
        match &self.value {
            ElementValue::Master(children) => children,
            _ => &[],
        }
    }

    ///
    /// Returns the first direct child with the given id.
    ///
    pub fn child(&self, id: u64) -> Option<&Element> {
        self.children().iter().find(|c| c.id == id)
    }

    pub fn as_unsigned_int(&self) -> Option<u64> {
        match self.value {
            ElementValue::UnsignedInt(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            ElementValue::Text(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match &self.value {
            ElementValue::Binary(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.value {
            ElementValue::Block(val) => Some(val),
            _ => None,
        }
    }
}
