//! This crate provides the element schema that is used by the matroska-xml crate.
//!
//! The schema is a static, read-only table keyed by element id.  It is never mutated after
//! initialization, so lookups can be shared freely.
//!

///
/// Contains the Matroska element table and the ids the parser needs to recognize.
///
pub mod matroska;

pub use matroska::MatroskaSpec;

///
/// Different data types defined in the EBML specification.
///
/// # Notes
///
/// `JustGoOn` is not an EBML type.  It marks master elements (Segment and Cluster) whose
/// children are reported as if they were siblings, so that a damaged boundary never hides
/// the rest of the stream.
///
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ElementType {
    Master,
    UnsignedInt,
    Integer,
    Float,
    TextAscii,
    TextUtf8,
    Binary,
    Date,
    JustGoOn,
}

///
/// One entry of a specification table.
///
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElementSpec {
    pub id: u64,
    pub name: &'static str,
    pub data_type: ElementType,
}

impl ElementSpec {
    pub const fn new(id: u64, name: &'static str, data_type: ElementType) -> Self {
        ElementSpec { id, name, data_type }
    }
}

///
/// This trait should be implemented to define a specification so that EBML can be parsed correctly.
///
/// Any format built on EBML can be read by the `ElementIterator` as long as it has a type implementing this trait.  [`MatroskaSpec`] is the implementation used for Matroska and WebM files.
///
pub trait EbmlSpecification {
    ///
    /// Pulls the schema entry for an element, based on the element id.
    ///
    /// This function *must* return [`None`] if the input id is not in the specification.
    ///
    fn get_element(id: u64) -> Option<&'static ElementSpec>;

    ///
    /// Ids that the parser may resynchronize on after corrupted data.
    ///
    /// Every id returned here should be 4 bytes long.  The default implementation returns an empty slice, which disables resynchronization.
    ///
    fn sync_ids() -> &'static [u64] {
        &[]
    }
}
