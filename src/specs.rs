//!
//! Provides the EBML specification types.
//!
//! Typically won't be used unless you are implementing a custom specification that uses EBML.
//!

pub use matroska_xml_specification::EbmlSpecification as EbmlSpecification;
pub use matroska_xml_specification::ElementSpec as ElementSpec;
pub use matroska_xml_specification::ElementType as ElementType;
pub use matroska_xml_specification::MatroskaSpec as MatroskaSpec;
pub use matroska_xml_specification::matroska::ids as ids;
