pub mod tool {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum ToolError {
        #[error("Unrepresentable Vint size encountered.")]
        ReadVintOverflow,
        #[error("Element id of {0} bytes is longer than the 4 bytes allowed.")]
        ReadIdOverflow(usize),
        #[error("Value too large to be written as a vint: {0}")]
        WriteVintOverflow(u64),
        #[error("Could not read unsigned int from array: {0:?}")]
        ReadU64Overflow(Vec<u8>),
        #[error("Could not read int from array: {0:?}")]
        ReadI64Overflow(Vec<u8>),
        #[error("Could not read float from array: {0:?}")]
        ReadF64Mismatch(Vec<u8>),
        #[error("Could not read date from array: {0:?}")]
        ReadDateMismatch(Vec<u8>),
    }
}

pub mod block {
    use thiserror::Error;

    ///
    /// Problems found while decoding a SimpleBlock or Block payload.
    ///
    /// None of these stop the stream: a block with a broken header is passed through as binary data and a block with broken lacing keeps its header but reports no frames.
    ///
    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum BlockError {
        #[error("Block payload of {0} bytes is too short for a block header.")]
        TruncatedHeader(usize),
        #[error("Block track number is not a valid vint.")]
        InvalidTrackNumber,
        #[error("Block is laced but has no lace count.")]
        MissingLaceCount,
        #[error("Lace sizes are cut off after {parsed} of {expected} entries.")]
        TruncatedLaceSizes { parsed: usize, expected: usize },
        #[error("EBML lacing produced a negative frame size ({0}).")]
        NegativeLaceSize(i64),
        #[error("Lace sizes add up to {declared} bytes but only {available} are present.")]
        LaceSizeOverflow { declared: usize, available: usize },
        #[error("Fixed-size lacing cannot split {available} bytes into {frames} equal frames.")]
        UnevenFixedLacing { available: usize, frames: usize },
    }
}

pub mod element_iterator {
    use std::io;
    use std::string::FromUtf8Error;
    use thiserror::Error;

    use super::tool::ToolError;

    #[derive(Debug, Error)]
    pub enum ElementIteratorError {
        #[error("Error reading from source.")]
        ReadError {
            #[from]
            source: io::Error,
        },
    }

    ///
    /// Corruption that the iterator recovered from.
    ///
    /// These are never returned from the iterator.  They are reported through `tracing` at the point where the iterator skips past the damage.
    ///
    #[derive(Debug, Error)]
    pub enum CorruptedDataError {
        #[error("Stream ended inside element {id:#x} at offset {offset}.")]
        StreamTruncated { id: u64, offset: usize },
        #[error("Unknown element with id {id:#x} at offset {offset}.")]
        UnknownElement { id: u64, offset: usize },
        #[error("Unreadable element header at offset {offset}. {problem}")]
        InvalidHeader { offset: usize, problem: ToolError },
        #[error("Element {id:#x} at offset {offset} has an unknown size and cannot be buffered.")]
        UnknownSize { id: u64, offset: usize },
        #[error("Element {id:#x} at offset {offset} claims {size} bytes, more than the stream holds.")]
        OversizedElement { id: u64, offset: usize, size: usize },
        #[error("Element {id:#x} claims {size} bytes but its parent only has {available} left.")]
        OversizedChild { id: u64, size: usize, available: usize },
        #[error("Element {id:#x} without a size inside a sized parent.")]
        UnsizedChild { id: u64 },
        #[error("Value of element {id:#x} does not match its type. {problem}")]
        ValueMismatch { id: u64, problem: ToolError },
        #[error("Text of element {id:#x} is not valid UTF-8.")]
        InvalidText {
            id: u64,
            #[source]
            source: FromUtf8Error,
        },
    }
}

pub mod markup {
    use std::io;
    use thiserror::Error;

    use super::element_iterator::ElementIteratorError;

    #[derive(Debug, Error)]
    pub enum MarkupError {
        #[error("Error writing to destination.")]
        WriteError {
            #[from]
            source: io::Error,
        },
        #[error(transparent)]
        ReadError(#[from] ElementIteratorError),
    }
}
