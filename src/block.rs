//!
//! Decoding of SimpleBlock and Block payloads into frames.
//!

use tracing::warn;

use super::errors::block::BlockError;
use super::tools;
use super::tracks::TrackTable;

const FLAG_KEYFRAME: u8 = 0x80;
const FLAG_INVISIBLE: u8 = 0x08;
const FLAG_DISCARDABLE: u8 = 0x01;
const LACING_MASK: u8 = 0x06;

///
/// How the frames of a block are packed into its payload.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Lacing {
    None,
    Xiph,
    FixedSize,
    Ebml,
}

impl Lacing {
    pub fn from_flags(flags: u8) -> Self {
        match flags & LACING_MASK {
            0x02 => Lacing::Xiph,
            0x04 => Lacing::FixedSize,
            0x06 => Lacing::Ebml,
            _ => Lacing::None,
        }
    }
}

///
/// Stream state needed to turn block-relative timecodes into seconds.
///
/// All values are in unscaled ticks as they appear in the file.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockTiming {
    pub cluster_timecode: u64,
    pub timecode_scale: u64,

    ///
    /// `BlockDuration` of the enclosing BlockGroup, if any.
    ///
    pub duration: Option<u64>,
}

impl BlockTiming {
    fn to_seconds(&self, ticks: f64) -> f64 {
        ticks * self.timecode_scale as f64 / 1_000_000_000.0
    }
}

///
/// A decoded SimpleBlock or Block.
///
/// Every frame shares the track, timestamp, duration and flags of the block.  A block whose lacing could not be decoded has no frames.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub track: u64,
    pub relative_timecode: i16,

    ///
    /// Absolute timestamp in seconds.
    ///
    pub timestamp: f64,

    ///
    /// Duration in seconds, only known for blocks inside a BlockGroup.
    ///
    pub duration: Option<f64>,
    pub keyframe: bool,
    pub invisible: bool,
    pub discardable: bool,
    pub lacing: Lacing,
    pub frames: Vec<Vec<u8>>,
}

///
/// One frame of a [`Block`] along with the block's shared attributes.
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub track: u64,
    pub timestamp: f64,
    pub data: &'a [u8],
    pub more_laced_frames: bool,
    pub duration: Option<f64>,
    pub keyframe: bool,
    pub invisible: bool,
    pub discardable: bool,
}

struct BlockHeader {
    track: u64,
    relative_timecode: i16,
    flags: u8,
    length: usize,
}

fn read_header(payload: &[u8]) -> Result<BlockHeader, BlockError> {
    let (track, track_length) = match tools::read_vint(payload) {
        Ok(Some(value)) => value,
        Ok(None) => return Err(BlockError::TruncatedHeader(payload.len())),
        Err(_) => return Err(BlockError::InvalidTrackNumber),
    };

    if payload.len() < track_length + 3 {
        return Err(BlockError::TruncatedHeader(payload.len()));
    }

    Ok(BlockHeader {
        track,
        relative_timecode: i16::from_be_bytes([payload[track_length], payload[track_length + 1]]),
        flags: payload[track_length + 2],
        length: track_length + 3,
    })
}

impl Block {
    ///
    /// Decodes a block payload.
    ///
    /// Frames of tracks using header stripping get the track's stripped bytes put back in front of them.
    ///
    /// # Errors
    ///
    /// Returns a [`BlockError`] if either the block header or its lacing is malformed.
    ///
    pub fn decode(payload: &[u8], timing: &BlockTiming, tracks: &TrackTable) -> Result<Block, BlockError> {
        let (mut block, header_length) = Block::decode_header(payload, timing)?;
        let prefix = tracks.header_removal(block.track);
        block.frames = split_laces(block.lacing, &payload[header_length..])?
            .into_iter()
            .map(|frame| match prefix {
                Some(prefix) => [prefix, frame].concat(),
                None => frame.to_vec(),
            })
            .collect();
        Ok(block)
    }

    ///
    /// Decodes a block payload, reporting problems instead of returning them.
    ///
    /// Returns `None` when the block header itself is unreadable.  When only the lacing is broken, the block is returned without frames.
    ///
    pub fn decode_lossy(payload: &[u8], timing: &BlockTiming, tracks: &TrackTable) -> Option<Block> {
        match Block::decode(payload, timing, tracks) {
            Ok(block) => Some(block),
            Err(err) => {
                warn!("Dropping frames of malformed block: {}", err);
                Block::decode_header(payload, timing).ok().map(|(block, _)| block)
            }
        }
    }

    fn decode_header(payload: &[u8], timing: &BlockTiming) -> Result<(Block, usize), BlockError> {
        let header = read_header(payload)?;
        let timecode = timing.cluster_timecode as f64 + header.relative_timecode as f64;

        let block = Block {
            track: header.track,
            relative_timecode: header.relative_timecode,
            timestamp: timing.to_seconds(timecode),
            duration: timing.duration.map(|d| timing.to_seconds(d as f64)),
            keyframe: header.flags & FLAG_KEYFRAME != 0,
            invisible: header.flags & FLAG_INVISIBLE != 0,
            discardable: header.flags & FLAG_DISCARDABLE != 0,
            lacing: Lacing::from_flags(header.flags),
            frames: Vec::new(),
        };
        Ok((block, header.length))
    }

    ///
    /// Iterates over the frames of the block.  `more_laced_frames` is set on all but the last one.
    ///
    pub fn frames(&self) -> impl Iterator<Item = Frame<'_>> + '_ {
        let count = self.frames.len();
        self.frames.iter().enumerate().map(move |(index, data)| Frame {
            track: self.track,
            timestamp: self.timestamp,
            data,
            more_laced_frames: index + 1 < count,
            duration: self.duration,
            keyframe: self.keyframe,
            invisible: self.invisible,
            discardable: self.discardable,
        })
    }
}

///
/// Splits the data following a block header into frames.
///
/// `data` starts at the lace count byte for laced blocks, or at the frame itself when there is no lacing.  The size of the last frame is never stored; it takes whatever the other frames leave.
///
/// # Errors
///
/// Returns a [`BlockError`] if the lace sizes cannot be read or do not fit in `data`.
///
pub fn split_laces(lacing: Lacing, data: &[u8]) -> Result<Vec<&[u8]>, BlockError> {
    if lacing == Lacing::None {
        return Ok(vec![data]);
    }

    let (&count, data) = data.split_first().ok_or(BlockError::MissingLaceCount)?;
    let count = count as usize + 1;

    let (sizes, body) = match lacing {
        Lacing::Xiph => read_xiph_sizes(data, count)?,
        Lacing::Ebml => read_ebml_sizes(data, count)?,
        Lacing::FixedSize => {
            if data.len() % count != 0 {
                return Err(BlockError::UnevenFixedLacing { available: data.len(), frames: count });
            }
            (vec![data.len() / count; count - 1], data)
        },
        Lacing::None => unreachable!("unlaced blocks return early"),
    };

    let declared: usize = sizes.iter().sum();
    if declared > body.len() {
        return Err(BlockError::LaceSizeOverflow { declared, available: body.len() });
    }

    let mut frames = Vec::with_capacity(count);
    let mut position = 0;
    for size in sizes {
        frames.push(&body[position..position + size]);
        position += size;
    }
    frames.push(&body[position..]);

    Ok(frames)
}

fn read_xiph_sizes(data: &[u8], count: usize) -> Result<(Vec<usize>, &[u8]), BlockError> {
    let expected = count - 1;
    let mut sizes = Vec::with_capacity(expected);
    let mut position = 0;

    while sizes.len() < expected {
        let mut size = 0usize;
        loop {
            let byte = *data.get(position).ok_or(BlockError::TruncatedLaceSizes { parsed: sizes.len(), expected })? as usize;
            position += 1;
            size += byte;
            if byte < 255 {
                break;
            }
        }
        sizes.push(size);
    }

    Ok((sizes, &data[position..]))
}

fn read_ebml_sizes(data: &[u8], count: usize) -> Result<(Vec<usize>, &[u8]), BlockError> {
    let expected = count - 1;
    let mut sizes = Vec::with_capacity(expected);
    let mut position = 0;
    let mut previous = 0i64;

    while sizes.len() < expected {
        let (raw, length) = match tools::read_vint(&data[position..]) {
            Ok(Some(value)) => value,
            _ => return Err(BlockError::TruncatedLaceSizes { parsed: sizes.len(), expected }),
        };
        position += length;

        let size = if sizes.is_empty() {
            raw as i64
        } else {
            // Later sizes are differences to the previous one, stored with a bias of half the vint range.
            previous + (raw as i64 - ((1i64 << (7 * length - 1)) - 1))
        };

        if size < 0 {
            return Err(BlockError::NegativeLaceSize(size));
        }
        sizes.push(size as usize);
        previous = size;
    }

    Ok((sizes, &data[position..]))
}
