use std::io::{ErrorKind, Read};
use std::marker::PhantomData;

use tracing::{debug, warn};

use super::block::{Block, BlockTiming};
use super::element::{Element, ElementValue};
use super::errors::element_iterator::{CorruptedDataError, ElementIteratorError};
use super::specs::{ids, EbmlSpecification, ElementSpec, ElementType, MatroskaSpec};
use super::tools::{self, EBMLSize};
use super::tracks::TrackTable;

const DEFAULT_BUFFER_LEN: usize = 1024 * 64;
const MAX_HEADER_LEN: usize = 4 + 8;
const DEFAULT_MAX_ELEMENT_LEN: usize = 64 * 1024 * 1024;
const DEFAULT_TIMECODE_SCALE: u64 = 1_000_000;

///
/// Stream state that later elements depend on.
///
#[derive(Clone, Debug, PartialEq)]
struct SessionState {
    timecode_scale: u64,
    cluster_timecode: u64,
    tracks: TrackTable,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            timecode_scale: DEFAULT_TIMECODE_SCALE,
            cluster_timecode: 0,
            tracks: TrackTable::default(),
        }
    }
}

impl SessionState {
    fn timing(&self, duration: Option<u64>) -> BlockTiming {
        BlockTiming {
            cluster_timecode: self.cluster_timecode,
            timecode_scale: self.timecode_scale,
            duration,
        }
    }

    fn observe(&mut self, element: &Element) {
        match element.id {
            ids::EBML => check_ebml_header(element),
            ids::INFO => {
                if let Some(scale) = element.child(ids::TIMECODE_SCALE).and_then(Element::as_unsigned_int) {
                    self.timecode_scale = scale;
                }
            },
            ids::TRACKS => self.tracks = TrackTable::from_tracks_element(element),
            ids::CLUSTER => self.cluster_timecode = 0,
            ids::TIMECODE => {
                if let Some(timecode) = element.as_unsigned_int() {
                    self.cluster_timecode = timecode;
                }
            },
            _ => {},
        }
    }
}

fn check_ebml_header(element: &Element) {
    if element.child(ids::EBML_READ_VERSION).and_then(Element::as_unsigned_int).map_or(false, |v| v > 1) {
        warn!("EBMLReadVersion too big");
    }
    if element.child(ids::DOC_TYPE_READ_VERSION).and_then(Element::as_unsigned_int).map_or(false, |v| v > 2) {
        warn!("DocTypeReadVersion too big");
    }
    match element.child(ids::DOC_TYPE).and_then(Element::as_text) {
        Some("matroska") | Some("webm") => {},
        other => warn!("EBML DocType is {:?}, not \"matroska\" or \"webm\"", other),
    }
}

enum Step {
    Element(Element),
    Resync,
    End,
}

///
/// Provides an iterator over EBML files (read from a source implementing the [`std::io::Read`] trait).
/// 
/// The iterator emits one [`Element`] per top-level element of the stream.  Master elements are read completely and carry their children.  Elements the specification marks as [`ElementType::JustGoOn`] (Segment and Cluster for Matroska) are emitted as flat markers, and their children follow as top-level elements.  After damaged data the iterator skips forward to the next Cluster, Segment or Tracks id and carries on.
///
/// SimpleBlock and BlockGroup elements are decoded into [`Block`]s using the timecode scale, cluster timecode and track table seen so far.
///
/// Corrupted data never ends iteration early.  Problems are reported through `tracing` and skipped; a stream that ends in the middle of an element simply ends.  Only errors from the underlying reader are returned.
/// 
/// ## Example
/// 
/// ```no_run
/// use std::fs::File;
/// use matroska_xml::ElementIterator;
/// 
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("my_file.mkv")?;
/// let my_iterator: ElementIterator<_> = ElementIterator::new(file);
/// for element in my_iterator {
///   println!("{}", element?.name);
/// }
/// # Ok(())
/// # }
/// ```
/// 
pub struct ElementIterator<R: Read, TSpec = MatroskaSpec>
    where
    TSpec: EbmlSpecification
{
    source: R,
    buffer: Vec<u8>,
    buffer_offset: usize,
    internal_buffer_position: usize,
    reached_eof: bool,
    finished: bool,
    last_element_offset: usize,
    max_element_len: usize,
    session: SessionState,
    spec: PhantomData<TSpec>,
}

impl<R: Read, TSpec> ElementIterator<R, TSpec>
    where
    TSpec: EbmlSpecification
{

    /// 
    /// Returns a new `ElementIterator<R, TSpec>` instance.
    ///
    pub fn new(source: R) -> Self {
        ElementIterator::with_capacity(source, DEFAULT_BUFFER_LEN)
    }
    
    ///
    /// Returns a new `ElementIterator<R, TSpec>` instance with the specified internal buffer capacity.
    ///
    /// The buffer grows past this capacity when a single top-level element is larger than it.
    ///
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        ElementIterator {
            source,
            buffer: Vec::with_capacity(capacity),
            buffer_offset: 0,
            internal_buffer_position: 0,
            reached_eof: false,
            finished: false,
            last_element_offset: 0,
            max_element_len: DEFAULT_MAX_ELEMENT_LEN,
            session: SessionState::default(),
            spec: PhantomData,
        }
    }

    ///
    /// Sets the largest element body (64 MiB by default) the iterator will buffer.
    ///
    /// A larger declared size is treated as a corrupted header: the element is skipped and the iterator resyncs.
    ///
    pub fn with_max_element_size(mut self, max_element_len: usize) -> Self {
        self.max_element_len = max_element_len;
        self
    }

    ///
    /// Byte offset in the source of the last element emitted.
    ///
    pub fn last_emitted_element_offset(&self) -> usize {
        self.last_element_offset
    }

    ///
    /// Nanoseconds per timecode tick, as declared by the last `Info` element.
    ///
    pub fn timecode_scale(&self) -> u64 {
        self.session.timecode_scale
    }

    ///
    /// Tracks declared by the last `Tracks` element.
    ///
    pub fn tracks(&self) -> &TrackTable {
        &self.session.tracks
    }

    fn current_offset(&self) -> usize {
        self.buffer_offset + self.internal_buffer_position
    }

    fn available(&self) -> &[u8] {
        &self.buffer[self.internal_buffer_position..]
    }

    fn private_read(&mut self) -> Result<(), ElementIteratorError> {
        let start = self.buffer.len();
        self.buffer.resize(start + DEFAULT_BUFFER_LEN, 0);
        let read_result = loop {
            match self.source.read(&mut self.buffer[start..]) {
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match read_result {
            Ok(bytes_read) => {
                self.buffer.truncate(start + bytes_read);
                if bytes_read == 0 {
                    self.reached_eof = true;
                }
                Ok(())
            },
            Err(source) => {
                self.buffer.truncate(start);
                Err(ElementIteratorError::ReadError { source })
            }
        }
    }

    ///
    /// Makes sure `length` unread bytes are buffered.  Returns `false` if the source ends first.
    ///
    fn ensure_data_read(&mut self, length: usize) -> Result<bool, ElementIteratorError> {
        if self.available().len() >= length {
            return Ok(true);
        }

        self.buffer.drain(..self.internal_buffer_position);
        self.buffer_offset += self.internal_buffer_position;
        self.internal_buffer_position = 0;

        while self.buffer.len() < length && !self.reached_eof {
            self.private_read()?;
        }

        Ok(self.buffer.len() >= length)
    }

    fn read_tag_header(&mut self) -> Result<Result<(u64, EBMLSize), CorruptedDataError>, ElementIteratorError> {
        self.ensure_data_read(MAX_HEADER_LEN)?;
        let offset = self.current_offset();

        let (id, id_length) = match tools::read_element_id(self.available()) {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(Err(CorruptedDataError::StreamTruncated { id: 0, offset })),
            Err(problem) => return Ok(Err(CorruptedDataError::InvalidHeader { offset, problem })),
        };

        let (size, size_length) = match tools::read_element_size(&self.available()[id_length..]) {
            Ok(Some(size)) => size,
            Ok(None) => return Ok(Err(CorruptedDataError::StreamTruncated { id, offset })),
            Err(problem) => return Ok(Err(CorruptedDataError::InvalidHeader { offset, problem })),
        };

        self.internal_buffer_position += id_length + size_length;
        Ok(Ok((id, size)))
    }

    fn read_tag_data(&mut self, size: usize) -> Result<Option<&[u8]>, ElementIteratorError> {
        if !self.ensure_data_read(size)? {
            return Ok(None);
        }

        self.internal_buffer_position += size;
        Ok(Some(&self.buffer[(self.internal_buffer_position - size)..self.internal_buffer_position]))
    }

    ///
    /// Skips forward from `tag_start + 1` until the next id the specification allows resyncing on.
    ///
    fn resync(&mut self, tag_start: usize) -> Result<(), ElementIteratorError> {
        debug!("Resyncing after offset {}", tag_start);
        // Filling the buffer for an oversized body may already have dropped the header.
        self.internal_buffer_position = if tag_start >= self.buffer_offset {
            tag_start - self.buffer_offset + 1
        } else {
            0
        };
        let sync_ids = TSpec::sync_ids();
        
        loop {
            if !self.ensure_data_read(4)? {
                self.internal_buffer_position = self.buffer.len();
                return Ok(());
            }

            let candidate = tools::arr_to_u64(&self.available()[..4]).unwrap_or_default();
            if sync_ids.contains(&candidate) {
                debug!("Resynced at offset {} on element {:#x}", self.current_offset(), candidate);
                return Ok(());
            }
            self.internal_buffer_position += 1;
        }
    }

    fn read_next(&mut self) -> Result<Step, ElementIteratorError> {
        if !self.ensure_data_read(1)? {
            return Ok(Step::End);
        }

        let tag_start = self.current_offset();
        let (id, size) = match self.read_tag_header()? {
            Ok(header) => header,
            Err(err @ CorruptedDataError::StreamTruncated { .. }) => {
                debug!("{}", err);
                return Ok(Step::End);
            },
            Err(err) => {
                warn!("{}", err);
                self.resync(tag_start)?;
                return Ok(Step::Resync);
            }
        };

        let spec = match TSpec::get_element(id) {
            Some(spec) => spec,
            None => {
                warn!("{}", CorruptedDataError::UnknownElement { id, offset: tag_start });
                self.resync(tag_start)?;
                return Ok(Step::Resync);
            }
        };

        if spec.data_type == ElementType::JustGoOn {
            self.last_element_offset = tag_start;
            return Ok(Step::Element(Element::new(spec, ElementValue::Flat)));
        }

        let size = match size {
            EBMLSize::Known(size) => size,
            EBMLSize::Unknown => {
                warn!("{}", CorruptedDataError::UnknownSize { id, offset: tag_start });
                self.resync(tag_start)?;
                return Ok(Step::Resync);
            }
        };

        if size > self.max_element_len {
            warn!("{}", CorruptedDataError::OversizedElement { id, offset: tag_start, size });
            self.resync(tag_start)?;
            return Ok(Step::Resync);
        }

        if self.read_tag_data(size)?.is_none() {
            if self.available().is_empty() {
                debug!("{}", CorruptedDataError::StreamTruncated { id, offset: tag_start });
                return Ok(Step::End);
            }
            warn!("{}", CorruptedDataError::OversizedElement { id, offset: tag_start, size });
            self.resync(tag_start)?;
            return Ok(Step::Resync);
        }

        self.last_element_offset = tag_start;
        let data = &self.buffer[(self.internal_buffer_position - size)..self.internal_buffer_position];
        Ok(Step::Element(decode_element::<TSpec>(spec, data, &self.session)))
    }
}

///
/// Decodes the body of an element whose header has already been read.
///
fn decode_element<TSpec: EbmlSpecification>(spec: &'static ElementSpec, data: &[u8], session: &SessionState) -> Element {
    let id = spec.id;
    let value = match spec.data_type {
        ElementType::Master | ElementType::JustGoOn => {
            let children = decode_children::<TSpec>(data, session);
            if id == ids::BLOCK_GROUP {
                return Element::new(spec, ElementValue::Master(decode_block_group(children, session)));
            }
            Ok(ElementValue::Master(children))
        },
        ElementType::UnsignedInt => tools::arr_to_u64(data).map(ElementValue::UnsignedInt)
            .map_err(|problem| CorruptedDataError::ValueMismatch { id, problem }),
        ElementType::Integer => tools::arr_to_i64(data).map(ElementValue::Integer)
            .map_err(|problem| CorruptedDataError::ValueMismatch { id, problem }),
        ElementType::Float => tools::arr_to_f64(data).map(ElementValue::Float)
            .map_err(|problem| CorruptedDataError::ValueMismatch { id, problem }),
        ElementType::Date => tools::arr_to_date(data).map(ElementValue::Date)
            .map_err(|problem| CorruptedDataError::ValueMismatch { id, problem }),
        ElementType::TextAscii | ElementType::TextUtf8 => String::from_utf8(data.to_vec())
            .map(|text| ElementValue::Text(text.trim_end_matches('\0').to_string()))
            .map_err(|source| CorruptedDataError::InvalidText { id, source }),
        ElementType::Binary if id == ids::SIMPLE_BLOCK => {
            Ok(Block::decode_lossy(data, &session.timing(None), &session.tracks)
                .map(ElementValue::Block)
                .unwrap_or_else(|| ElementValue::Binary(data.to_vec())))
        },
        ElementType::Binary => Ok(ElementValue::Binary(data.to_vec())),
    };

    match value {
        Ok(value) => Element::new(spec, value),
        Err(err) => {
            warn!("{}", err);
            Element::new(spec, ElementValue::Binary(data.to_vec()))
        }
    }
}

///
/// Decodes the children packed in a master element's body.
///
/// A child that claims more room than its parent has left, or that has no size, ends the parent: the rest of its body is skipped.
///
fn decode_children<TSpec: EbmlSpecification>(data: &[u8], session: &SessionState) -> Vec<Element> {
    let mut children = Vec::new();
    let mut position = 0;

    while position < data.len() {
        let remaining = &data[position..];
        let header = tools::read_element_id(remaining).and_then(|id| match id {
            Some((id, id_length)) => Ok(tools::read_element_size(&remaining[id_length..])?
                .map(|(size, size_length)| (id, size, id_length + size_length))),
            None => Ok(None),
        });

        let (id, size, header_length) = match header {
            Ok(Some(header)) => header,
            Ok(None) => {
                warn!("Damaged data, skipping {} bytes of truncated element header", remaining.len());
                break;
            },
            Err(problem) => {
                warn!("Damaged data, skipping {} bytes. {}", remaining.len(), problem);
                break;
            }
        };

        let available = remaining.len() - header_length;
        let size = match size {
            EBMLSize::Known(size) if size <= available => size,
            EBMLSize::Known(size) => {
                warn!("{}", CorruptedDataError::OversizedChild { id, size, available });
                break;
            },
            EBMLSize::Unknown => {
                warn!("{}", CorruptedDataError::UnsizedChild { id });
                break;
            }
        };

        let body = &remaining[header_length..header_length + size];
        children.push(match TSpec::get_element(id) {
            Some(spec) => decode_element::<TSpec>(spec, body, session),
            None => Element::unknown(id, body),
        });
        position += header_length + size;
    }

    children
}

///
/// Replaces the binary `Block` of a BlockGroup with its decoded form, using the group's `BlockDuration`.
///
fn decode_block_group(mut children: Vec<Element>, session: &SessionState) -> Vec<Element> {
    let duration = children.iter()
        .find(|c| c.id == ids::BLOCK_DURATION)
        .and_then(Element::as_unsigned_int);
    let timing = session.timing(duration);

    for child in children.iter_mut().filter(|c| c.id == ids::BLOCK) {
        let block = match &child.value {
            ElementValue::Binary(data) => Block::decode_lossy(data, &timing, &session.tracks),
            _ => None,
        };
        if let Some(block) = block {
            child.value = ElementValue::Block(block);
        }
    }

    children
}

impl<R: Read, TSpec> Iterator for ElementIterator<R, TSpec>
    where TSpec: EbmlSpecification
{
    type Item = Result<Element, ElementIteratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.read_next() {
                Ok(Step::Element(element)) => {
                    self.session.observe(&element);
                    return Some(Ok(element));
                },
                Ok(Step::Resync) => continue,
                Ok(Step::End) => self.finished = true,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }

        None
    }
}
