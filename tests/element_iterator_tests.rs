mod mkv_fixture;

pub mod element_iterator_tests {
    use std::io::{self, Read};

    use matroska_xml::element::{Element, ElementValue};
    use matroska_xml::error::ElementIteratorError;
    use matroska_xml::specs::{ids, ElementType};
    use matroska_xml::{ElementIterator, Lacing};

    use super::mkv_fixture::*;

    fn read_all(data: &[u8]) -> Vec<Element> {
        let iter: ElementIterator<_> = ElementIterator::new(data);
        iter.map(|e| e.expect("Reading from memory shouldn't fail")).collect()
    }

    fn names(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(|e| e.name.as_ref()).collect()
    }

    struct OneByteReader<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for OneByteReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }
            if self.data.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[0];
            self.data = &self.data[1..];
            Ok(1)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    pub fn reads_header_master() {
        let elements = read_all(&ebml_header("matroska"));
        assert_eq!(1, elements.len());

        let header = &elements[0];
        assert_eq!("EBML", header.name);
        assert_eq!(ElementType::Master, header.data_type);
        assert_eq!(vec!["EBMLVersion", "EBMLReadVersion", "DocType", "DocTypeReadVersion"], names(header.children()));
        assert_eq!(Some("matroska"), header.child(ids::DOC_TYPE).and_then(Element::as_text));
    }

    #[test]
    pub fn segment_and_cluster_are_flat() {
        let elements = read_all(&single_block_stream());
        assert_eq!(vec!["Segment", "Info", "Cluster", "Timecode", "SimpleBlock"], names(&elements));
        assert!(elements[0].is_flat());
        assert!(elements[2].is_flat());
        assert!(!elements[1].is_flat());
    }

    #[test]
    pub fn sized_segment_is_flat_too() {
        let data = [
            element(ids::SEGMENT, &[info(1_000_000), uint(ids::TIMECODE, 3)].concat()),
        ].concat();
        assert_eq!(vec!["Segment", "Info", "Timecode"], names(&read_all(&data)));
    }

    #[test]
    pub fn simple_block_timestamp() {
        let elements = read_all(&single_block_stream());
        let block = elements[4].as_block().expect("SimpleBlock should be decoded");
        assert_eq!(1, block.track);
        assert_eq!(1.0, block.timestamp);
        assert_eq!(None, block.duration);
        assert!(block.keyframe);
        assert_eq!(vec![vec![0x01, 0x02]], block.frames);
    }

    #[test]
    pub fn timecode_scale_changes_timestamps() {
        let data = [
            unknown_size(ids::SEGMENT),
            info(500_000),
            unknown_size(ids::CLUSTER),
            uint(ids::TIMECODE, 4000),
            simple_block(1, -2000, 0, &[0x00]),
        ].concat();
        let mut iter: ElementIterator<_> = ElementIterator::new(&data[..]);
        let last = iter.by_ref().last().expect("Stream isn't empty").expect("Reading from memory shouldn't fail");
        assert_eq!(1.0, last.as_block().expect("SimpleBlock should be decoded").timestamp);
        assert_eq!(500_000, iter.timecode_scale());
    }

    #[test]
    pub fn new_cluster_resets_timecode() {
        let data = [
            unknown_size(ids::SEGMENT),
            unknown_size(ids::CLUSTER),
            uint(ids::TIMECODE, 1000),
            unknown_size(ids::CLUSTER),
            simple_block(1, 0, 0, &[0x00]),
        ].concat();
        let elements = read_all(&data);
        assert_eq!(0.0, elements[4].as_block().expect("SimpleBlock should be decoded").timestamp);
    }

    #[test]
    pub fn block_group_duration() {
        let data = [
            unknown_size(ids::CLUSTER),
            uint(ids::TIMECODE, 0),
            block_group(2, 10, 40, &[0xaa, 0xbb]),
        ].concat();
        let elements = read_all(&data);
        let group = &elements[2];
        assert_eq!(vec!["Block", "BlockDuration"], names(group.children()));

        let block = group.child(ids::BLOCK).and_then(Element::as_block).expect("Block should be decoded");
        assert_eq!(2, block.track);
        assert_eq!(0.01, block.timestamp);
        assert_eq!(Some(0.04), block.duration);
        assert!(!block.keyframe);
    }

    #[test]
    pub fn laced_frames_share_attributes() {
        let payload = [vec![0x02, 0x02, 0x03], vec![0x11; 2], vec![0x22; 3], vec![0x33; 4]].concat();
        let data = [
            unknown_size(ids::CLUSTER),
            uint(ids::TIMECODE, 0),
            simple_block(1, 0, 0x82, &payload),
        ].concat();
        let elements = read_all(&data);
        let block = elements[2].as_block().expect("SimpleBlock should be decoded");
        assert_eq!(Lacing::Xiph, block.lacing);

        let frames: Vec<_> = block.frames().collect();
        assert_eq!(3, frames.len());
        assert_eq!(&[0x11, 0x11][..], frames[0].data);
        assert_eq!(&[0x33; 4][..], frames[2].data);
        assert!(frames[0].more_laced_frames);
        assert!(frames[1].more_laced_frames);
        assert!(!frames[2].more_laced_frames);
        assert!(frames.iter().all(|f| f.track == 1 && f.keyframe && f.timestamp == 0.0));
    }

    #[test]
    pub fn header_removal_restores_frames() {
        let data = [
            unknown_size(ids::SEGMENT),
            master(ids::TRACKS, &[track_entry(1, "V_MPEG4/ISO/AVC", &[header_removal(&[0x00, 0x00, 0x01])])]),
            unknown_size(ids::CLUSTER),
            simple_block(1, 0, 0x80, &[0x65]),
        ].concat();
        let mut iter: ElementIterator<_> = ElementIterator::new(&data[..]);
        let elements: Vec<_> = iter.by_ref().map(|e| e.expect("Reading from memory shouldn't fail")).collect();

        assert_eq!(1, iter.tracks().len());
        assert_eq!(Some(&[0x00, 0x00, 0x01][..]), iter.tracks().header_removal(1));
        let block = elements[3].as_block().expect("SimpleBlock should be decoded");
        assert_eq!(vec![vec![0x00, 0x00, 0x01, 0x65]], block.frames);
    }

    #[test]
    pub fn value_types() {
        let data = master(ids::INFO, &[
            float(DURATION, 1234.5),
            uint(DATE_UTC, 0),
            element(DATE_UTC, &1_000_000_000i64.to_be_bytes()),
            text(TITLE, "Title\0\0"),
        ]);
        let elements = read_all(&data);
        let values: Vec<_> = elements[0].children().iter().map(|c| c.value.clone()).collect();
        assert_eq!(vec![
            ElementValue::Float(1234.5),
            ElementValue::Binary(vec![0x00]),
            ElementValue::Date(1_000_000_000),
            ElementValue::Text(String::from("Title")),
        ], values);
    }

    #[test]
    pub fn survives_short_and_interrupted_reads() {
        let data = single_block_stream();
        let reader = OneByteReader { data: &data, interrupt: false };
        let iter: ElementIterator<_> = ElementIterator::with_capacity(reader, 4);
        let elements: Vec<_> = iter.map(|e| e.expect("Interrupted reads should be retried")).collect();
        assert_eq!(vec!["Segment", "Info", "Cluster", "Timecode", "SimpleBlock"], names(&elements));
    }

    #[test]
    pub fn reader_error_is_returned_once() {
        let mut iter: ElementIterator<_> = ElementIterator::new(FailingReader);
        assert!(matches!(iter.next(), Some(Err(ElementIteratorError::ReadError { .. }))));
        assert!(iter.next().is_none());
    }

    #[test]
    pub fn reports_element_offsets() {
        let data = single_block_stream();
        let mut iter: ElementIterator<_> = ElementIterator::new(&data[..]);
        let mut offsets = Vec::new();
        while let Some(element) = iter.next() {
            element.expect("Reading from memory shouldn't fail");
            offsets.push(iter.last_emitted_element_offset());
        }
        // Segment and Cluster headers are 12 bytes, Info is 12 and Timecode 4
        assert_eq!(vec![0, 12, 24, 36, 40], offsets);
    }

    #[test]
    pub fn empty_stream() {
        assert!(read_all(&[]).is_empty());
    }
}
