use std::collections::HashMap;
use std::sync::OnceLock;

use super::{EbmlSpecification, ElementSpec, ElementType};
use super::ElementType::{Binary, Date, Float, Integer, JustGoOn, Master, TextAscii, TextUtf8, UnsignedInt};

///
/// Ids of the elements that get special treatment while parsing or reconstructing.
///
pub mod ids {
    pub const EBML: u64 = 0x1A45DFA3;
    pub const EBML_READ_VERSION: u64 = 0x42F7;
    pub const DOC_TYPE: u64 = 0x4282;
    pub const DOC_TYPE_READ_VERSION: u64 = 0x4285;

    pub const SEGMENT: u64 = 0x18538067;
    pub const INFO: u64 = 0x1549A966;
    pub const TIMECODE_SCALE: u64 = 0x2AD7B1;

    pub const TRACKS: u64 = 0x1654AE6B;
    pub const TRACK_ENTRY: u64 = 0xAE;
    pub const TRACK_NUMBER: u64 = 0xD7;
    pub const CODEC_ID: u64 = 0x86;
    pub const CODEC_PRIVATE: u64 = 0x63A2;
    pub const CONTENT_ENCODINGS: u64 = 0x6D80;
    pub const CONTENT_ENCODING: u64 = 0x6240;
    pub const CONTENT_ENCODING_SCOPE: u64 = 0x5032;
    pub const CONTENT_COMPRESSION: u64 = 0x5034;
    pub const CONTENT_COMP_ALGO: u64 = 0x4254;
    pub const CONTENT_COMP_SETTINGS: u64 = 0x4255;

    pub const CLUSTER: u64 = 0x1F43B675;
    pub const TIMECODE: u64 = 0xE7;
    pub const SIMPLE_BLOCK: u64 = 0xA3;
    pub const BLOCK_GROUP: u64 = 0xA0;
    pub const BLOCK: u64 = 0xA1;
    pub const BLOCK_DURATION: u64 = 0x9B;
}

///
/// Matroska (and WebM) specification, including the EBML header and global elements.
///
/// Names follow the element names used by `mkvinfo` at the time timestamps were still called timecodes.
///
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MatroskaSpec;

impl EbmlSpecification for MatroskaSpec {
    fn get_element(id: u64) -> Option<&'static ElementSpec> {
        index().get(&id).copied()
    }

    fn sync_ids() -> &'static [u64] {
        &[ids::CLUSTER, ids::SEGMENT, ids::TRACKS]
    }
}

fn index() -> &'static HashMap<u64, &'static ElementSpec> {
    static INDEX: OnceLock<HashMap<u64, &'static ElementSpec>> = OnceLock::new();
    INDEX.get_or_init(|| MATROSKA_ELEMENTS.iter().map(|e| (e.id, e)).collect())
}

///
/// Every element known to [`MatroskaSpec`], grouped by parent.
///
pub static MATROSKA_ELEMENTS: &[ElementSpec] = &[
    // EBML header
    ElementSpec::new(0x1A45DFA3, "EBML", Master),
    ElementSpec::new(0x4286, "EBMLVersion", UnsignedInt),
    ElementSpec::new(0x42F7, "EBMLReadVersion", UnsignedInt),
    ElementSpec::new(0x42F2, "EBMLMaxIDLength", UnsignedInt),
    ElementSpec::new(0x42F3, "EBMLMaxSizeLength", UnsignedInt),
    ElementSpec::new(0x4282, "DocType", TextAscii),
    ElementSpec::new(0x4287, "DocTypeVersion", UnsignedInt),
    ElementSpec::new(0x4285, "DocTypeReadVersion", UnsignedInt),

    // Global
    ElementSpec::new(0xEC, "Void", Binary),
    ElementSpec::new(0xBF, "CRC-32", Binary),
    ElementSpec::new(0x1B538667, "SignatureSlot", Master),
    ElementSpec::new(0x7E8A, "SignatureAlgo", UnsignedInt),
    ElementSpec::new(0x7E9A, "SignatureHash", UnsignedInt),
    ElementSpec::new(0x7EA5, "SignaturePublicKey", Binary),
    ElementSpec::new(0x7EB5, "Signature", Binary),
    ElementSpec::new(0x7E5B, "SignatureElements", Master),
    ElementSpec::new(0x7E7B, "SignatureElementList", Master),
    ElementSpec::new(0x6532, "SignedElement", Binary),

    ElementSpec::new(0x18538067, "Segment", JustGoOn),

    // Meta seek
    ElementSpec::new(0x114D9B74, "SeekHead", Master),
    ElementSpec::new(0x4DBB, "Seek", Master),
    ElementSpec::new(0x53AB, "SeekID", Binary),
    ElementSpec::new(0x53AC, "SeekPosition", UnsignedInt),

    // Segment information
    ElementSpec::new(0x1549A966, "Info", Master),
    ElementSpec::new(0x73A4, "SegmentUID", Binary),
    ElementSpec::new(0x7384, "SegmentFilename", TextUtf8),
    ElementSpec::new(0x3CB923, "PrevUID", Binary),
    ElementSpec::new(0x3C83AB, "PrevFilename", TextUtf8),
    ElementSpec::new(0x3EB923, "NextUID", Binary),
    ElementSpec::new(0x3E83BB, "NextFilename", TextUtf8),
    ElementSpec::new(0x4444, "SegmentFamily", Binary),
    ElementSpec::new(0x6924, "ChapterTranslate", Master),
    ElementSpec::new(0x69FC, "ChapterTranslateEditionUID", UnsignedInt),
    ElementSpec::new(0x69BF, "ChapterTranslateCodec", UnsignedInt),
    ElementSpec::new(0x69A5, "ChapterTranslateID", Binary),
    ElementSpec::new(0x2AD7B1, "TimecodeScale", UnsignedInt),
    ElementSpec::new(0x4489, "Duration", Float),
    ElementSpec::new(0x4461, "DateUTC", Date),
    ElementSpec::new(0x7BA9, "Title", TextUtf8),
    ElementSpec::new(0x4D80, "MuxingApp", TextUtf8),
    ElementSpec::new(0x5741, "WritingApp", TextUtf8),

    // Cluster
    ElementSpec::new(0x1F43B675, "Cluster", JustGoOn),
    ElementSpec::new(0xE7, "Timecode", UnsignedInt),
    ElementSpec::new(0x5854, "SilentTracks", Master),
    ElementSpec::new(0x58D7, "SilentTrackNumber", UnsignedInt),
    ElementSpec::new(0xA7, "Position", UnsignedInt),
    ElementSpec::new(0xAB, "PrevSize", UnsignedInt),
    ElementSpec::new(0xA3, "SimpleBlock", Binary),
    ElementSpec::new(0xA0, "BlockGroup", Master),
    ElementSpec::new(0xA1, "Block", Binary),
    ElementSpec::new(0xA2, "BlockVirtual", Binary),
    ElementSpec::new(0x75A1, "BlockAdditions", Master),
    ElementSpec::new(0xA6, "BlockMore", Master),
    ElementSpec::new(0xEE, "BlockAddID", UnsignedInt),
    ElementSpec::new(0xA5, "BlockAdditional", Binary),
    ElementSpec::new(0x9B, "BlockDuration", UnsignedInt),
    ElementSpec::new(0xFA, "ReferencePriority", UnsignedInt),
    ElementSpec::new(0xFB, "ReferenceBlock", Integer),
    ElementSpec::new(0xFD, "ReferenceVirtual", Integer),
    ElementSpec::new(0xA4, "CodecState", Binary),
    ElementSpec::new(0x75A2, "DiscardPadding", Integer),
    ElementSpec::new(0x8E, "Slices", Master),
    ElementSpec::new(0xE8, "TimeSlice", Master),
    ElementSpec::new(0xCC, "LaceNumber", UnsignedInt),
    ElementSpec::new(0xCD, "FrameNumber", UnsignedInt),
    ElementSpec::new(0xCB, "BlockAdditionID", UnsignedInt),
    ElementSpec::new(0xCE, "Delay", UnsignedInt),
    ElementSpec::new(0xCF, "SliceDuration", UnsignedInt),
    ElementSpec::new(0xC8, "ReferenceFrame", Master),
    ElementSpec::new(0xC9, "ReferenceOffset", UnsignedInt),
    ElementSpec::new(0xCA, "ReferenceTimeCode", UnsignedInt),
    ElementSpec::new(0xAF, "EncryptedBlock", Binary),

    // Track
    ElementSpec::new(0x1654AE6B, "Tracks", Master),
    ElementSpec::new(0xAE, "TrackEntry", Master),
    ElementSpec::new(0xD7, "TrackNumber", UnsignedInt),
    ElementSpec::new(0x73C5, "TrackUID", UnsignedInt),
    ElementSpec::new(0x83, "TrackType", UnsignedInt),
    ElementSpec::new(0xB9, "FlagEnabled", UnsignedInt),
    ElementSpec::new(0x88, "FlagDefault", UnsignedInt),
    ElementSpec::new(0x55AA, "FlagForced", UnsignedInt),
    ElementSpec::new(0x9C, "FlagLacing", UnsignedInt),
    ElementSpec::new(0x6DE7, "MinCache", UnsignedInt),
    ElementSpec::new(0x6DF8, "MaxCache", UnsignedInt),
    ElementSpec::new(0x23E383, "DefaultDuration", UnsignedInt),
    ElementSpec::new(0x234E7A, "DefaultDecodedFieldDuration", UnsignedInt),
    ElementSpec::new(0x23314F, "TrackTimecodeScale", Float),
    ElementSpec::new(0x537F, "TrackOffset", Integer),
    ElementSpec::new(0x55EE, "MaxBlockAdditionID", UnsignedInt),
    ElementSpec::new(0x536E, "Name", TextUtf8),
    ElementSpec::new(0x22B59C, "Language", TextAscii),
    ElementSpec::new(0x86, "CodecID", TextAscii),
    ElementSpec::new(0x63A2, "CodecPrivate", Binary),
    ElementSpec::new(0x258688, "CodecName", TextUtf8),
    ElementSpec::new(0x7446, "AttachmentLink", UnsignedInt),
    ElementSpec::new(0x3A9697, "CodecSettings", TextUtf8),
    ElementSpec::new(0x3B4040, "CodecInfoURL", TextAscii),
    ElementSpec::new(0x26B240, "CodecDownloadURL", TextAscii),
    ElementSpec::new(0xAA, "CodecDecodeAll", UnsignedInt),
    ElementSpec::new(0x6FAB, "TrackOverlay", UnsignedInt),
    ElementSpec::new(0x56AA, "CodecDelay", UnsignedInt),
    ElementSpec::new(0x56BB, "SeekPreRoll", UnsignedInt),
    ElementSpec::new(0x6624, "TrackTranslate", Master),
    ElementSpec::new(0x66FC, "TrackTranslateEditionUID", UnsignedInt),
    ElementSpec::new(0x66BF, "TrackTranslateCodec", UnsignedInt),
    ElementSpec::new(0x66A5, "TrackTranslateTrackID", Binary),

    // Video
    ElementSpec::new(0xE0, "Video", Master),
    ElementSpec::new(0x9A, "FlagInterlaced", UnsignedInt),
    ElementSpec::new(0x9D, "FieldOrder", UnsignedInt),
    ElementSpec::new(0x53B8, "StereoMode", UnsignedInt),
    ElementSpec::new(0x53C0, "AlphaMode", UnsignedInt),
    ElementSpec::new(0x53B9, "OldStereoMode", UnsignedInt),
    ElementSpec::new(0xB0, "PixelWidth", UnsignedInt),
    ElementSpec::new(0xBA, "PixelHeight", UnsignedInt),
    ElementSpec::new(0x54AA, "PixelCropBottom", UnsignedInt),
    ElementSpec::new(0x54BB, "PixelCropTop", UnsignedInt),
    ElementSpec::new(0x54CC, "PixelCropLeft", UnsignedInt),
    ElementSpec::new(0x54DD, "PixelCropRight", UnsignedInt),
    ElementSpec::new(0x54B0, "DisplayWidth", UnsignedInt),
    ElementSpec::new(0x54BA, "DisplayHeight", UnsignedInt),
    ElementSpec::new(0x54B2, "DisplayUnit", UnsignedInt),
    ElementSpec::new(0x54B3, "AspectRatioType", UnsignedInt),
    ElementSpec::new(0x2EB524, "ColourSpace", Binary),
    ElementSpec::new(0x2FB523, "GammaValue", Float),
    ElementSpec::new(0x2383E3, "FrameRate", Float),
    ElementSpec::new(0x55B0, "Colour", Master),
    ElementSpec::new(0x55B1, "MatrixCoefficients", UnsignedInt),
    ElementSpec::new(0x55B2, "BitsPerChannel", UnsignedInt),
    ElementSpec::new(0x55B3, "ChromaSubsamplingHorz", UnsignedInt),
    ElementSpec::new(0x55B4, "ChromaSubsamplingVert", UnsignedInt),
    ElementSpec::new(0x55B5, "CbSubsamplingHorz", UnsignedInt),
    ElementSpec::new(0x55B6, "CbSubsamplingVert", UnsignedInt),
    ElementSpec::new(0x55B7, "ChromaSitingHorz", UnsignedInt),
    ElementSpec::new(0x55B8, "ChromaSitingVert", UnsignedInt),
    ElementSpec::new(0x55B9, "Range", UnsignedInt),
    ElementSpec::new(0x55BA, "TransferCharacteristics", UnsignedInt),
    ElementSpec::new(0x55BB, "Primaries", UnsignedInt),
    ElementSpec::new(0x55BC, "MaxCLL", UnsignedInt),
    ElementSpec::new(0x55BD, "MaxFALL", UnsignedInt),
    ElementSpec::new(0x55D0, "MasteringMetadata", Master),
    ElementSpec::new(0x55D1, "PrimaryRChromaticityX", Float),
    ElementSpec::new(0x55D2, "PrimaryRChromaticityY", Float),
    ElementSpec::new(0x55D3, "PrimaryGChromaticityX", Float),
    ElementSpec::new(0x55D4, "PrimaryGChromaticityY", Float),
    ElementSpec::new(0x55D5, "PrimaryBChromaticityX", Float),
    ElementSpec::new(0x55D6, "PrimaryBChromaticityY", Float),
    ElementSpec::new(0x55D7, "WhitePointChromaticityX", Float),
    ElementSpec::new(0x55D8, "WhitePointChromaticityY", Float),
    ElementSpec::new(0x55D9, "LuminanceMax", Float),
    ElementSpec::new(0x55DA, "LuminanceMin", Float),

    // Audio
    ElementSpec::new(0xE1, "Audio", Master),
    ElementSpec::new(0xB5, "SamplingFrequency", Float),
    ElementSpec::new(0x78B5, "OutputSamplingFrequency", Float),
    ElementSpec::new(0x9F, "Channels", UnsignedInt),
    ElementSpec::new(0x7D7B, "ChannelPositions", Binary),
    ElementSpec::new(0x6264, "BitDepth", UnsignedInt),

    // Track operations
    ElementSpec::new(0xE2, "TrackOperation", Master),
    ElementSpec::new(0xE3, "TrackCombinePlanes", Master),
    ElementSpec::new(0xE4, "TrackPlane", Master),
    ElementSpec::new(0xE5, "TrackPlaneUID", UnsignedInt),
    ElementSpec::new(0xE6, "TrackPlaneType", UnsignedInt),
    ElementSpec::new(0xE9, "TrackJoinBlocks", Master),
    ElementSpec::new(0xED, "TrackJoinUID", UnsignedInt),

    // Content encoding
    ElementSpec::new(0x6D80, "ContentEncodings", Master),
    ElementSpec::new(0x6240, "ContentEncoding", Master),
    ElementSpec::new(0x5031, "ContentEncodingOrder", UnsignedInt),
    ElementSpec::new(0x5032, "ContentEncodingScope", UnsignedInt),
    ElementSpec::new(0x5033, "ContentEncodingType", UnsignedInt),
    ElementSpec::new(0x5034, "ContentCompression", Master),
    ElementSpec::new(0x4254, "ContentCompAlgo", UnsignedInt),
    ElementSpec::new(0x4255, "ContentCompSettings", Binary),
    ElementSpec::new(0x5035, "ContentEncryption", Master),
    ElementSpec::new(0x47E1, "ContentEncAlgo", UnsignedInt),
    ElementSpec::new(0x47E2, "ContentEncKeyID", Binary),
    ElementSpec::new(0x47E3, "ContentSignature", Binary),
    ElementSpec::new(0x47E4, "ContentSigKeyID", Binary),
    ElementSpec::new(0x47E5, "ContentSigAlgo", UnsignedInt),
    ElementSpec::new(0x47E6, "ContentSigHashAlgo", UnsignedInt),

    // Cueing data
    ElementSpec::new(0x1C53BB6B, "Cues", Master),
    ElementSpec::new(0xBB, "CuePoint", Master),
    ElementSpec::new(0xB3, "CueTime", UnsignedInt),
    ElementSpec::new(0xB7, "CueTrackPositions", Master),
    ElementSpec::new(0xF7, "CueTrack", UnsignedInt),
    ElementSpec::new(0xF1, "CueClusterPosition", UnsignedInt),
    ElementSpec::new(0xF0, "CueRelativePosition", UnsignedInt),
    ElementSpec::new(0xB2, "CueDuration", UnsignedInt),
    ElementSpec::new(0x5378, "CueBlockNumber", UnsignedInt),
    ElementSpec::new(0xEA, "CueCodecState", UnsignedInt),
    ElementSpec::new(0xDB, "CueReference", Master),
    ElementSpec::new(0x96, "CueRefTime", UnsignedInt),
    ElementSpec::new(0x97, "CueRefCluster", UnsignedInt),
    ElementSpec::new(0x535F, "CueRefNumber", UnsignedInt),
    ElementSpec::new(0xEB, "CueRefCodecState", UnsignedInt),

    // Attachments
    ElementSpec::new(0x1941A469, "Attachments", Master),
    ElementSpec::new(0x61A7, "AttachedFile", Master),
    ElementSpec::new(0x467E, "FileDescription", TextUtf8),
    ElementSpec::new(0x466E, "FileName", TextUtf8),
    ElementSpec::new(0x4660, "FileMimeType", TextAscii),
    ElementSpec::new(0x465C, "FileData", Binary),
    ElementSpec::new(0x46AE, "FileUID", UnsignedInt),
    ElementSpec::new(0x4675, "FileReferral", Binary),
    ElementSpec::new(0x4661, "FileUsedStartTime", UnsignedInt),
    ElementSpec::new(0x4662, "FileUsedEndTime", UnsignedInt),

    // Chapters
    ElementSpec::new(0x1043A770, "Chapters", Master),
    ElementSpec::new(0x45B9, "EditionEntry", Master),
    ElementSpec::new(0x45BC, "EditionUID", UnsignedInt),
    ElementSpec::new(0x45BD, "EditionFlagHidden", UnsignedInt),
    ElementSpec::new(0x45DB, "EditionFlagDefault", UnsignedInt),
    ElementSpec::new(0x45DD, "EditionFlagOrdered", UnsignedInt),
    ElementSpec::new(0xB6, "ChapterAtom", Master),
    ElementSpec::new(0x73C4, "ChapterUID", UnsignedInt),
    ElementSpec::new(0x5654, "ChapterStringUID", TextUtf8),
    ElementSpec::new(0x91, "ChapterTimeStart", UnsignedInt),
    ElementSpec::new(0x92, "ChapterTimeEnd", UnsignedInt),
    ElementSpec::new(0x98, "ChapterFlagHidden", UnsignedInt),
    ElementSpec::new(0x4598, "ChapterFlagEnabled", UnsignedInt),
    ElementSpec::new(0x6E67, "ChapterSegmentUID", Binary),
    ElementSpec::new(0x6EBC, "ChapterSegmentEditionUID", UnsignedInt),
    ElementSpec::new(0x63C3, "ChapterPhysicalEquiv", UnsignedInt),
    ElementSpec::new(0x8F, "ChapterTrack", Master),
    ElementSpec::new(0x89, "ChapterTrackNumber", UnsignedInt),
    ElementSpec::new(0x80, "ChapterDisplay", Master),
    ElementSpec::new(0x85, "ChapString", TextUtf8),
    ElementSpec::new(0x437C, "ChapLanguage", TextAscii),
    ElementSpec::new(0x437E, "ChapCountry", TextAscii),
    ElementSpec::new(0x6944, "ChapProcess", Master),
    ElementSpec::new(0x6955, "ChapProcessCodecID", UnsignedInt),
    ElementSpec::new(0x450D, "ChapProcessPrivate", Binary),
    ElementSpec::new(0x6911, "ChapProcessCommand", Master),
    ElementSpec::new(0x6922, "ChapProcessTime", UnsignedInt),
    ElementSpec::new(0x6933, "ChapProcessData", Binary),

    // Tagging
    ElementSpec::new(0x1254C367, "Tags", Master),
    ElementSpec::new(0x7373, "Tag", Master),
    ElementSpec::new(0x63C0, "Targets", Master),
    ElementSpec::new(0x68CA, "TargetTypeValue", UnsignedInt),
    ElementSpec::new(0x63CA, "TargetType", TextAscii),
    ElementSpec::new(0x63C5, "TagTrackUID", UnsignedInt),
    ElementSpec::new(0x63C9, "TagEditionUID", UnsignedInt),
    ElementSpec::new(0x63C4, "TagChapterUID", UnsignedInt),
    ElementSpec::new(0x63C6, "TagAttachmentUID", UnsignedInt),
    ElementSpec::new(0x67C8, "SimpleTag", Master),
    ElementSpec::new(0x45A3, "TagName", TextUtf8),
    ElementSpec::new(0x447A, "TagLanguage", TextAscii),
    ElementSpec::new(0x4484, "TagDefault", UnsignedInt),
    ElementSpec::new(0x4487, "TagString", TextUtf8),
    ElementSpec::new(0x4485, "TagBinary", Binary),
];
