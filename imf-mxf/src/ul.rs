//! Universal Label (UL) types for MXF
//!
//! Universal Labels are 16-byte identifiers defined by SMPTE for
//! identifying all elements in MXF files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 16-byte Universal Label
pub type UL = [u8; 16];

const URN_PREFIX: &str = "urn:smpte:ul:";

/// Universal Label wrapper with helper methods
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniversalLabel(pub UL);

impl UniversalLabel {
    /// Create from raw bytes
    pub fn new(bytes: UL) -> Self {
        UniversalLabel(bytes)
    }

    /// Create from the first 16 bytes of a slice
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let ul: UL = bytes.get(..16)?.try_into().ok()?;
        Some(UniversalLabel(ul))
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &UL {
        &self.0
    }

    /// Check if this is a SMPTE-registered label (starts with 06 0E 2B 34)
    pub fn is_smpte(&self) -> bool {
        self.0[0..4] == labels::SMPTE_PREFIX
    }

    /// Get the category code (byte 5)
    pub fn category(&self) -> u8 {
        self.0[4]
    }

    /// Get the registry designator (byte 6)
    pub fn registry(&self) -> u8 {
        self.0[5]
    }

    /// Get version (byte 8)
    pub fn version(&self) -> u8 {
        self.0[7]
    }

    /// Match a metadata set key, ignoring the registry designator and version bytes.
    ///
    /// Set keys are written with either the 0x53 (local set, 2-byte tags) or
    /// 0x7F (any local set) registry designator depending on the writer.
    pub fn matches_set(&self, pattern: &UL) -> bool {
        self.0[0..5] == pattern[0..5] && self.0[6] == pattern[6] && self.0[8..] == pattern[8..]
    }

    /// Match a property (item) key, ignoring the version byte
    pub fn matches_item(&self, pattern: &UL) -> bool {
        self.0[0..7] == pattern[0..7] && self.0[8..] == pattern[8..]
    }

    /// Check if this is a partition pack
    pub fn is_partition_pack(&self) -> bool {
        // Primer pack shares bytes 0..13 but has byte 13 = 0x05
        self.0[0..13] == labels::PARTITION_PACK_BASE[0..13]
            && (0x02..=0x04).contains(&self.0[13])
    }

    /// Check if this is a primer pack
    pub fn is_primer_pack(&self) -> bool {
        self.0[0..7] == labels::PRIMER_PACK[0..7] && self.0[8..] == labels::PRIMER_PACK[8..]
    }

    /// Check if this is a fill item
    pub fn is_fill_item(&self) -> bool {
        // Older writers use version 0x01 instead of 0x02
        self.0[0..7] == labels::FILL_ITEM[0..7] && self.0[8..13] == labels::FILL_ITEM[8..13]
    }

    /// Check if this is an index table segment
    pub fn is_index_table_segment(&self) -> bool {
        self.matches_set(&labels::INDEX_TABLE_SEGMENT)
    }

    /// Check if this is the random index pack key
    pub fn is_random_index_pack(&self) -> bool {
        self.0[0..7] == labels::RANDOM_INDEX_PACK[0..7]
            && self.0[8..] == labels::RANDOM_INDEX_PACK[8..]
    }

    /// Check if this is essence data
    pub fn is_essence(&self) -> bool {
        // Essence elements have category 01 and item designator 0D.01.03.01
        self.is_smpte() && self.0[4] == 0x01 && self.0[8..12] == [0x0D, 0x01, 0x03, 0x01]
    }

    /// Check if this is a metadata set
    pub fn is_metadata(&self) -> bool {
        // Sets and packs have category 02
        self.is_smpte() && self.0[4] == 0x02
    }

    /// Check if this is any SMPTE operational pattern label
    pub fn is_operational_pattern(&self) -> bool {
        if !(self.is_smpte()
            && self.0[4..7] == [0x04, 0x01, 0x01]
            && self.0[8..12] == [0x0D, 0x01, 0x02, 0x01])
        {
            return false;
        }
        match self.0[12] {
            // OP1..OP3 with package complexity a..c
            0x01..=0x03 => (0x01..=0x03).contains(&self.0[13]),
            // OP-Atom
            0x10 => true,
            _ => false,
        }
    }

    /// Check if this is the OP1A (single item, single package) pattern
    pub fn is_op1a(&self) -> bool {
        self.is_operational_pattern() && self.0[12] == 0x01 && self.0[13] == 0x01
    }

    /// Check if this is an MXF generic container essence container label
    pub fn is_generic_container(&self) -> bool {
        self.0[0..7] == labels::GENERIC_CONTAINER_BASE[0..7]
            && self.0[8..13] == labels::GENERIC_CONTAINER_BASE[8..13]
    }

    /// Generic container mapping kind and wrapping bytes (bytes 14 and 15)
    pub fn generic_container_mapping(&self) -> Option<(u8, u8)> {
        self.is_generic_container().then_some((self.0[13], self.0[14]))
    }

    /// Format as a `urn:smpte:ul:` URN
    pub fn to_urn(&self) -> String {
        let hex: String = self.0.iter().map(|b| format!("{:02x}", b)).collect();
        format!(
            "{}{}.{}.{}.{}",
            URN_PREFIX,
            &hex[0..8],
            &hex[8..16],
            &hex[16..24],
            &hex[24..32]
        )
    }

    /// Classify the packet this key introduces
    pub fn kind(&self) -> LabelKind {
        if !self.is_smpte() {
            return LabelKind::Unknown;
        }
        match self.category() {
            0x01 if self.is_fill_item() => LabelKind::FillItem,
            0x01 if self.is_essence() => LabelKind::EssenceElement,
            0x02 if self.is_partition_pack() => LabelKind::PartitionPack,
            0x02 if self.is_primer_pack() => LabelKind::PrimerPack,
            0x02 if self.is_random_index_pack() => LabelKind::RandomIndexPack,
            0x02 if self.is_index_table_segment() => LabelKind::IndexTable,
            0x02 => LabelKind::MetadataSet,
            _ => LabelKind::Unknown,
        }
    }
}

impl fmt::Debug for UniversalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UL(")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for UniversalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = labels::lookup_name(&self.0);
        write!(f, "{}", name)
    }
}

impl From<UL> for UniversalLabel {
    fn from(bytes: UL) -> Self {
        UniversalLabel(bytes)
    }
}

impl From<&[u8; 16]> for UniversalLabel {
    fn from(bytes: &[u8; 16]) -> Self {
        UniversalLabel(*bytes)
    }
}

/// Error parsing a UL from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError(String);

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid universal label '{}'", self.0)
    }
}

impl std::error::Error for ParseLabelError {}

impl FromStr for UniversalLabel {
    type Err = ParseLabelError;

    /// Accepts `urn:smpte:ul:060e2b34.01010101.01011502.00000000` or bare hex
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let body = s.strip_prefix(URN_PREFIX).unwrap_or(s);
        let hex: String = body.chars().filter(|c| *c != '.').collect();
        if hex.len() != 32 || !hex.is_ascii() {
            return Err(ParseLabelError(s.to_string()));
        }

        let mut ul = [0u8; 16];
        for (i, byte) in ul.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| ParseLabelError(s.to_string()))?;
        }
        Ok(UniversalLabel(ul))
    }
}

impl Serialize for UniversalLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_urn())
    }
}

impl<'de> Deserialize<'de> for UniversalLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of Universal Label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Partition pack
    PartitionPack,
    /// Primer pack
    PrimerPack,
    /// Fill item (KLV fill)
    FillItem,
    /// Random index pack
    RandomIndexPack,
    /// Essence element
    EssenceElement,
    /// Metadata set
    MetadataSet,
    /// Index table
    IndexTable,
    /// Unknown
    Unknown,
}

/// Well-known Universal Labels
pub mod labels {
    use super::{LabelKind, UL};

    /// SMPTE Label prefix
    pub const SMPTE_PREFIX: [u8; 4] = [0x06, 0x0E, 0x2B, 0x34];

    /// Partition pack base (last 3 bytes vary)
    pub const PARTITION_PACK_BASE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x00, 0x00,
        0x00,
    ];

    /// Header partition - open incomplete
    pub const HEADER_PARTITION_OPEN_INCOMPLETE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x01,
        0x00,
    ];

    /// Header partition - closed complete
    pub const HEADER_PARTITION_CLOSED_COMPLETE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02, 0x04,
        0x00,
    ];

    /// Body partition - closed complete
    pub const BODY_PARTITION_CLOSED_COMPLETE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x03, 0x04,
        0x00,
    ];

    /// Footer partition - closed complete
    pub const FOOTER_PARTITION: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x04, 0x04,
        0x00,
    ];

    /// Primer pack
    pub const PRIMER_PACK: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x05, 0x01,
        0x00,
    ];

    /// Fill item
    pub const FILL_ITEM: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x02, 0x03, 0x01, 0x02, 0x10, 0x01, 0x00, 0x00,
        0x00,
    ];

    /// Index table segment
    pub const INDEX_TABLE_SEGMENT: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x10, 0x01,
        0x00,
    ];

    /// Random index pack
    pub const RANDOM_INDEX_PACK: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x11, 0x01,
        0x00,
    ];

    /// OP1A operational pattern (internal essence, stream file, multi-track)
    pub const OP1A: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x01, 0x09,
        0x00,
    ];

    /// OP-Atom operational pattern
    pub const OP_ATOM: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x02, 0x0D, 0x01, 0x02, 0x01, 0x10, 0x00, 0x00,
        0x00,
    ];

    // Metadata sets

    /// Preface (root of metadata tree)
    pub const PREFACE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x2F,
        0x00,
    ];

    /// Content storage
    pub const CONTENT_STORAGE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x18,
        0x00,
    ];

    /// Material package
    pub const MATERIAL_PACKAGE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x36,
        0x00,
    ];

    /// Source package
    pub const SOURCE_PACKAGE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x37,
        0x00,
    ];

    // Essence descriptors

    /// CDCI descriptor (component video)
    pub const CDCI_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x28,
        0x00,
    ];

    /// RGBA descriptor
    pub const RGBA_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x29,
        0x00,
    ];

    /// Wave audio descriptor
    pub const WAVE_AUDIO_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x48,
        0x00,
    ];

    // Sub-descriptors

    /// JPEG 2000 picture sub-descriptor
    pub const JPEG2000_SUB_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x5A,
        0x00,
    ];

    /// Audio channel label sub-descriptor (ST 377-4)
    pub const AUDIO_CHANNEL_LABEL_SUB_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x6B,
        0x00,
    ];

    /// Soundfield group label sub-descriptor (ST 377-4)
    pub const SOUNDFIELD_GROUP_LABEL_SUB_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x6C,
        0x00,
    ];

    /// Group of soundfield groups label sub-descriptor (ST 377-4)
    pub const GROUP_OF_SOUNDFIELD_GROUPS_LABEL_SUB_DESCRIPTOR: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0D, 0x01, 0x01, 0x01, 0x01, 0x01, 0x6D,
        0x00,
    ];

    // Essence container labels

    /// MXF generic container base (bytes 14..16 select the mapping)
    pub const GENERIC_CONTAINER_BASE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x02, 0x00, 0x00,
        0x00,
    ];

    /// JPEG 2000 frame-wrapped
    pub const ESSENCE_JPEG2000: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x07, 0x0D, 0x01, 0x03, 0x01, 0x02, 0x0C, 0x01,
        0x00,
    ];

    /// Uncompressed pictures, frame-wrapped
    pub const ESSENCE_UNCOMPRESSED: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x02, 0x05, 0x01,
        0x00,
    ];

    /// Broadcast wave audio, clip-wrapped
    pub const ESSENCE_WAVE_CLIP: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x02, 0x06, 0x02,
        0x00,
    ];

    /// MPEG-2 video elementary stream, frame-wrapped
    pub const ESSENCE_MPEG2: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x04, 0x01, 0x01, 0x02, 0x0D, 0x01, 0x03, 0x01, 0x02, 0x04, 0x60,
        0x01,
    ];

    // Property keys

    /// Instance UID (static tag 3C0A)
    pub const INSTANCE_UID: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x15, 0x02, 0x00, 0x00, 0x00,
        0x00,
    ];

    /// Operational pattern of a preface (static tag 3B09)
    pub const OPERATIONAL_PATTERN: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x05, 0x01, 0x02, 0x02, 0x03, 0x00, 0x00, 0x00,
        0x00,
    ];

    /// Essence containers of a preface (static tag 3B0A)
    pub const ESSENCE_CONTAINERS: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x05, 0x01, 0x02, 0x02, 0x10, 0x02, 0x01, 0x00,
        0x00,
    ];

    /// Sub-descriptor strong references (dynamic tag)
    pub const SUB_DESCRIPTORS: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x09, 0x06, 0x01, 0x01, 0x04, 0x06, 0x10, 0x00,
        0x00,
    ];

    /// Sample rate (static tag 3001)
    pub const SAMPLE_RATE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x01, 0x04, 0x06, 0x01, 0x01, 0x00, 0x00, 0x00,
        0x00,
    ];

    /// Container duration (static tag 3002)
    pub const CONTAINER_DURATION: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x01, 0x04, 0x06, 0x01, 0x02, 0x00, 0x00, 0x00,
        0x00,
    ];

    /// Essence container of a descriptor (static tag 3004)
    pub const ESSENCE_CONTAINER: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x02, 0x06, 0x01, 0x01, 0x04, 0x01, 0x02, 0x00,
        0x00,
    ];

    /// Frame layout (static tag 320C)
    pub const FRAME_LAYOUT: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x01, 0x04, 0x01, 0x03, 0x01, 0x04, 0x00, 0x00,
        0x00,
    ];

    /// Stored width (static tag 3203)
    pub const STORED_WIDTH: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x01, 0x04, 0x01, 0x05, 0x02, 0x02, 0x00, 0x00,
        0x00,
    ];

    /// Stored height (static tag 3202)
    pub const STORED_HEIGHT: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x01, 0x04, 0x01, 0x05, 0x02, 0x01, 0x00, 0x00,
        0x00,
    ];

    /// Component depth (static tag 3301)
    pub const COMPONENT_DEPTH: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x02, 0x04, 0x01, 0x05, 0x03, 0x0A, 0x00, 0x00,
        0x00,
    ];

    /// Audio sampling rate (static tag 3D03)
    pub const AUDIO_SAMPLING_RATE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x05, 0x04, 0x02, 0x03, 0x01, 0x01, 0x01, 0x00,
        0x00,
    ];

    /// Locked to video (static tag 3D02)
    pub const LOCKED: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x04, 0x04, 0x02, 0x03, 0x01, 0x04, 0x00, 0x00,
        0x00,
    ];

    /// Channel count (static tag 3D07)
    pub const CHANNEL_COUNT: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x05, 0x04, 0x02, 0x01, 0x01, 0x04, 0x00, 0x00,
        0x00,
    ];

    /// Quantization bits (static tag 3D01)
    pub const QUANTIZATION_BITS: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x04, 0x04, 0x02, 0x03, 0x03, 0x04, 0x00, 0x00,
        0x00,
    ];

    /// Block align (static tag 3D0A)
    pub const BLOCK_ALIGN: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x05, 0x04, 0x02, 0x03, 0x02, 0x01, 0x00, 0x00,
        0x00,
    ];

    /// MCA label dictionary ID
    pub const MCA_LABEL_DICTIONARY_ID: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x07, 0x01, 0x01, 0x00, 0x00,
        0x00,
    ];

    /// MCA tag symbol
    pub const MCA_TAG_SYMBOL: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x07, 0x01, 0x02, 0x00, 0x00,
        0x00,
    ];

    /// MCA tag name
    pub const MCA_TAG_NAME: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x07, 0x01, 0x03, 0x00, 0x00,
        0x00,
    ];

    /// MCA link ID
    pub const MCA_LINK_ID: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x07, 0x01, 0x05, 0x00, 0x00,
        0x00,
    ];

    /// MCA channel ID
    pub const MCA_CHANNEL_ID: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x04, 0x0A, 0x00, 0x00, 0x00,
        0x00,
    ];

    /// RFC 5646 spoken language
    pub const RFC5646_SPOKEN_LANGUAGE: UL = [
        0x06, 0x0E, 0x2B, 0x34, 0x01, 0x01, 0x01, 0x0D, 0x03, 0x01, 0x01, 0x02, 0x03, 0x15, 0x00,
        0x00,
    ];

    /// Lookup human-readable name for a UL
    pub fn lookup_name(ul: &UL) -> &'static str {
        let label = super::UniversalLabel(*ul);

        match label.kind() {
            LabelKind::PrimerPack => return "Primer Pack",
            LabelKind::FillItem => return "Fill Item",
            LabelKind::RandomIndexPack => return "Random Index Pack",
            LabelKind::PartitionPack => {
                return match (ul[13], ul[14] % 2 == 0) {
                    (0x02, false) => "Open Header Partition",
                    (0x02, true) => "Closed Header Partition",
                    (0x03, false) => "Open Body Partition",
                    (0x03, true) => "Closed Body Partition",
                    _ => "Footer Partition",
                }
            }
            _ => {}
        }
        if label.is_op1a() {
            return "OP1A";
        }
        if label.is_operational_pattern() {
            return "Operational Pattern";
        }

        const SETS: [(&UL, &str); 12] = [
            (&INDEX_TABLE_SEGMENT, "Index Table Segment"),
            (&PREFACE, "Preface"),
            (&CONTENT_STORAGE, "Content Storage"),
            (&MATERIAL_PACKAGE, "Material Package"),
            (&SOURCE_PACKAGE, "Source Package"),
            (&CDCI_DESCRIPTOR, "CDCI Descriptor"),
            (&RGBA_DESCRIPTOR, "RGBA Descriptor"),
            (&WAVE_AUDIO_DESCRIPTOR, "Wave Audio Descriptor"),
            (&JPEG2000_SUB_DESCRIPTOR, "JPEG 2000 Sub-Descriptor"),
            (
                &AUDIO_CHANNEL_LABEL_SUB_DESCRIPTOR,
                "Audio Channel Label Sub-Descriptor",
            ),
            (
                &SOUNDFIELD_GROUP_LABEL_SUB_DESCRIPTOR,
                "Soundfield Group Label Sub-Descriptor",
            ),
            (
                &GROUP_OF_SOUNDFIELD_GROUPS_LABEL_SUB_DESCRIPTOR,
                "Group Of Soundfield Groups Label Sub-Descriptor",
            ),
        ];
        if let Some((_, name)) = SETS.iter().find(|(pattern, _)| label.matches_set(pattern)) {
            return name;
        }

        if label.is_generic_container() {
            return "Generic Container";
        }
        if label.is_essence() {
            return "Essence Element";
        }
        if label.is_metadata() {
            return "Metadata Set";
        }

        "Unknown"
    }
}
