//! IMF track file (MXF) essence reader
//!
//! This crate reads MXF files (SMPTE ST 377-1) that carry IMF essence
//! (SMPTE ST 2067) without loading them wholesale. It locates partitions
//! through the random index pack, parses the header partition, and checks the
//! file against the OP1A and IMF constraints before answering queries.
//!
//! # Features
//!
//! - KLV (Key-Length-Value) header and BER length decoding
//! - Random index pack discovery from the end of the resource
//! - Partition pack, primer pack and header metadata parsing
//! - OP1A and IMF compliance reports listing every violation
//! - Register-driven projection of essence descriptors into XML fragments
//! - Essence type and audio spoken language queries
//!
//! # Example
//!
//! ```no_run
//! use imf_mxf::{EssenceReader, EssenceType, FileSource};
//!
//! fn main() -> imf_mxf::Result<()> {
//!     let reader = EssenceReader::new(FileSource::open("audio.mxf")?);
//!
//!     if reader.essence_type()? == EssenceType::MainAudioSequence {
//!         println!("Language: {:?}", reader.audio_spoken_language()?);
//!     }
//!     Ok(())
//! }
//! ```

mod compliance;
mod config;
mod cursor;
mod error;
mod header;
mod imf;
mod klv;
mod op1a;
mod partition;
mod primer;
mod projector;
mod reader;
mod register;
mod rip;
mod source;
mod types;
mod ul;

pub use compliance::{ComplianceReport, ImfRule, Op1aRule, Rule, Stage, Violation};
pub use config::{ReaderConfig, DEFAULT_MAX_HEADER_PARTITION_SIZE};
pub use cursor::ByteCursor;
pub use error::{ErrorKind, MxfError, Result};
pub use header::{
    AudioDescriptor, DescriptorKind, EssenceDescriptor, HeaderPartition, InterchangeObject,
    McaLabel, PictureDescriptor, Preface, Property, PropertySet, SubDescriptor,
    SubDescriptorKind,
};
pub use imf::{is_allowed_essence_container, HeaderPartitionImf, ImfPartitions};
pub use klv::{
    decode_ber_length, KlvHeader, LocalSetItem, LocalSetReader, KEY_FIELD_SIZE,
    MAX_LENGTH_FIELD_SIZE,
};
pub use op1a::{HeaderPartitionOp1a, Op1aPartitions};
pub use partition::{PartitionCompleteness, PartitionKind, PartitionPack, PartitionStatus};
pub use primer::PrimerPack;
pub use projector::{DescriptorProjector, DocumentNode, NodeContent, Triplet};
pub use reader::EssenceReader;
pub use register::{
    EnumerationValue, FieldDefinition, FieldType, MemoryRegister, RecordMember, Register,
    TypeDefinition,
};
pub use rip::{pack_bounds, RandomIndexPack, RipEntry};
pub use source::{ByteRangeSource, FileSource, MemorySource};
pub use types::{EssenceType, FrameLayout, FrameSize, Rational};
pub use ul::{labels, LabelKind, UniversalLabel, UL};
