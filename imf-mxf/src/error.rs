//! Error types for MXF essence reading

use crate::compliance::ComplianceReport;
use crate::ul::UniversalLabel;
use std::io;
use thiserror::Error;

/// Result type for MXF operations
pub type Result<T> = std::result::Result<T, MxfError>;

/// Errors that can occur while reading an MXF essence
#[derive(Error, Debug)]
pub enum MxfError {
    /// IO error from the byte range source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes available than a read requires
    #[error("Insufficient data at offset {offset}: need {needed} bytes, have {available}")]
    InsufficientData {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// Malformed KLV packet
    #[error("Invalid KLV at offset {offset}: {message}")]
    InvalidKlv { message: String, offset: u64 },

    /// BER length field that cannot be decoded
    #[error("BER length error at offset {offset}: {message}")]
    BerLength { message: String, offset: u64 },

    /// Resource layout does not match what MXF requires
    #[error("Invalid MXF structure: {0}")]
    Structural(String),

    /// The last four bytes do not describe a random index pack
    #[error(
        "Random index pack size {declared} from the last 4 bytes exceeds resource size {resource_size}: file has no random index pack"
    )]
    NoRandomIndexPack { declared: u64, resource_size: u64 },

    /// Invalid partition pack
    #[error("Invalid partition at offset {offset}: {message}")]
    InvalidPartition { message: String, offset: u64 },

    /// Operational Pattern 1A rules violated
    #[error("Not OP1A compliant: {0}")]
    Op1aCompliance(ComplianceReport),

    /// OP1A compliant but IMF rules violated
    #[error("Not IMF compliant: {0}")]
    ImfCompliance(ComplianceReport),

    /// Metadata set key with no register entry
    #[error("No register entry for metadata set {key:?} ({key})")]
    UnknownSet { key: UniversalLabel },

    /// Field byte length does not match the width of its declared type
    #[error("Field {field} of {set} is {actual} bytes, type requires {expected}")]
    FieldWidth {
        set: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Any other failure projecting a metadata set
    #[error("Projection of {set} failed: {message}")]
    Projection { set: String, message: String },

    /// Sound field group sub-descriptors disagree on the spoken language
    #[error("Language codes ({}) do not match across the sound field group label sub-descriptors", .languages.join(", "))]
    LanguageMismatch { languages: Vec<String> },

    /// Query invoked against the wrong kind of essence
    #[error("Essence of type {actual} does not support {query}")]
    EssenceTypeMismatch {
        query: &'static str,
        actual: crate::types::EssenceType,
    },

    /// A scan was aborted through the reader's cancellation flag
    #[error("Operation cancelled")]
    Cancelled,
}

/// Broad classification of an [`MxfError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Underlying resource range unavailable
    Io,
    /// Malformed bytes
    Decode,
    /// Resource layout inconsistent with MXF
    Structural,
    /// OP1A or IMF rule violated
    Compliance,
    /// Register-driven projection failed
    Projection,
    /// Query-level semantic failure
    Semantic,
    /// Aborted by the caller
    Cancelled,
}

impl MxfError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MxfError::Io(_) => ErrorKind::Io,
            MxfError::InsufficientData { .. }
            | MxfError::InvalidKlv { .. }
            | MxfError::BerLength { .. } => ErrorKind::Decode,
            MxfError::Structural(_)
            | MxfError::NoRandomIndexPack { .. }
            | MxfError::InvalidPartition { .. } => ErrorKind::Structural,
            MxfError::Op1aCompliance(_) | MxfError::ImfCompliance(_) => ErrorKind::Compliance,
            MxfError::UnknownSet { .. }
            | MxfError::FieldWidth { .. }
            | MxfError::Projection { .. } => ErrorKind::Projection,
            MxfError::LanguageMismatch { .. } | MxfError::EssenceTypeMismatch { .. } => {
                ErrorKind::Semantic
            }
            MxfError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Compliance report carried by an OP1A or IMF failure
    pub fn compliance_report(&self) -> Option<&ComplianceReport> {
        match self {
            MxfError::Op1aCompliance(report) | MxfError::ImfCompliance(report) => Some(report),
            _ => None,
        }
    }
}
