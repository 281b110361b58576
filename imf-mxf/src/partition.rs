//! MXF partition packs
//!
//! MXF files are divided into partitions:
//! - Header partition (required)
//! - Body partitions (optional)
//! - Footer partition (required for closed/complete files)

use crate::cursor::ByteCursor;
use crate::error::{MxfError, Result};
use crate::klv::KlvHeader;
use crate::ul::UniversalLabel;

/// Size of the fixed part of a partition pack value
pub const FIXED_VALUE_SIZE: usize = 88;

/// Partition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    /// Header partition
    Header,
    /// Body partition
    Body,
    /// Footer partition
    Footer,
}

/// Partition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStatus {
    /// Open (not yet finalized)
    Open,
    /// Closed (finalized)
    Closed,
}

/// Partition completeness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionCompleteness {
    /// Incomplete (missing some metadata)
    Incomplete,
    /// Complete
    Complete,
}

/// MXF partition pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPack {
    /// KLV header of the pack
    pub header: KlvHeader,
    /// Partition kind
    pub kind: PartitionKind,
    /// Status (open/closed)
    pub status: PartitionStatus,
    /// Completeness
    pub completeness: PartitionCompleteness,
    /// Major version (should be 1)
    pub major_version: u16,
    /// Minor version (should be 2 or 3)
    pub minor_version: u16,
    /// KAG size (key alignment grid)
    pub kag_size: u32,
    /// This partition offset in file
    pub this_partition: u64,
    /// Previous partition offset
    pub previous_partition: u64,
    /// Footer partition offset
    pub footer_partition: u64,
    /// Header metadata byte count
    pub header_byte_count: u64,
    /// Index byte count
    pub index_byte_count: u64,
    /// Index SID (stream ID for index)
    pub index_sid: u32,
    /// Body offset (for body partitions)
    pub body_offset: u64,
    /// Body SID (stream ID for essence)
    pub body_sid: u32,
    /// Operational pattern
    pub operational_pattern: UniversalLabel,
    /// Essence containers
    pub essence_containers: Vec<UniversalLabel>,
}

impl PartitionPack {
    /// Parse a partition pack from bytes that start at its key.
    ///
    /// `offset` is the resource offset of the first byte of `data`.
    pub fn parse(data: &[u8], offset: u64, max_length_field_size: usize) -> Result<Self> {
        let mut cursor = ByteCursor::with_base_offset(data, offset);
        let header = KlvHeader::read(&mut cursor, max_length_field_size)?;
        let key = header.key;

        if !key.is_partition_pack() {
            return Err(MxfError::InvalidPartition {
                message: format!("not a partition pack: {:?}", key),
                offset,
            });
        }

        // Determine kind from UL
        let kind = match key.0[13] {
            0x02 => PartitionKind::Header,
            0x03 => PartitionKind::Body,
            _ => PartitionKind::Footer,
        };

        let status = match key.0[14] {
            0x01 | 0x03 => PartitionStatus::Open,
            _ => PartitionStatus::Closed,
        };

        let completeness = match key.0[14] {
            0x01 | 0x02 => PartitionCompleteness::Incomplete,
            _ => PartitionCompleteness::Complete,
        };

        let value_len = header.value_len()?;
        if value_len < FIXED_VALUE_SIZE {
            return Err(MxfError::InvalidPartition {
                message: format!(
                    "partition pack value is {} bytes, need at least {}",
                    value_len, FIXED_VALUE_SIZE
                ),
                offset,
            });
        }
        let value = cursor.read_bytes(value_len)?;
        let mut cursor = ByteCursor::with_base_offset(value, header.value_offset());

        let major_version = cursor.read_u16()?;
        let minor_version = cursor.read_u16()?;
        let kag_size = cursor.read_u32()?;
        let this_partition = cursor.read_u64()?;
        let previous_partition = cursor.read_u64()?;
        let footer_partition = cursor.read_u64()?;
        let header_byte_count = cursor.read_u64()?;
        let index_byte_count = cursor.read_u64()?;
        let index_sid = cursor.read_u32()?;
        let body_offset = cursor.read_u64()?;
        let body_sid = cursor.read_u32()?;
        let operational_pattern = UniversalLabel(cursor.read_array::<16>()?);

        if !operational_pattern.is_operational_pattern() {
            return Err(MxfError::InvalidPartition {
                message: format!(
                    "unrecognized operational pattern label {:?}",
                    operational_pattern
                ),
                offset,
            });
        }

        // Essence container batch
        let batch_count = cursor.read_u32()?;
        let batch_item_size = cursor.read_u32()?;
        if batch_count > 0 && batch_item_size != 16 {
            return Err(MxfError::InvalidPartition {
                message: format!(
                    "essence container batch item size is {}, expected 16",
                    batch_item_size
                ),
                offset,
            });
        }

        let mut essence_containers = Vec::new();
        for _ in 0..batch_count {
            essence_containers.push(UniversalLabel(cursor.read_array::<16>()?));
        }

        log::debug!("Found {:?} partition at offset {}", kind, offset);

        Ok(PartitionPack {
            header,
            kind,
            status,
            completeness,
            major_version,
            minor_version,
            kag_size,
            this_partition,
            previous_partition,
            footer_partition,
            header_byte_count,
            index_byte_count,
            index_sid,
            body_offset,
            body_sid,
            operational_pattern,
            essence_containers,
        })
    }

    /// Resource offset of the pack
    pub fn offset(&self) -> u64 {
        self.header.offset
    }

    pub fn is_header(&self) -> bool {
        self.kind == PartitionKind::Header
    }

    pub fn is_body(&self) -> bool {
        self.kind == PartitionKind::Body
    }

    pub fn is_footer(&self) -> bool {
        self.kind == PartitionKind::Footer
    }

    /// Whether the partition carries essence (non-zero body SID)
    pub fn has_essence(&self) -> bool {
        self.body_sid != 0
    }

    /// Whether the partition carries index table segments
    pub fn has_index_table(&self) -> bool {
        self.index_byte_count != 0
    }
}
