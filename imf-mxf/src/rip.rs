//! Random Index Pack
//!
//! The RIP is the last KLV packet of a file. It lists the byte offset of every
//! partition, and its final four bytes repeat the overall pack length so a
//! reader can find it by looking backwards from the end of the resource.

use crate::cursor::ByteCursor;
use crate::error::{MxfError, Result};
use crate::klv::{KlvHeader, KEY_FIELD_SIZE};

/// Size of the trailing overall length field
pub const OVERALL_LENGTH_SIZE: u64 = 4;

/// Size of one `(body SID, byte offset)` entry
pub const ENTRY_SIZE: usize = 12;

/// Smallest possible RIP: key, 1-byte length, overall length
pub const MIN_PACK_SIZE: u64 = KEY_FIELD_SIZE as u64 + 1 + OVERALL_LENGTH_SIZE;

/// Locate the RIP from the resource size and the resource's last four bytes.
///
/// Returns `(pack_start, pack_end)` with `pack_end` exclusive.
pub fn pack_bounds(resource_size: u64, last4: [u8; 4]) -> Result<(u64, u64)> {
    let declared = u32::from_be_bytes(last4) as u64;

    if declared > resource_size {
        return Err(MxfError::NoRandomIndexPack {
            declared,
            resource_size,
        });
    }
    if declared < MIN_PACK_SIZE {
        return Err(MxfError::Structural(format!(
            "random index pack size {} from the last 4 bytes is below the minimum of {}",
            declared, MIN_PACK_SIZE
        )));
    }

    Ok((resource_size - declared, resource_size))
}

/// Random Index Pack entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RipEntry {
    /// Body SID (0 for partitions without essence)
    pub body_sid: u32,
    /// Byte offset of partition
    pub byte_offset: u64,
}

/// Random Index Pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomIndexPack {
    /// Offset of the pack in the resource
    pub offset: u64,
    /// Overall pack length declared by the last four bytes
    pub size: u64,
    /// Entries in file order
    pub entries: Vec<RipEntry>,
}

impl RandomIndexPack {
    /// Parse the pack from exactly the bytes between its start and the resource end
    pub fn parse(
        data: &[u8],
        offset: u64,
        resource_size: u64,
        max_length_field_size: usize,
    ) -> Result<Self> {
        let size = data.len() as u64;
        let mut cursor = ByteCursor::with_base_offset(data, offset);
        let header = KlvHeader::read(&mut cursor, max_length_field_size)?;

        if !header.key.is_random_index_pack() {
            return Err(MxfError::Structural(format!(
                "expected random index pack at offset {}, found {:?}",
                offset, header.key
            )));
        }
        if header.total_size() != size {
            return Err(MxfError::Structural(format!(
                "random index pack KLV spans {} bytes but its overall length is {}",
                header.total_size(),
                size
            )));
        }

        let value_len = header.value_len()?;
        let entries_len = value_len
            .checked_sub(OVERALL_LENGTH_SIZE as usize)
            .filter(|len| len % ENTRY_SIZE == 0)
            .ok_or_else(|| {
                MxfError::Structural(format!(
                    "random index pack value of {} bytes is not a whole number of entries",
                    value_len
                ))
            })?;

        let mut entries = Vec::with_capacity(entries_len / ENTRY_SIZE);
        for _ in 0..entries_len / ENTRY_SIZE {
            let body_sid = cursor.read_u32()?;
            let byte_offset = cursor.read_u64()?;
            if byte_offset >= resource_size {
                return Err(MxfError::Structural(format!(
                    "partition offset {} listed in the random index pack is outside the resource ({} bytes)",
                    byte_offset, resource_size
                )));
            }
            entries.push(RipEntry {
                body_sid,
                byte_offset,
            });
        }

        let overall_length = cursor.read_u32()? as u64;
        if overall_length != size {
            return Err(MxfError::Structural(format!(
                "random index pack overall length {} does not match its size {}",
                overall_length, size
            )));
        }

        log::debug!(
            "Found RIP at offset {} with {} entries",
            offset,
            entries.len()
        );

        Ok(RandomIndexPack {
            offset,
            size,
            entries,
        })
    }

    /// Partition byte offsets in the order the pack lists them
    pub fn partition_offsets(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.byte_offset).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::klv::MAX_LENGTH_FIELD_SIZE;
    use crate::ul::labels;

    fn rip_bytes(entries: &[(u32, u64)]) -> Vec<u8> {
        let value_size = entries.len() * ENTRY_SIZE + 4;
        let mut data = labels::RANDOM_INDEX_PACK.to_vec();
        data.push(0x83);
        data.extend_from_slice(&(value_size as u32).to_be_bytes()[1..]);
        for (sid, offset) in entries {
            data.extend_from_slice(&sid.to_be_bytes());
            data.extend_from_slice(&offset.to_be_bytes());
        }
        let overall = (data.len() + 4) as u32;
        data.extend_from_slice(&overall.to_be_bytes());
        data
    }

    #[test]
    fn test_pack_bounds() {
        assert_eq!(pack_bounds(1000, 100u32.to_be_bytes()).unwrap(), (900, 1000));
        assert_eq!(pack_bounds(100, 100u32.to_be_bytes()).unwrap(), (0, 100));
    }

    #[test]
    fn test_pack_bounds_larger_than_resource() {
        let err = pack_bounds(50, 51u32.to_be_bytes()).unwrap_err();
        assert!(matches!(
            err,
            MxfError::NoRandomIndexPack {
                declared: 51,
                resource_size: 50
            }
        ));
    }

    #[test]
    fn test_pack_bounds_too_small() {
        assert!(matches!(
            pack_bounds(1000, 3u32.to_be_bytes()),
            Err(MxfError::Structural(_))
        ));
    }

    #[test]
    fn test_parse_preserves_order() {
        let data = rip_bytes(&[(0, 0), (1, 5000), (0, 1200)]);
        let resource_size = 6000 + data.len() as u64;
        let rip = RandomIndexPack::parse(&data, 6000, resource_size, MAX_LENGTH_FIELD_SIZE)
            .unwrap();

        assert_eq!(rip.offset, 6000);
        assert_eq!(rip.size, data.len() as u64);
        assert_eq!(rip.partition_offsets(), vec![0, 5000, 1200]);
        assert_eq!(rip.entries[1].body_sid, 1);
    }

    #[test]
    fn test_parse_rejects_offset_outside_resource() {
        let data = rip_bytes(&[(0, 0), (0, 9_000)]);
        let err =
            RandomIndexPack::parse(&data, 100, 100 + data.len() as u64, MAX_LENGTH_FIELD_SIZE)
                .unwrap_err();
        assert!(matches!(err, MxfError::Structural(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_key() {
        let mut data = rip_bytes(&[(0, 0)]);
        data[..16].copy_from_slice(&labels::PRIMER_PACK);
        assert!(RandomIndexPack::parse(&data, 0, 1000, MAX_LENGTH_FIELD_SIZE).is_err());
    }

    #[test]
    fn test_parse_rejects_size_mismatch() {
        let mut data = rip_bytes(&[(0, 0)]);
        data.push(0);
        assert!(RandomIndexPack::parse(&data, 0, 1000, MAX_LENGTH_FIELD_SIZE).is_err());
    }
}
