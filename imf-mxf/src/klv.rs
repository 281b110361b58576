//! KLV (Key-Length-Value) packet headers
//!
//! All data in MXF files is encoded as KLV triplets:
//! - Key: 16-byte Universal Label identifying the data
//! - Length: BER-encoded length of the value
//! - Value: The actual data
//!
//! Only the key and length are decoded here. Values are materialized
//! separately so that huge essence packets are never read by accident.

use crate::cursor::ByteCursor;
use crate::error::{MxfError, Result};
use crate::ul::UniversalLabel;

/// Size of the key field
pub const KEY_FIELD_SIZE: usize = 16;

/// Longest supported BER length suffix (bytes following the first length byte)
pub const LENGTH_FIELD_SUFFIX_MAX_SIZE: usize = 8;

/// Longest supported length field, first byte included
pub const MAX_LENGTH_FIELD_SIZE: usize = 1 + LENGTH_FIELD_SUFFIX_MAX_SIZE;

/// Upper bound on the size of a KLV header
pub const MAX_HEADER_SIZE: usize = KEY_FIELD_SIZE + MAX_LENGTH_FIELD_SIZE;

/// Decoded key and length of a KLV packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KlvHeader {
    /// Universal Label (key)
    pub key: UniversalLabel,
    /// Size of the BER length field
    pub length_field_size: usize,
    /// Size of the value
    pub value_size: u64,
    /// Offset of the first key byte in the resource
    pub offset: u64,
}

impl KlvHeader {
    /// Read a header at the cursor position, leaving the cursor on the first value byte
    pub fn read(cursor: &mut ByteCursor<'_>, max_length_field_size: usize) -> Result<Self> {
        let offset = cursor.absolute_position();
        let start = cursor.position();

        let key = match cursor.read_array::<KEY_FIELD_SIZE>() {
            Ok(key) => UniversalLabel(key),
            Err(_) => {
                return Err(MxfError::InvalidKlv {
                    message: format!(
                        "need {} key bytes, have {}",
                        KEY_FIELD_SIZE,
                        cursor.remaining()
                    ),
                    offset,
                })
            }
        };

        let (value_size, length_field_size) =
            match decode_ber_length(cursor.remaining_bytes(), offset, max_length_field_size) {
                Ok(decoded) => decoded,
                Err(e) => {
                    cursor.seek(start);
                    return Err(e);
                }
            };
        let kl_size = (KEY_FIELD_SIZE + length_field_size) as u64;
        if offset
            .checked_add(kl_size)
            .and_then(|value_offset| value_offset.checked_add(value_size))
            .is_none()
        {
            cursor.seek(start);
            return Err(MxfError::InvalidKlv {
                message: format!(
                    "value size {} runs past the end of the addressable range",
                    value_size
                ),
                offset,
            });
        }
        cursor.skip(length_field_size)?;

        Ok(KlvHeader {
            key,
            length_field_size,
            value_size,
            offset,
        })
    }

    /// Decode a header from the start of a byte range materialized at `offset`
    pub fn parse(data: &[u8], offset: u64, max_length_field_size: usize) -> Result<Self> {
        let mut cursor = ByteCursor::with_base_offset(data, offset);
        Self::read(&mut cursor, max_length_field_size)
    }

    /// Key plus length field size
    pub fn kl_size(&self) -> u64 {
        (KEY_FIELD_SIZE + self.length_field_size) as u64
    }

    /// Total packet span
    pub fn total_size(&self) -> u64 {
        self.kl_size().saturating_add(self.value_size)
    }

    /// Offset of the first value byte
    pub fn value_offset(&self) -> u64 {
        self.offset.saturating_add(self.kl_size())
    }

    /// Offset one past the last value byte
    pub fn end_offset(&self) -> u64 {
        self.offset.saturating_add(self.total_size())
    }

    /// Value size as an in-memory length
    pub fn value_len(&self) -> Result<usize> {
        usize::try_from(self.value_size).map_err(|_| MxfError::InvalidKlv {
            message: format!("value size {} is not addressable", self.value_size),
            offset: self.offset,
        })
    }

    /// Inclusive byte range of the whole packet
    pub fn packet_range(&self) -> (u64, u64) {
        (self.offset, self.end_offset().saturating_sub(1))
    }

    /// Fail when the packet runs past the end of the resource
    pub fn ensure_within(&self, resource_size: u64) -> Result<()> {
        let end = self.offset.checked_add(self.total_size());
        match end {
            Some(end) if end <= resource_size => Ok(()),
            _ => Err(MxfError::Structural(format!(
                "KLV packet {} at offset {} spans {} bytes, past resource end {}",
                self.key,
                self.offset,
                self.total_size(),
                resource_size
            ))),
        }
    }
}

/// Decode a BER length from bytes, returning `(length, length field size)`
pub fn decode_ber_length(
    data: &[u8],
    offset: u64,
    max_length_field_size: usize,
) -> Result<(u64, usize)> {
    let first_byte = match data.first() {
        Some(byte) => *byte,
        None => {
            return Err(MxfError::BerLength {
                message: "no data for length".into(),
                offset,
            })
        }
    };

    if first_byte < 0x80 {
        // Short form: length is in the byte itself
        return Ok((first_byte as u64, 1));
    }
    if first_byte == 0x80 {
        return Err(MxfError::BerLength {
            message: "indefinite length not supported".into(),
            offset,
        });
    }

    // Long form: low 7 bits count the big-endian length bytes that follow
    let num_bytes = (first_byte & 0x7F) as usize;
    let field_size = 1 + num_bytes;
    if num_bytes > LENGTH_FIELD_SUFFIX_MAX_SIZE || field_size > max_length_field_size {
        return Err(MxfError::BerLength {
            message: format!(
                "length field of {} bytes exceeds supported maximum of {}",
                field_size,
                max_length_field_size.min(MAX_LENGTH_FIELD_SIZE)
            ),
            offset,
        });
    }
    if data.len() < field_size {
        return Err(MxfError::BerLength {
            message: format!("need {} length bytes, have {}", field_size, data.len()),
            offset,
        });
    }

    let length = data[1..field_size]
        .iter()
        .fold(0u64, |length, byte| (length << 8) | *byte as u64);

    Ok((length, field_size))
}

/// One item of a local set (2-byte tag, 2-byte length)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSetItem<'a> {
    /// Local tag
    pub tag: u16,
    /// Item value
    pub value: &'a [u8],
    /// Offset of the tag in the resource
    pub offset: u64,
}

/// Iterator over the items of a local set value
pub struct LocalSetReader<'a> {
    cursor: ByteCursor<'a>,
    failed: bool,
}

impl<'a> LocalSetReader<'a> {
    /// Iterate the items of `value`, which starts at resource offset `offset`
    pub fn new(value: &'a [u8], offset: u64) -> Self {
        LocalSetReader {
            cursor: ByteCursor::with_base_offset(value, offset),
            failed: false,
        }
    }

    fn read_item(&mut self) -> Result<LocalSetItem<'a>> {
        let offset = self.cursor.absolute_position();
        let tag = self.cursor.read_u16()?;
        let length = self.cursor.read_u16()? as usize;
        let value = self.cursor.read_bytes(length)?;
        Ok(LocalSetItem { tag, value, offset })
    }
}

impl<'a> Iterator for LocalSetReader<'a> {
    type Item = Result<LocalSetItem<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_eof() {
            return None;
        }
        let item = self.read_item();
        self.failed = item.is_err();
        Some(item)
    }
}
