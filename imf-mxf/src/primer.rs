//! Primer pack: local tag to Universal Label mapping
//!
//! Every local set in a header partition uses 2-byte local tags. The primer
//! pack of that header partition is the only place that says which property
//! each tag stands for.

use crate::cursor::ByteCursor;
use crate::error::{MxfError, Result};
use crate::klv::KlvHeader;
use crate::ul::{UniversalLabel, UL};
use std::collections::HashMap;

/// Size of one primer batch item (2-byte tag + 16-byte UL)
const ITEM_SIZE: u32 = 18;

/// Primer pack for local tag mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerPack {
    /// KLV header of the pack
    pub header: KlvHeader,
    mappings: HashMap<u16, UniversalLabel>,
}

impl PrimerPack {
    /// Parse the value of a primer pack whose KLV header is `header`
    pub fn parse(header: KlvHeader, value: &[u8]) -> Result<Self> {
        if !header.key.is_primer_pack() {
            return Err(MxfError::Structural(format!(
                "expected primer pack at offset {}, found {:?}",
                header.offset, header.key
            )));
        }

        let mut cursor = ByteCursor::with_base_offset(value, header.value_offset());
        let count = cursor.read_u32()?;
        let item_size = cursor.read_u32()?;
        if item_size != ITEM_SIZE {
            return Err(MxfError::InvalidKlv {
                message: format!(
                    "primer pack item size is {}, expected {}",
                    item_size, ITEM_SIZE
                ),
                offset: header.offset,
            });
        }

        let declared = (count as usize).checked_mul(ITEM_SIZE as usize);
        if declared.map_or(true, |size| size > cursor.remaining()) {
            return Err(MxfError::InvalidKlv {
                message: format!(
                    "primer pack declares {} items but holds {} bytes",
                    count,
                    cursor.remaining()
                ),
                offset: header.offset,
            });
        }

        let mut mappings = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let item_offset = cursor.absolute_position();
            let tag = cursor.read_u16()?;
            let ul = UniversalLabel(cursor.read_array::<16>()?);

            if let Some(existing) = mappings.insert(tag, ul) {
                if existing != ul {
                    return Err(MxfError::InvalidKlv {
                        message: format!(
                            "local tag {:04x} maps to both {:?} and {:?}",
                            tag, existing, ul
                        ),
                        offset: item_offset,
                    });
                }
            }
        }

        Ok(PrimerPack { header, mappings })
    }

    /// Lookup UL by tag
    pub fn lookup(&self, tag: u16) -> Option<&UniversalLabel> {
        self.mappings.get(&tag)
    }

    /// Lookup tag by UL, ignoring the UL version byte
    pub fn reverse_lookup(&self, ul: &UL) -> Option<u16> {
        self.mappings
            .iter()
            .find(|(_, u)| u.matches_item(ul))
            .map(|(t, _)| *t)
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Iterate mappings in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &UniversalLabel)> {
        self.mappings.iter().map(|(t, u)| (*t, u))
    }
}
