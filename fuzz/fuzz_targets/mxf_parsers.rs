#![no_main]

//! Fuzz target for MXF structure parsing.
//!
//! Feeds arbitrary bytes to the KLV, random index pack, partition pack and
//! header partition parsers to find panics and overflows.

use arbitrary::Arbitrary;
use imf_mxf::{
    decode_ber_length, pack_bounds, HeaderPartition, KlvHeader, LocalSetReader, PartitionPack,
    RandomIndexPack, ReaderConfig,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct MxfInput {
    data: Vec<u8>,
    offset: u32,
    max_length_field_size: u8,
    operation: MxfOperation,
}

#[derive(Arbitrary, Debug)]
enum MxfOperation {
    /// Decode a BER length
    BerLength,
    /// Parse a KLV header
    KlvHeader,
    /// Walk local set items
    LocalSet,
    /// Locate and parse a RIP at the end of the data
    RandomIndexPack,
    /// Parse a partition pack
    PartitionPack,
    /// Parse a header partition
    HeaderPartition,
}

fuzz_target!(|input: MxfInput| {
    // Limit input size to keep iterations fast
    if input.data.len() > 64 * 1024 {
        return;
    }

    let data = &input.data;
    let offset = input.offset as u64;
    let lfs = (input.max_length_field_size % 9 + 1) as usize;

    match input.operation {
        MxfOperation::BerLength => {
            if let Ok((_, size)) = decode_ber_length(data, offset, lfs) {
                assert!(size <= lfs && size <= data.len());
            }
        }

        MxfOperation::KlvHeader => {
            if let Ok(header) = KlvHeader::parse(data, offset, lfs) {
                assert_eq!(header.offset, offset);
                assert!(header.kl_size() as usize <= data.len());
            }
        }

        MxfOperation::LocalSet => {
            for item in LocalSetReader::new(data, offset) {
                if item.is_err() {
                    break;
                }
            }
        }

        MxfOperation::RandomIndexPack => {
            let size = data.len() as u64;
            if size < 4 {
                return;
            }
            let mut last4 = [0u8; 4];
            last4.copy_from_slice(&data[data.len() - 4..]);

            if let Ok((start, end)) = pack_bounds(size, last4) {
                assert_eq!(end, size);
                let _ = RandomIndexPack::parse(&data[start as usize..], start, size, lfs);
            }
        }

        MxfOperation::PartitionPack => {
            let _ = PartitionPack::parse(data, offset, lfs);
        }

        MxfOperation::HeaderPartition => {
            let config = ReaderConfig::new().with_max_length_field_size(lfs);
            let _ = HeaderPartition::parse(data, offset, &config);
        }
    }
});
