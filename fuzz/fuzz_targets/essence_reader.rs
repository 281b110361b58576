#![no_main]

//! Fuzz target for the essence reader queries.
//!
//! Treats arbitrary bytes as a whole resource and runs every reader query
//! over it. Each query must return a result without panicking.

use imf_mxf::{EssenceReader, MemoryRegister, MemorySource};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 256 * 1024 {
        return;
    }

    let reader = EssenceReader::new(MemorySource::from(data.to_vec()));
    let _ = reader.random_index_pack();
    let _ = reader.partition_packs();
    let _ = reader.essence_descriptors();
    let _ = reader.essence_type();
    let _ = reader.audio_spoken_language();
    let _ = reader.essence_descriptor_documents(&MemoryRegister::new());
});
