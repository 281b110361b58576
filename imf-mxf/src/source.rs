//! Byte range sources
//!
//! The reader never needs a whole resource at once. It asks a
//! [`ByteRangeSource`] for the inclusive byte ranges it is about to parse.

use crate::error::Result;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Random access to the bytes of a resource
pub trait ByteRangeSource {
    /// Resource size in bytes
    fn size(&self) -> Result<u64>;

    /// Bytes `start..=end_inclusive`, exactly `end_inclusive - start + 1` of them
    fn range(&self, start: u64, end_inclusive: u64) -> Result<Vec<u8>>;
}

impl<S: ByteRangeSource + ?Sized> ByteRangeSource for &S {
    fn size(&self) -> Result<u64> {
        (**self).size()
    }

    fn range(&self, start: u64, end_inclusive: u64) -> Result<Vec<u8>> {
        (**self).range(start, end_inclusive)
    }
}

impl<S: ByteRangeSource + ?Sized> ByteRangeSource for Arc<S> {
    fn size(&self) -> Result<u64> {
        (**self).size()
    }

    fn range(&self, start: u64, end_inclusive: u64) -> Result<Vec<u8>> {
        (**self).range(start, end_inclusive)
    }
}

/// Resolve an inclusive range against `len`, returning a slice range
fn checked_range(start: u64, end_inclusive: u64, len: u64) -> io::Result<std::ops::Range<usize>> {
    if start > end_inclusive {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("inverted byte range {}..={}", start, end_inclusive),
        ));
    }
    if end_inclusive >= len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "byte range {}..={} is past the end of a {} byte resource",
                start, end_inclusive, len
            ),
        ));
    }
    let to_usize = |v: u64| {
        usize::try_from(v).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("offset {} is not addressable", v))
        })
    };
    Ok(to_usize(start)?..to_usize(end_inclusive)? + 1)
}

/// Resource held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        MemorySource { data: data.into() }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(data: Vec<u8>) -> Self {
        MemorySource::new(data)
    }
}

impl ByteRangeSource for MemorySource {
    fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn range(&self, start: u64, end_inclusive: u64) -> Result<Vec<u8>> {
        let range = checked_range(start, end_inclusive, self.data.len() as u64)?;
        Ok(self.data[range].to_vec())
    }
}

/// Memory-mapped file; only requested ranges are copied out
#[derive(Debug)]
pub struct FileSource {
    // None for empty files, which cannot be mapped
    map: Option<memmap2::Mmap>,
    len: u64,
}

impl FileSource {
    /// Open and map a file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(FileSource { map: None, len });
        }

        // The mapping is read-only; the file must not be truncated while mapped
        let map = unsafe { memmap2::MmapOptions::new().map(&file)? };

        #[cfg(unix)]
        map.advise(memmap2::Advice::Random)?;

        log::debug!("Mapped {} ({} bytes)", path.as_ref().display(), len);
        Ok(FileSource {
            map: Some(map),
            len,
        })
    }
}

impl ByteRangeSource for FileSource {
    fn size(&self) -> Result<u64> {
        Ok(self.len)
    }

    fn range(&self, start: u64, end_inclusive: u64) -> Result<Vec<u8>> {
        let range = checked_range(start, end_inclusive, self.len)?;
        match &self.map {
            Some(map) => Ok(map[range].to_vec()),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "empty file").into()),
        }
    }
}
