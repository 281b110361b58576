//! Reader configuration

use crate::error::{MxfError, Result};
use crate::klv::MAX_LENGTH_FIELD_SIZE;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default guard on the header partition span (1 GiB)
pub const DEFAULT_MAX_HEADER_PARTITION_SIZE: u64 = 1 << 30;

/// Essence reader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Longest accepted BER length field, first byte included
    pub max_length_field_size: usize,
    /// Largest header partition that will be materialized in memory
    pub max_header_partition_size: u64,
    /// Set to abort header metadata walks between KLV packets
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            max_length_field_size: MAX_LENGTH_FIELD_SIZE,
            max_header_partition_size: DEFAULT_MAX_HEADER_PARTITION_SIZE,
            cancel: None,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, missing keys take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| MxfError::Structural(format!("invalid reader configuration: {}", e)))
    }

    /// Set the longest accepted BER length field (clamped to 1..=9)
    pub fn with_max_length_field_size(mut self, size: usize) -> Self {
        self.max_length_field_size = size.clamp(1, MAX_LENGTH_FIELD_SIZE);
        self
    }

    /// Set the header partition size guard
    pub fn with_max_header_partition_size(mut self, size: u64) -> Self {
        self.max_header_partition_size = size;
        self
    }

    /// Attach a cancellation flag
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Fail with [`MxfError::Cancelled`] once the cancellation flag is set
    pub fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(MxfError::Cancelled),
            _ => Ok(()),
        }
    }
}
