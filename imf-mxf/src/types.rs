//! MXF value types

use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// Rational number for sample rates and aspect ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: i32,
    pub denominator: i32,
}

impl Rational {
    /// Create new rational
    pub fn new(numerator: i32, denominator: i32) -> Self {
        Rational {
            numerator,
            denominator,
        }
    }

    /// Decode the 8-byte MXF encoding (two big-endian i32)
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 8 {
            return None;
        }
        Some(Rational::new(
            BigEndian::read_i32(&bytes[0..4]),
            BigEndian::read_i32(&bytes[4..8]),
        ))
    }

    /// Convert to f64
    pub fn to_f64(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Video frame size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        FrameSize { width, height }
    }
}

/// Frame layout of a picture descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// Progressive
    FullFrame,
    /// Interlaced, one field per KLV
    SeparateFields,
    /// Single field of an interlaced source
    OneField,
    /// Interlaced, both fields in one KLV
    MixedFields,
    /// Progressive frame carried as two fields
    SegmentedFrame,
    /// Value not defined by ST 377-1
    Other(u8),
}

impl From<u8> for FrameLayout {
    fn from(value: u8) -> Self {
        match value {
            0 => FrameLayout::FullFrame,
            1 => FrameLayout::SeparateFields,
            2 => FrameLayout::OneField,
            3 => FrameLayout::MixedFields,
            4 => FrameLayout::SegmentedFrame,
            other => FrameLayout::Other(other),
        }
    }
}

/// Kind of essence carried by an IMF track file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EssenceType {
    /// Picture essence (CDCI or RGBA descriptor)
    MainImageSequence,
    /// Sound essence (wave audio descriptor)
    MainAudioSequence,
    /// Neither
    #[default]
    Unknown,
}

impl EssenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EssenceType::MainImageSequence => "MainImageSequence",
            EssenceType::MainAudioSequence => "MainAudioSequence",
            EssenceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EssenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational() {
        let r = Rational::new(30000, 1001);
        let f = r.to_f64();
        assert!((f - 29.97).abs() < 0.01);
        assert_eq!(r.to_string(), "30000/1001");
        assert_eq!(Rational::new(1, 0).to_f64(), 0.0);
    }

    #[test]
    fn test_rational_from_bytes() {
        let bytes = [0, 0, 0, 24, 0, 0, 0, 1];
        assert_eq!(Rational::from_bytes(&bytes), Some(Rational::new(24, 1)));
        assert_eq!(Rational::from_bytes(&bytes[..7]), None);
    }

    #[test]
    fn test_frame_layout() {
        assert_eq!(FrameLayout::from(0), FrameLayout::FullFrame);
        assert_eq!(FrameLayout::from(4), FrameLayout::SegmentedFrame);
        assert_eq!(FrameLayout::from(9), FrameLayout::Other(9));
    }

    #[test]
    fn test_essence_type_display() {
        assert_eq!(EssenceType::MainAudioSequence.to_string(), "MainAudioSequence");
        assert_eq!(EssenceType::default(), EssenceType::Unknown);
    }
}
