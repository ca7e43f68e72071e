//! Decoder configuration.
//!
//! [`DecoderConfig`] is what the archive layer hands the core for one
//! entry. [`StaticParams`] holds the per-method constants of the lh4-lh7
//! family.

use crate::methods::LzhMethod;
use lhadec_core::error::Result;

/// Per-entry construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Compression method of the entry.
    pub method: LzhMethod,
    /// Declared uncompressed size in bytes.
    pub original_size: u64,
}

impl DecoderConfig {
    /// Create a configuration for a known method.
    pub fn new(method: LzhMethod, original_size: u64) -> Self {
        Self {
            method,
            original_size,
        }
    }

    /// Create a configuration from a header's 5-byte method signature.
    ///
    /// Fails with `UnknownMethod` for signatures that are not LHA methods.
    pub fn from_signature(signature: &[u8], original_size: u64) -> Result<Self> {
        Ok(Self::new(LzhMethod::from_id(signature)?, original_size))
    }

    /// Dictionary bits for the entry's method.
    pub fn dictionary_bits(&self) -> u8 {
        self.method.dictionary_bits()
    }

    /// Length adjustment for the entry's method.
    pub fn position_adjust(&self) -> u16 {
        self.method.position_adjust()
    }
}

/// Parameters of the lh4-lh7 static Huffman family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticParams {
    /// Dictionary size in bits.
    pub dictionary_bits: u8,
    /// Number of position codes (`np`).
    pub position_codes: usize,
    /// Bits used to transmit the position code count (`pbit`).
    pub position_bits: u8,
}

impl StaticParams {
    /// lh4: 4KB window.
    pub const LH4: Self = Self {
        dictionary_bits: 12,
        position_codes: 14,
        position_bits: 4,
    };

    /// lh5: 8KB window.
    pub const LH5: Self = Self {
        dictionary_bits: 13,
        position_codes: 14,
        position_bits: 4,
    };

    /// lh6: 32KB window.
    pub const LH6: Self = Self {
        dictionary_bits: 15,
        position_codes: 16,
        position_bits: 5,
    };

    /// lh7: 64KB window.
    pub const LH7: Self = Self {
        dictionary_bits: 16,
        position_codes: 17,
        position_bits: 5,
    };

    /// Parameters for a method, if it belongs to the family.
    pub fn for_method(method: LzhMethod) -> Option<Self> {
        match method {
            LzhMethod::Lh4 => Some(Self::LH4),
            LzhMethod::Lh5 => Some(Self::LH5),
            LzhMethod::Lh6 => Some(Self::LH6),
            LzhMethod::Lh7 => Some(Self::LH7),
            _ => None,
        }
    }
}
