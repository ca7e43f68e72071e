//! LZH compression method definitions.
//!
//! Every LHA entry names its method with a 5-byte signature such as
//! `-lh5-`. This module maps those signatures to the decoder parameters
//! the core needs: dictionary size and the length adjustment for matches.

use lhadec_core::error::{LhaError, Result};
use std::str::FromStr;

/// LZH compression method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LzhMethod {
    /// lhd: Directory entry, carries no data.
    Lhd,
    /// lh0: Stored (no compression).
    Lh0,
    /// lh1: 4KB window, adaptive Huffman codes, fixed position table.
    Lh1,
    /// lh2: 8KB window, adaptive Huffman codes and positions.
    Lh2,
    /// lh3: 8KB window, static Huffman per block.
    Lh3,
    /// lh4: 4KB window, static Huffman.
    Lh4,
    /// lh5: 8KB window, static Huffman (most common).
    #[default]
    Lh5,
    /// lh6: 32KB window, static Huffman.
    Lh6,
    /// lh7: 64KB window, static Huffman.
    Lh7,
    /// lzs: 2KB window, LArc fixed-width codes.
    Lzs,
    /// lz4: Stored (LArc).
    Lz4,
    /// lz5: 4KB window, LArc flag-byte codes.
    Lz5,
    /// pm1: PMarc method, no decoder.
    Pm1,
    /// pm2: PMarc method, no decoder.
    Pm2,
}

impl LzhMethod {
    /// Every method signature known to the decoder.
    pub const ALL: [LzhMethod; 14] = [
        Self::Lhd,
        Self::Lh0,
        Self::Lh1,
        Self::Lh2,
        Self::Lh3,
        Self::Lh4,
        Self::Lh5,
        Self::Lh6,
        Self::Lh7,
        Self::Lzs,
        Self::Lz4,
        Self::Lz5,
        Self::Pm1,
        Self::Pm2,
    ];

    /// Parse method from the 5-byte method ID string.
    pub fn from_id(id: &[u8]) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.id().as_slice() == id)
            .ok_or_else(|| LhaError::unknown_method(id))
    }

    /// Get the method ID string.
    pub fn id(&self) -> &'static [u8; 5] {
        match self {
            Self::Lhd => b"-lhd-",
            Self::Lh0 => b"-lh0-",
            Self::Lh1 => b"-lh1-",
            Self::Lh2 => b"-lh2-",
            Self::Lh3 => b"-lh3-",
            Self::Lh4 => b"-lh4-",
            Self::Lh5 => b"-lh5-",
            Self::Lh6 => b"-lh6-",
            Self::Lh7 => b"-lh7-",
            Self::Lzs => b"-lzs-",
            Self::Lz4 => b"-lz4-",
            Self::Lz5 => b"-lz5-",
            Self::Pm1 => b"-pm1-",
            Self::Pm2 => b"-pm2-",
        }
    }

    /// Get the number of dictionary bits (0 for methods without a window).
    pub fn dictionary_bits(&self) -> u8 {
        match self {
            Self::Lhd | Self::Lh0 | Self::Lz4 | Self::Pm1 | Self::Pm2 => 0,
            Self::Lzs => 11,
            Self::Lh1 | Self::Lh4 | Self::Lz5 => 12,
            Self::Lh2 | Self::Lh3 | Self::Lh5 => 13,
            Self::Lh6 => 15,
            Self::Lh7 => 16,
        }
    }

    /// Get the sliding window size in bytes.
    pub fn window_size(&self) -> usize {
        match self.dictionary_bits() {
            0 => 0,
            bits => 1 << bits,
        }
    }

    /// Value subtracted from a match code to get the copy length.
    ///
    /// Codes 0-255 are literals; a code `c` above that copies
    /// `c - position_adjust()` bytes.
    pub fn position_adjust(&self) -> u16 {
        match self {
            Self::Lzs => constants::LZS_ADJUST,
            _ => constants::ADJUST,
        }
    }

    /// Check if this method is stored (no compression).
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Lh0 | Self::Lz4)
    }

    /// Check if this method marks a directory entry.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Lhd)
    }

    /// Check if a decoder exists for this method.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Pm1 | Self::Pm2)
    }

    /// Get the method name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lhd => "lhd",
            Self::Lh0 => "lh0",
            Self::Lh1 => "lh1",
            Self::Lh2 => "lh2",
            Self::Lh3 => "lh3",
            Self::Lh4 => "lh4",
            Self::Lh5 => "lh5",
            Self::Lh6 => "lh6",
            Self::Lh7 => "lh7",
            Self::Lzs => "lzs",
            Self::Lz4 => "lz4",
            Self::Lz5 => "lz5",
            Self::Pm1 => "pm1",
            Self::Pm2 => "pm2",
        }
    }

    /// Short description of the coding scheme.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Lhd => "directory",
            Self::Lh0 | Self::Lz4 => "stored",
            Self::Lh1 => "adaptive Huffman, fixed positions",
            Self::Lh2 => "adaptive Huffman, adaptive positions",
            Self::Lh3 => "static Huffman, per-block lengths",
            Self::Lh4 | Self::Lh5 | Self::Lh6 | Self::Lh7 => "static Huffman, coded lengths",
            Self::Lzs => "fixed-width LZSS",
            Self::Lz5 => "flag-byte LZSS, seeded dictionary",
            Self::Pm1 | Self::Pm2 => "PMarc (no decoder)",
        }
    }
}

impl std::fmt::Display for LzhMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LzhMethod {
    type Err = LhaError;

    /// Accepts either the bare name (`lh5`) or the signature (`-lh5-`).
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim_matches('-').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.name() == name)
            .ok_or_else(|| LhaError::unknown_method(s.as_bytes()))
    }
}

/// LZH constants for decoding.
pub mod constants {
    /// Length adjustment for every method except lzs.
    pub const ADJUST: u16 = 253;
    /// Length adjustment for lzs.
    pub const LZS_ADJUST: u16 = 254;
    /// Number of character codes (0-255 literals + 256+ lengths) for lh4-lh7.
    pub const NC: usize = 510;
    /// Number of code length codes.
    pub const NT: usize = 19;
    /// Bits used to transmit the code length code count.
    pub const TBIT: u8 = 5;
    /// Bits used to transmit the character code count.
    pub const CBIT: u8 = 9;
    /// Size of the scratch array for transmitted length tables.
    pub const NPT: usize = 0x80;
    /// Maximum number of position codes (lh7).
    pub const NP_MAX: usize = 17;
    /// Longest code length a table may declare.
    pub const MAX_CODE_LENGTH: u8 = 16;
}
