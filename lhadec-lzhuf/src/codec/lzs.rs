//! lzs: LZSS with fixed-width fields.
//!
//! Each item starts with a flag bit. A set flag is followed by an 8-bit
//! literal; a clear flag by an 11-bit window position and a 4-bit length.

use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use std::io::Read;

const LITERAL_BITS: u8 = 8;
const POSITION_BITS: u8 = 11;
const LENGTH_BITS: u8 = 4;
const POSITION_MASK: usize = (1 << POSITION_BITS) - 1;
/// Stored positions are absolute and run this far ahead of the cursor.
const POSITION_BIAS: usize = 18;

/// lzs decoder state.
#[derive(Debug, Clone, Default)]
pub struct LzsCodec {
    /// Absolute window position of the pending match.
    match_pos: usize,
}

impl LzsCodec {
    /// Create an lzs decoder.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn initialize<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        reader.fill(16)?;
        self.match_pos = 0;
        Ok(())
    }

    pub(crate) fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        if reader.get_bits(1)? != 0 {
            return reader.get_bits(LITERAL_BITS);
        }
        self.match_pos = usize::from(reader.get_bits(POSITION_BITS)?);
        Ok(reader.get_bits(LENGTH_BITS)? + 0x100)
    }

    /// Convert the stored absolute position into a distance from `write_pos`.
    pub(crate) fn decode_position(&self, write_pos: usize) -> usize {
        write_pos.wrapping_sub(self.match_pos + POSITION_BIAS) & POSITION_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_then_match() {
        // 1 'A'(0x41) | 0 position 0x7EE length 5
        // 1_0100_0001 0_111_1110_1110 0101
        let data = [0b1010_0000, 0b1011_1111, 0b0111_0010, 0b1000_0000, 0, 0];
        let mut codec = LzsCodec::new();
        let mut reader = BitReader::new(&data[..]);
        codec.initialize(&mut reader).unwrap();
        assert_eq!(codec.decode_code(&mut reader).unwrap(), 0x41);
        assert_eq!(codec.decode_code(&mut reader).unwrap(), 0x105);
        assert_eq!(reader.bit_position(), 25);
        // position 0x7EE is 18 short of a wrap, so at write position 1 the
        // distance is 1 - (0x7EE + 18) mod 2048 = 1
        assert_eq!(codec.decode_position(1), 1);
        assert_eq!(codec.decode_position(0), 0);
    }
}
