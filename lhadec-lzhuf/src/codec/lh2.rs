//! lh2: adaptive Huffman codes and adaptive positions.

use super::read_position_low;
use crate::adaptive::{CodeTree, PositionTree};
use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use std::io::Read;
use tracing::debug;

/// 256 literals plus 29 short lengths and one extension code.
const CODE_SYMBOLS: usize = 286;
/// The last code is followed by 8 bits extending the match length.
const EXTENDED_CODE: u16 = 285;
const EXTENSION_BITS: u8 = 8;
const DICTIONARY_BITS: u8 = 13;

/// lh2 decoder state.
#[derive(Debug, Clone)]
pub struct Lh2Codec {
    code: CodeTree,
    position: PositionTree,
}

impl Lh2Codec {
    /// Create an lh2 decoder.
    pub fn new() -> Self {
        Self {
            code: CodeTree::new(CODE_SYMBOLS),
            position: PositionTree::new(DICTIONARY_BITS),
        }
    }

    pub(crate) fn initialize<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        reader.fill(16)?;
        debug!("lh2 decoder initialized");
        Ok(())
    }

    pub(crate) fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        let code = self.code.decode(reader)?;
        if code == EXTENDED_CODE {
            Ok(code + reader.get_bits(EXTENSION_BITS)?)
        } else {
            Ok(code)
        }
    }

    pub(crate) fn decode_position<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        decoded: u64,
    ) -> Result<usize> {
        let high = self.position.decode(reader, decoded)?;
        read_position_low(reader, high)
    }
}

impl Default for Lh2Codec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_positions_need_only_low_bits() {
        // below 64 bytes of output the position tree has one symbol
        let mut codec = Lh2Codec::new();
        let data = [0b1111_1100, 0, 0];
        let mut reader = BitReader::new(&data[..]);
        codec.initialize(&mut reader).unwrap();
        assert_eq!(codec.decode_position(&mut reader, 10).unwrap(), 63);
        assert_eq!(reader.bit_position(), 6);
    }
}
