//! lh1: adaptive Huffman codes with a fixed position table.

use super::read_position_low;
use crate::adaptive::CodeTree;
use crate::huffman::{DecodeTable, fixed_lengths};
use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use std::io::Read;
use tracing::debug;

/// 256 literals plus match lengths 3..=60.
const CODE_SYMBOLS: usize = 314;
/// Position codes cover the high 6 bits of a 12-bit distance.
const POSITION_SYMBOLS: usize = 64;
const POSITION_TABLE_BITS: u8 = 8;
/// Position code lengths: 3 bits for code 0, one more at each step.
const POSITION_INITIAL_LENGTH: u8 = 3;
const POSITION_STEPS: [usize; 5] = [0x01, 0x04, 0x0c, 0x18, 0x30];

/// lh1 decoder state.
#[derive(Debug, Clone)]
pub struct Lh1Codec {
    code: CodeTree,
    position: DecodeTable,
}

impl Lh1Codec {
    /// Create an lh1 decoder.
    pub fn new() -> Self {
        Self {
            code: CodeTree::new(CODE_SYMBOLS),
            position: DecodeTable::new(POSITION_SYMBOLS, POSITION_TABLE_BITS),
        }
    }

    pub(crate) fn initialize<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        reader.fill(16)?;
        let lengths = fixed_lengths(POSITION_INITIAL_LENGTH, &POSITION_STEPS, POSITION_SYMBOLS);
        self.position.build(&lengths)?;
        debug!("lh1 decoder initialized");
        Ok(())
    }

    pub(crate) fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        self.code.decode(reader)
    }

    pub(crate) fn decode_position<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<usize> {
        let high = self.position.decode(reader)?;
        read_position_low(reader, high)
    }
}

impl Default for Lh1Codec {
    fn default() -> Self {
        Self::new()
    }
}
