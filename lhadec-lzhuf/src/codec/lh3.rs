//! lh3: static Huffman tables sent as plain lengths at every block.
//!
//! Block header layout:
//!
//! ```text
//! block size        16 bits  (codes in this block)
//! code lengths      286 x { present: 1 bit, [length - 1: 4 bits] }
//! position flag     1 bit
//! position lengths  128 x 4 bits, only when the flag is set
//! ```
//!
//! If the first three lengths of either table are all 1, the rest of that
//! table is replaced by a single symbol id and the table decodes that
//! symbol without consuming bits.

use super::read_position_low;
use crate::huffman::{DecodeTable, fixed_lengths};
use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use std::io::Read;
use tracing::debug;

const CODE_SYMBOLS: usize = 286;
const CODE_TABLE_BITS: u8 = 12;
const EXTENDED_CODE: u16 = 285;
const EXTENSION_BITS: u8 = 8;
const POSITION_SYMBOLS: usize = 128;
const POSITION_TABLE_BITS: u8 = 8;
/// Bits of the symbol id that replaces a degenerate code table.
const UNIFORM_CODE_BITS: u8 = 9;
/// Bits of the symbol id that replaces a degenerate position table.
const UNIFORM_POSITION_BITS: u8 = 7;
/// Default position lengths when the header does not send any.
const POSITION_INITIAL_LENGTH: u8 = 2;
const POSITION_STEPS: [usize; 7] = [0x01, 0x01, 0x03, 0x06, 0x0D, 0x1F, 0x4E];

/// lh3 decoder state.
#[derive(Debug, Clone)]
pub struct Lh3Codec {
    block_remaining: u16,
    code: DecodeTable,
    position: DecodeTable,
}

impl Lh3Codec {
    /// Create an lh3 decoder.
    pub fn new() -> Self {
        Self {
            block_remaining: 0,
            code: DecodeTable::new(CODE_SYMBOLS, CODE_TABLE_BITS),
            position: DecodeTable::new(POSITION_SYMBOLS, POSITION_TABLE_BITS),
        }
    }

    pub(crate) fn initialize<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        reader.fill(16)?;
        self.block_remaining = 0;
        debug!("lh3 decoder initialized");
        Ok(())
    }

    pub(crate) fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        if self.block_remaining == 0 {
            self.read_block_header(reader)?;
        }
        self.block_remaining = self.block_remaining.wrapping_sub(1);

        let code = self.code.decode(reader)?;
        if code == EXTENDED_CODE {
            Ok(code + reader.get_bits(EXTENSION_BITS)?)
        } else {
            Ok(code)
        }
    }

    pub(crate) fn decode_position<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<usize> {
        let high = self.position.decode(reader)?;
        read_position_low(reader, high)
    }

    fn read_block_header<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        self.block_remaining = reader.get_bits(16)?;

        let mut lengths = [0u8; CODE_SYMBOLS];
        let mut uniform = false;
        for i in 0..CODE_SYMBOLS {
            lengths[i] = if reader.get_bits(1)? != 0 {
                reader.get_bits(4)? as u8 + 1
            } else {
                0
            };
            if i == 2 && lengths[..3] == [1, 1, 1] {
                let symbol = reader.get_bits(UNIFORM_CODE_BITS)?;
                self.code.fill_uniform(usize::from(symbol))?;
                uniform = true;
                break;
            }
        }
        if !uniform {
            self.code.build(&lengths)?;
        }

        let transmitted = reader.get_bits(1)? != 0;
        if transmitted {
            let mut lengths = [0u8; POSITION_SYMBOLS];
            let mut uniform = false;
            for i in 0..POSITION_SYMBOLS {
                lengths[i] = reader.get_bits(4)? as u8;
                if i == 2 && lengths[..3] == [1, 1, 1] {
                    let symbol = reader.get_bits(UNIFORM_POSITION_BITS)?;
                    self.position.fill_uniform(usize::from(symbol))?;
                    uniform = true;
                    break;
                }
            }
            if !uniform {
                self.position.build(&lengths)?;
            }
        } else {
            let lengths =
                fixed_lengths(POSITION_INITIAL_LENGTH, &POSITION_STEPS, POSITION_SYMBOLS);
            self.position.build(&lengths)?;
        }

        debug!(
            block_size = self.block_remaining,
            positions_sent = transmitted,
            "lh3 block header"
        );
        Ok(())
    }
}

impl Default for Lh3Codec {
    fn default() -> Self {
        Self::new()
    }
}
