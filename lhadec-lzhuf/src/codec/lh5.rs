//! lh4-lh7: static Huffman tables with Huffman-coded lengths.
//!
//! Each block starts with:
//!
//! ```text
//! block size          16 bits
//! length-code lengths  (NT symbols, 3-bit lengths with unary extension)
//! code lengths         9-bit count, each length coded with the table above
//! position lengths     (np symbols, same scheme as the length-code lengths)
//! ```
//!
//! A count of zero in any of the three tables is followed by a single
//! symbol id, and the table decodes that symbol without consuming bits.

use crate::config::StaticParams;
use crate::huffman::DecodeTable;
use crate::methods::constants::{CBIT, MAX_CODE_LENGTH, NC, NPT, NT, TBIT};
use lhadec_core::bitstream::BitReader;
use lhadec_core::error::{LhaError, Result};
use std::io::Read;
use tracing::debug;

const CODE_TABLE_BITS: u8 = 12;
const PT_TABLE_BITS: u8 = 8;
/// After this many length-code lengths, 2 bits give a run of zero lengths.
const PT_SPECIAL_INDEX: usize = 3;

/// Decoder state for one of lh4, lh5, lh6 or lh7.
#[derive(Debug, Clone)]
pub struct Lh5Codec {
    params: StaticParams,
    block_remaining: u16,
    code: DecodeTable,
    /// Lengths of the code table's lengths.
    pt: DecodeTable,
    position: DecodeTable,
}

impl Lh5Codec {
    /// Create a decoder for the given family member.
    pub fn new(params: StaticParams) -> Self {
        Self {
            params,
            block_remaining: 0,
            code: DecodeTable::new(NC, CODE_TABLE_BITS),
            pt: DecodeTable::new(NT, PT_TABLE_BITS),
            position: DecodeTable::new(params.position_codes, PT_TABLE_BITS),
        }
    }

    /// Parameters of this family member.
    pub fn params(&self) -> StaticParams {
        self.params
    }

    pub(crate) fn initialize<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        reader.fill(16)?;
        self.block_remaining = 0;
        debug!(
            dictionary_bits = self.params.dictionary_bits,
            "static Huffman decoder initialized"
        );
        Ok(())
    }

    pub(crate) fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        if self.block_remaining == 0 {
            self.block_remaining = reader.get_bits(16)?;
            read_pt_lengths(reader, &mut self.pt, TBIT, Some(PT_SPECIAL_INDEX))?;
            self.read_code_lengths(reader)?;
            read_pt_lengths(reader, &mut self.position, self.params.position_bits, None)?;
            debug!(block_size = self.block_remaining, "block header");
        }
        self.block_remaining = self.block_remaining.wrapping_sub(1);
        self.code.decode(reader)
    }

    pub(crate) fn decode_position<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<usize> {
        let code = self.position.decode(reader)?;
        if code == 0 {
            return Ok(0);
        }
        let extra = (code - 1) as u8;
        Ok((1usize << extra) + usize::from(reader.get_bits(extra)?))
    }

    /// Read the code table's lengths, each decoded with the pt table.
    fn read_code_lengths<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        let count = usize::from(reader.get_bits(CBIT)?);
        if count == 0 {
            let symbol = reader.get_bits(CBIT)?;
            return self.code.fill_uniform(usize::from(symbol));
        }

        let mut lengths = [0u8; NC];
        let limit = count.min(NC);
        let mut i = 0;
        while i < limit {
            let c = self.pt.decode(reader)?;
            let run = match c {
                0 => 1,
                1 => usize::from(reader.get_bits(4)?) + 3,
                2 => usize::from(reader.get_bits(CBIT)?) + 20,
                len => {
                    lengths[i] = (len - 2) as u8;
                    i += 1;
                    continue;
                }
            };
            if i + run > NC {
                return Err(LhaError::bad_table(format!(
                    "zero run of {} at code {} overflows {} codes",
                    run, i, NC
                )));
            }
            i += run;
        }
        self.code.build(&lengths)
    }
}

/// Read a length table sent with 3-bit lengths and unary extension.
///
/// Used for the pt table and the position table. `special` is the index
/// after which a 2-bit run of zero lengths follows.
fn read_pt_lengths<R: Read>(
    reader: &mut BitReader<R>,
    table: &mut DecodeTable,
    count_bits: u8,
    special: Option<usize>,
) -> Result<()> {
    let count = usize::from(reader.get_bits(count_bits)?);
    if count == 0 {
        let symbol = reader.get_bits(count_bits)?;
        return table.fill_uniform(usize::from(symbol));
    }

    let mut lengths = [0u8; NPT];
    let limit = count.min(NPT);
    let mut i = 0;
    while i < limit {
        let mut len = reader.window() >> 13;
        if len == 7 {
            let mut mask = 1u16 << 12;
            while mask & reader.window() != 0 {
                mask >>= 1;
                len += 1;
            }
            if len > u16::from(MAX_CODE_LENGTH) {
                return Err(LhaError::bad_table(format!(
                    "length {} exceeds {}",
                    len, MAX_CODE_LENGTH
                )));
            }
            reader.fill(len as u8 - 3)?;
        } else {
            reader.fill(3)?;
        }
        lengths[i] = len as u8;
        i += 1;

        if Some(i) == special {
            let mut zeros = reader.get_bits(2)?;
            while zeros > 0 && i < NPT {
                lengths[i] = 0;
                i += 1;
                zeros -= 1;
            }
        }
    }

    let symbols = table.symbols();
    table.build(&lengths[..symbols])
}
