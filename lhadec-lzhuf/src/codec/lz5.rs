//! lz5: byte-aligned LZSS over a pre-seeded 4 KB dictionary.
//!
//! A flag byte announces the next eight items, least significant bit
//! first. A set bit is a literal byte. A clear bit is two bytes carrying
//! a 12-bit absolute window position and a 4-bit length.
//!
//! Before decoding, the dictionary is seeded so that early matches can
//! refer to common runs:
//!
//! ```text
//!    18 .. 3346   13 copies of every byte value, ascending
//!  3346 .. 3602   0x00 ..= 0xFF
//!  3602 .. 3858   0xFF ..= 0x00
//!  3858 .. 3986   zeros
//!  3986 .. 4096   spaces
//! ```

use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use lhadec_core::window::SlidingWindow;
use std::io::Read;

const POSITION_MASK: usize = 0xFFF;
/// Stored positions are absolute and run this far ahead of the cursor.
const POSITION_BIAS: usize = 19;
const SEED_START: usize = 18;
const SEED_RUN: usize = 13;

/// lz5 decoder state.
#[derive(Debug, Clone, Default)]
pub struct Lz5Codec {
    flags: u8,
    flags_left: u8,
    /// Absolute window position of the pending match.
    match_pos: usize,
}

impl Lz5Codec {
    /// Create an lz5 decoder.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn initialize(&mut self, window: &mut SlidingWindow) {
        self.flags = 0;
        self.flags_left = 0;
        self.match_pos = 0;
        seed_dictionary(window.history_mut());
    }

    pub(crate) fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        if self.flags_left == 0 {
            self.flags = reader.read_byte()?;
            self.flags_left = 8;
        }
        self.flags_left -= 1;
        let literal = self.flags & 1 != 0;
        self.flags >>= 1;

        let first = reader.read_byte()?;
        if literal {
            return Ok(u16::from(first));
        }
        let second = reader.read_byte()?;
        self.match_pos = usize::from(first) | (usize::from(second & 0xF0) << 4);
        Ok(u16::from(second & 0x0F) | 0x100)
    }

    /// Convert the stored absolute position into a distance from `write_pos`.
    pub(crate) fn decode_position(&self, write_pos: usize) -> usize {
        write_pos.wrapping_sub(self.match_pos + POSITION_BIAS) & POSITION_MASK
    }
}

/// Write the initial dictionary contents. `history` must hold 4096 bytes.
fn seed_dictionary(history: &mut [u8]) {
    let runs_end = SEED_START + 256 * SEED_RUN;
    for (i, chunk) in history[SEED_START..runs_end]
        .chunks_exact_mut(SEED_RUN)
        .enumerate()
    {
        chunk.fill(i as u8);
    }

    let ascending = runs_end;
    let descending = ascending + 256;
    let zeros = descending + 256;
    let spaces = zeros + 128;
    for i in 0..256 {
        history[ascending + i] = i as u8;
        history[descending + i] = 255 - i as u8;
    }
    history[zeros..spaces].fill(0);
    history[spaces..].fill(b' ');
}
