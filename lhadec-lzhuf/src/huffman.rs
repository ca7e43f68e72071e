//! Canonical Huffman decode tables.
//!
//! LZH transmits Huffman codes as per-symbol bit lengths only. Codes are
//! assigned shortest first and, within one length, in symbol order. A
//! [`DecodeTable`] resolves the first `table_bits` bits of the look-ahead
//! window with one array lookup; longer codes continue through a small
//! binary tree whose nodes are allocated after the symbol ids.

use crate::methods::constants::MAX_CODE_LENGTH;
use lhadec_core::bitstream::{BitReader, WINDOW_BITS};
use lhadec_core::error::{LhaError, Result};
use std::io::Read;

/// Where a table or tree link is stored while building.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Table(usize),
    Left(usize),
    Right(usize),
}

/// Lookup table plus overflow tree for one canonical code.
///
/// Entries below `symbols` are symbol ids; anything else is a tree node.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    /// Alphabet size.
    symbols: usize,
    /// Width of the direct lookup.
    table_bits: u8,
    /// Direct lookup by `table_bits`-bit prefix.
    table: Vec<u16>,
    /// Overflow tree, 0-bit branches.
    left: Vec<u16>,
    /// Overflow tree, 1-bit branches.
    right: Vec<u16>,
    /// Code length per symbol (0 for unused symbols).
    lengths: Vec<u8>,
}

impl DecodeTable {
    /// Create an empty table for `symbols` symbols.
    ///
    /// # Panics
    ///
    /// Panics if `table_bits` is not in 1..=16.
    pub fn new(symbols: usize, table_bits: u8) -> Self {
        assert!(
            (1..=WINDOW_BITS).contains(&table_bits),
            "Table bits must be in 1..=16, got {}",
            table_bits
        );
        Self {
            symbols,
            table_bits,
            table: vec![0; 1 << table_bits],
            left: vec![0; 2 * symbols],
            right: vec![0; 2 * symbols],
            lengths: vec![0; symbols],
        }
    }

    /// Alphabet size.
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// Width of the direct lookup.
    pub fn table_bits(&self) -> u8 {
        self.table_bits
    }

    /// Code lengths the table was last built from.
    pub fn lengths(&self) -> &[u8] {
        &self.lengths
    }

    /// Build the table from per-symbol code lengths.
    ///
    /// `lengths` may be shorter than the alphabet; missing symbols are
    /// unused. The lengths must form a complete prefix code: the sum of
    /// `2^(16 - len)` over used symbols must be exactly `2^16`. Nothing is
    /// written when validation fails.
    pub fn build(&mut self, lengths: &[u8]) -> Result<()> {
        if lengths.len() > self.symbols {
            return Err(LhaError::bad_table(format!(
                "{} code lengths for {} symbols",
                lengths.len(),
                self.symbols
            )));
        }

        let mut count = [0u32; 17];
        for &len in lengths {
            if len > MAX_CODE_LENGTH {
                return Err(LhaError::bad_table(format!(
                    "code length {} exceeds {}",
                    len, MAX_CODE_LENGTH
                )));
            }
            count[usize::from(len)] += 1;
        }

        let mut weight = [0u32; 17];
        let mut start = [0u32; 17];
        let mut total = 0u32;
        for len in 1..=16 {
            weight[len] = 1 << (16 - len);
            start[len] = total;
            total += weight[len] * count[len];
        }
        if total != 1 << 16 {
            return Err(LhaError::bad_table(format!(
                "code lengths cover {:#x} of 0x10000",
                total
            )));
        }

        let table_bits = usize::from(self.table_bits);
        let shift = 16 - table_bits;
        for len in 1..=table_bits {
            start[len] >>= shift;
            weight[len] >>= shift;
        }

        self.table.fill(0);
        self.lengths.fill(0);
        self.lengths[..lengths.len()].copy_from_slice(lengths);

        let mut avail = self.symbols;
        for (symbol, &len) in lengths.iter().enumerate() {
            let len = usize::from(len);
            if len == 0 {
                continue;
            }
            let next = start[len] + weight[len];
            if len <= table_bits {
                self.table[start[len] as usize..next as usize].fill(symbol as u16);
            } else {
                let mut code = start[len];
                let mut slot = Slot::Table((code >> shift) as usize);
                code = (code << table_bits) & 0xFFFF;
                for _ in table_bits..len {
                    let mut node = usize::from(self.link(slot));
                    if node == 0 {
                        node = avail;
                        avail += 1;
                        self.left[node] = 0;
                        self.right[node] = 0;
                        self.set_link(slot, node as u16);
                    }
                    slot = if code & 0x8000 != 0 {
                        Slot::Right(node)
                    } else {
                        Slot::Left(node)
                    };
                    code = (code << 1) & 0xFFFF;
                }
                self.set_link(slot, symbol as u16);
            }
            start[len] = next;
        }

        Ok(())
    }

    /// Make every prefix decode to `symbol` without consuming bits.
    ///
    /// Used when a block header declares a single-symbol alphabet.
    pub fn fill_uniform(&mut self, symbol: usize) -> Result<()> {
        if symbol >= self.symbols {
            return Err(LhaError::bad_table(format!(
                "uniform symbol {} outside alphabet of {}",
                symbol, self.symbols
            )));
        }
        self.lengths.fill(0);
        self.table.fill(symbol as u16);
        Ok(())
    }

    /// Decode one symbol from the reader's look-ahead window.
    pub fn decode<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        let prefix = reader.window() >> (WINDOW_BITS - self.table_bits);
        let mut j = usize::from(self.table[usize::from(prefix)]);
        if j < self.symbols {
            reader.fill(self.lengths[j])?;
            return Ok(j as u16);
        }

        reader.fill(self.table_bits)?;
        let window = reader.window();
        let mut mask = 0x8000u16;
        loop {
            j = usize::from(if window & mask != 0 {
                self.right[j]
            } else {
                self.left[j]
            });
            mask >>= 1;
            if j < self.symbols {
                break;
            }
            if mask == 0 && j == usize::from(self.left[j]) {
                return Err(LhaError::bad_table("degenerate overflow tree"));
            }
        }
        reader.fill(self.lengths[j].saturating_sub(self.table_bits))?;
        Ok(j as u16)
    }

    fn link(&self, slot: Slot) -> u16 {
        match slot {
            Slot::Table(i) => self.table[i],
            Slot::Left(i) => self.left[i],
            Slot::Right(i) => self.right[i],
        }
    }

    fn set_link(&mut self, slot: Slot, value: u16) {
        match slot {
            Slot::Table(i) => self.table[i] = value,
            Slot::Left(i) => self.left[i] = value,
            Slot::Right(i) => self.right[i] = value,
        }
    }
}

/// Expand a hard-coded length table.
///
/// Symbols start at `initial` bits; the length grows by one at each symbol
/// listed in `steps`.
pub fn fixed_lengths(initial: u8, steps: &[usize], symbols: usize) -> Vec<u8> {
    let mut lengths = Vec::with_capacity(symbols);
    let mut len = initial;
    let mut steps = steps.iter().peekable();
    for symbol in 0..symbols {
        while steps.next_if(|&&step| step == symbol).is_some() {
            len += 1;
        }
        lengths.push(len);
    }
    lengths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &[u8]) -> BitReader<&[u8]> {
        let mut reader = BitReader::new(data);
        reader.fill(16).unwrap();
        reader
    }

    #[test]
    fn test_short_codes_direct_lookup() {
        // 0, 10, 110, 111
        let mut table = DecodeTable::new(4, 8);
        table.build(&[1, 2, 3, 3]).unwrap();

        let data = [0b0101_1011, 0b1000_0000];
        let mut r = reader(&data);
        let decoded: Vec<u16> = (0..4).map(|_| table.decode(&mut r).unwrap()).collect();
        assert_eq!(decoded, vec![0, 1, 2, 3]);
        assert_eq!(r.bit_position(), 9);
    }

    #[test]
    fn test_overflow_tree_matches_direct_lookup() {
        let mut narrow = DecodeTable::new(4, 1);
        narrow.build(&[1, 2, 3, 3]).unwrap();

        // 111 110 10 0
        let data = [0b1111_1010, 0b0000_0000];
        let mut r = reader(&data);
        assert_eq!(narrow.decode(&mut r).unwrap(), 3);
        assert_eq!(narrow.decode(&mut r).unwrap(), 2);
        assert_eq!(narrow.decode(&mut r).unwrap(), 1);
        assert_eq!(narrow.decode(&mut r).unwrap(), 0);
        assert_eq!(r.bit_position(), 9);
    }

    #[test]
    fn test_sixteen_bit_codes() {
        // lengths 1..=16 plus a second 16-bit code: a complete code
        let mut lengths: Vec<u8> = (1..=16).collect();
        lengths.push(16);
        let mut table = DecodeTable::new(lengths.len(), 8);
        table.build(&lengths).unwrap();

        // sixteen ones, then 1111_1111_0, then 0
        let data = [0xFF, 0xFF, 0xFF, 0x00];
        let mut r = reader(&data);
        assert_eq!(table.decode(&mut r).unwrap(), 16);
        assert_eq!(table.decode(&mut r).unwrap(), 8);
        assert_eq!(table.decode(&mut r).unwrap(), 0);
        assert_eq!(r.bit_position(), 26);
    }

    #[test]
    fn test_unused_symbols_are_skipped() {
        let mut table = DecodeTable::new(6, 4);
        table.build(&[0, 1, 0, 2, 2]).unwrap();
        let data = [0b0101_1000, 0];
        let mut r = reader(&data);
        assert_eq!(table.decode(&mut r).unwrap(), 1);
        assert_eq!(table.decode(&mut r).unwrap(), 3);
        assert_eq!(table.decode(&mut r).unwrap(), 4);
        assert_eq!(table.lengths(), &[0, 1, 0, 2, 2, 0]);
    }

    #[test]
    fn test_oversubscribed_table_is_rejected_untouched() {
        let mut table = DecodeTable::new(18, 8);
        table.build(&[1, 1]).unwrap();
        let before = table.table.clone();

        // weights sum to 2^16 + 1
        let mut lengths: Vec<u8> = (1..=16).collect();
        lengths.push(16);
        lengths.push(16);
        let err = table.build(&lengths).unwrap_err();
        assert!(matches!(err, LhaError::BadTable { .. }));
        assert_eq!(table.table, before);
        assert_eq!(&table.lengths()[..2], &[1, 1]);
    }

    #[test]
    fn test_incomplete_table_is_rejected() {
        let mut table = DecodeTable::new(3, 8);
        assert!(table.build(&[1, 2]).is_err());
        assert!(table.build(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_overlong_length_is_rejected() {
        let mut table = DecodeTable::new(3, 8);
        let err = table.build(&[1, 17, 1]).unwrap_err();
        assert!(err.to_string().contains("exceeds 16"));
    }

    #[test]
    fn test_too_many_lengths_is_rejected() {
        let mut table = DecodeTable::new(2, 8);
        assert!(table.build(&[2, 2, 2, 2]).is_err());
    }

    #[test]
    fn test_uniform_consumes_no_bits() {
        let mut table = DecodeTable::new(19, 8);
        table.fill_uniform(7).unwrap();
        let mut r = reader(&[0xA5, 0x5A]);
        assert_eq!(table.decode(&mut r).unwrap(), 7);
        assert_eq!(table.decode(&mut r).unwrap(), 7);
        assert_eq!(r.bit_position(), 0);

        assert!(table.fill_uniform(19).is_err());
    }

    #[test]
    fn test_degenerate_tree_is_rejected() {
        let mut table = DecodeTable::new(2, 1);
        // a self-referencing node reachable from both prefixes
        table.table = vec![2, 2];
        table.left[2] = 2;
        table.right[2] = 2;
        let mut r = reader(&[0, 0, 0]);
        assert!(matches!(
            table.decode(&mut r),
            Err(LhaError::BadTable { .. })
        ));
    }

    #[test]
    fn test_fixed_lengths() {
        let lengths = fixed_lengths(3, &[0x01, 0x04, 0x0c, 0x18, 0x30], 64);
        assert_eq!(lengths[0], 3);
        assert_eq!(&lengths[1..4], &[4, 4, 4]);
        assert_eq!(lengths[11], 5);
        assert_eq!(lengths[12], 6);
        assert_eq!(lengths[47], 7);
        assert_eq!(lengths[63], 8);

        let mut table = DecodeTable::new(64, 8);
        table.build(&lengths).unwrap();
    }
}
