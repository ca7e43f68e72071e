//! Bit-level input for LZH payloads.
//!
//! LZH streams are packed MSB-first: the first bit of the payload is the
//! most significant bit of the first byte. [`BitReader`] keeps the next 16
//! unconsumed bits left-justified in a look-ahead window so that table
//! decoders can index by prefix before deciding how many bits to consume.
//!
//! # End of input
//!
//! Missing bytes past the end of the source are read as zero, so the
//! look-ahead window can always be topped up. Only *consuming* a bit that
//! lies beyond the real data is an error ([`LhaError::PrematureEndOfInput`]).
//!
//! # Example
//!
//! ```
//! use lhadec_core::bitstream::BitReader;
//!
//! let data = [0b1011_0011u8, 0b1100_0000];
//! let mut reader = BitReader::new(&data[..]);
//! reader.fill(16).unwrap(); // prime the window
//!
//! assert_eq!(reader.peek(4), 0b1011);
//! assert_eq!(reader.get_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.get_bits(7).unwrap(), 0b1_0011_11);
//! ```

use crate::error::{LhaError, Result};
use std::io::{ErrorKind, Read};

/// Width of the look-ahead window in bits.
pub const WINDOW_BITS: u8 = 16;

/// An MSB-first bit reader with a 16-bit look-ahead window.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying byte source.
    reader: R,
    /// Next 16 unconsumed bits, left-justified.
    bits: u16,
    /// Byte whose top `pending_count` bits follow `bits`.
    pending: u8,
    /// Number of valid bits in `pending` (0..=8).
    pending_count: u8,
    /// Bytes actually obtained from `reader`.
    bytes_read: u64,
    /// Bits shifted through the window, including the priming fill.
    bits_consumed: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given byte source.
    ///
    /// The window starts empty; bit decoders prime it with `fill(16)`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bits: 0,
            pending: 0,
            pending_count: 0,
            bytes_read: 0,
            bits_consumed: 0,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consume this `BitReader` and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Number of payload bits consumed so far (look-ahead excluded).
    pub fn bit_position(&self) -> u64 {
        self.bits_consumed.saturating_sub(u64::from(WINDOW_BITS))
    }

    /// Number of bytes pulled from the underlying reader.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// The full 16-bit look-ahead window.
    #[inline]
    pub fn window(&self) -> u16 {
        self.bits
    }

    /// Return the top `count` bits of the window without consuming them.
    #[inline]
    pub fn peek(&self, count: u8) -> u16 {
        debug_assert!(count <= WINDOW_BITS, "Cannot peek more than 16 bits");
        if count == 0 {
            0
        } else {
            self.bits >> (WINDOW_BITS - count)
        }
    }

    /// Consume `count` bits (0..=16) from the window and refill it.
    pub fn fill(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= WINDOW_BITS, "Cannot fill more than 16 bits");
        if count == 0 {
            return Ok(());
        }

        let mut n = u32::from(count);
        let mut bits = u32::from(self.bits);
        let mut pending = u32::from(self.pending);
        let mut pending_count = u32::from(self.pending_count);

        while n > pending_count {
            n -= pending_count;
            bits = ((bits << pending_count) + (pending >> (8 - pending_count))) & 0xFFFF;
            pending = u32::from(self.next_byte()?);
            pending_count = 8;
        }
        pending_count -= n;
        bits = ((bits << n) + (pending >> (8 - n))) & 0xFFFF;
        pending = (pending << n) & 0xFF;

        self.bits = bits as u16;
        self.pending = pending as u8;
        self.pending_count = pending_count as u8;
        self.bits_consumed += u64::from(count);

        if self.bit_position() > self.bytes_read * 8 {
            return Err(LhaError::premature_end(self.bit_position()));
        }
        Ok(())
    }

    /// Read `count` bits (0..=16) as an unsigned value.
    #[inline]
    pub fn get_bits(&mut self, count: u8) -> Result<u16> {
        let value = self.peek(count);
        self.fill(count)?;
        Ok(value)
    }

    /// Read one raw byte from the source, bypassing the bit window.
    ///
    /// Used by the byte-aligned formats, which never prime the window.
    pub fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_raw(&mut byte)?;
        Ok(byte[0])
    }

    /// Fill `buf` completely with raw bytes, bypassing the bit window.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => return Err(LhaError::premature_end(self.bytes_read * 8)),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(LhaError::premature_end(self.bytes_read * 8));
                }
                Ok(n) => {
                    filled += n;
                    self.bytes_read += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Next byte for the window; zero once the source is exhausted.
    fn next_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(0),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(0),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
