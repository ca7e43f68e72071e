//! Sliding dictionary for LZ77-style decompression.
//!
//! The window is both the back-reference history and the staging area for
//! output: decoded bytes are written at `end` and handed to the caller
//! from `begin` by [`SlidingWindow::drain`].
//!
//! # Sizes
//!
//! LZH methods use windows of 2^N bytes:
//! - lzs: 2 KB (N = 11)
//! - lh1, lh4, lz5: 4 KB (N = 12)
//! - lh2, lh3, lh5: 8 KB (N = 13)
//! - lh6: 32 KB (N = 15)
//! - lh7: 64 KB (N = 16)

/// A circular dictionary of `2^bits` bytes.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
    /// Oldest byte not yet drained to the caller.
    begin: usize,
    /// Next write position.
    end: usize,
    /// Bytes written but not yet drained.
    pending: usize,
}

impl SlidingWindow {
    /// Create a zero-filled window of `2^bits` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is greater than 16.
    pub fn new(bits: u8) -> Self {
        assert!(bits <= 16, "Window bits must be at most 16, got {}", bits);
        let capacity = 1usize << bits;
        Self {
            buffer: vec![0; capacity],
            mask: capacity - 1,
            begin: 0,
            end: 0,
            pending: 0,
        }
    }

    /// Get the capacity of the window.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current write position.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of decoded bytes waiting to be drained.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Mutable access to the whole dictionary, for pre-seeding history.
    ///
    /// Only meaningful before any byte has been written.
    pub fn history_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Append one literal byte.
    #[inline]
    pub fn push_literal(&mut self, byte: u8) {
        self.buffer[self.end] = byte;
        self.end = (self.end + 1) & self.mask;
        self.pending += 1;
        debug_assert!(self.pending <= self.capacity());
    }

    /// Copy `length` bytes starting `offset + 1` bytes behind the write
    /// position.
    ///
    /// Source and destination may overlap, so a short offset repeats the
    /// most recent bytes (offset 0 repeats the last byte).
    pub fn copy_match(&mut self, offset: usize, length: usize) {
        let mut src = self.end.wrapping_sub(offset).wrapping_sub(1) & self.mask;
        for _ in 0..length {
            self.buffer[self.end] = self.buffer[src];
            self.end = (self.end + 1) & self.mask;
            src = (src + 1) & self.mask;
        }
        self.pending += length;
        debug_assert!(self.pending <= self.capacity());
    }

    /// Move up to `out.len()` undelivered bytes into `out`.
    ///
    /// Returns the number of bytes copied.
    pub fn drain(&mut self, out: &mut [u8]) -> usize {
        let count = out.len().min(self.pending);
        let first = count.min(self.capacity() - self.begin);
        out[..first].copy_from_slice(&self.buffer[self.begin..self.begin + first]);
        let second = count - first;
        if second > 0 {
            out[first..count].copy_from_slice(&self.buffer[..second]);
        }
        self.begin = (self.begin + count) & self.mask;
        self.pending -= count;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_all(window: &mut SlidingWindow) -> Vec<u8> {
        let mut out = vec![0u8; window.pending()];
        let n = window.drain(&mut out);
        out.truncate(n);
        out
    }

    #[test]
    fn test_literals_and_drain() {
        let mut window = SlidingWindow::new(4);
        for &b in b"abc" {
            window.push_literal(b);
        }
        assert_eq!(window.pending(), 3);
        assert_eq!(drain_all(&mut window), b"abc");
        assert_eq!(window.pending(), 0);
    }

    #[test]
    fn test_overlapping_copy_repeats_last_byte() {
        let mut window = SlidingWindow::new(4);
        window.push_literal(b'q');
        window.push_literal(b'X');
        drain_all(&mut window);

        // offset 0 points at the last written byte
        window.copy_match(0, 5);
        assert_eq!(drain_all(&mut window), b"XXXXX");
    }

    #[test]
    fn test_copy_distance_one_back() {
        let mut window = SlidingWindow::new(4);
        for &b in b"ab" {
            window.push_literal(b);
        }
        window.copy_match(1, 5);
        assert_eq!(drain_all(&mut window), b"abababa");
    }

    #[test]
    fn test_drain_wraps_around() {
        let mut window = SlidingWindow::new(3);
        for b in 0..6u8 {
            window.push_literal(b);
        }
        drain_all(&mut window);
        for b in 6..12u8 {
            window.push_literal(b);
        }
        assert_eq!(window.end(), 4);

        let mut out = [0u8; 4];
        assert_eq!(window.drain(&mut out), 4);
        assert_eq!(out, [6, 7, 8, 9]);
        let mut out = [0u8; 8];
        assert_eq!(window.drain(&mut out), 2);
        assert_eq!(&out[..2], &[10, 11]);
    }

    #[test]
    fn test_copy_wraps_source() {
        let mut window = SlidingWindow::new(2);
        for &b in b"wxyz" {
            window.push_literal(b);
        }
        drain_all(&mut window);
        // end is back at 0; offset 3 reaches the oldest byte
        window.copy_match(3, 3);
        assert_eq!(drain_all(&mut window), b"wxy");
    }

    #[test]
    fn test_seeded_history_is_referenced() {
        let mut window = SlidingWindow::new(4);
        window.history_mut()[14] = b'!';
        // end = 0, so offset 1 resolves to index 14
        window.copy_match(1, 2);
        assert_eq!(drain_all(&mut window), [b'!', 0]);
    }

    #[test]
    fn test_partial_drain_keeps_order() {
        let mut window = SlidingWindow::new(5);
        for &b in b"hello world" {
            window.push_literal(b);
        }
        let mut out = [0u8; 3];
        window.drain(&mut out);
        assert_eq!(&out, b"hel");
        assert_eq!(drain_all(&mut window), b"lo world");
    }
}
