//! # lhadec Core
//!
//! Core components for the lhadec LZH/LHA payload decoder.
//!
//! This crate provides the building blocks shared by every LZH method:
//!
//! - [`bitstream`]: MSB-first bit input with a 16-bit look-ahead window
//! - [`window`]: Sliding dictionary used as history and output staging
//! - [`traits`]: The pull-style [`Decompressor`] contract
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Archive layer (external)                                │
//! │     headers, entry index, CRC-16 / sum checks          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codec (lhadec-lzhuf)                                    │
//! │     lh0-lh7, lzs, lz4, lz5                              │
//! ├─────────────────────────────────────────────────────────┤
//! │ BitStream (this crate)                                  │
//! │     BitReader, SlidingWindow                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lhadec_core::{BitReader, SlidingWindow};
//!
//! let mut reader = BitReader::new(&[0xAB, 0xCD][..]);
//! reader.fill(16).unwrap();
//! assert_eq!(reader.get_bits(12).unwrap(), 0xABC);
//!
//! let mut window = SlidingWindow::new(12);
//! window.push_literal(b'a');
//! window.copy_match(0, 3);
//! let mut out = [0u8; 4];
//! assert_eq!(window.drain(&mut out), 4);
//! assert_eq!(&out, b"aaaa");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use bitstream::BitReader;
pub use error::{LhaError, Result};
pub use traits::{Decompressor, ReadStatus};
pub use window::SlidingWindow;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::BitReader;
    pub use crate::error::{LhaError, Result};
    pub use crate::traits::{Decompressor, ReadStatus};
    pub use crate::window::SlidingWindow;
}
