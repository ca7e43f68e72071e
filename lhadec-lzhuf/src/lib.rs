//! # lhadec LZHuf
//!
//! Decoders for the compression methods found in LZH/LHA archives.
//!
//! | method | scheme | window |
//! |--------|--------|--------|
//! | lh0, lz4 | stored | - |
//! | lh1 | adaptive Huffman, fixed position table | 4KB |
//! | lh2 | adaptive Huffman, adaptive positions | 8KB |
//! | lh3 | static Huffman, plain lengths per block | 8KB |
//! | lh4-lh7 | static Huffman, coded lengths per block | 4KB-64KB |
//! | lzs | fixed-width LZSS | 2KB |
//! | lz5 | flag-byte LZSS, seeded dictionary | 4KB |
//! | lhd | directory, no data | - |
//!
//! The archive layer hands the decoder a byte source positioned at the
//! entry's payload, the method and the declared original size. Output is
//! pulled with [`Decompressor::decompress`] or through [`std::io::Read`].
//!
//! ## Example
//!
//! ```rust
//! use lhadec_lzhuf::{DecoderConfig, LzhDecoder, LzhMethod};
//! use lhadec_core::Decompressor;
//!
//! let payload = b"stored entry";
//! let config = DecoderConfig::from_signature(b"-lh0-", payload.len() as u64).unwrap();
//! let mut decoder = LzhDecoder::new(&payload[..], config).unwrap();
//!
//! assert_eq!(decoder.method(), LzhMethod::Lh0);
//! assert_eq!(decoder.decompress_all().unwrap(), payload);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adaptive;
pub mod codec;
pub mod config;
pub mod decode;
pub mod huffman;
pub mod methods;

// Re-exports
pub use adaptive::{CodeTree, PositionTree};
pub use codec::Codec;
pub use config::{DecoderConfig, StaticParams};
pub use decode::{DecoderState, LzhDecoder, decode_lzh};
pub use huffman::DecodeTable;
pub use lhadec_core::{Decompressor, LhaError, ReadStatus, Result};
pub use methods::LzhMethod;
