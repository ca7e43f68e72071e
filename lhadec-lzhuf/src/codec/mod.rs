//! Symbol and position decoders for the window-based LZH methods.
//!
//! Each method turns the bitstream into a sequence of *codes*: values
//! 0-255 are literal bytes, larger values announce a match whose length is
//! the code minus the method's adjustment. After a match code the method
//! decodes a *position*, the distance back from the write cursor minus one.
//!
//! [`Codec`] is the closed set of these methods. Stored and directory
//! entries need no codec and are handled by the decoder directly.

mod lh1;
mod lh2;
mod lh3;
mod lh5;
mod lz5;
mod lzs;

pub use lh1::Lh1Codec;
pub use lh2::Lh2Codec;
pub use lh3::Lh3Codec;
pub use lh5::Lh5Codec;
pub use lz5::Lz5Codec;
pub use lzs::LzsCodec;

use crate::config::StaticParams;
use crate::methods::LzhMethod;
use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use lhadec_core::window::SlidingWindow;
use std::io::Read;

/// Low bits sent verbatim after a position code in lh1-lh3.
const POSITION_LOW_BITS: u8 = 6;

/// Combine a position code with its verbatim low bits.
fn read_position_low<R: Read>(reader: &mut BitReader<R>, high: u16) -> Result<usize> {
    let low = reader.get_bits(POSITION_LOW_BITS)?;
    Ok((usize::from(high) << POSITION_LOW_BITS) + usize::from(low))
}

/// A classified code from the symbol stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Emit one byte.
    Literal(u8),
    /// Copy this many bytes from the window.
    Match(usize),
}

impl Code {
    /// Split a raw code into literal or match using the method's adjustment.
    pub fn classify(code: u16, adjust: u16) -> Self {
        match u8::try_from(code) {
            Ok(byte) => Self::Literal(byte),
            Err(_) => Self::Match(usize::from(code - adjust)),
        }
    }
}

/// Decoder state a position decode may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionContext {
    /// Window write position before the match is copied.
    pub write_pos: usize,
    /// Bytes decoded before this match.
    pub decoded: u64,
}

/// Per-method decoder for the window-based methods.
#[derive(Debug, Clone)]
pub enum Codec {
    /// lh1: adaptive codes, fixed positions.
    Lh1(Lh1Codec),
    /// lh2: adaptive codes and positions.
    Lh2(Lh2Codec),
    /// lh3: static tables with plain per-block lengths.
    Lh3(Lh3Codec),
    /// lh4-lh7: static tables with coded lengths.
    Lh5(Lh5Codec),
    /// lzs: fixed-width LZSS.
    Lzs(LzsCodec),
    /// lz5: flag-byte LZSS over a seeded dictionary.
    Lz5(Lz5Codec),
}

impl Codec {
    /// Create the codec for a method, or `None` if the method has no window.
    pub fn for_method(method: LzhMethod) -> Option<Self> {
        let codec = match method {
            LzhMethod::Lh1 => Self::Lh1(Lh1Codec::new()),
            LzhMethod::Lh2 => Self::Lh2(Lh2Codec::new()),
            LzhMethod::Lh3 => Self::Lh3(Lh3Codec::new()),
            LzhMethod::Lzs => Self::Lzs(LzsCodec::new()),
            LzhMethod::Lz5 => Self::Lz5(Lz5Codec::new()),
            other => Self::Lh5(Lh5Codec::new(StaticParams::for_method(other)?)),
        };
        Some(codec)
    }

    /// Prepare the bit reader and any initial tables or dictionary contents.
    pub fn initialize<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        window: &mut SlidingWindow,
    ) -> Result<()> {
        match self {
            Self::Lh1(codec) => codec.initialize(reader),
            Self::Lh2(codec) => codec.initialize(reader),
            Self::Lh3(codec) => codec.initialize(reader),
            Self::Lh5(codec) => codec.initialize(reader),
            Self::Lzs(codec) => codec.initialize(reader),
            Self::Lz5(codec) => {
                codec.initialize(window);
                Ok(())
            }
        }
    }

    /// Decode the next raw code.
    pub fn decode_code<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        match self {
            Self::Lh1(codec) => codec.decode_code(reader),
            Self::Lh2(codec) => codec.decode_code(reader),
            Self::Lh3(codec) => codec.decode_code(reader),
            Self::Lh5(codec) => codec.decode_code(reader),
            Self::Lzs(codec) => codec.decode_code(reader),
            Self::Lz5(codec) => codec.decode_code(reader),
        }
    }

    /// Decode the position that follows a match code.
    pub fn decode_position<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        ctx: PositionContext,
    ) -> Result<usize> {
        match self {
            Self::Lh1(codec) => codec.decode_position(reader),
            Self::Lh2(codec) => codec.decode_position(reader, ctx.decoded),
            Self::Lh3(codec) => codec.decode_position(reader),
            Self::Lh5(codec) => codec.decode_position(reader),
            Self::Lzs(codec) => Ok(codec.decode_position(ctx.write_pos)),
            Self::Lz5(codec) => Ok(codec.decode_position(ctx.write_pos)),
        }
    }
}
