//! LZH entry decompression.
//!
//! [`LzhDecoder`] turns one entry's payload into its original bytes. It
//! owns the byte source, the method's [`Codec`] and the sliding window,
//! and is driven by the caller pulling output:
//!
//! 1. Bytes left in the window by an earlier call are delivered first.
//! 2. Further codes are decoded until the caller's buffer is full or the
//!    declared original size has been reached.
//!
//! Nothing is read from the source until the first non-empty request, so
//! empty files and directories never touch it.

use crate::codec::{Code, Codec, PositionContext};
use crate::config::DecoderConfig;
use crate::methods::LzhMethod;
use lhadec_core::bitstream::BitReader;
use lhadec_core::error::{LhaError, Result};
use lhadec_core::traits::{Decompressor, ReadStatus};
use lhadec_core::window::SlidingWindow;
use std::io::{self, Read};
use tracing::debug;

/// Upper bound for the up-front allocation in `decompress_all`.
const MAX_PREALLOCATION: u64 = 1 << 24;

/// Lifecycle of an [`LzhDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Nothing has been read from the source yet.
    Uninitialized,
    /// Tables and window are set up; decoding is in progress.
    Ready,
    /// Every declared byte has been delivered.
    Exhausted,
    /// A previous call failed; the decoder cannot be used any more.
    Failed,
}

/// What the decoder does with the payload.
#[derive(Debug)]
enum Payload {
    /// Directory entry: no data at all.
    Directory,
    /// Stored entry: payload bytes are the output.
    Stored,
    /// Window-based method.
    Compressed {
        codec: Box<Codec>,
        window: SlidingWindow,
        adjust: u16,
    },
}

/// Pull-style decoder for one LZH entry.
#[derive(Debug)]
pub struct LzhDecoder<R: Read> {
    reader: BitReader<R>,
    config: DecoderConfig,
    payload: Payload,
    state: DecoderState,
    /// Bytes produced into the window (or copied, for stored entries).
    decoded: u64,
    /// Bytes handed to the caller.
    delivered: u64,
}

impl<R: Read> LzhDecoder<R> {
    /// Create a decoder over an entry's payload.
    ///
    /// Fails with `UnsupportedMethod` for methods without a decoder. No
    /// bytes are read from `reader` here.
    pub fn new(reader: R, config: DecoderConfig) -> Result<Self> {
        let method = config.method;
        if !method.is_supported() {
            debug!(%method, "no decoder for method");
            return Err(LhaError::unsupported_method(method.name()));
        }

        let payload = if method.is_directory() {
            Payload::Directory
        } else if method.is_stored() {
            Payload::Stored
        } else {
            let codec = Codec::for_method(method)
                .ok_or_else(|| LhaError::unsupported_method(method.name()))?;
            Payload::Compressed {
                codec: Box::new(codec),
                window: SlidingWindow::new(config.dictionary_bits()),
                adjust: config.position_adjust(),
            }
        };

        debug!(
            %method,
            original_size = config.original_size,
            "created decoder"
        );
        Ok(Self {
            reader: BitReader::new(reader),
            config,
            payload,
            state: DecoderState::Uninitialized,
            decoded: 0,
            delivered: 0,
        })
    }

    /// Compression method of the entry.
    pub fn method(&self) -> LzhMethod {
        self.config.method
    }

    /// Declared uncompressed size.
    pub fn original_size(&self) -> u64 {
        self.config.original_size
    }

    /// Bytes handed to the caller so far.
    pub fn bytes_delivered(&self) -> u64 {
        self.delivered
    }

    /// Bytes pulled from the byte source so far, look-ahead included.
    pub fn bytes_consumed(&self) -> u64 {
        self.reader.bytes_read()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Get a reference to the byte source.
    pub fn get_ref(&self) -> &R {
        self.reader.get_ref()
    }

    /// Give the byte source back, abandoning the entry.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn initialize(&mut self) -> Result<()> {
        if let Payload::Compressed { codec, window, .. } = &mut self.payload {
            codec.initialize(&mut self.reader, window)?;
        }
        self.state = DecoderState::Ready;
        Ok(())
    }

    /// Produce up to `output.len()` bytes, never past the declared size.
    fn produce(&mut self, output: &mut [u8]) -> Result<usize> {
        let size = self.config.original_size;
        let want = output.len().min(clamp(size - self.delivered));
        let output = &mut output[..want];

        match &mut self.payload {
            Payload::Directory => Ok(0),
            Payload::Stored => {
                self.reader.read_raw(output)?;
                self.decoded += want as u64;
                Ok(want)
            }
            Payload::Compressed {
                codec,
                window,
                adjust,
            } => {
                let mut written = window.drain(output);
                while written < want && self.decoded < size {
                    let raw = codec.decode_code(&mut self.reader)?;
                    match Code::classify(raw, *adjust) {
                        Code::Literal(byte) => {
                            window.push_literal(byte);
                            self.decoded += 1;
                        }
                        Code::Match(length) => {
                            let ctx = PositionContext {
                                write_pos: window.end(),
                                decoded: self.decoded,
                            };
                            let offset = codec.decode_position(&mut self.reader, ctx)?;
                            let length = length.min(clamp(size - self.decoded));
                            window.copy_match(offset, length);
                            self.decoded += length as u64;
                        }
                    }
                    written += window.drain(&mut output[written..]);
                }
                Ok(written)
            }
        }
    }

    fn fail(&mut self, err: LhaError) -> LhaError {
        debug!(
            method = %self.config.method,
            delivered = self.delivered,
            error = %err,
            "decoder failed"
        );
        self.state = DecoderState::Failed;
        err
    }
}

impl<R: Read> Decompressor for LzhDecoder<R> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<ReadStatus> {
        match self.state {
            DecoderState::Failed => return Err(LhaError::DecoderFailed),
            DecoderState::Exhausted => return Ok(ReadStatus::EndOfEntry),
            DecoderState::Uninitialized | DecoderState::Ready => {}
        }
        if output.is_empty() {
            return Ok(ReadStatus::Produced(0));
        }

        if self.state == DecoderState::Uninitialized {
            if self.config.original_size == 0 || matches!(self.payload, Payload::Directory) {
                self.state = DecoderState::Exhausted;
                return Ok(ReadStatus::EndOfEntry);
            }
            if let Err(err) = self.initialize() {
                return Err(self.fail(err));
            }
        }

        match self.produce(output) {
            Ok(n) => {
                self.delivered += n as u64;
                if self.delivered == self.config.original_size {
                    self.state = DecoderState::Exhausted;
                }
                Ok(ReadStatus::Produced(n))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn is_finished(&self) -> bool {
        self.state == DecoderState::Exhausted
    }

    fn decompress_all(&mut self) -> Result<Vec<u8>> {
        let remaining = self.config.original_size - self.delivered;
        let mut output = Vec::with_capacity(clamp(remaining.min(MAX_PREALLOCATION)));
        let mut buffer = vec![0u8; 32768];
        loop {
            match self.decompress(&mut buffer)? {
                ReadStatus::Produced(n) => output.extend_from_slice(&buffer[..n]),
                ReadStatus::EndOfEntry => break,
            }
        }
        Ok(output)
    }
}

impl<R: Read> Read for LzhDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.decompress(buf)?.produced())
    }
}

fn clamp(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Decompress a whole LZH payload held in memory.
pub fn decode_lzh(data: &[u8], method: LzhMethod, original_size: u64) -> Result<Vec<u8>> {
    let mut decoder = LzhDecoder::new(data, DecoderConfig::new(method, original_size))?;
    decoder.decompress_all()
}
