//! Core traits for entry decompression.

use crate::error::Result;

/// Outcome of a single [`Decompressor::decompress`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// This many bytes were written to the front of the output buffer.
    ///
    /// Zero only when the output buffer itself was empty.
    Produced(usize),
    /// The entry's declared original size has been delivered.
    EndOfEntry,
}

impl ReadStatus {
    /// Number of bytes produced by this call.
    pub fn produced(self) -> usize {
        match self {
            Self::Produced(n) => n,
            Self::EndOfEntry => 0,
        }
    }

    /// Check whether the entry is finished.
    pub fn is_end(self) -> bool {
        matches!(self, Self::EndOfEntry)
    }
}

/// A pull-style decompressor for one archive entry.
///
/// Implementations decode strictly sequentially and are never reused for
/// another entry.
pub trait Decompressor {
    /// Decode into `output`, returning how much was written.
    fn decompress(&mut self, output: &mut [u8]) -> Result<ReadStatus>;

    /// Check if every declared byte has been delivered.
    fn is_finished(&self) -> bool;

    /// Decompress the rest of the entry at once (convenience method).
    fn decompress_all(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
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
