//! Error types for lhadec operations.
//!
//! Every failure the decoding core can report is a variant of [`LhaError`].
//! All of them are fatal for the entry being decoded: the core never tries
//! to resynchronize a damaged bitstream.

use std::io;
use thiserror::Error;

/// The main error type for lhadec operations.
#[derive(Debug, Error)]
pub enum LhaError {
    /// I/O error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A code-length table does not describe a complete canonical code.
    #[error("Bad Huffman table: {reason}")]
    BadTable {
        /// What was wrong with the table.
        reason: String,
    },

    /// The byte source ran out while bits were still needed.
    #[error("Premature end of input at bit position {bit_position}")]
    PrematureEndOfInput {
        /// Number of payload bits consumed when the shortfall was detected.
        bit_position: u64,
    },

    /// The method is a known LHA signature without a decoder.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The method signature.
        method: String,
    },

    /// The method signature is not an LHA method at all.
    #[error("Unknown compression method: {method}")]
    UnknownMethod {
        /// The method signature as found in the header.
        method: String,
    },

    /// A previous call on this decoder already failed.
    #[error("Decoder is unusable after an earlier failure")]
    DecoderFailed,
}

/// Result type alias for lhadec operations.
pub type Result<T> = std::result::Result<T, LhaError>;

impl LhaError {
    /// Create a bad table error.
    pub fn bad_table(reason: impl Into<String>) -> Self {
        Self::BadTable {
            reason: reason.into(),
        }
    }

    /// Create a premature end of input error.
    pub fn premature_end(bit_position: u64) -> Self {
        Self::PrematureEndOfInput { bit_position }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create an unknown method error from the raw signature bytes.
    pub fn unknown_method(signature: &[u8]) -> Self {
        Self::UnknownMethod {
            method: String::from_utf8_lossy(signature).into_owned(),
        }
    }

    /// Whether this error means the payload itself is corrupt or truncated.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::BadTable { .. } | Self::PrematureEndOfInput { .. }
        )
    }
}

impl From<LhaError> for io::Error {
    fn from(err: LhaError) -> Self {
        match err {
            LhaError::Io(inner) => inner,
            LhaError::PrematureEndOfInput { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            LhaError::UnsupportedMethod { .. } => io::Error::new(io::ErrorKind::Unsupported, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LhaError::bad_table("code lengths cover 0x10001 of 0x10000");
        assert!(err.to_string().contains("Bad Huffman table"));

        let err = LhaError::premature_end(1234);
        assert!(err.to_string().contains("1234"));

        let err = LhaError::unsupported_method("-pm2-");
        assert!(err.to_string().contains("-pm2-"));

        let err = LhaError::unknown_method(b"-xyz-");
        assert!(err.to_string().contains("-xyz-"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: LhaError = io_err.into();
        assert!(matches!(err, LhaError::Io(_)));
    }

    #[test]
    fn test_into_io_error_kinds() {
        let err: io::Error = LhaError::premature_end(8).into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let err: io::Error = LhaError::bad_table("x").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err: io::Error = LhaError::unsupported_method("-pm1-").into();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);

        let err: io::Error = LhaError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe")).into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_is_corruption() {
        assert!(LhaError::bad_table("x").is_corruption());
        assert!(LhaError::premature_end(0).is_corruption());
        assert!(!LhaError::DecoderFailed.is_corruption());
    }
}
