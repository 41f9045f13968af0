//! Error type

use std::io;
use thiserror::Error;

/// Every way that decoding an MPEG-1 video bitstream can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A mandatory literal (start code, marker bit, end-of-macroblock flag)
    /// did not appear where the syntax requires it.
    #[error("syntax violation: expected {0}")]
    SyntaxViolation(&'static str),

    /// The bitstream followed a variable-length code path that has no symbol.
    #[error("bitstream contains a variable-length code with no table entry")]
    InvalidCode,

    /// The picture coding type is none of I, P, B or D.
    #[error("unsupported picture coding type {0}")]
    UnsupportedCodingType(u8),

    /// Run-length expansion walked past the last coefficient of a block.
    #[error("coefficient index {0} lies outside of the 8x8 block")]
    CoefficientOverflow(usize),

    /// A code table entry collides with a code that was already inserted.
    #[error("code {0:?} collides with a previously inserted code")]
    ConflictingCode(String),

    /// A code table entry is empty or contains something other than '0' and
    /// '1'.
    #[error("code {0:?} is not a bit string")]
    MalformedCode(String),

    /// The byte source ran dry while the syntax still expected more bits.
    #[error("unexpected end of stream")]
    EndOfStream,

    /// The decoder was driven in a way it does not support, such as restoring
    /// a checkpoint that was never saved.
    #[error("internal decoder error")]
    InternalDecoderError,

    #[error("unhandled I/O error: {0}")]
    UnhandledIoError(#[from] io::Error),
}

/// Coarse classification of an `Error`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bitstream does not follow the syntax.
    Syntax,

    /// The bitstream is well-formed but describes something out of range.
    Unsupported,

    /// The bitstream ended early.
    EndOfStream,

    /// Misuse of the decoder or a failure of the underlying source.
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SyntaxViolation(_) | Self::InvalidCode => ErrorKind::Syntax,
            Self::UnsupportedCodingType(_) | Self::CoefficientOverflow(_) => {
                ErrorKind::Unsupported
            }
            Self::EndOfStream => ErrorKind::EndOfStream,
            Self::ConflictingCode(_)
            | Self::MalformedCode(_)
            | Self::InternalDecoderError
            | Self::UnhandledIoError(_) => ErrorKind::Internal,
        }
    }

    /// Whether resynchronizing at the next start code could get decoding
    /// going again after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Syntax | ErrorKind::Unsupported)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use crate::error::{Error, ErrorKind};
    use std::io;

    #[test]
    fn error_classification() {
        assert_eq!(ErrorKind::Syntax, Error::SyntaxViolation("marker bit").kind());
        assert_eq!(ErrorKind::Syntax, Error::InvalidCode.kind());
        assert_eq!(
            ErrorKind::Unsupported,
            Error::UnsupportedCodingType(7).kind()
        );
        assert_eq!(ErrorKind::Unsupported, Error::CoefficientOverflow(64).kind());
        assert_eq!(ErrorKind::EndOfStream, Error::EndOfStream.kind());
        assert_eq!(
            ErrorKind::Internal,
            Error::from(io::Error::new(io::ErrorKind::Other, "disk on fire")).kind()
        );
    }

    #[test]
    fn only_bitstream_errors_are_recoverable() {
        assert!(Error::SyntaxViolation("slice start code").is_recoverable());
        assert!(Error::CoefficientOverflow(70).is_recoverable());
        assert!(!Error::EndOfStream.is_recoverable());
        assert!(!Error::InternalDecoderError.is_recoverable());
    }
}
