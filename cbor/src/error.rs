/*!
Error types reported by the decoder.

Every failure is reported once, through [`ParseClient::error`](crate::ParseClient::error),
at the offset of the header of the item that could not be decoded.
*/

use super::header::MajorType;
use core::fmt;
use thiserror::Error;

/// What a length check was trying to read when it ran out of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    InitialByte,
    LengthField,
    ByteString,
    TextString,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Context::InitialByte => "initial byte",
            Context::LengthField => "length field",
            Context::ByteString => "byte string",
            Context::TextString => "text string",
        })
    }
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fewer bytes remain than a header, length or payload requires.
    InsufficientLength,
    /// Well-formed CBOR this decoder does not accept.
    UnsupportedEncoding,
    /// A compound item declares more children than the input holds.
    StructuralMismatch,
    /// A configured resource bound was hit.
    LimitExceeded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Need {needed} byte(s) for {context}, have {available}.")]
    InsufficientLength {
        needed: u64,
        available: u64,
        context: Context,
    },

    #[error("NINT values that don't fit in int64_t are not supported.")]
    NintOutOfRange(u64),

    #[error("Unsupported simple value {0}.")]
    UnsupportedSimple(u8),

    #[error("Floating-point values are not supported.")]
    UnsupportedFloat,

    #[error("Indefinite-length items are not supported.")]
    IndefiniteLength,

    #[error("Reserved additional information value {0}.")]
    ReservedAdditionalInfo(u8),

    #[error("Text string is not valid UTF-8.")]
    InvalidUtf8,

    #[error("Not enough entries for {0}.")]
    NotEnoughEntries(MajorType),

    #[error("Maximum nesting depth of {0} exceeded.")]
    MaxDepth(usize),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InsufficientLength { .. } => ErrorKind::InsufficientLength,
            Error::NintOutOfRange(_)
            | Error::UnsupportedSimple(_)
            | Error::UnsupportedFloat
            | Error::IndefiniteLength
            | Error::ReservedAdditionalInfo(_)
            | Error::InvalidUtf8 => ErrorKind::UnsupportedEncoding,
            Error::NotEnoughEntries(_) => ErrorKind::StructuralMismatch,
            Error::MaxDepth(_) => ErrorKind::LimitExceeded,
        }
    }
}

/// An [`Error`] together with the offset it was reported at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error} (at offset {position})")]
pub struct ParseError {
    pub position: usize,
    #[source]
    pub error: Error,
}

impl ParseError {
    pub fn new(position: usize, error: Error) -> Self {
        Self { position, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
