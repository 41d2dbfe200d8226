/*!
Initial byte and argument decoding (RFC 8949 §3).

A header is one initial byte, split into a 3-bit major type and 5-bit
additional information, optionally followed by a 1, 2, 4 or 8 byte
big-endian argument.
*/

use super::error::{Context, Error};
use core::fmt;

pub const FALSE: u8 = 20;
pub const TRUE: u8 = 21;
pub const NULL: u8 = 22;
pub const ONE_BYTE_LENGTH: u8 = 24;
pub const TWO_BYTE_LENGTH: u8 = 25;
pub const FOUR_BYTE_LENGTH: u8 = 26;
pub const EIGHT_BYTE_LENGTH: u8 = 27;
pub const INDEFINITE_LENGTH: u8 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MajorType {
    Uint,
    Nint,
    Bstr,
    Tstr,
    Array,
    Map,
    Semantic,
    Simple,
}

impl MajorType {
    /// Extracts the major type from an initial byte.
    pub fn from_initial_byte(b: u8) -> Self {
        match b >> 5 {
            0 => MajorType::Uint,
            1 => MajorType::Nint,
            2 => MajorType::Bstr,
            3 => MajorType::Tstr,
            4 => MajorType::Array,
            5 => MajorType::Map,
            6 => MajorType::Semantic,
            _ => MajorType::Simple,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, MajorType::Array | MajorType::Map | MajorType::Semantic)
    }
}

impl fmt::Display for MajorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MajorType::Uint => "unsigned integer",
            MajorType::Nint => "negative integer",
            MajorType::Bstr => "byte string",
            MajorType::Tstr => "text string",
            MajorType::Array => "array",
            MajorType::Map => "map",
            MajorType::Semantic => "semantic",
            MajorType::Simple => "simple",
        })
    }
}

/// A decoded initial byte plus its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major: MajorType,
    /// The raw 5-bit additional information.
    pub minor: u8,
    /// The direct value (minor < 24) or the big-endian argument that followed.
    pub argument: u64,
    /// Offset of the initial byte.
    pub start: usize,
    /// Offset just past the argument; where the item's value begins.
    pub end: usize,
}

/// Decodes the header starting at `offset`.
///
/// Indefinite-length encodings are rejected outright; this decoder never
/// scans for a break stop code.
pub fn decode_header(data: &[u8], offset: usize) -> Result<Header, Error> {
    let Some(&initial) = data.get(offset) else {
        return Err(Error::InsufficientLength {
            needed: 1,
            available: 0,
            context: Context::InitialByte,
        });
    };

    let major = MajorType::from_initial_byte(initial);
    let minor = initial & 0x1F;
    let pos = offset + 1;

    let (argument, end) = match minor {
        0..=23 => (minor as u64, pos),
        ONE_BYTE_LENGTH => read_argument::<1>(data, pos)?,
        TWO_BYTE_LENGTH => read_argument::<2>(data, pos)?,
        FOUR_BYTE_LENGTH => read_argument::<4>(data, pos)?,
        EIGHT_BYTE_LENGTH => read_argument::<8>(data, pos)?,
        INDEFINITE_LENGTH => return Err(Error::IndefiniteLength),
        _ => return Err(Error::ReservedAdditionalInfo(minor)),
    };

    Ok(Header {
        major,
        minor,
        argument,
        start: offset,
        end,
    })
}

fn read_argument<const N: usize>(data: &[u8], pos: usize) -> Result<(u64, usize), Error> {
    let available = data.len().saturating_sub(pos);
    if available < N {
        return Err(Error::InsufficientLength {
            needed: N as u64,
            available: available as u64,
            context: Context::LengthField,
        });
    }
    let v = data[pos..pos + N]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | (*b as u64));
    Ok((v, pos + N))
}
