/*!
The item decoder.

[`parse`] decodes exactly one top-level item, and everything nested inside
it, feeding each item to a [`ParseClient`] as it goes. Nesting is tracked on
an explicit heap-allocated work-list rather than the call stack, and bounded
by [`Options::max_depth`].
*/

use super::client::{Compound, Flow, FullParseClient, ParseClient, Span};
use super::error::{Context, Error, ParseError};
use super::header::{self, Header, MajorType, decode_header};
use super::item::{Array, Item, Map, Semantic};
use alloc::{string::String, vec::Vec};
use tracing::*;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Decoder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// The maximum number of compound items that may be open at once.
    ///
    /// The decoder itself does not recurse, but dropping, cloning, comparing
    /// and formatting an [`Item`] tree all recurse once per nesting level.
    /// This bound is what keeps those within the native stack, so raise it
    /// only for input that is already trusted.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// How a call to [`parse`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The top-level item was fully delivered; holds the offset just past it.
    Complete(usize),
    /// The client returned [`Flow::Stop`]; holds the end of the item it was handed.
    Stopped(usize),
    /// An error was reported to the client at this offset.
    Failed(usize),
}

struct Frame {
    compound: Compound,
    header: usize,
    value: usize,
    // Wide enough for twice the largest declared map size
    remaining: u128,
}

enum Decoded {
    Scalar(Item, usize),
    Compound(Item, Compound, u128),
}

/// Decodes one top-level item from the start of `data` with default [`Options`].
pub fn parse(data: &[u8], client: &mut dyn ParseClient) -> Outcome {
    parse_with(data, client, &Options::default())
}

pub fn parse_with(data: &[u8], mut client: &mut dyn ParseClient, options: &Options) -> Outcome {
    let mut frames: Vec<Frame> = Vec::new();
    let mut pos = 0;

    loop {
        if let Some(frame) = frames.last_mut() {
            if pos == data.len() {
                let error = Error::NotEnoughEntries(frame.compound.major_type());
                return fail(client, frame.header, error);
            }
            frame.remaining -= 1;
        }

        let header = match decode_header(data, pos) {
            Ok(header) => header,
            Err(e) => return fail(client, pos, e),
        };

        match decode_item(data, &header) {
            Err(e) => return fail(client, header.start, e),
            Ok(Decoded::Scalar(item, end)) => {
                let span = Span {
                    header: header.start,
                    value: header.end,
                    end,
                };
                match client.item(item, span) {
                    Flow::Continue(next) => client = next,
                    Flow::Stop => return stopped(end),
                }
                pos = end;
            }
            Ok(Decoded::Compound(item, compound, children)) => {
                if frames.len() >= options.max_depth {
                    return fail(client, header.start, Error::MaxDepth(options.max_depth));
                }
                let span = Span {
                    header: header.start,
                    value: header.end,
                    end: header.end,
                };
                match client.item(item, span) {
                    Flow::Continue(next) => client = next,
                    Flow::Stop => return stopped(header.end),
                }
                frames.push(Frame {
                    compound,
                    header: header.start,
                    value: header.end,
                    remaining: children,
                });
                pos = header.end;
            }
        }

        while frames.last().is_some_and(|f| f.remaining == 0) {
            let Some(frame) = frames.pop() else {
                break;
            };
            let span = Span {
                header: frame.header,
                value: frame.value,
                end: pos,
            };
            match client.item_end(frame.compound, span) {
                Flow::Continue(next) => client = next,
                Flow::Stop => return stopped(pos),
            }
        }

        if frames.is_empty() {
            return Outcome::Complete(pos);
        }
    }
}

fn fail(client: &mut dyn ParseClient, position: usize, error: Error) -> Outcome {
    debug!("CBOR decode failed at offset {position}: {error}");
    client.error(position, error);
    Outcome::Failed(position)
}

fn stopped(position: usize) -> Outcome {
    trace!("CBOR client stopped the parse at offset {position}");
    Outcome::Stopped(position)
}

fn decode_item(data: &[u8], header: &Header) -> Result<Decoded, Error> {
    let scalar = |item| Ok(Decoded::Scalar(item, header.end));

    match header.major {
        MajorType::Uint => scalar(Item::Uint(header.argument)),
        MajorType::Nint => {
            if header.argument > i64::MAX as u64 {
                return Err(Error::NintOutOfRange(header.argument));
            }
            scalar(Item::Nint(-1 - header.argument as i64))
        }
        MajorType::Bstr => {
            let (bytes, end) = string_value(data, header, Context::ByteString)?;
            Ok(Decoded::Scalar(Item::Bstr(bytes.to_vec()), end))
        }
        MajorType::Tstr => {
            let (bytes, end) = string_value(data, header, Context::TextString)?;
            let s = String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8)?;
            Ok(Decoded::Scalar(Item::Tstr(s), end))
        }
        MajorType::Array => {
            let size = declared_size(header.argument);
            Ok(Decoded::Compound(
                Item::Array(Array::with_size(size)),
                Compound::Array(size),
                header.argument as u128,
            ))
        }
        MajorType::Map => {
            let size = declared_size(header.argument);
            Ok(Decoded::Compound(
                Item::Map(Map::with_size(size)),
                Compound::Map(size),
                header.argument as u128 * 2,
            ))
        }
        MajorType::Semantic => Ok(Decoded::Compound(
            Item::Semantic(Semantic::with_tag(header.argument)),
            Compound::Semantic(header.argument),
            1,
        )),
        MajorType::Simple => match header.minor {
            header::FALSE => scalar(Item::Bool(false)),
            header::TRUE => scalar(Item::Bool(true)),
            header::NULL => scalar(Item::Null),
            header::ONE_BYTE_LENGTH => Err(Error::UnsupportedSimple(header.argument as u8)),
            header::TWO_BYTE_LENGTH | header::FOUR_BYTE_LENGTH | header::EIGHT_BYTE_LENGTH => {
                Err(Error::UnsupportedFloat)
            }
            minor => Err(Error::UnsupportedSimple(minor)),
        },
    }
}

fn string_value<'a>(
    data: &'a [u8],
    header: &Header,
    context: Context,
) -> Result<(&'a [u8], usize), Error> {
    let available = (data.len() - header.end) as u64;
    if header.argument > available {
        return Err(Error::InsufficientLength {
            needed: header.argument,
            available,
            context,
        });
    }
    let end = header.end + header.argument as usize;
    Ok((&data[header.end..end], end))
}

fn declared_size(argument: u64) -> usize {
    usize::try_from(argument).unwrap_or(usize::MAX)
}

/// Decodes and fully materializes one item, returning it with the offset just past it.
pub fn parse_item(data: &[u8]) -> Result<(Item, usize), ParseError> {
    parse_item_with(data, &Options::default())
}

pub fn parse_item_with(data: &[u8], options: &Options) -> Result<(Item, usize), ParseError> {
    let mut client = FullParseClient::new();
    parse_with(data, &mut client, options);
    match client.into_parts() {
        (Some(item), end, None) => Ok((item, end)),
        (_, position, Some(error)) => Err(ParseError::new(position, error)),
        (None, _, None) => unreachable!("FullParseClient finishes with an item or an error"),
    }
}

/// Iterates over a concatenation of top-level items (a CBOR sequence).
///
/// Iteration ends at the end of the data, or after yielding the first error.
pub struct Items<'a> {
    data: &'a [u8],
    offset: usize,
    options: Options,
    failed: bool,
}

impl Items<'_> {
    /// The offset of the next undecoded byte.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Items<'_> {
    type Item = Result<Item, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }
        match parse_item_with(&self.data[self.offset..], &self.options) {
            Ok((item, len)) => {
                self.offset += len;
                Some(Ok(item))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(ParseError::new(self.offset + e.position, e.error)))
            }
        }
    }
}

pub fn items(data: &[u8]) -> Items<'_> {
    items_with(data, Options::default())
}

pub fn items_with(data: &[u8], options: Options) -> Items<'_> {
    Items {
        data,
        offset: 0,
        options,
        failed: false,
    }
}
