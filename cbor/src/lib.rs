#![no_std]
extern crate alloc;

pub mod client;
pub mod decode;
pub mod error;
pub mod header;
pub mod item;
pub mod pretty;
pub mod validate;

pub use client::{Compound, Flow, FullParseClient, ParseClient, Span};
pub use decode::{
    DEFAULT_MAX_DEPTH, Items, Options, Outcome, items, items_with, parse, parse_item,
    parse_item_with, parse_with,
};
pub use error::{Error, ErrorKind, ParseError};
pub use item::{Array, Item, Map, Semantic};
pub use pretty::{PrettyOptions, pretty_print};
pub use validate::{Summary, Validator, validate, validate_sequence};

#[cfg(test)]
mod decode_tests;
