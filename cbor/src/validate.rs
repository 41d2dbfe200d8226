/*!
Structural validation without building an item tree.
*/

use super::client::{Compound, Flow, ParseClient, Span};
use super::decode::{Options, Outcome, parse_with};
use super::error::{Error, ParseError};
use super::item::Item;

/// Statistics gathered while validating.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of top-level items.
    pub top_level: usize,
    /// Number of items at any depth, compound items included.
    pub items: usize,
    /// Deepest nesting of compound items seen.
    pub max_depth: usize,
    /// Offset just past the last validated item.
    pub end: usize,
}

/// A [`ParseClient`] that checks well-formedness and discards every item.
#[derive(Debug, Default)]
pub struct Validator {
    summary: Summary,
    depth: usize,
    error: Option<ParseError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Validates the item at `offset`, accumulating into this validator.
    fn run(&mut self, data: &[u8], offset: usize, options: &Options) -> Result<(), ParseError> {
        match parse_with(&data[offset..], self, options) {
            Outcome::Complete(len) => {
                self.summary.top_level += 1;
                self.summary.end = offset + len;
                Ok(())
            }
            Outcome::Failed(_) => {
                let Some(e) = self.error.take() else {
                    unreachable!("Failed outcome without a reported error")
                };
                Err(ParseError::new(offset + e.position, e.error))
            }
            Outcome::Stopped(_) => unreachable!("Validator never stops a parse"),
        }
    }
}

impl ParseClient for Validator {
    fn item(&mut self, item: Item, _span: Span) -> Flow<'_> {
        self.summary.items += 1;
        if item.is_compound() {
            self.depth += 1;
            self.summary.max_depth = self.summary.max_depth.max(self.depth);
        }
        Flow::Continue(self)
    }

    fn item_end(&mut self, _compound: Compound, _span: Span) -> Flow<'_> {
        self.depth = self.depth.saturating_sub(1);
        Flow::Continue(self)
    }

    fn error(&mut self, position: usize, error: Error) {
        self.depth = 0;
        self.error = Some(ParseError::new(position, error));
    }
}

/// Checks that `data` starts with one well-formed item.
pub fn validate(data: &[u8], options: &Options) -> Result<Summary, ParseError> {
    let mut v = Validator::new();
    v.run(data, 0, options)?;
    Ok(v.summary)
}

/// Checks that `data` is entirely a sequence of well-formed items.
pub fn validate_sequence(data: &[u8], options: &Options) -> Result<Summary, ParseError> {
    let mut v = Validator::new();
    while v.summary.end < data.len() {
        let offset = v.summary.end;
        v.run(data, offset, options)?;
    }
    Ok(v.summary)
}
