/*!
The visitor interface driven by the decoder, and the client that builds a
complete item tree from it.
*/

use super::error::Error;
use super::header::MajorType;
use super::item::Item;
use alloc::{string::String, string::ToString, vec::Vec};
use tracing::*;

/// Byte offsets of an item within the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the initial byte.
    pub header: usize,
    /// Offset just past the header, where the value (if any) begins.
    pub value: usize,
    /// Offset just past the item. For the `item()` call of a compound item
    /// this equals `value`, as the end is not yet known.
    pub end: usize,
}

/// Identifies a compound item whose children are all delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compound {
    /// An array with this many entries.
    Array(usize),
    /// A map with this many key/value pairs.
    Map(usize),
    /// A tagged item with this tag.
    Semantic(u64),
}

impl Compound {
    pub fn major_type(&self) -> MajorType {
        match self {
            Compound::Array(_) => MajorType::Array,
            Compound::Map(_) => MajorType::Map,
            Compound::Semantic(_) => MajorType::Semantic,
        }
    }
}

/// What the decoder should do after a callback.
pub enum Flow<'a> {
    /// Keep going, delivering further callbacks to this client.
    Continue(&'a mut dyn ParseClient),
    /// Halt the whole parse. This is not an error.
    Stop,
}

/// Receives decoded items as the decoder walks the input.
///
/// Every item is delivered through exactly one [`item`](Self::item) call, in
/// input order. Compound items are delivered as empty shells before any of
/// their children, and then announced again through
/// [`item_end`](Self::item_end) once their last child has been delivered.
pub trait ParseClient {
    /// Takes ownership of a freshly decoded item.
    fn item(&mut self, item: Item, span: Span) -> Flow<'_>;

    /// Called once per compound item, after all of its children.
    fn item_end(&mut self, compound: Compound, span: Span) -> Flow<'_>;

    /// Called at most once per parse; no further callbacks follow.
    fn error(&mut self, position: usize, error: Error);
}

/// A [`ParseClient`] that materializes the complete item tree.
///
/// A client may be reused for further parses, one after another. Each parse
/// replaces the item or error left by the previous one.
///
/// Compound items still waiting for children are held on a stack owned by
/// the client; when one completes it is moved into the entry below it, or
/// becomes the result.
#[derive(Debug, Default)]
pub struct FullParseClient {
    result: Option<Item>,
    parents: Vec<Item>,
    position: usize,
    error: Option<Error>,
}

impl FullParseClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// The end of the completed item, or the offset of the reported error.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Yields `(item, position, error message)`. The message is empty on success.
    pub fn into_result(self) -> (Option<Item>, usize, String) {
        let message = self.error.map(|e| e.to_string()).unwrap_or_default();
        (self.result, self.position, message)
    }

    pub fn into_parts(self) -> (Option<Item>, usize, Option<Error>) {
        (self.result, self.position, self.error)
    }

    fn append_to_parent(&mut self, item: Item) {
        let Some(parent) = self.parents.last_mut() else {
            return;
        };
        match parent {
            Item::Array(a) => a.push(item),
            Item::Map(m) => m.push_entry(item),
            Item::Semantic(s) => {
                if s.set_child(item).is_err() {
                    warn!("Semantic item received a second child");
                }
            }
            _ => unreachable!("Only compound items are pushed as parents"),
        }
    }
}

impl ParseClient for FullParseClient {
    fn item(&mut self, item: Item, span: Span) -> Flow<'_> {
        if self.parents.is_empty() {
            // A new top-level item: forget the outcome of any earlier parse
            self.result = None;
            self.error = None;
        }

        if item.is_compound() {
            self.parents.push(item);
            return Flow::Continue(self);
        }

        if self.parents.is_empty() {
            // A lone scalar is the whole result
            self.result = Some(item);
            self.position = span.end;
            return Flow::Stop;
        }

        self.append_to_parent(item);
        Flow::Continue(self)
    }

    fn item_end(&mut self, _compound: Compound, span: Span) -> Flow<'_> {
        let Some(item) = self.parents.pop() else {
            return Flow::Stop;
        };

        if self.parents.is_empty() {
            self.result = Some(item);
            self.position = span.end;
            Flow::Stop
        } else {
            self.append_to_parent(item);
            Flow::Continue(self)
        }
    }

    fn error(&mut self, position: usize, error: Error) {
        self.parents.clear();
        self.result = None;
        self.position = position;
        self.error = Some(error);
    }
}
