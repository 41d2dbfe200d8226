/*!
Multi-line, human-oriented rendering of an item tree.

Unlike the diagnostic notation produced by `Display`, this output is meant
for logs: large byte strings are summarised by size and digest, and the
values of selected map keys can be withheld.
*/

use super::item::Item;
use alloc::{string::String, vec::Vec};
use core::fmt::Write;
use sha1::{Digest, Sha1};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Byte strings longer than this print as `<bstr size=N sha1=...>`.
    pub max_bstr_size: usize,
    /// Text-string map keys whose values print as `<not printed>`.
    pub keys_not_printed: Vec<String>,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            max_bstr_size: 32,
            keys_not_printed: Vec::new(),
        }
    }
}

pub fn pretty_print(item: &Item, options: &PrettyOptions) -> String {
    let mut out = String::new();
    write_item(&mut out, item, 0, options);
    out
}

fn write_item(out: &mut String, item: &Item, indent: usize, options: &PrettyOptions) {
    match item {
        Item::Uint(v) => _ = write!(out, "{v}"),
        Item::Nint(v) => _ = write!(out, "{v}"),
        Item::Bool(b) => _ = write!(out, "{b}"),
        Item::Null => out.push_str("null"),
        Item::Bstr(v) if v.len() > options.max_bstr_size => {
            _ = write!(out, "<bstr size={} sha1=", v.len());
            for b in Sha1::digest(v).iter() {
                _ = write!(out, "{b:02x}");
            }
            out.push('>');
        }
        Item::Bstr(v) => {
            out.push('{');
            for (n, b) in v.iter().enumerate() {
                if n > 0 {
                    out.push_str(", ");
                }
                _ = write!(out, "0x{b:02x}");
            }
            out.push('}');
        }
        Item::Tstr(s) => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        Item::Array(a) if a.is_empty() => out.push_str("[]"),
        Item::Array(a) if a.iter().all(is_flat) => {
            out.push('[');
            for (n, entry) in a.iter().enumerate() {
                if n > 0 {
                    out.push_str(", ");
                }
                write_item(out, entry, indent + 2, options);
            }
            out.push(']');
        }
        Item::Array(a) => {
            out.push('[');
            for entry in a {
                newline(out, indent + 2);
                write_item(out, entry, indent + 2, options);
                out.push(',');
            }
            newline(out, indent);
            out.push(']');
        }
        Item::Map(m) if m.is_empty() => out.push_str("{}"),
        Item::Map(m) => {
            out.push('{');
            for (key, value) in m.iter() {
                newline(out, indent + 2);
                write_item(out, key, indent + 2, options);
                out.push_str(" : ");
                if key
                    .as_tstr()
                    .is_some_and(|k| options.keys_not_printed.iter().any(|n| n == k))
                {
                    out.push_str("<not printed>");
                } else {
                    write_item(out, value, indent + 2, options);
                }
                out.push(',');
            }
            newline(out, indent);
            out.push('}');
        }
        Item::Semantic(s) => {
            _ = write!(out, "tag {} ", s.tag());
            if let Some(child) = s.child() {
                write_item(out, child, indent, options);
            }
        }
    }
}

fn is_flat(item: &Item) -> bool {
    !matches!(item, Item::Array(_) | Item::Map(_))
}

fn newline(out: &mut String, indent: usize) {
    out.push('\n');
    out.extend(core::iter::repeat_n(' ', indent));
}
