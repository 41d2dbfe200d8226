/*!
Diagnostic notation with optional decoding of embedded CBOR

Without embedded decoding the output is exactly the `Display` form of each
item. With it enabled:
- Tag 24 byte strings that decode are shown as `24(content)`
- Other byte strings that decode are shown as `<<content>>`
- CBOR sequences (RFC 8742) are shown as `<<item1, item2, ...>>`
- Anything else falls back to hex notation `h'...'`
*/

use cbor_item::{Item, Options, items_with};

/// Format a sequence of top-level items, one per line
pub fn format_items(items: &[Item], decode_embedded: bool, options: &Options) -> String {
    items
        .iter()
        .map(|item| format_item(item, decode_embedded, options))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_item(item: &Item, decode_embedded: bool, options: &Options) -> String {
    if !decode_embedded {
        return item.to_string();
    }

    match item {
        Item::Bstr(bytes) => match decode_sequence(bytes, options) {
            Some(embedded) => format!("<<{}>>", embedded),
            None => item.to_string(),
        },
        Item::Array(a) => {
            let entries: Vec<_> = a.iter().map(|e| format_item(e, true, options)).collect();
            format!("[{}]", entries.join(", "))
        }
        Item::Map(m) => {
            let pairs: Vec<_> = m
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}: {}",
                        format_item(k, true, options),
                        format_item(v, true, options)
                    )
                })
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
        Item::Semantic(s) => {
            let Some(child) = s.child() else {
                return item.to_string();
            };
            let inner = match (s.tag(), child.as_bstr()) {
                (24, Some(bytes)) => decode_sequence(bytes, options)
                    .unwrap_or_else(|| format_item(child, true, options)),
                _ => format_item(child, true, options),
            };
            format!("{}({inner})", s.tag())
        }
        _ => item.to_string(),
    }
}

/// Decode `bytes` as a non-empty CBOR sequence, formatting its items comma-separated
fn decode_sequence(bytes: &[u8], options: &Options) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let decoded = items_with(bytes, *options)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let formatted: Vec<_> = decoded
        .iter()
        .map(|item| format_item(item, true, options))
        .collect();
    Some(formatted.join(", "))
}
