/*!
Inspect command - display CBOR data in various formats
*/

use super::diag;
use super::io::{Input, Output};
use base64::prelude::*;
use cbor_item::{Item, Options, PrettyOptions, items_with, pretty_print};
use clap::Parser;
use tracing::*;

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), pretty (multi-line), json (lossy), hex"
    )]
    format: OutputFormat,

    /// Automatically decode embedded CBOR byte strings
    #[arg(
        short = 'e',
        long = "decode-embedded",
        help = "Opportunistically decode byte strings as CBOR/sequences (tag 24 and untagged)"
    )]
    decode_embedded: bool,

    /// Maximum nesting depth of arrays, maps and tags
    #[arg(long, default_value_t = cbor_item::DEFAULT_MAX_DEPTH, value_name = "DEPTH")]
    max_depth: usize,

    /// Byte strings longer than this are summarised in pretty output
    #[arg(long, default_value_t = 32, value_name = "BYTES")]
    max_bstr_size: usize,

    /// Map keys whose values are withheld in pretty output (repeatable)
    #[arg(long = "hide", value_name = "KEY")]
    keys_not_printed: Vec<String>,

    /// Output file (use '-' for stdout)
    #[arg(short = 'o', long, default_value = "-")]
    output: Output,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CBOR Diagnostic Notation (human-readable)
    #[value(alias = "diagnostic")]
    Diag,
    /// Indented, one entry per line
    Pretty,
    /// JSON format (lossy - loses CBOR tags and byte string types)
    Json,
    /// Hexadecimal dump
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let cbor_bytes = self.input.read_all()?;
        debug!("Read {} bytes from {}", cbor_bytes.len(), self.input.filepath());

        let options = Options {
            max_depth: self.max_depth,
        };

        let output_text = match self.format {
            OutputFormat::Hex => hex::encode(&cbor_bytes),
            OutputFormat::Diag => diag::format_items(
                &decode_all(&cbor_bytes, &options)?,
                self.decode_embedded,
                &options,
            ),
            OutputFormat::Pretty => {
                let pretty = PrettyOptions {
                    max_bstr_size: self.max_bstr_size,
                    keys_not_printed: self.keys_not_printed,
                };
                decode_all(&cbor_bytes, &options)?
                    .iter()
                    .map(|item| pretty_print(item, &pretty))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            OutputFormat::Json => {
                let values: Vec<_> = decode_all(&cbor_bytes, &options)?
                    .iter()
                    .map(item_to_json)
                    .collect();
                match <[_; 1]>::try_from(values) {
                    Ok([value]) => serde_json::to_string_pretty(&value)?,
                    Err(values) => serde_json::to_string_pretty(&values)?,
                }
            }
        };

        self.output.write_str(&output_text)
    }
}

/// Decode every top-level item in the input
fn decode_all(data: &[u8], options: &Options) -> anyhow::Result<Vec<Item>> {
    let items = items_with(data, *options).collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        anyhow::bail!("No CBOR items in input");
    }
    Ok(items)
}

/// Convert an item to JSON (lossy)
fn item_to_json(item: &Item) -> serde_json::Value {
    use serde_json::Value;

    match item {
        Item::Uint(n) => Value::from(*n),
        Item::Nint(n) => Value::from(*n),
        Item::Bool(b) => Value::Bool(*b),
        Item::Null => Value::Null,
        Item::Bstr(bytes) => Value::String(BASE64_URL_SAFE_NO_PAD.encode(bytes)),
        Item::Tstr(s) => Value::String(s.clone()),
        Item::Array(a) => Value::Array(a.iter().map(item_to_json).collect()),
        Item::Map(m) => Value::Object(
            m.iter()
                .map(|(k, v)| {
                    // In JSON, all keys must be strings
                    let key = match k {
                        Item::Tstr(s) => s.clone(),
                        k => k.to_string(),
                    };
                    (key, item_to_json(v))
                })
                .collect(),
        ),
        // Tags have no JSON equivalent, keep the content
        Item::Semantic(s) => s.child().map_or(Value::Null, item_to_json),
    }
}
