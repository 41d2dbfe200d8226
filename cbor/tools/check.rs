/*!
Check command - validate CBOR data without printing it
*/

use super::io::Input;
use cbor_item::{Options, validate, validate_sequence};
use clap::Parser;
use tracing::*;

/// Check CBOR data for well-formedness
#[derive(Parser, Debug)]
#[command(about = "Check that input is well-formed CBOR", long_about = None)]
pub struct Command {
    /// Accept any number of concatenated items (RFC 8742), not just one
    #[arg(short = 's', long)]
    sequence: bool,

    /// Maximum nesting depth of arrays, maps and tags
    #[arg(long, default_value_t = cbor_item::DEFAULT_MAX_DEPTH, value_name = "DEPTH")]
    max_depth: usize,

    /// Only report failures
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        let options = Options {
            max_depth: self.max_depth,
        };

        let result = if self.sequence {
            validate_sequence(&data, &options)
        } else {
            validate(&data, &options)
        };
        let summary =
            result.inspect_err(|e| info!("{} failed validation: {e}", self.input.filepath()))?;

        if !self.sequence && summary.end < data.len() {
            warn!(
                "{} bytes of trailing data after the first item",
                data.len() - summary.end
            );
        }

        if !self.quiet {
            println!(
                "{}: {} top-level item(s), {} item(s) in total, maximum depth {}, {} byte(s)",
                self.input.filepath(),
                summary.top_level,
                summary.items,
                summary.max_depth,
                summary.end
            );
        }
        Ok(())
    }
}
