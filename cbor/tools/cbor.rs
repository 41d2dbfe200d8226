/*!
CBOR Tools - A CLI for inspecting and validating CBOR data

# Commands

- `inspect`: Display CBOR data in various formats (diagnostic, pretty, JSON, hex)
- `check`: Validate that input is a well-formed CBOR item or sequence

# Examples

```bash
# Inspect a CBOR file in diagnostic notation
cbor inspect data.cbor

# Decode byte strings that themselves hold CBOR (tag 24 and untagged)
cbor inspect -e data.cbor

# Multi-line output, hiding the value of the "password" key
cbor inspect --format pretty --hide password data.cbor

# Validate a CBOR sequence read from stdin
cat data.cbor | cbor check --sequence -
```
*/

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod check;
mod diag;
mod inspect;
mod io;

/// A CLI tool for working with CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and validating CBOR data",
    long_about = "CBOR Tools decodes CBOR (Concise Binary Object Representation, RFC 8949) data.\n\n\
                  Only definite-length items, integers, strings, arrays, maps, tags,\n\
                  booleans and null are accepted; anything else is reported as an error."
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display CBOR data in various formats
    Inspect(inspect::Command),

    /// Check CBOR data for well-formedness
    Check(check::Command),
}

fn init_logger(log_level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(log_level > LevelFilter::INFO)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Check(args) => args.exec(),
    }
}
