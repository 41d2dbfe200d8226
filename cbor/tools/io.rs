/*!
Where the tools read CBOR from and write text to: a path, or `-` for the
standard streams
*/

use anyhow::Context;
use std::borrow::Cow;
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input(Option<PathBuf>);

impl Input {
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        match &self.0 {
            Some(path) => std::fs::read(path)
                .with_context(|| format!("Failed to read from '{}'", path.display())),
            None => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .lock()
                    .read_to_end(&mut buffer)
                    .context("Failed to read from stdin")?;
                Ok(buffer)
            }
        }
    }

    pub fn filepath(&self) -> Cow<'_, str> {
        match &self.0 {
            Some(path) => path.to_string_lossy(),
            None => "stdin".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output(Option<PathBuf>);

impl Output {
    /// Writes `text`, adding a trailing newline on stdout
    pub fn write_str(&self, text: &str) -> anyhow::Result<()> {
        match &self.0 {
            Some(path) => std::fs::write(path, text)
                .with_context(|| format!("Failed to write to '{}'", path.display())),
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{text}").context("Failed to write to stdout")
            }
        }
    }
}

fn path_or_dash(s: &str) -> Option<PathBuf> {
    (!s.is_empty() && s != "-").then(|| PathBuf::from(s))
}

impl std::str::FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(path_or_dash(s)))
    }
}

impl std::str::FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(path_or_dash(s)))
    }
}
