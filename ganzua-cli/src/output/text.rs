//! Plain text output formatter

use super::{DocumentSummary, OutputFormatter};
use anyhow::Result;
use serde_json::Value;
use std::io::{self, Write};

/// Plain text formatter - one line per document
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

fn render(summary: &DocumentSummary) -> String {
    if let Some(error) = &summary.error {
        return format!("✗ {} ({}): {}", summary.path, summary.kind, error);
    }

    let details: Vec<String> = summary
        .details
        .iter()
        .map(|(name, value)| match value {
            Value::String(text) => format!("{name}={text}"),
            other => format!("{name}={other}"),
        })
        .collect();
    format!(
        "✓ {} ({}, {}): {}",
        summary.path,
        summary.kind,
        summary.locale.as_deref().unwrap_or("-"),
        details.join(" ")
    )
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_summary(&mut self, summary: &DocumentSummary) -> Result<()> {
        writeln!(self.writer, "{}", render(summary))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
