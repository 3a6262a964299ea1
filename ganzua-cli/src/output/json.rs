//! JSON output formatter

use super::{DocumentSummary, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs summaries as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    summaries: Vec<DocumentSummary>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            summaries: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_summary(&mut self, summary: &DocumentSummary) -> Result<()> {
        self.summaries.push(summary.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.summaries)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.summaries)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
