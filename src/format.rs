//! Human-readable renderings of a record list.

use crate::error::StoreError;
use crate::types::Record;
use chrono::FixedOffset;
use std::str::FromStr;

/// Renders records into a downloadable text document.
pub trait RecordFormatter {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;

    /// Render `records` in the order given.
    fn render(&self, records: &[Record]) -> String;
}

/// Supported formatted export types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
}

impl ExportFormat {
    /// Formatter for this format, rendering times at `offset`.
    pub fn formatter(self, offset: FixedOffset) -> Box<dyn RecordFormatter> {
        match self {
            ExportFormat::Text => Box::new(PlainTextFormatter { offset }),
            ExportFormat::Markdown => Box::new(MarkdownFormatter { offset }),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(ExportFormat::Text),
            "md" => Ok(ExportFormat::Markdown),
            other => Err(StoreError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Plain text, one block per record.
pub struct PlainTextFormatter {
    pub offset: FixedOffset,
}

impl RecordFormatter for PlainTextFormatter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain;charset=utf-8"
    }

    fn render(&self, records: &[Record]) -> String {
        let mut out = String::new();
        for record in records {
            out.push_str(&format!(
                "Recorded: {}\nContent:\n{}\n\n",
                record.created_at.display_in(&self.offset),
                record.content
            ));
        }
        out
    }
}

/// Markdown with a heading per record.
pub struct MarkdownFormatter {
    pub offset: FixedOffset,
}

impl RecordFormatter for MarkdownFormatter {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn mime_type(&self) -> &'static str {
        "text/markdown;charset=utf-8"
    }

    fn render(&self, records: &[Record]) -> String {
        let mut out = String::from("# Record Export\n\n");
        for record in records {
            out.push_str(&format!(
                "## {}\n{}\n---\n",
                record.created_at.display_in(&self.offset),
                record.content
            ));
        }
        out
    }
}
