use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::parser::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One JSON object per line.
    JsonLines,
    /// A single pretty-printed JSON array.
    JsonArray,
}

impl Format {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jl" | "jsonl") => Format::JsonLines,
            _ => Format::JsonArray,
        }
    }
}

/// Write records to `path`, or as JSON lines to stdout when no path is given.
pub fn write_records(path: Option<&Path>, records: &[Record]) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            render(&mut writer, Format::for_path(path), records)?;
            writer.flush()?;
            info!(path = %path.display(), records = records.len(), "Wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            render(&mut lock, Format::JsonLines, records)?;
        }
    }
    Ok(())
}

pub fn render<W: Write>(writer: &mut W, format: Format, records: &[Record]) -> Result<()> {
    match format {
        Format::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
        }
        Format::JsonArray => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
