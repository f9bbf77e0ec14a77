//! Output formatting for the moexiss CLI.

use clap::ValueEnum;
use moexiss_lib::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Output format for lists and history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Table,
    Csv,
    Json,
}

impl Format {
    /// Returns the name of this format.
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Code-to-title map as entries sorted by code.
pub(crate) fn sorted_entries(map: &HashMap<String, String>) -> Vec<ReferenceEntry> {
    let mut entries: Vec<_> = map
        .iter()
        .map(|(code, title)| ReferenceEntry::new(code.as_str(), title.as_str()))
        .collect();
    entries.sort_by(|a, b| a.code.cmp(&b.code));
    entries
}

/// Write a reference list.
pub(crate) fn write_reference<W: Write>(
    kind: ReferenceKind,
    entries: &[ReferenceEntry],
    format: Format,
    mut writer: W,
) -> Result<()> {
    let code_header = kind.code_attribute().to_uppercase();

    match format {
        Format::Table => {
            let width = entries
                .iter()
                .map(|e| e.code.chars().count())
                .max()
                .unwrap_or(0)
                .max(code_header.len());
            writeln!(writer, "{code_header:<width$}  TITLE")?;
            writeln!(writer, "{}", "-".repeat(width + 40))?;
            for entry in entries {
                writeln!(writer, "{:<width$}  {}", entry.code, entry.title)?;
            }
            writeln!(writer, "\nTotal: {} {kind}", entries.len())?;
        }
        Format::Csv => {
            writeln!(writer, "{},title", code_header.to_lowercase())?;
            for entry in entries {
                writeln!(writer, "{},{}", csv_field(&entry.code), csv_field(&entry.title))?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// Write history rows.
pub(crate) fn write_history<W: Write>(
    rows: &[HistoryRow],
    format: Format,
    mut writer: W,
) -> Result<()> {
    match format {
        Format::Table => {
            writeln!(writer, "{:<14} {:>14} {:>10}", "SECID", "CLOSE", "TRADES")?;
            writeln!(writer, "{}", "-".repeat(40))?;
            for row in rows {
                writeln!(
                    writer,
                    "{:<14} {:>14} {:>10}",
                    row.secid, row.close_price, row.num_trades
                )?;
            }
            writeln!(writer, "\nTotal: {} securities", rows.len())?;
        }
        Format::Csv => {
            writeln!(writer, "secid,close_price,num_trades")?;
            for row in rows {
                writeln!(
                    writer,
                    "{},{},{}",
                    csv_field(&row.secid),
                    row.close_price,
                    row.num_trades
                )?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// Write history rows to `output`, or stdout when no path is given.
pub(crate) fn emit_history(
    rows: &[HistoryRow],
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write_history(rows, format, &mut writer)?;
            writer.flush()?;
        }
        None => write_history(rows, format, io::stdout().lock())?,
    }
    Ok(())
}

/// Quotes a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
