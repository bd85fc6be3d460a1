//! CSV output formatting.

use crate::extractor::PortRecord;
use crate::{ReportError, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write records as CSV to any writer.
///
/// The header is taken from the record fields. An empty record list writes
/// nothing at all, not even the header.
pub fn write_csv_to<W: Write>(records: &[PortRecord], writer: W) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records as CSV to `path`, replacing any existing file
pub fn write_csv<P: AsRef<Path>>(records: &[PortRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        ReportError::Output(format!("Cannot create {}: {}", path.display(), e))
    })?;
    write_csv_to(records, file)
}
