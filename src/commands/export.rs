//! Export content records as JSON for a site generator

use anyhow::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::content::ContentRecord;
use crate::Site;

/// Write records as a pretty JSON array, or one object per line
pub fn write_records<W: Write>(records: &[ContentRecord], lines: bool, mut out: W) -> Result<()> {
    if lines {
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
    } else {
        serde_json::to_writer_pretty(&mut out, records)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Run the export command. Records are exported in path order; load
/// errors are logged and left out of the output.
pub fn run(site: &Site, lines: bool, output: Option<&Path>) -> Result<()> {
    let report = site.load()?;
    for err in &report.errors {
        tracing::warn!("Not exported: {}", err);
    }

    match output {
        Some(path) => {
            let file = File::create(path)?;
            write_records(&report.records, lines, BufWriter::new(file))?;
            tracing::info!("Exported {} records to {:?}", report.records.len(), path);
        }
        None => write_records(&report.records, lines, io::stdout().lock())?,
    }

    Ok(())
}
