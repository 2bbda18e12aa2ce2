//! Check content for load errors and data-quality warnings

use anyhow::Result;

use crate::content::{lint, Lint};
use crate::error::ContentError;
use crate::Site;

/// Result of one check pass
#[derive(Debug)]
pub struct CheckSummary {
    pub records: usize,
    pub errors: Vec<ContentError>,
    pub warnings: Vec<Lint>,
}

impl CheckSummary {
    pub fn passed(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// Load and lint every record
pub fn check(site: &Site) -> Result<CheckSummary> {
    let report = site.load()?;
    let warnings = lint::lint(&report.records, site.tz()?);

    Ok(CheckSummary {
        records: report.records.len(),
        errors: report.errors,
        warnings,
    })
}

/// Print the check results
pub fn print(summary: &CheckSummary) {
    for err in &summary.errors {
        println!("error: {}", err);
    }
    for warning in &summary.warnings {
        println!("warning: {}", warning);
    }
    println!(
        "{} records, {} errors, {} warnings",
        summary.records,
        summary.errors.len(),
        summary.warnings.len()
    );
}

/// Run the check command. Fails if any file could not be loaded, or on
/// any warning when `strict` is set.
pub fn run(site: &Site, strict: bool) -> Result<()> {
    let summary = check(site)?;
    print(&summary);

    if !summary.passed(strict) {
        anyhow::bail!(
            "check failed: {} errors, {} warnings",
            summary.errors.len(),
            summary.warnings.len()
        );
    }
    Ok(())
}
