//! List content records

use anyhow::Result;

use crate::content::index;
use crate::Site;

/// List records newest first
pub fn run(site: &Site) -> Result<()> {
    let report = site.load()?;
    let tz = site.tz()?;

    println!("Records ({}):", report.records.len());
    for record in index::by_date(&report.records, tz) {
        let date = match record.parse_date(tz) {
            Ok(Some(date)) => date.format("%Y-%m-%d").to_string(),
            _ => "----------".to_string(),
        };
        println!(
            "  {} - {} [{}]",
            date,
            record.title().unwrap_or("(untitled)"),
            record.path
        );
    }

    if !report.errors.is_empty() {
        println!("Skipped ({}):", report.errors.len());
        for err in &report.errors {
            println!("  {}", err);
        }
    }

    Ok(())
}
