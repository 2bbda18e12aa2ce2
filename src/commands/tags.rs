//! List tags with their record counts

use anyhow::Result;

use crate::content::index;
use crate::Site;

/// Tag names and counts, most used first
pub fn tag_counts(site: &Site) -> Result<Vec<(String, usize)>> {
    let report = site.load()?;
    let groups = index::group_by_tag(&report.records, site.tz()?);

    let mut tags: Vec<_> = groups
        .into_iter()
        .map(|(tag, records)| (tag, records.len()))
        .collect();
    // group_by_tag yields names in order, so a stable sort keeps ties alphabetical
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(tags)
}

pub fn run(site: &Site) -> Result<()> {
    let tags = tag_counts(site)?;
    println!("Tags ({}):", tags.len());
    for (tag, count) in tags {
        println!("  {} ({})", tag, count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tag_counts() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("a.md"),
            "+++\ntitle = \"A\"\ndate = \"2020-01-01\"\ntags = [\"rust\", \"web\"]\n+++\n",
        )
        .unwrap();
        fs::write(
            content.join("b.md"),
            "+++\ntitle = \"B\"\ndate = \"2020-02-01\"\ntags=[\"rust\"]\n+++\n",
        )
        .unwrap();
        fs::write(
            content.join("c.md"),
            "+++\ntitle = \"C\"\ndate = \"2020-03-01\"\ntags=[\"go\"]\n+++\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        let tags = tag_counts(&site).unwrap();
        assert_eq!(
            tags,
            vec![
                ("rust".to_string(), 2),
                ("go".to_string(), 1),
                ("web".to_string(), 1),
            ]
        );
    }
}
