//! Orderings and groupings consumers build over the record set

use chrono_tz::Tz;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::ContentRecord;

/// Records newest first. Undated or unparseable records go last; ties
/// fall back to path order.
pub fn by_date(records: &[ContentRecord], tz: Option<Tz>) -> Vec<&ContentRecord> {
    let mut sorted: Vec<&ContentRecord> = records.iter().collect();
    sorted.sort_by_cached_key(|r| {
        let date = r.parse_date(tz).ok().flatten();
        (date.is_none(), Reverse(date), r.path.clone())
    });
    sorted
}

/// Sort records in place, newest first
pub fn sort_by_date(records: &mut [ContentRecord], tz: Option<Tz>) {
    records.sort_by_cached_key(|r| {
        let date = r.parse_date(tz).ok().flatten();
        (date.is_none(), Reverse(date), r.path.clone())
    });
}

/// Records grouped by tag, each group newest first
pub fn group_by_tag(
    records: &[ContentRecord],
    tz: Option<Tz>,
) -> BTreeMap<String, Vec<&ContentRecord>> {
    let mut groups: BTreeMap<String, Vec<&ContentRecord>> = BTreeMap::new();
    for record in by_date(records, tz) {
        let mut tags = record.tags();
        tags.sort_unstable();
        tags.dedup();
        for tag in tags {
            groups.entry(tag.to_string()).or_default().push(record);
        }
    }
    groups
}
