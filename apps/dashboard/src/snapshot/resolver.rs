//! Latest-snapshot resolution: reduces an append-only record stream to the
//! current record per owner.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// A timestamped record that belongs to exactly one owner.
pub trait Snapshot {
    fn owner_id(&self) -> i64;
    fn taken_at(&self) -> NaiveDateTime;
}

/// Returns the newest record per owner.
pub fn latest_per_owner<T, I>(records: I) -> BTreeMap<i64, T>
where
    T: Snapshot,
    I: IntoIterator<Item = T>,
{
    latest_per_owner_where(records, |_| true)
}

/// Returns the newest record per owner among the records accepted by `filter`.
///
/// Owners whose records are all rejected are absent from the map. On equal
/// timestamps the record seen first wins, so a given input order always
/// yields the same winner.
pub fn latest_per_owner_where<T, I, F>(records: I, filter: F) -> BTreeMap<i64, T>
where
    T: Snapshot,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> bool,
{
    let mut latest: BTreeMap<i64, T> = BTreeMap::new();
    for record in records.into_iter().filter(|r| filter(r)) {
        let owner = record.owner_id();
        let newer = latest
            .get(&owner)
            .map_or(true, |current| record.taken_at() > current.taken_at());
        if newer {
            latest.insert(owner, record);
        }
    }
    latest
}
