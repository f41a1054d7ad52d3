//! Pairwise overlap detection for schedule entries.

use crate::entry::{ConflictAnnotatedEntry, ScheduleEntry};

/// Sort entries by start time and flag every entry that overlaps another.
///
/// Overlap is pairwise: for `i < j` in start order, both are flagged when
/// `start_j < end_i`. Touching windows (`start_j == end_i`) do not conflict.
/// Flags are never merged across chains of overlaps, and no entry is dropped.
pub fn detect_conflicts(mut entries: Vec<ScheduleEntry>) -> Vec<ConflictAnnotatedEntry> {
    entries.sort_by_key(|e| e.start_time);

    let mut flags = vec![false; entries.len()];

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if entries[j].start_time < entries[i].end_time {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }

    entries
        .into_iter()
        .zip(flags)
        .map(|(entry, is_conflicting)| ConflictAnnotatedEntry {
            entry,
            is_conflicting,
        })
        .collect()
}
