use crate::date::{date_for_key, key_for};
use crate::model::Entry;
use std::collections::BTreeSet;

/// Consecutive days with an entry, ending at `today_key` and walking
/// strictly backward. An entry for yesterday but none for today is a
/// streak of 0.
pub fn current_streak(entries: &[Entry], today_key: &str) -> u32 {
    let keys: BTreeSet<&str> = entries.iter().map(|e| e.date_key.as_str()).collect();

    let Some(mut cursor) = date_for_key(today_key) else {
        return 0;
    };

    let mut streak = 0u32;
    while keys.contains(key_for(cursor).as_str()) {
        streak += 1;
        cursor = cursor.prev_day();
    }
    streak
}

pub fn total_count(entries: &[Entry]) -> usize {
    entries.len()
}
