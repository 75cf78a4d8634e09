use crate::db::{read_db, update_db};
use crate::engine::newly_earned;
use crate::error::CliError;
use crate::model::{Db, EarnedBadge};
use std::collections::BTreeSet;

fn earned_ids(db: &Db) -> BTreeSet<String> {
    db.badges.iter().map(|b| b.id.clone()).collect()
}

/// Records newly crossed badge thresholds and returns exactly the ids that
/// this call persisted, in evaluation order.
///
/// The read-before-write / compare-after-write sequencing is what makes
/// awarding idempotent under overlapping writers:
/// 1. snapshot the persisted earned ids,
/// 2. evaluate against a fresh read of the entries,
/// 3. nothing new: return without writing,
/// 4. insert one record per new id under the write lock, skipping ids a
///    concurrent writer recorded since the snapshot,
/// 5. re-read and diff against the snapshot,
/// 6. report the diff in the evaluation order.
///
/// Two same-day saves racing from separate processes are narrowed by the
/// lock file and absorbed by the re-diff, not fully serialized.
pub fn award_newly_earned(
    db_path: &str,
    today: &str,
    earned_at: &str,
) -> Result<Vec<String>, CliError> {
    let snapshot = read_db(db_path, today)?;
    let before = earned_ids(&snapshot);

    let newly = newly_earned(&snapshot.entries, today, &before);
    if newly.is_empty() {
        return Ok(Vec::new());
    }

    update_db(db_path, today, |db| {
        for id in newly.iter() {
            if db.badges.iter().all(|b| b.id != *id) {
                db.badges.push(EarnedBadge {
                    id: id.clone(),
                    earned_at: earned_at.to_string(),
                });
            }
        }
        Ok(())
    })?;

    let after = earned_ids(&read_db(db_path, today)?);

    Ok(newly
        .into_iter()
        .filter(|id| after.contains(id) && !before.contains(id))
        .collect())
}
