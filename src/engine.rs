use crate::badges::{Family, FAMILIES};
use crate::model::Entry;
use crate::streak::{current_streak, total_count};
use std::collections::BTreeSet;

/// The four derived metrics the badge ladders are measured against.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Metrics {
    pub streak: u32,
    pub total: u32,
    pub photos: u32,
    pub titled: u32,
}

impl Metrics {
    pub fn compute(entries: &[Entry], today_key: &str) -> Self {
        let photos = entries
            .iter()
            .map(|e| u32::from(e.main_photo.is_some()) + e.sub_photos.len() as u32)
            .sum();

        let titled = entries
            .iter()
            .filter(|e| {
                e.title
                    .as_deref()
                    .map(|t| !t.trim().is_empty())
                    .unwrap_or(false)
            })
            .count() as u32;

        Metrics {
            streak: current_streak(entries, today_key),
            total: total_count(entries) as u32,
            photos,
            titled,
        }
    }

    pub fn value(&self, family: Family) -> u32 {
        match family {
            Family::Streak => self.streak,
            Family::Total => self.total,
            Family::Photo => self.photos,
            Family::Titled => self.titled,
        }
    }
}

/// Every badge id whose threshold the current metrics satisfy and that is
/// not in `already_earned`. Families in catalog order, thresholds
/// ascending, so one save can surface a whole run of crossed thresholds.
/// Pure: safe to call speculatively.
pub fn newly_earned(
    entries: &[Entry],
    today_key: &str,
    already_earned: &BTreeSet<String>,
) -> Vec<String> {
    let metrics = Metrics::compute(entries, today_key);

    let mut earned = Vec::new();
    for family in FAMILIES {
        let value = metrics.value(family);
        for &t in family.targets() {
            if value < t {
                continue;
            }
            let id = family.badge_id(t);
            if !already_earned.contains(&id) {
                earned.push(id);
            }
        }
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::add_days;

    fn entry(date_key: &str, title: Option<&str>, photos: (bool, usize)) -> Entry {
        Entry {
            date_key: date_key.to_string(),
            title: title.map(|t| t.to_string()),
            body: "one line".to_string(),
            main_photo: photos.0.then(|| format!("{}-main.jpg", date_key)),
            sub_photos: (0..photos.1)
                .map(|i| format!("{}-sub{}.jpg", date_key, i))
                .collect(),
            created_at: "2026-01-31T20:00:00Z".to_string(),
            updated_at: "2026-01-31T20:00:00Z".to_string(),
        }
    }

    /// `count` plain entries on consecutive days ending well before today,
    /// so only the `total` family can fire.
    fn backlog(count: u32) -> Vec<Entry> {
        (0..count)
            .map(|i| entry(&add_days("2020-06-30", -(i as i32)).unwrap(), None, (false, 0)))
            .collect()
    }

    const TODAY: &str = "2026-01-31";

    #[test]
    fn empty_entries_earn_nothing() {
        assert!(newly_earned(&[], TODAY, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn thirty_plain_entries_earn_exactly_the_total_ladder() {
        let got = newly_earned(&backlog(30), TODAY, &BTreeSet::new());
        assert_eq!(
            got,
            vec!["total_1", "total_3", "total_10", "total_20", "total_30"]
        );
    }

    #[test]
    fn single_entry_today_earns_first_rungs() {
        let entries = vec![entry(TODAY, None, (false, 0))];
        let got = newly_earned(&entries, TODAY, &BTreeSet::new());
        assert_eq!(got, vec!["streak_1", "total_1"]);
    }

    #[test]
    fn families_report_in_fixed_order() {
        let entries = vec![entry(TODAY, Some("first"), (true, 2))];
        let got = newly_earned(&entries, TODAY, &BTreeSet::new());
        assert_eq!(got, vec!["streak_1", "total_1", "photo_1", "photo_3", "titled_1"]);
    }

    #[test]
    fn already_earned_ids_are_skipped() {
        let already: BTreeSet<String> =
            ["total_1", "total_3"].iter().map(|s| s.to_string()).collect();
        let got = newly_earned(&backlog(10), TODAY, &already);
        assert_eq!(got, vec!["total_10"]);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let entries = backlog(20);
        let mut earned: BTreeSet<String> = ["streak_1".to_string()].into_iter().collect();
        let first = newly_earned(&entries, TODAY, &earned);
        assert!(!first.is_empty());
        earned.extend(first);
        assert!(newly_earned(&entries, TODAY, &earned).is_empty());
    }

    #[test]
    fn fewer_already_earned_yields_superset() {
        let entries = backlog(35);
        let s1: BTreeSet<String> = BTreeSet::new();
        let s2: BTreeSet<String> = ["total_10", "total_20"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let from_s1 = newly_earned(&entries, TODAY, &s1);
        let from_s2 = newly_earned(&entries, TODAY, &s2);
        for id in &from_s2 {
            assert!(from_s1.contains(id));
        }
        assert!(from_s1.len() > from_s2.len());
    }

    #[test]
    fn whitespace_titles_do_not_count_as_titled() {
        let entries = vec![
            entry("2020-06-30", Some("   "), (false, 0)),
            entry("2020-06-29", Some(""), (false, 0)),
            entry("2020-06-28", Some("real title"), (false, 0)),
        ];
        let m = Metrics::compute(&entries, TODAY);
        assert_eq!(m.titled, 1);
    }

    #[test]
    fn photos_count_main_plus_subs() {
        let entries = vec![
            entry("2020-06-30", None, (true, 3)),
            entry("2020-06-29", None, (false, 2)),
            entry("2020-06-28", None, (true, 0)),
        ];
        let m = Metrics::compute(&entries, TODAY);
        assert_eq!(m.photos, 7);
    }

    #[test]
    fn bulk_jump_crosses_many_thresholds_at_once() {
        let got = newly_earned(&backlog(50), TODAY, &BTreeSet::new());
        assert_eq!(
            got,
            vec!["total_1", "total_3", "total_10", "total_20", "total_30", "total_50"]
        );
    }
}
