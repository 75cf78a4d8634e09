/// Achievement prestige tiers, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Level {
    SS,
    S,
    A,
    B,
    C,
    D,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::SS => "SS",
            Level::S => "S",
            Level::A => "A",
            Level::B => "B",
            Level::C => "C",
            Level::D => "D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub title: String,
    pub level: Level,
}

/// The four metric families, in catalog display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Streak,
    Total,
    Photo,
    Titled,
}

pub const FAMILIES: [Family; 4] = [Family::Streak, Family::Total, Family::Photo, Family::Titled];

const STREAK_TARGETS: [u32; 16] = [
    1, 3, 7, 10, 14, 21, 30, 50, 60, 100, 120, 200, 250, 300, 500, 1000,
];
const TOTAL_TARGETS: [u32; 15] = [
    1, 3, 10, 20, 30, 50, 75, 100, 150, 200, 300, 500, 1000, 1500, 2000,
];
const PHOTO_TARGETS: [u32; 15] = TOTAL_TARGETS;
const TITLED_TARGETS: [u32; 15] = TOTAL_TARGETS;

impl Family {
    pub fn key(&self) -> &'static str {
        match self {
            Family::Streak => "streak",
            Family::Total => "total",
            Family::Photo => "photo",
            Family::Titled => "titled",
        }
    }

    pub fn targets(&self) -> &'static [u32] {
        match self {
            Family::Streak => &STREAK_TARGETS,
            Family::Total => &TOTAL_TARGETS,
            Family::Photo => &PHOTO_TARGETS,
            Family::Titled => &TITLED_TARGETS,
        }
    }

    pub fn badge_id(&self, threshold: u32) -> String {
        format!("{}_{}", self.key(), threshold)
    }

    fn title_for(&self, threshold: u32) -> String {
        match self {
            Family::Streak => format!("{}-day streak", threshold),
            Family::Total => {
                if threshold == 1 {
                    "1 entry".to_string()
                } else {
                    format!("{} entries", threshold)
                }
            }
            Family::Photo => {
                if threshold == 1 {
                    "1 photo".to_string()
                } else {
                    format!("{} photos", threshold)
                }
            }
            Family::Titled => {
                if threshold == 1 {
                    "1 titled entry".to_string()
                } else {
                    format!("{} titled entries", threshold)
                }
            }
        }
    }

    /// Tier cutoffs are hand-tuned per family. Streak growth counts for
    /// more at small absolute numbers than total growth does.
    pub fn level_for(&self, threshold: u32) -> Level {
        match self {
            Family::Streak => match threshold {
                500.. => Level::SS,
                250..=499 => Level::S,
                120..=249 => Level::A,
                50..=119 => Level::B,
                10..=49 => Level::C,
                _ => Level::D,
            },
            Family::Total => match threshold {
                1500.. => Level::SS,
                1000..=1499 => Level::S,
                300..=999 => Level::A,
                100..=299 => Level::B,
                30..=99 => Level::C,
                _ => Level::D,
            },
            Family::Photo | Family::Titled => match threshold {
                1000.. => Level::SS,
                500..=999 => Level::S,
                200..=499 => Level::A,
                75..=199 => Level::B,
                20..=74 => Level::C,
                _ => Level::D,
            },
        }
    }
}

/// Every badge definition, streak then total then photo then titled,
/// thresholds ascending within each family. Pure and deterministic.
pub fn all_definitions() -> Vec<BadgeDefinition> {
    let mut defs = Vec::new();
    for family in FAMILIES {
        for &t in family.targets() {
            defs.push(BadgeDefinition {
                id: family.badge_id(t),
                title: family.title_for(t),
                level: family.level_for(t),
            });
        }
    }
    defs
}

pub fn definition_for(id: &str) -> Option<BadgeDefinition> {
    all_definitions().into_iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_deterministic() {
        assert_eq!(all_definitions(), all_definitions());
    }

    #[test]
    fn catalog_order_and_ids() {
        let defs = all_definitions();
        assert_eq!(defs.len(), 16 + 15 + 15 + 15);
        assert_eq!(defs[0].id, "streak_1");
        assert_eq!(defs[15].id, "streak_1000");
        assert_eq!(defs[16].id, "total_1");
        assert_eq!(defs[31].id, "photo_1");
        assert_eq!(defs[46].id, "titled_1");
        assert_eq!(defs[60].id, "titled_2000");
    }

    #[test]
    fn ids_are_unique() {
        let defs = all_definitions();
        let ids: std::collections::BTreeSet<&str> = defs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), defs.len());
    }

    #[test]
    fn lookup_hits_and_misses() {
        let def = definition_for("streak_30").unwrap();
        assert_eq!(def.title, "30-day streak");
        assert_eq!(def.level, Level::C);
        assert!(definition_for("streak_31").is_none());
        assert!(definition_for("").is_none());
    }

    #[test]
    fn streak_tier_boundaries() {
        assert_eq!(Family::Streak.level_for(7), Level::D);
        assert_eq!(Family::Streak.level_for(10), Level::C);
        assert_eq!(Family::Streak.level_for(30), Level::C);
        assert_eq!(Family::Streak.level_for(50), Level::B);
        assert_eq!(Family::Streak.level_for(100), Level::B);
        assert_eq!(Family::Streak.level_for(120), Level::A);
        assert_eq!(Family::Streak.level_for(200), Level::A);
        assert_eq!(Family::Streak.level_for(250), Level::S);
        assert_eq!(Family::Streak.level_for(300), Level::S);
        assert_eq!(Family::Streak.level_for(500), Level::SS);
        assert_eq!(Family::Streak.level_for(1000), Level::SS);
    }

    #[test]
    fn total_tier_boundaries() {
        assert_eq!(Family::Total.level_for(20), Level::D);
        assert_eq!(Family::Total.level_for(30), Level::C);
        assert_eq!(Family::Total.level_for(75), Level::C);
        assert_eq!(Family::Total.level_for(100), Level::B);
        assert_eq!(Family::Total.level_for(200), Level::B);
        assert_eq!(Family::Total.level_for(300), Level::A);
        assert_eq!(Family::Total.level_for(500), Level::A);
        assert_eq!(Family::Total.level_for(1000), Level::S);
        assert_eq!(Family::Total.level_for(1500), Level::SS);
        assert_eq!(Family::Total.level_for(2000), Level::SS);
    }

    #[test]
    fn photo_and_titled_share_tier_cutoffs() {
        for &t in Family::Photo.targets() {
            assert_eq!(Family::Photo.level_for(t), Family::Titled.level_for(t));
        }
        assert_eq!(Family::Photo.level_for(10), Level::D);
        assert_eq!(Family::Photo.level_for(20), Level::C);
        assert_eq!(Family::Photo.level_for(75), Level::B);
        assert_eq!(Family::Photo.level_for(200), Level::A);
        assert_eq!(Family::Photo.level_for(500), Level::S);
        assert_eq!(Family::Photo.level_for(1000), Level::SS);
    }
}
