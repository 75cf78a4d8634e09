#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Db {
    pub version: u32,
    pub settings: Settings,
    pub entries: Vec<Entry>,
    pub badges: Vec<EarnedBadge>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    pub reminder_enabled: bool,
    pub reminder_hour: u32,
    pub reminder_minute: u32,
    pub lock_enabled: bool,
    pub start_date: String,
}

/// One journal entry. `date_key` is the natural key: at most one entry
/// exists per calendar day.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub date_key: String,
    pub title: Option<String>,
    pub body: String,
    pub main_photo: Option<String>,
    pub sub_photos: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An award record. Ids are unique; a badge is earned at most once and
/// never removed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EarnedBadge {
    pub id: String,
    pub earned_at: String,
}

pub fn default_settings(start_date: &str) -> Settings {
    Settings {
        reminder_enabled: false,
        reminder_hour: 20,
        reminder_minute: 0,
        lock_enabled: false,
        start_date: start_date.to_string(),
    }
}

/// The settings record is created here, once, when the DB file does not
/// exist yet. No other code path creates it.
pub fn default_db(start_date: &str) -> Db {
    Db {
        version: 1,
        settings: default_settings(start_date),
        entries: Vec::new(),
        badges: Vec::new(),
    }
}
