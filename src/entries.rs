use crate::error::CliError;
use crate::model::{Db, Entry};

/// The editor keeps at most this many sub photos per entry; extras are
/// dropped silently, like the photo picker does.
pub const MAX_SUB_PHOTOS: usize = 5;

fn find_entry_index(db: &Db, date_key: &str) -> Option<usize> {
    db.entries.iter().position(|e| e.date_key == date_key)
}

pub fn find_entry<'a>(db: &'a Db, date_key: &str) -> Option<&'a Entry> {
    db.entries.iter().find(|e| e.date_key == date_key)
}

fn clean_body(body: &str) -> String {
    body.replace(['\n', '\r'], " ").trim().to_string()
}

fn clean_title(title: Option<&str>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Creates or replaces the entry for `date_key`. `created_at` survives an
/// update; `updated_at` always moves to `ts`.
pub fn upsert_entry(
    db: &mut Db,
    date_key: &str,
    title: Option<&str>,
    body: &str,
    main_photo: Option<&str>,
    sub_photos: &[String],
    ts: &str,
) -> Result<Entry, CliError> {
    let body = clean_body(body);
    if body.is_empty() {
        return Err(CliError::usage("Entry body is required"));
    }

    let title = clean_title(title);
    let main_photo = main_photo.map(|p| p.to_string());
    let sub_photos: Vec<String> = sub_photos.iter().take(MAX_SUB_PHOTOS).cloned().collect();

    match find_entry_index(db, date_key) {
        Some(i) => {
            let e = &mut db.entries[i];
            e.title = title;
            e.body = body;
            e.main_photo = main_photo;
            e.sub_photos = sub_photos;
            e.updated_at = ts.to_string();
            Ok(e.clone())
        }
        None => {
            let e = Entry {
                date_key: date_key.to_string(),
                title,
                body,
                main_photo,
                sub_photos,
                created_at: ts.to_string(),
                updated_at: ts.to_string(),
            };
            db.entries.push(e.clone());
            Ok(e)
        }
    }
}

pub fn delete_entry(db: &mut Db, date_key: &str) -> Result<Entry, CliError> {
    match find_entry_index(db, date_key) {
        Some(i) => Ok(db.entries.remove(i)),
        None => Err(CliError::not_found(format!(
            "No entry for {}",
            date_key
        ))),
    }
}

pub fn list_entries(db: &Db, from: Option<&str>, to: Option<&str>) -> Vec<Entry> {
    let mut out: Vec<Entry> = db
        .entries
        .iter()
        .filter(|e| {
            if let Some(f) = from {
                if e.date_key.as_str() < f {
                    return false;
                }
            }
            if let Some(t) = to {
                if e.date_key.as_str() > t {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    out.sort_by(|a, b| a.date_key.cmp(&b.date_key));
    out
}

/// Case-insensitive substring match over title and body.
pub fn search_entries(db: &Db, query: &str) -> Vec<Entry> {
    let q = query.trim().to_lowercase();
    let mut out: Vec<Entry> = db
        .entries
        .iter()
        .filter(|e| {
            e.body.to_lowercase().contains(&q)
                || e.title
                    .as_deref()
                    .map(|t| t.to_lowercase().contains(&q))
                    .unwrap_or(false)
        })
        .cloned()
        .collect();

    out.sort_by(|a, b| a.date_key.cmp(&b.date_key));
    out
}
