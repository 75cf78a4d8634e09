use crate::error::CliError;
use crate::model::{EarnedBadge, Entry};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn csv_escape(value: &str) -> String {
    if value.contains(['\n', '\r', '"', ',']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv_line(values: &[String]) -> String {
    values
        .iter()
        .map(|v| csv_escape(v))
        .collect::<Vec<String>>()
        .join(",")
}

fn write_csv_file(path: &Path, lines: &[String]) -> Result<(), CliError> {
    let mut f = fs::File::create(path).map_err(|_| CliError::io("DB IO error"))?;
    #[cfg(unix)]
    {
        let _ = f.set_permissions(fs::Permissions::from_mode(0o600));
    }
    f.write_all(lines.join("\n").as_bytes())
        .map_err(|_| CliError::io("DB IO error"))?;
    let _ = f.write_all(b"\n");
    Ok(())
}

pub fn export_csv_to_dir(
    out_dir: &str,
    entries: &[Entry],
    badges: &[EarnedBadge],
) -> Result<(), CliError> {
    let out_path = Path::new(out_dir);
    fs::create_dir_all(out_path).map_err(|_| CliError::io("DB IO error"))?;

    #[cfg(unix)]
    {
        let _ = fs::set_permissions(out_path, fs::Permissions::from_mode(0o700));
    }

    let entries_header: Vec<String> = vec![
        "date",
        "title",
        "body",
        "main_photo",
        "sub_photos",
        "created_at",
        "updated_at",
    ]
    .into_iter()
    .map(|s| s.to_string())
    .collect();

    let mut entry_lines: Vec<String> = Vec::new();
    entry_lines.push(to_csv_line(&entries_header));
    for e in entries.iter() {
        entry_lines.push(to_csv_line(&[
            e.date_key.clone(),
            e.title.clone().unwrap_or_default(),
            e.body.clone(),
            e.main_photo.clone().unwrap_or_default(),
            e.sub_photos.join(";"),
            e.created_at.clone(),
            e.updated_at.clone(),
        ]));
    }

    let badges_header: Vec<String> = vec!["id", "earned_at"]
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut badge_lines: Vec<String> = Vec::new();
    badge_lines.push(to_csv_line(&badges_header));
    for b in badges.iter() {
        badge_lines.push(to_csv_line(&[b.id.clone(), b.earned_at.clone()]));
    }

    write_csv_file(&out_path.join("entries.csv"), &entry_lines)?;
    write_csv_file(&out_path.join("badges.csv"), &badge_lines)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(
            to_csv_line(&["2026-01-31".to_string(), "rain, again".to_string()]),
            "2026-01-31,\"rain, again\""
        );
    }
}
