mod award;
mod badges;
mod date;
mod db;
mod engine;
mod entries;
mod error;
mod export;
mod model;
mod output;
mod settings;
mod stable_json;
mod streak;
mod ts;

use crate::award::award_newly_earned;
use crate::badges::{all_definitions, definition_for, BadgeDefinition, Level};
use crate::date::{parse_date_string, system_today_utc};
use crate::db::{read_db, resolve_db_path, update_db};
use crate::engine::Metrics;
use crate::entries::{delete_entry, find_entry, list_entries, search_entries, upsert_entry};
use crate::error::CliError;
use crate::export::export_csv_to_dir;
use crate::output::{render_simple_table, Styler};
use crate::settings::{apply_patch, SettingsPatch};
use crate::stable_json::stable_to_string_pretty;
use crate::streak::{current_streak, total_count};
use crate::ts::resolve_ts;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "daybook", version, about = "Local one-entry-per-day journal CLI")]
struct Cli {
    /// Overrides the DB path for this invocation.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Overrides logical "today" for deterministic output/testing.
    #[arg(long, global = true)]
    today: Option<String>,

    /// Output format. Most commands support table/json. `export` supports json/csv.
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: Format,

    /// Disables ANSI color output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write (or rewrite) today's entry, then check for newly earned badges.
    Write(WriteArgs),
    Show(ShowArgs),
    List(ListArgs),
    Search(SearchArgs),
    Delete(DeleteArgs),
    /// Current consecutive-day streak and total entry count.
    Streak,
    /// The full badge catalog with earned state.
    Badges(BadgesArgs),
    /// All four metrics plus badge progress at a glance.
    Summary,
    Config(ConfigArgs),
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct WriteArgs {
    /// The entry text. Newlines are flattened to spaces.
    body: String,

    #[arg(long)]
    title: Option<String>,

    /// Path of the main photo.
    #[arg(long)]
    photo: Option<String>,

    /// Path of a sub photo (repeatable, first 5 kept).
    #[arg(long = "sub-photo")]
    sub_photos: Vec<String>,

    /// RFC3339 with offset; defaults to the system clock.
    #[arg(long)]
    ts: Option<String>,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Defaults to today.
    date: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    to: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Case-insensitive substring matched against titles and bodies.
    query: String,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    date: String,
}

#[derive(Args, Debug)]
struct BadgesArgs {
    /// Only badges that have been earned.
    #[arg(long)]
    earned: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    Set(ConfigSetArgs),
}

#[derive(Args, Debug)]
struct ConfigSetArgs {
    /// Clap note: accepts an explicit boolean value (`--reminder-enabled true|false`).
    #[arg(long, action = clap::ArgAction::Set)]
    reminder_enabled: Option<bool>,

    /// 0..=23
    #[arg(long)]
    reminder_hour: Option<u32>,

    /// 0..=59
    #[arg(long)]
    reminder_minute: Option<u32>,

    #[arg(long, action = clap::ArgAction::Set)]
    lock_enabled: Option<bool>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// File (json) or directory (csv) to write to. JSON defaults to stdout.
    #[arg(long)]
    out: Option<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let exit = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code
        }
    };

    std::process::exit(exit);
}

fn print_line(s: &str) {
    println!("{}", s);
}

fn print_json<T: serde::Serialize>(obj: &T) -> Result<(), CliError> {
    let s = stable_to_string_pretty(obj).map_err(|_| CliError::io("DB IO error"))?;
    println!("{}", s);
    Ok(())
}

fn resolve_today(cli_today: Option<&str>) -> Result<String, CliError> {
    if let Some(t) = cli_today {
        parse_date_string(t, "today")?;
        return Ok(t.to_string());
    }

    if let Ok(t) = std::env::var("DAYBOOK_TODAY") {
        let tt = t.trim();
        if !tt.is_empty() {
            parse_date_string(tt, "today")?;
            return Ok(tt.to_string());
        }
    }

    Ok(system_today_utc())
}

fn resolve_color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    true
}

fn ensure_format_supported(format: Format, allow_csv: bool) -> Result<(), CliError> {
    if format == Format::Csv && !allow_csv {
        return Err(CliError::usage(
            "--format csv is only supported by `daybook export`",
        ));
    }
    Ok(())
}

fn entry_photo_count(e: &crate::model::Entry) -> usize {
    usize::from(e.main_photo.is_some()) + e.sub_photos.len()
}

/// Display fallback for an award whose id has no catalog definition:
/// id-as-title at the lowest tier, never a failed screen.
fn definition_or_default(id: &str) -> BadgeDefinition {
    definition_for(id).unwrap_or_else(|| BadgeDefinition {
        id: id.to_string(),
        title: id.to_string(),
        level: Level::D,
    })
}

#[derive(serde::Serialize)]
struct BadgeRow {
    id: String,
    title: String,
    level: Level,
    earned: bool,
    earned_at: Option<String>,
}

fn print_entry_lines(e: &crate::model::Entry) {
    print_line(&e.date_key);
    if let Some(t) = e.title.as_deref() {
        print_line(&format!("title: {}", t));
    }
    print_line(&format!("body: {}", e.body));
    if let Some(p) = e.main_photo.as_deref() {
        print_line(&format!("photo: {}", p));
    }
    for p in e.sub_photos.iter() {
        print_line(&format!("sub photo: {}", p));
    }
    print_line(&format!("created_at: {}", e.created_at));
    print_line(&format!("updated_at: {}", e.updated_at));
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db_path = resolve_db_path(cli.db.as_deref())?;
    let today = resolve_today(cli.today.as_deref())?;

    let styler = Styler::new(resolve_color_enabled(cli.no_color));

    match cli.command {
        Command::Write(args) => {
            ensure_format_supported(cli.format, false)?;

            let ts = resolve_ts(args.ts.as_deref())?;

            let saved = update_db(&db_path, &today, |db| {
                upsert_entry(
                    db,
                    &today,
                    args.title.as_deref(),
                    &args.body,
                    args.photo.as_deref(),
                    &args.sub_photos,
                    &ts,
                )
            })?;

            // The entry is safely saved at this point; badge bookkeeping
            // failures must not undo or mask that.
            let new_badges = match award_newly_earned(&db_path, &today, &ts) {
                Ok(ids) => ids,
                Err(e) => {
                    eprintln!("Warning: badge bookkeeping failed: {}", e);
                    Vec::new()
                }
            };

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    entry: crate::model::Entry,
                    new_badges: Vec<BadgeDefinition>,
                }
                print_json(&Out {
                    entry: saved,
                    new_badges: new_badges.iter().map(|id| definition_or_default(id)).collect(),
                })?;
            } else {
                print_line(&format!("Saved entry for {}", saved.date_key));
                for id in new_badges.iter() {
                    let def = definition_or_default(id);
                    print_line(&styler.yellow(&format!(
                        "New badge: {} ({})",
                        def.title,
                        def.level.as_str()
                    )));
                }
            }

            Ok(())
        }

        Command::Show(args) => {
            ensure_format_supported(cli.format, false)?;

            let date = args.date.as_deref().unwrap_or(&today);
            parse_date_string(date, "date")?;

            let db = read_db(&db_path, &today)?;
            let entry = find_entry(&db, date)
                .cloned()
                .ok_or_else(|| CliError::not_found(format!("No entry for {}", date)))?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    entry: crate::model::Entry,
                }
                print_json(&Out { entry })?;
            } else {
                print_entry_lines(&entry);
            }

            Ok(())
        }

        Command::List(args) => {
            ensure_format_supported(cli.format, false)?;

            if let Some(f) = args.from.as_deref() {
                parse_date_string(f, "from")?;
            }
            if let Some(t) = args.to.as_deref() {
                parse_date_string(t, "to")?;
            }
            if let (Some(f), Some(t)) = (args.from.as_deref(), args.to.as_deref()) {
                if f > t {
                    return Err(CliError::usage("Invalid range: from > to"));
                }
            }

            let db = read_db(&db_path, &today)?;
            let rows = list_entries(&db, args.from.as_deref(), args.to.as_deref());

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    entries: Vec<crate::model::Entry>,
                }
                print_json(&Out { entries: rows })?;
            } else if rows.is_empty() {
                print_line(&styler.gray("(no entries)"));
            } else {
                let table_rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|e| {
                        vec![
                            e.date_key.clone(),
                            e.title.clone().unwrap_or_default(),
                            entry_photo_count(e).to_string(),
                            e.body.clone(),
                        ]
                    })
                    .collect();
                print_line(&render_simple_table(
                    &["date", "title", "photos", "body"],
                    &table_rows,
                ));
            }

            Ok(())
        }

        Command::Search(args) => {
            ensure_format_supported(cli.format, false)?;

            let q = args.query.trim();
            if q.is_empty() {
                return Err(CliError::usage("Search query is required"));
            }

            let db = read_db(&db_path, &today)?;
            let rows = search_entries(&db, q);

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    entries: Vec<crate::model::Entry>,
                }
                print_json(&Out { entries: rows })?;
            } else if rows.is_empty() {
                print_line(&styler.gray("(no matches)"));
            } else {
                let table_rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|e| {
                        vec![
                            e.date_key.clone(),
                            e.title.clone().unwrap_or_default(),
                            e.body.clone(),
                        ]
                    })
                    .collect();
                print_line(&render_simple_table(&["date", "title", "body"], &table_rows));
            }

            Ok(())
        }

        Command::Delete(args) => {
            ensure_format_supported(cli.format, false)?;

            parse_date_string(&args.date, "date")?;

            // Entries go; earned badges stay, by design of the award model.
            let removed = update_db(&db_path, &today, |db| delete_entry(db, &args.date))?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    entry: crate::model::Entry,
                }
                print_json(&Out { entry: removed })?;
            } else {
                print_line(&format!("Deleted entry for {}", removed.date_key));
            }

            Ok(())
        }

        Command::Streak => {
            ensure_format_supported(cli.format, false)?;

            let db = read_db(&db_path, &today)?;
            let streak = current_streak(&db.entries, &today);
            let total = total_count(&db.entries);

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    streak: u32,
                    total: usize,
                }
                print_json(&Out { streak, total })?;
            } else {
                let marker = if streak > 0 {
                    styler.green(&streak.to_string())
                } else {
                    streak.to_string()
                };
                print_line(&format!("Current streak: {} day(s)", marker));
                print_line(&format!("Total entries: {}", total));
            }

            Ok(())
        }

        Command::Badges(args) => {
            ensure_format_supported(cli.format, false)?;

            let db = read_db(&db_path, &today)?;

            let rows: Vec<BadgeRow> = all_definitions()
                .into_iter()
                .filter_map(|def| {
                    let earned_at = db
                        .badges
                        .iter()
                        .find(|b| b.id == def.id)
                        .map(|b| b.earned_at.clone());
                    if args.earned && earned_at.is_none() {
                        return None;
                    }
                    Some(BadgeRow {
                        id: def.id,
                        title: def.title,
                        level: def.level,
                        earned: earned_at.is_some(),
                        earned_at,
                    })
                })
                .collect();

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    badges: Vec<BadgeRow>,
                }
                print_json(&Out { badges: rows })?;
            } else if rows.is_empty() {
                print_line(&styler.gray("(no badges earned yet)"));
            } else {
                let table_rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.clone(),
                            r.title.clone(),
                            r.level.as_str().to_string(),
                            if r.earned {
                                styler.green("yes")
                            } else {
                                "no".to_string()
                            },
                            r.earned_at.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                print_line(&render_simple_table(
                    &["id", "title", "level", "earned", "earned_at"],
                    &table_rows,
                ));
            }

            Ok(())
        }

        Command::Summary => {
            ensure_format_supported(cli.format, false)?;

            let db = read_db(&db_path, &today)?;
            let metrics = Metrics::compute(&db.entries, &today);
            let catalog_size = all_definitions().len();

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct BadgeProgress {
                    earned: usize,
                    total: usize,
                }
                #[derive(serde::Serialize)]
                struct Out {
                    metrics: Metrics,
                    badges: BadgeProgress,
                    start_date: String,
                }
                print_json(&Out {
                    metrics,
                    badges: BadgeProgress {
                        earned: db.badges.len(),
                        total: catalog_size,
                    },
                    start_date: db.settings.start_date.clone(),
                })?;
            } else {
                print_line(&format!("Since {}", db.settings.start_date));
                print_line(&format!("Current streak: {} day(s)", metrics.streak));
                print_line(&format!("Total entries: {}", metrics.total));
                print_line(&format!("Photos: {}", metrics.photos));
                print_line(&format!("Titled entries: {}", metrics.titled));
                print_line(&format!(
                    "Badges: {}/{}",
                    db.badges.len(),
                    catalog_size
                ));
            }

            Ok(())
        }

        Command::Config(args) => {
            ensure_format_supported(cli.format, false)?;

            match args.command {
                ConfigCommand::Show => {
                    let db = read_db(&db_path, &today)?;

                    if cli.format == Format::Json {
                        #[derive(serde::Serialize)]
                        struct Out {
                            settings: crate::model::Settings,
                        }
                        print_json(&Out {
                            settings: db.settings,
                        })?;
                    } else {
                        let s = &db.settings;
                        print_line(&format!(
                            "reminder: {} at {:02}:{:02}",
                            if s.reminder_enabled { "on" } else { "off" },
                            s.reminder_hour,
                            s.reminder_minute
                        ));
                        print_line(&format!(
                            "lock: {}",
                            if s.lock_enabled { "on" } else { "off" }
                        ));
                        print_line(&format!("start_date: {}", s.start_date));
                    }
                    Ok(())
                }

                ConfigCommand::Set(set) => {
                    let patch = SettingsPatch {
                        reminder_enabled: set.reminder_enabled,
                        reminder_hour: set.reminder_hour,
                        reminder_minute: set.reminder_minute,
                        lock_enabled: set.lock_enabled,
                    };

                    let updated = update_db(&db_path, &today, |db| {
                        apply_patch(&mut db.settings, &patch)?;
                        Ok(db.settings.clone())
                    })?;

                    if cli.format == Format::Json {
                        #[derive(serde::Serialize)]
                        struct Out {
                            settings: crate::model::Settings,
                        }
                        print_json(&Out { settings: updated })?;
                    } else {
                        print_line("Settings updated");
                    }
                    Ok(())
                }
            }
        }

        Command::Export(args) => {
            // `export` supports json/csv; `table` is invalid.
            if cli.format == Format::Table {
                return Err(CliError::usage("`daybook export` requires --format json|csv"));
            }

            let db = read_db(&db_path, &today)?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Payload {
                    version: u32,
                    settings: crate::model::Settings,
                    entries: Vec<crate::model::Entry>,
                    badges: Vec<crate::model::EarnedBadge>,
                }

                let entries = list_entries(&db, None, None);
                let payload = Payload {
                    version: db.version,
                    settings: db.settings,
                    entries,
                    badges: db.badges,
                };
                let data = stable_to_string_pretty(&payload)
                    .map_err(|_| CliError::io("DB IO error"))?
                    + "\n";

                if let Some(p) = args.out.as_deref() {
                    fs::write(p, data.as_bytes()).map_err(|_| CliError::io("DB IO error"))?;
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        let _ = fs::set_permissions(p, fs::Permissions::from_mode(0o600));
                    }
                } else {
                    print!("{}", data);
                }
            } else {
                let out_dir = args
                    .out
                    .as_deref()
                    .ok_or_else(|| CliError::usage("CSV export requires --out <dir>"))?;
                export_csv_to_dir(out_dir, &list_entries(&db, None, None), &db.badges)?;
            }

            Ok(())
        }
    }
}
