use crate::error::CliError;
use chrono::{SecondsFormat, Utc};

pub fn validate_rfc3339(ts: &str, label: &str) -> Result<(), CliError> {
    let t = ts.trim();
    if t.is_empty() {
        return Err(CliError::usage(format!("Invalid {}: (empty)", label)));
    }
    chrono::DateTime::parse_from_rfc3339(t)
        .map(|_| ())
        .map_err(|_| CliError::usage(format!("Invalid {}: {}", label, ts)))
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Explicit `--ts` wins over the system clock so saves can be replayed
/// deterministically in tests.
pub fn resolve_ts(cli_ts: Option<&str>) -> Result<String, CliError> {
    match cli_ts {
        Some(t) => {
            validate_rfc3339(t, "ts")?;
            Ok(t.trim().to_string())
        }
        None => Ok(now_rfc3339()),
    }
}
