use crate::error::CliError;
use crate::model::Settings;

/// Partial update for the settings record. `None` leaves a field alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPatch {
    pub reminder_enabled: Option<bool>,
    pub reminder_hour: Option<u32>,
    pub reminder_minute: Option<u32>,
    pub lock_enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.reminder_enabled.is_none()
            && self.reminder_hour.is_none()
            && self.reminder_minute.is_none()
            && self.lock_enabled.is_none()
    }
}

pub fn apply_patch(settings: &mut Settings, patch: &SettingsPatch) -> Result<(), CliError> {
    if patch.is_empty() {
        return Err(CliError::usage("Nothing to update"));
    }

    if let Some(h) = patch.reminder_hour {
        if h > 23 {
            return Err(CliError::usage(format!("Invalid reminder hour: {}", h)));
        }
    }
    if let Some(m) = patch.reminder_minute {
        if m > 59 {
            return Err(CliError::usage(format!("Invalid reminder minute: {}", m)));
        }
    }

    if let Some(h) = patch.reminder_hour {
        settings.reminder_hour = h;
    }
    if let Some(m) = patch.reminder_minute {
        settings.reminder_minute = m;
    }
    if let Some(b) = patch.reminder_enabled {
        settings.reminder_enabled = b;
    }
    if let Some(b) = patch.lock_enabled {
        settings.lock_enabled = b;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_settings;

    #[test]
    fn empty_patch_is_a_usage_error() {
        let mut s = default_settings("2026-01-31");
        let err = apply_patch(&mut s, &SettingsPatch::default()).unwrap_err();
        assert_eq!(err.exit_code, 2);
    }

    #[test]
    fn out_of_range_time_is_rejected_without_partial_update() {
        let mut s = default_settings("2026-01-31");
        let patch = SettingsPatch {
            reminder_hour: Some(24),
            reminder_enabled: Some(true),
            ..Default::default()
        };
        assert!(apply_patch(&mut s, &patch).is_err());
        assert!(!s.reminder_enabled);
        assert_eq!(s.reminder_hour, 20);
    }

    #[test]
    fn patch_updates_only_named_fields() {
        let mut s = default_settings("2026-01-31");
        let patch = SettingsPatch {
            reminder_enabled: Some(true),
            reminder_hour: Some(7),
            reminder_minute: Some(30),
            ..Default::default()
        };
        apply_patch(&mut s, &patch).unwrap();
        assert!(s.reminder_enabled);
        assert_eq!(s.reminder_hour, 7);
        assert_eq!(s.reminder_minute, 30);
        assert!(!s.lock_enabled);
        assert_eq!(s.start_date, "2026-01-31");
    }
}
