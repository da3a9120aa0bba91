//! Timezone resolution for "today"
//!
//! Every reporting period is anchored to the current calendar date. That
//! date depends on the timezone, so a single zone is resolved up front and
//! used for the whole run.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

use crate::error::{AwsCostError, Result};

/// Timezone used to decide which calendar day "today" is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimezoneConfig {
    pub tz: Tz,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            tz: get_local_timezone(),
        }
    }
}

impl TimezoneConfig {
    /// Resolve the timezone from CLI arguments
    ///
    /// `use_utc` wins over an explicit name; with neither, the local zone is used.
    pub fn from_cli(timezone: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self { tz: Tz::UTC });
        }

        match timezone {
            Some(name) => {
                let tz = Tz::from_str(name).map_err(|_| {
                    AwsCostError::InvalidTimezone(format!(
                        "'{name}'. Use a name like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                    ))
                })?;
                Ok(Self { tz })
            }
            None => Ok(Self::default()),
        }
    }

    /// Name of the configured zone
    pub fn display_name(&self) -> &str {
        self.tz.name()
    }

    /// Calendar date of `now` in this zone
    pub fn today_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Current calendar date in this zone
    pub fn today(&self) -> NaiveDate {
        self.today_at(Utc::now())
    }
}

/// Detect the system's local timezone
///
/// Checks `TZ` first, then asks the OS, and falls back to UTC.
pub fn get_local_timezone() -> Tz {
    #[allow(clippy::collapsible_if)]
    if let Ok(tz_str) = std::env::var("TZ") {
        if let Ok(tz) = Tz::from_str(&tz_str) {
            debug!("Using timezone from TZ environment variable: {}", tz_str);
            return tz;
        }
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => Tz::from_str(&tz_str).unwrap_or_else(|_| {
            debug!("Unrecognized system timezone '{}', using UTC", tz_str);
            Tz::UTC
        }),
        Err(e) => {
            debug!("Could not detect local timezone: {:?}, using UTC", e);
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{EnvVarGuard, lock_env};
    use chrono::TimeZone;

    #[test]
    fn test_utc_flag_overrides_name() {
        let config = TimezoneConfig::from_cli(Some("Asia/Tokyo"), true).unwrap();
        assert_eq!(config.tz, Tz::UTC);
        assert_eq!(config.display_name(), "UTC");
    }

    #[test]
    fn test_explicit_timezone() {
        let config = TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap();
        assert_eq!(config.display_name(), "America/New_York");
    }

    #[test]
    fn test_invalid_timezone() {
        let result = TimezoneConfig::from_cli(Some("Mars/Olympus_Mons"), false);
        assert!(matches!(result, Err(AwsCostError::InvalidTimezone(_))));
    }

    #[test]
    fn test_today_depends_on_zone() {
        // 2024-05-11 02:00 UTC is still May 10 in New York
        let now = Utc.with_ymd_and_hms(2024, 5, 11, 2, 0, 0).unwrap();
        let utc = TimezoneConfig { tz: Tz::UTC };
        let new_york = TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap();

        assert_eq!(utc.today_at(now), NaiveDate::from_ymd_opt(2024, 5, 11).unwrap());
        assert_eq!(
            new_york.today_at(now),
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
        );
    }

    #[test]
    fn test_tz_env_var_is_honoured() {
        let _lock = lock_env();
        let mut guard = EnvVarGuard::new();
        guard.set("TZ", "Europe/Berlin");

        assert_eq!(get_local_timezone().name(), "Europe/Berlin");
    }
}
