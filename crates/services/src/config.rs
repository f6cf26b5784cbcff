use std::env;
use std::time::Duration;

use crate::progress_store::PROGRESS_KEY;

/// Runtime knobs for assembling services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    pub database_url: String,
    pub progress_key: String,
    pub tick_period: Duration,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://course.sqlite3".into(),
            progress_key: PROGRESS_KEY.into(),
            tick_period: Duration::from_secs(1),
        }
    }
}

impl ServicesConfig {
    /// Defaults overridden by `COURSE_DB_URL`, `COURSE_PROGRESS_KEY` and
    /// `COURSE_TICK_MILLIS` when set. Blank or unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank("COURSE_DB_URL") {
            config.database_url = url;
        }
        if let Some(key) = non_blank("COURSE_PROGRESS_KEY") {
            config.progress_key = key;
        }
        if let Some(millis) = non_blank("COURSE_TICK_MILLIS") {
            match millis.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.tick_period = Duration::from_millis(ms),
                _ => log::warn!("ignoring invalid COURSE_TICK_MILLIS value {millis:?}"),
            }
        }
        config
    }
}
