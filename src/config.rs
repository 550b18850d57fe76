//! Runtime settings for the command-line front end.
//!
//! Settings are layered from built-in defaults, an optional
//! `<data_dir>/config.toml`, and `TASKDECK_*` environment variables, in
//! increasing order of precedence. The data directory itself is chosen
//! before the layers are read, since it decides where the file lives.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{FixedOffset, Local, Offset};
use serde::Deserialize;
use thiserror::Error;

/// Name of the optional settings file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "TASKDECK";

const DEFAULT_DIR_NAME: &str = ".taskdeck";
const DEFAULT_MAX_BACKUPS: i64 = 5;
const DEFAULT_UPCOMING_DAYS: i64 = 7;
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors raised while resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings source could not be read or deserialised.
    #[error("failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    /// No data directory was given and the home directory is unknown.
    #[error("cannot determine the home directory; pass --data-dir")]
    NoHomeDirectory,

    /// The home directory path is not valid UTF-8.
    #[error("home directory is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// At least one backup must be kept, since the newest snapshot is
    /// written before older ones are pruned.
    #[error("max_backups must be at least 1")]
    NoBackupsKept,

    /// The configured UTC offset is outside ±24 hours.
    #[error("utc_offset_minutes {0} is out of range")]
    InvalidOffset(i32),
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Directory holding `workspaces.json`, backups, and the session file.
    pub data_dir: Utf8PathBuf,
    /// Number of backups kept after each write. Must be at least one.
    pub max_backups: usize,
    /// Offset from UTC, in minutes, that defines calendar days. The local
    /// offset at startup applies when unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Length of the dashboard's upcoming window in days.
    pub upcoming_days: u32,
    /// `tracing` filter directive, such as `info` or `taskdeck=debug`.
    pub log_level: String,
}

impl Settings {
    /// Loads settings for `data_dir`, or for `~/.taskdeck` when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the home directory cannot be resolved,
    /// a settings source is malformed, or `max_backups` is zero.
    pub fn load(data_dir: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let resolved_dir = match data_dir {
            Some(dir) => dir.to_owned(),
            None => default_data_dir()?,
        };
        let config_path = resolved_dir.join(CONFIG_FILE);

        let settings = ::config::Config::builder()
            .set_default("max_backups", DEFAULT_MAX_BACKUPS)?
            .set_default("upcoming_days", DEFAULT_UPCOMING_DAYS)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(::config::File::from(config_path.as_std_path()).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override("data_dir", resolved_dir.as_str())?
            .build()?
            .try_deserialize::<Self>()?;
        if settings.max_backups == 0 {
            return Err(ConfigError::NoBackupsKept);
        }
        Ok(settings)
    }

    /// Returns the offset that defines calendar days.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOffset`] when the configured minutes do
    /// not form a valid offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        let Some(minutes) = self.utc_offset_minutes else {
            return Ok(Local::now().offset().fix());
        };
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidOffset(minutes))
    }
}

fn default_data_dir() -> Result<Utf8PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    let utf8_home = Utf8PathBuf::from_path_buf(home)
        .map_err(|path| ConfigError::NonUtf8Path(path.display().to_string()))?;
    Ok(utf8_home.join(DEFAULT_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings_with_offset(minutes: Option<i32>) -> Settings {
        Settings {
            data_dir: Utf8PathBuf::from("/tmp/taskdeck"),
            max_backups: 5,
            utc_offset_minutes: minutes,
            upcoming_days: 7,
            log_level: "warn".to_owned(),
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(-180, -10_800)]
    #[case(330, 19_800)]
    fn offset_converts_minutes_to_seconds(#[case] minutes: i32, #[case] seconds: i32) {
        let settings = settings_with_offset(Some(minutes));
        assert_eq!(
            settings.offset().ok(),
            FixedOffset::east_opt(seconds),
            "offset for {minutes} minutes"
        );
    }

    #[rstest]
    #[case(1_440)]
    #[case(i32::MAX)]
    fn offset_rejects_out_of_range_minutes(#[case] minutes: i32) {
        let settings = settings_with_offset(Some(minutes));
        assert!(matches!(
            settings.offset(),
            Err(ConfigError::InvalidOffset(value)) if value == minutes
        ));
    }

    #[rstest]
    fn load_reads_defaults_and_config_file() -> eyre::Result<()> {
        let temp = tempfile::tempdir()?;
        let dir = Utf8Path::from_path(temp.path())
            .ok_or_else(|| eyre::eyre!("temporary directory is not UTF-8"))?;

        let defaults = Settings::load(Some(dir))?;
        eyre::ensure!(defaults.data_dir == dir, "data dir should be the override");
        eyre::ensure!(defaults.max_backups == 5, "default backups");
        eyre::ensure!(defaults.upcoming_days == 7, "default window");

        std::fs::write(
            dir.join(CONFIG_FILE),
            "max_backups = 2\nupcoming_days = 14\nutc_offset_minutes = -180\n",
        )?;
        let from_file = Settings::load(Some(dir))?;
        eyre::ensure!(from_file.max_backups == 2, "file should set backups");
        eyre::ensure!(from_file.upcoming_days == 14, "file should set window");
        eyre::ensure!(
            from_file.utc_offset_minutes == Some(-180),
            "file should set offset"
        );
        Ok(())
    }

    #[rstest]
    fn load_rejects_keeping_no_backups() -> eyre::Result<()> {
        let temp = tempfile::tempdir()?;
        let dir = Utf8Path::from_path(temp.path())
            .ok_or_else(|| eyre::eyre!("temporary directory is not UTF-8"))?;
        std::fs::write(dir.join(CONFIG_FILE), "max_backups = 0\n")?;

        let result = Settings::load(Some(dir));

        eyre::ensure!(
            matches!(result, Err(ConfigError::NoBackupsKept)),
            "zero backups should be rejected"
        );
        Ok(())
    }
}
