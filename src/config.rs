//! The optional `config.toml` file.
//!
//! ```toml
//! plan = "mcheyne"
//! start_date = "2025-01-01"
//! bible_text = "/home/me/kjv.json"
//! ansi = true
//! ```
//!
//! Every key is optional. A missing file is the same as an empty one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::calendar::{default_start_date, Schedule, DATE_FORMAT};
use crate::errors::*;
use crate::plan::PlanType;

/// User configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Plan key. Unknown keys fall back to the default plan.
    #[serde(default = "default_plan")]
    pub plan: String,

    /// Start date (`YYYY-MM-DD`) for plans counted from a start date.
    /// A bare TOML date (`start_date = 2025-01-01`) is accepted too.
    /// Malformed dates, or values of any other type, fall back to the
    /// default start date.
    #[serde(default = "default_start", deserialize_with = "lenient_start")]
    pub start_date: String,

    /// JSON file holding Bible text, if any.
    #[serde(default)]
    pub bible_text: Option<PathBuf>,

    /// Whether to use coloured output.
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_plan() -> String {
    PlanType::DEFAULT.key().to_owned()
}
fn default_start() -> String {
    default_start_date().format(DATE_FORMAT).to_string()
}
fn default_true() -> bool {
    true
}

/// Reads `start_date` as text whatever its TOML type. Strings are kept
/// as they are (and checked later, by `Schedule::from_stored`); dates are
/// written as `YYYY-MM-DD`; anything else is replaced by the default.
fn lenient_start<'de, D: Deserializer<'de>>(deserializer: D) -> ::std::result::Result<String, D::Error> {
    let value = toml::Value::deserialize(deserializer)?;
    let date = match value {
        toml::Value::String(s) => return Ok(s),
        toml::Value::Datetime(ref dt) => dt.date,
        _ => None,
    };
    match date {
        Some(d) => Ok(format!("{:04}-{:02}-{:02}", d.year, d.month, d.day)),
        None => {
            warn!(start_date = %value, "start date is not a date; using {}", default_start());
            Ok(default_start())
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            plan: default_plan(),
            start_date: default_start(),
            bible_text: None,
            ansi: true,
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| ErrorKind::Config(e.to_string()).into())
    }

    /// Reads the configuration file at `path`, returning the defaults if
    /// it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path).chain_err(|| ErrorKind::Io(format!("could not read config file '{}'", path.display())))?;
        Config::from_toml(&text).chain_err(|| format!("in config file '{}'", path.display()))
    }

    /// The schedule described by this configuration, with fallbacks
    /// applied.
    pub fn schedule(&self) -> Schedule {
        Schedule::from_stored(&self.plan, &self.start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::default().schedule(), Schedule::default());
    }

    #[test]
    fn full_config() {
        let c = Config::from_toml("plan = \"mcheyne\"\nstart_date = \"2025-03-01\"\n\
                                   bible_text = \"kjv.json\"\nansi = false\n")
            .unwrap();
        assert_eq!(c.bible_text, Some(PathBuf::from("kjv.json")));
        assert!(!c.ansi);
        let s = c.schedule();
        assert_eq!(s.plan(), PlanType::McCheyne);
        assert_eq!(s.start_date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn bad_values_fall_back_in_schedule() {
        let c = Config::from_toml("plan = \"whole_bible_tomorrow\"\nstart_date = \"soon\"\n").unwrap();
        assert_eq!(c.schedule(), Schedule::default());
    }

    #[test]
    fn bare_toml_dates_are_accepted() {
        let c = Config::from_toml("start_date = 2025-01-01\n").unwrap();
        assert_eq!(c.start_date, "2025-01-01");
        assert_eq!(c.schedule().start_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        // A date-time keeps only its date
        let c = Config::from_toml("start_date = 2025-06-15T08:00:00\n").unwrap();
        assert_eq!(c.schedule().start_date(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn start_dates_of_other_types_fall_back() {
        for text in &["start_date = 20250101\n", "start_date = true\n", "start_date = 08:00:00\n",
                      "start_date = [2025, 1, 1]\n"] {
            let c = Config::from_toml(text).unwrap();
            assert_eq!(c.schedule().start_date(), default_start_date(), "{}", text);
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("colour = \"red\"\n").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path().join("config.toml")).unwrap(),
                   Config::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "plan = \"genre_52week\"").unwrap();
        assert_eq!(Config::load(&path).unwrap().schedule().plan(),
                   PlanType::Genre52Week);
    }
}
