//! This module provides functions for working with the application's
//! directories and with exported plans stored in them. The directories
//! are determined by the `app_dirs` crate, which will return a path based
//! on the operating system (Windows, OS X, or Linux).
//!
//! Exports are only ever written when the user asks for one. They are a
//! snapshot of a whole year of readings and are never read back in place
//! of computing a reading: the schedule is always the source of truth.
//!
//! All exports are stored in the exports directory with the extension
//! `.plan.json`. Files with a different extension will not be recognized,
//! e.g. by the `Exports` iterator.

use std::collections::BTreeMap;
use std::fs::{self, File, ReadDir};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use app_dirs::{self, AppDataType, AppDirsError, AppInfo};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::{Schedule, DATE_FORMAT};
use crate::errors::*;
use crate::plan::{DayAssignment, PlanType};

/// The information for app_dirs
const APP_INFO: AppInfo = AppInfo {
    name: "lectio",
    author: "Ian Johnson",
};

/// The extension given to every export file.
const EXTENSION: &str = "plan.json";

/// A year of readings from one plan, keyed by date (`YYYY-MM-DD`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Export {
    pub plan: PlanType,
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub year: i32,
    pub total_days: usize,
    pub readings: BTreeMap<String, DayAssignment>,
}

impl Export {
    /// Computes the readings for every date of `year`.
    pub fn build(schedule: &Schedule, year: i32) -> Result<Export> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| Error::from_kind(ErrorKind::InvalidDate(format!("year {} is out of range", year))))?;

        let readings: BTreeMap<String, DayAssignment> = first.iter_days()
            .take_while(|d| d.year() == year)
            .map(|d| (d.format(DATE_FORMAT).to_string(), schedule.reading(d)))
            .collect();

        let info = schedule.plan().info();
        Ok(Export {
            plan: schedule.plan(),
            name: info.name.to_owned(),
            description: info.description.to_owned(),
            start_date: schedule.start_date().format(DATE_FORMAT).to_string(),
            year: year,
            total_days: readings.len(),
            readings: readings,
        })
    }

    /// The name the export is stored under, e.g. `mcheyne-2026`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.plan.key(), self.year)
    }

    /// Writes the export in plain text: one unindented line per day
    /// holding the date and passages, followed by an indented line with
    /// the day's theme.
    pub fn to_text<T: Write>(&self, output: T) -> Result<()> {
        // Buffer writes
        let mut w = BufWriter::new(output);

        for (date, reading) in &self.readings {
            writeln!(w, "{}: {}", date, reading.passages.join("; ")).chain_err(|| ErrorKind::Io("could not write to text output".into()))?;
            if !reading.theme.is_empty() {
                writeln!(w, "    {}", reading.theme).chain_err(|| ErrorKind::Io("could not write to text output".into()))?;
            }
        }

        w.flush().chain_err(|| ErrorKind::Io("could not write to text output".into()))
    }
}

/// Returns the location of the given application directory if possible.
fn app_dir(kind: AppDataType, name: &str) -> Result<PathBuf> {
    match app_dirs::get_app_dir(kind, &APP_INFO, name) {
        Ok(p) => Ok(p),
        Err(AppDirsError::NotSupported) => Err(ErrorKind::CannotLocateConfig.into()),
        Err(AppDirsError::Io(e)) => Err(e).chain_err(|| ErrorKind::Io("could not find application directory".into())),
        // This should properly be a panic, since there really isn't any way
        // this can happen (unless `app_dirs` changes in a breaking way).
        Err(AppDirsError::InvalidAppInfo) => panic!("invalid app info"),
    }
}

/// Returns the location of the configuration file (which need not exist).
pub fn config_path() -> Result<PathBuf> {
    app_dir(AppDataType::UserConfig, "config.toml")
}

/// Returns the location of the exports directory if possible.
pub fn exports_dir() -> Result<PathBuf> {
    app_dir(AppDataType::UserData, "exports")
}

/// An iterator over all the exports in an export directory.
///
/// The iterator returns items of type `Result<Export>`
/// because there may be errors in reading an export or errors
/// in the format itself.
pub struct Exports {
    /// The underlying `ReadDir` iterator
    read_dir: ReadDir,
}

impl Iterator for Exports {
    type Item = Result<Export>;

    fn next(&mut self) -> Option<Result<Export>> {
        loop {
            let entry = self.read_dir.next()?;
            let path = match entry.chain_err(|| ErrorKind::Io("could not read directory item".into())) {
                Ok(e) => e.path(),
                Err(e) => return Some(Err(e)),
            };

            // Skip over things that aren't files or don't have the
            // proper extension
            let path_str = match path.to_str() {
                Some(s) => s.to_owned(),
                None => return Some(Err(ErrorKind::Utf8("path is not valid utf8".into()).into())),
            };
            if !path.is_file() || !path_str.ends_with(".plan.json") {
                continue;
            }
            return Some(read_file(&path));
        }
    }
}

fn read_file(path: &Path) -> Result<Export> {
    let f = File::open(path).chain_err(|| ErrorKind::Io(format!("could not open file '{}'", path.display())))?;
    serde_json::from_reader(f).chain_err(|| ErrorKind::Json(format!("json error in file '{}'", path.display())))
}

/// The directory that exports are kept in.
///
/// `ExportStore::open` uses the per-user data directory; `ExportStore::at`
/// uses any directory.
#[derive(Debug, Clone)]
pub struct ExportStore {
    dir: PathBuf,
}

impl ExportStore {
    /// The store in the per-user data directory.
    pub fn open() -> Result<ExportStore> {
        Ok(ExportStore::at(exports_dir()?))
    }

    pub fn at<P: Into<PathBuf>>(dir: P) -> ExportStore {
        ExportStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let mut filename = self.dir.clone();
        filename.push(format!("{}.{}", name, EXTENSION));
        filename
    }

    /// Makes sure the directory exists (it will be created if it does not).
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir).chain_err(|| ErrorKind::Io("could not create exports directory".into()))?;
        }
        Ok(())
    }

    /// Returns an error if the directory does not exist.
    fn must_exist(&self) -> Result<()> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(ErrorKind::NoDataDirectory.into())
        }
    }

    /// Returns an iterator over the stored exports.
    ///
    /// As noted in the module documentation, exports must have the extension
    /// `.plan.json` to be recognized; the iterator will pass over any files
    /// that do not have this extension.
    pub fn exports(&self) -> Result<Exports> {
        self.must_exist()?;
        Ok(Exports { read_dir: fs::read_dir(&self.dir).chain_err(|| ErrorKind::Io("could not read from exports directory".into()))? })
    }

    /// Reads the export with the given name (e.g. `mcheyne-2026`).
    pub fn read(&self, name: &str) -> Result<Export> {
        self.must_exist()?;
        let filename = self.path_for(name);
        if !filename.exists() {
            return Err(ErrorKind::ExportDoesNotExist(name.into()).into());
        }
        read_file(&filename)
    }

    /// Writes an export, returning an error if one with the same name
    /// already exists.
    pub fn add(&self, export: &Export) -> Result<PathBuf> {
        if self.path_for(&export.key()).exists() {
            return Err(ErrorKind::ExportAlreadyExists(export.key()).into());
        }
        self.overwrite(export)
    }

    /// Writes an export, replacing any existing one with the same name.
    pub fn overwrite(&self, export: &Export) -> Result<PathBuf> {
        self.ensure_dir()?;
        let filename = self.path_for(&export.key());
        let f = File::create(&filename).chain_err(|| ErrorKind::Io("could not create export file".into()))?;

        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, export).chain_err(|| ErrorKind::Json("could not serialize export to json".into()))?;
        w.flush().chain_err(|| ErrorKind::Io("could not write export file".into()))?;
        info!(export = %export.key(), path = %filename.display(), "wrote export");
        Ok(filename)
    }

    /// Removes the export with the given name, returning an error if it
    /// doesn't exist.
    pub fn remove(&self, name: &str) -> Result<()> {
        self.must_exist()?;
        let filename = self.path_for(name);
        if !filename.exists() {
            Err(ErrorKind::ExportDoesNotExist(name.to_owned()).into())
        } else {
            fs::remove_file(&filename).chain_err(|| ErrorKind::Io("could not remove export file".into()))
        }
    }
}
