// For `error_chain!`
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;

pub mod errors {
    error_chain! {
        errors {
            /// The user's config or data directory could not be found or deduced.
            CannotLocateConfig {
                description("cannot locate config directory")
            }
            /// The data directory does not exist (nothing has been exported yet).
            NoDataDirectory {
                description("data directory does not exist")
            }
            /// The specified export does not exist (includes its name).
            ExportDoesNotExist(name: String) {
                description("export does not exist")
                display("export '{}' does not exist", name)
            }
            /// The specified export already exists (includes its name).
            /// Exports are only replaced when the caller asks for it.
            ExportAlreadyExists(name: String) {
                description("export already exists")
                display("export '{}' already exists", name)
            }
            /// A plan name that matches none of the known plans.
            UnknownPlan(name: String) {
                description("unknown plan")
                display("unknown plan '{}'", name)
            }
            /// A date that could not be parsed or is out of range.
            InvalidDate(t: String) {
                description("invalid date")
                display("invalid date: {}", t)
            }
            /// A passage reference that could not be parsed.
            InvalidReference(t: String) {
                description("invalid passage reference")
                display("invalid passage reference '{}'", t)
            }
            /// An error in the configuration file.
            Config(t: String) {
                description("config error")
                display("config error: {}", t)
            }
            /// Indicates an error in UTF8 format (probably a filename).
            Utf8(t: String) {
                description("utf8 error")
                display("utf8 error: {}", t)
            }
            /// An IO error (usually caused by `std::io::Error`).
            Io(t: String) {
                description("io error")
                display("{}", t)
            }
            /// A JSON error (usually caused by `serde_json::Error`).
            Json(t: String) {
                description("json error")
                display("{}", t)
            }
        }
    }
}

pub use crate::errors::*;

pub mod canon;
pub mod reference;
pub mod partition;
pub mod plan;
pub mod calendar;
pub mod text;
pub mod config;
pub mod files;

pub use crate::calendar::{get_reading, DatedReading, DayIndexMode, Schedule};
pub use crate::canon::{BookSpec, ChapterUnit, Genre};
pub use crate::config::Config;
pub use crate::plan::{DayAssignment, PlanInfo, PlanType};
pub use crate::reference::Passage;
