//! Converting calendar dates into plan day indices, and the `Schedule`
//! type through which readings are looked up by date.

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

use crate::plan::{DayAssignment, PlanType};

/// Every plan is laid out over a 365-day year.
pub const DAYS_PER_YEAR: u32 = 365;

/// The format of stored start dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a plan turns a calendar date into a day index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayIndexMode {
    /// Days elapsed since the plan's start date, wrapping every 365 days
    /// in both directions.
    Elapsed,
    /// The date's own day of the year, ignoring the start date. Day 366
    /// of a leap year is read as day 365.
    DayOfYear,
}

/// The start date used when none is configured or the configured one
/// cannot be parsed: January 1, 2024.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Parses a stored `YYYY-MM-DD` start date, substituting the default
/// start date if it is malformed.
pub fn parse_start_date(s: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(s.trim(), DATE_FORMAT) {
        Ok(d) => d,
        Err(e) => {
            let fallback = default_start_date();
            warn!(start_date = s, error = %e, "invalid start date; using {}", fallback);
            fallback
        }
    }
}

/// Day index of `target` counted from `start` (day 1), wrapped into
/// `1..=365`.
pub fn elapsed_day_index(start: NaiveDate, target: NaiveDate) -> u32 {
    let raw = target.signed_duration_since(start).num_days() + 1;
    ((raw - 1).rem_euclid(DAYS_PER_YEAR as i64) + 1) as u32
}

/// Day of the year of `target`, clamped to 365.
pub fn day_of_year_index(target: NaiveDate) -> u32 {
    std::cmp::min(target.ordinal(), DAYS_PER_YEAR)
}

/// Converts `target` to a day index in `1..=365` using `mode`.
pub fn day_index_for_date(mode: DayIndexMode, start: NaiveDate, target: NaiveDate) -> u32 {
    match mode {
        DayIndexMode::Elapsed => elapsed_day_index(start, target),
        DayIndexMode::DayOfYear => day_of_year_index(target),
    }
}

/// A reading together with the date it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedReading {
    pub date: NaiveDate,
    pub day: u32,
    pub reading: DayAssignment,
}

/// A plan anchored at a start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    plan: PlanType,
    start_date: NaiveDate,
}

impl Schedule {
    pub fn new(plan: PlanType, start_date: NaiveDate) -> Schedule {
        Schedule {
            plan: plan,
            start_date: start_date,
        }
    }

    /// Builds a schedule from stored (possibly invalid) values. Unknown
    /// plans and malformed dates fall back to the defaults.
    pub fn from_stored(plan: &str, start_date: &str) -> Schedule {
        Schedule::new(PlanType::from_key_or_default(plan),
                      parse_start_date(start_date))
    }

    pub fn plan(&self) -> PlanType {
        self.plan
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The day index `date` falls on under this plan's convention.
    pub fn day_index(&self, date: NaiveDate) -> u32 {
        day_index_for_date(self.plan.day_index_mode(), self.start_date, date)
    }

    /// The reading for `date`.
    pub fn reading(&self, date: NaiveDate) -> DayAssignment {
        let day = self.day_index(date);
        let reading = self.plan.assign(day);
        debug!(plan = %self.plan, %date, day, passages = ?reading.passages, "computed reading");
        reading
    }

    /// The reading for `date`, with its date and day index attached.
    pub fn dated_reading(&self, date: NaiveDate) -> DatedReading {
        DatedReading {
            date: date,
            day: self.day_index(date),
            reading: self.reading(date),
        }
    }

    /// The readings for `days` consecutive dates beginning with `from`.
    /// Readings are computed as the iterator is advanced; it stops early
    /// at the last date chrono can represent.
    pub fn upcoming(&self, from: NaiveDate, days: u32) -> impl Iterator<Item = DatedReading> {
        let schedule = *self;
        (0..i64::from(days))
            .map_while(move |i| from.checked_add_signed(Duration::days(i)))
            .map(move |d| schedule.dated_reading(d))
    }
}

impl Default for Schedule {
    fn default() -> Schedule {
        Schedule::new(PlanType::DEFAULT, default_start_date())
    }
}

/// The reading for `date` under `plan`, anchored at the default start
/// date.
pub fn get_reading(date: NaiveDate, plan: PlanType) -> DayAssignment {
    Schedule::new(plan, default_start_date()).reading(date)
}
