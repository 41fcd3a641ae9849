//! This module provides the `PlanType` enumeration and the partitioning
//! strategy behind each plan.
//!
//! Every plan is an entry in a single table (`PLANS`) that gives its
//! display name, description, cycle length, the way calendar dates are
//! turned into day indices, and the pure function computing a day's
//! reading. Adding a plan means adding an entry and a function.
//!
//! All of the assignment functions take a 1-based day index within a
//! 365-day year and return a `DayAssignment`. They hold no state, so they
//! may be called from any number of threads.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::{DayIndexMode, DAYS_PER_YEAR};
use crate::canon::{self, ChapterUnit, Genre, Testament};
use crate::errors::*;
use crate::partition::{cycle_position, cyclic_window, even_split, even_split_at_least_one};
use crate::reference::{compress, Passage};

/// The readings for a single day: compressed passage references and a
/// short theme.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DayAssignment {
    pub passages: Vec<String>,
    pub theme: String,
}

impl DayAssignment {
    /// Renders structured passages into an assignment.
    pub fn new(passages: &[Passage], theme: String) -> DayAssignment {
        DayAssignment {
            passages: passages.iter().map(|p| p.to_string()).collect(),
            theme: theme,
        }
    }
}

/// The named reading plans.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanType {
    #[serde(rename = "classic")]
    Classic,
    #[serde(rename = "chronological")]
    Chronological,
    #[serde(rename = "chronological_cross_ref")]
    ChronologicalCrossRef,
    #[serde(rename = "old_psalms_new")]
    OldPsalmsNew,
    #[serde(rename = "old_new_split")]
    OldNewSplit,
    #[serde(rename = "mcheyne")]
    McCheyne,
    #[serde(rename = "fivexfive_nt")]
    FiveXFiveNt,
    #[serde(rename = "genre_52week")]
    Genre52Week,
}

/// Descriptive information about a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Number of days in one pass through the plan; readings repeat
    /// after this many days.
    pub total_days: u32,
}

/// One row of the strategy table.
struct PlanEntry {
    plan: PlanType,
    info: PlanInfo,
    mode: DayIndexMode,
    assign: fn(u32) -> DayAssignment,
}

static PLANS: [PlanEntry; 8] = [
    PlanEntry {
        plan: PlanType::Classic,
        info: PlanInfo {
            key: "classic",
            name: "Classic Bible in a Year",
            description: "Old Testament, two chapters of Psalms and Proverbs, and New Testament \
                          every day",
            total_days: 365,
        },
        mode: DayIndexMode::Elapsed,
        assign: old_psalms_new,
    },
    PlanEntry {
        plan: PlanType::Chronological,
        info: PlanInfo {
            key: "chronological",
            name: "Chronological",
            description: "The whole Bible in chronological book order, split evenly over the \
                          year",
            total_days: 365,
        },
        mode: DayIndexMode::DayOfYear,
        assign: chronological,
    },
    PlanEntry {
        plan: PlanType::ChronologicalCrossRef,
        info: PlanInfo {
            key: "chronological_cross_ref",
            name: "Chronological with Psalms",
            description: "The chronological plan with a psalm added on each of the first 150 \
                          days that has none",
            total_days: 365,
        },
        mode: DayIndexMode::DayOfYear,
        assign: chronological_cross_ref,
    },
    PlanEntry {
        plan: PlanType::OldPsalmsNew,
        info: PlanInfo {
            key: "old_psalms_new",
            name: "Old Testament, Psalms & New Testament",
            description: "Three parallel readings: Old Testament, Psalms and Proverbs, New \
                          Testament",
            total_days: 365,
        },
        mode: DayIndexMode::Elapsed,
        assign: old_psalms_new,
    },
    PlanEntry {
        plan: PlanType::OldNewSplit,
        info: PlanInfo {
            key: "old_new_split",
            name: "Old & New",
            description: "The Old and New Testaments read side by side, each finishing at the \
                          end of the year",
            total_days: 365,
        },
        mode: DayIndexMode::DayOfYear,
        assign: old_new_split,
    },
    PlanEntry {
        plan: PlanType::McCheyne,
        info: PlanInfo {
            key: "mcheyne",
            name: "M'Cheyne",
            description: "Four daily readings: Old Testament history, prophets and poetry, New \
                          Testament, and a psalm",
            total_days: 365,
        },
        mode: DayIndexMode::Elapsed,
        assign: mcheyne,
    },
    PlanEntry {
        plan: PlanType::FiveXFiveNt,
        info: PlanInfo {
            key: "fivexfive_nt",
            name: "5x5x5 New Testament",
            description: "The New Testament one chapter a day, five days a week for 52 weeks",
            total_days: FIVE_BY_FIVE_DAYS,
        },
        mode: DayIndexMode::DayOfYear,
        assign: fivexfive_nt,
    },
    PlanEntry {
        plan: PlanType::Genre52Week,
        info: PlanInfo {
            key: "genre_52week",
            name: "52 Weeks by Genre",
            description: "The Bible read genre by genre: law, history, poetry, prophets, gospels, \
                          epistles",
            total_days: 365,
        },
        mode: DayIndexMode::DayOfYear,
        assign: genre_52week,
    },
];

impl PlanType {
    /// Every plan, in table order.
    pub const ALL: [PlanType; 8] = [
        PlanType::Classic,
        PlanType::Chronological,
        PlanType::ChronologicalCrossRef,
        PlanType::OldPsalmsNew,
        PlanType::OldNewSplit,
        PlanType::McCheyne,
        PlanType::FiveXFiveNt,
        PlanType::Genre52Week,
    ];

    /// The plan used when none (or an unknown one) is given.
    pub const DEFAULT: PlanType = PlanType::Chronological;

    fn entry(self) -> &'static PlanEntry {
        // The table has one entry per variant, in declaration order
        &PLANS[self as usize]
    }

    /// Looks up a plan by its key (e.g. `mcheyne`).
    pub fn from_key(key: &str) -> Option<PlanType> {
        PLANS.iter().find(|e| e.info.key == key).map(|e| e.plan)
    }

    /// Looks up a plan by its key, falling back to the default plan for
    /// unknown keys.
    pub fn from_key_or_default(key: &str) -> PlanType {
        PlanType::from_key(key).unwrap_or_else(|| {
            warn!(plan = key, "unknown plan; using {}", PlanType::DEFAULT);
            PlanType::DEFAULT
        })
    }

    pub fn key(self) -> &'static str {
        self.entry().info.key
    }

    pub fn info(self) -> PlanInfo {
        self.entry().info
    }

    /// How dates are converted to day indices for this plan.
    pub fn day_index_mode(self) -> DayIndexMode {
        self.entry().mode
    }

    /// Computes the reading for a day index in `1..=365`.
    ///
    /// # Panics
    ///
    /// Panics if `day` is outside `1..=365`.
    pub fn assign(self, day: u32) -> DayAssignment {
        assert!(day >= 1 && day <= DAYS_PER_YEAR,
                "day index {} is outside 1..={}",
                day,
                DAYS_PER_YEAR);
        (self.entry().assign)(day)
    }
}

impl Default for PlanType {
    fn default() -> PlanType {
        PlanType::DEFAULT
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PlanType {
    type Err = Error;

    fn from_str(s: &str) -> Result<PlanType> {
        PlanType::from_key(s).ok_or_else(|| ErrorKind::UnknownPlan(s.to_owned()).into())
    }
}

/// Length of the 5x5x5 cycle: five days a week for 52 weeks.
pub const FIVE_BY_FIVE_DAYS: u32 = 260;

/// The number of days at the start of the year that get a psalm in the
/// cross-reference plan.
const CROSS_REF_PSALM_DAYS: u32 = 150;

/// The sub-sequences of the canon read by the multi-stream plans. They
/// are derived once from the chapter sequence and never change.
struct Streams {
    old: Vec<ChapterUnit>,
    new: Vec<ChapterUnit>,
    /// The Old Testament without Psalms and Proverbs.
    old_without_wisdom: Vec<ChapterUnit>,
    /// Psalms followed by Proverbs.
    psalms_proverbs: Vec<ChapterUnit>,
    /// Law and history.
    mcheyne_history: Vec<ChapterUnit>,
    /// Poetry (except Psalms) and prophets.
    mcheyne_prophets: Vec<ChapterUnit>,
    /// The whole canon regrouped genre by genre.
    by_genre: Vec<ChapterUnit>,
}

static STREAMS: Lazy<Streams> = Lazy::new(|| {
    let mut psalms_proverbs = canon::sequence_where(|b| b.name == "Psalms");
    psalms_proverbs.extend(canon::sequence_where(|b| b.name == "Proverbs"));

    Streams {
        old: canon::sequence_where(|b| b.genre.testament() == Testament::Old),
        new: canon::sequence_where(|b| b.genre.testament() == Testament::New),
        old_without_wisdom: canon::sequence_where(|b| {
            b.genre.testament() == Testament::Old && b.name != "Psalms" && b.name != "Proverbs"
        }),
        psalms_proverbs: psalms_proverbs,
        mcheyne_history: canon::sequence_where(|b| {
            b.genre == Genre::Law || b.genre == Genre::History
        }),
        mcheyne_prophets: canon::sequence_where(|b| {
            (b.genre == Genre::Poetry && b.name != "Psalms") || b.genre == Genre::Prophets
        }),
        by_genre: Genre::ALL
            .iter()
            .flat_map(|&g| canon::sequence_where(move |b| b.genre == g))
            .collect(),
    }
});

/// "{genre} - Day {n}", using the genre of the first chapter read.
fn day_theme(first: Option<&ChapterUnit>, day: u32) -> String {
    match first.and_then(|u| u.genre()) {
        Some(g) => format!("{} - Day {}", g, day),
        None => format!("Day {}", day),
    }
}

/// The single psalm read on `day` by plans that cycle through the
/// Psalter once every 150 days.
fn daily_psalm(day: u32) -> Passage {
    Passage::chapter("Psalms", cycle_position(day, 150))
}

fn chronological(day: u32) -> DayAssignment {
    let units = even_split(canon::sequence(), DAYS_PER_YEAR, day);
    DayAssignment::new(&compress(units), day_theme(units.first(), day))
}

fn chronological_cross_ref(day: u32) -> DayAssignment {
    let units = even_split(canon::sequence(), DAYS_PER_YEAR, day);
    let mut passages = compress(units);

    if day <= CROSS_REF_PSALM_DAYS && !passages.iter().any(|p| p.book == "Psalms") {
        passages.push(daily_psalm(day));
    }
    DayAssignment::new(&passages, day_theme(units.first(), day))
}

fn old_psalms_new(day: u32) -> DayAssignment {
    let s = &*STREAMS;
    let old = even_split(&s.old_without_wisdom, DAYS_PER_YEAR, day);
    let wisdom = cyclic_window(&s.psalms_proverbs, day, 2);
    let new = even_split(&s.new, DAYS_PER_YEAR, day);

    let mut passages = compress(old);
    passages.extend(compress(&wisdom));
    passages.extend(compress(new));
    DayAssignment::new(&passages, day_theme(old.first(), day))
}

fn old_new_split(day: u32) -> DayAssignment {
    let s = &*STREAMS;
    let old = even_split(&s.old, DAYS_PER_YEAR, day);
    let new = even_split(&s.new, DAYS_PER_YEAR, day);

    let mut passages = compress(old);
    passages.extend(compress(new));
    DayAssignment::new(&passages, day_theme(old.first(), day))
}

fn mcheyne(day: u32) -> DayAssignment {
    let s = &*STREAMS;
    let history = even_split_at_least_one(&s.mcheyne_history, DAYS_PER_YEAR, day);
    let prophets = even_split_at_least_one(&s.mcheyne_prophets, DAYS_PER_YEAR, day);
    let new = even_split_at_least_one(&s.new, DAYS_PER_YEAR, day);

    let mut passages = compress(history);
    passages.extend(compress(prophets));
    passages.extend(compress(new));
    passages.push(daily_psalm(day));
    DayAssignment::new(&passages, day_theme(history.first(), day))
}

fn fivexfive_nt(day: u32) -> DayAssignment {
    // Days past the end of the cycle start it again
    let cycle_day = cycle_position(day, FIVE_BY_FIVE_DAYS);
    let units = even_split(&STREAMS.new, FIVE_BY_FIVE_DAYS, cycle_day);

    let week = (cycle_day - 1) / 5 + 1;
    let weekday = (cycle_day - 1) % 5 + 1;
    let theme = format!("New Testament - Week {}, Day {}", week, weekday);
    DayAssignment::new(&compress(units), theme)
}

fn genre_52week(day: u32) -> DayAssignment {
    let units = even_split(&STREAMS.by_genre, DAYS_PER_YEAR, day);
    let week = std::cmp::min((day - 1) / 7 + 1, 52);
    let theme = match units.first().and_then(|u| u.genre()) {
        Some(g) => format!("Week {}: {}", week, g),
        None => format!("Week {}", week),
    };
    DayAssignment::new(&compress(units), theme)
}
