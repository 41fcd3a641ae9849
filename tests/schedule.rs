//! Whole-year properties of every plan, checked through the public API.

use std::collections::HashMap;
use std::thread;

use chrono::NaiveDate;
use lectio::canon::{self, ChapterUnit, Genre, Testament};
use lectio::plan::FIVE_BY_FIVE_DAYS;
use lectio::reference::{compress, compress_to_strings};
use lectio::{get_reading, DayIndexMode, Passage, PlanType, Schedule};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The chapters `plan` assigns to `day`, in reading order.
fn chapters_on(plan: PlanType, day: u32) -> Vec<ChapterUnit> {
    plan.assign(day)
        .passages
        .iter()
        .flat_map(|s| s.parse::<Passage>().unwrap().chapters())
        .collect()
}

/// Every chapter read by `plan` over its first `days` days, in reading
/// order.
fn chapters_read_over(plan: PlanType, days: u32) -> Vec<ChapterUnit> {
    (1..=days).flat_map(|day| chapters_on(plan, day)).collect()
}

/// Every chapter read by `plan` over the year, in reading order.
fn chapters_read(plan: PlanType) -> Vec<ChapterUnit> {
    chapters_read_over(plan, 365)
}

fn counts(units: &[ChapterUnit]) -> HashMap<ChapterUnit, usize> {
    let mut counts = HashMap::new();
    for u in units {
        *counts.entry(*u).or_insert(0) += 1;
    }
    counts
}

/// Chronological plan: day 1 starts at Genesis 1, day 365 ends at
/// 3 John 1, and every chapter is read exactly once.
#[test]
fn chronological_reads_whole_canon_in_order() {
    let first = get_reading(date(2025, 1, 1), PlanType::Chronological);
    assert!(first.passages[0].starts_with("Genesis 1"));

    let last = get_reading(date(2025, 12, 31), PlanType::Chronological);
    assert_eq!(last.passages.last().map(String::as_str), Some("3 John 1"));

    assert_eq!(chapters_read(PlanType::Chronological), canon::sequence().to_vec());
}

/// Each chronological day starts with the chapter after the one the
/// previous day ended on.
#[test]
fn chronological_days_meet_end_to_start() {
    let seq = canon::sequence();
    let position = |u: &ChapterUnit| seq.iter().position(|s| s == u).unwrap();

    let mut previous_end = None;
    for day in 1..=365 {
        let units = chapters_on(PlanType::Chronological, day);
        let start = position(&units[0]);
        let end = position(&units[units.len() - 1]);
        assert_eq!(end - start + 1, units.len(), "day {}", day);
        if let Some(p) = previous_end {
            assert_eq!(start, p + 1, "day {}", day);
        }
        previous_end = Some(end);
    }
    assert_eq!(previous_end, Some(canon::TOTAL_CHAPTERS - 1));
}

/// The genre plan reads the canon exactly once, genre by genre, keeping
/// canon order within each genre.
#[test]
fn genre_plan_covers_canon_once_by_genre() {
    let expected: Vec<ChapterUnit> = Genre::ALL
        .iter()
        .flat_map(|&g| canon::sequence_where(move |b| b.genre == g))
        .collect();
    assert_eq!(chapters_read(PlanType::Genre52Week), expected);
}

/// The 5x5x5 plan reads the New Testament once in its 260-day cycle and
/// then starts again.
#[test]
fn fivexfive_covers_new_testament_each_cycle() {
    let nt = canon::sequence_where(|b| b.genre.testament() == Testament::New);
    assert_eq!(chapters_read_over(PlanType::FiveXFiveNt, FIVE_BY_FIVE_DAYS), nt);

    for day in FIVE_BY_FIVE_DAYS + 1..=365 {
        assert_eq!(PlanType::FiveXFiveNt.assign(day),
                   PlanType::FiveXFiveNt.assign(day - FIVE_BY_FIVE_DAYS));
    }
}

/// Old & New reads each testament exactly once.
#[test]
fn old_new_split_covers_canon_once() {
    let read = counts(&chapters_read(PlanType::OldNewSplit));
    assert_eq!(read.len(), canon::TOTAL_CHAPTERS);
    assert!(read.values().all(|&c| c == 1));
}

/// Classic plan: every chapter outside Psalms and Proverbs once; Psalms
/// and Proverbs cycle four times over (730 chapters from a 181-chapter
/// stream).
#[test]
fn classic_reads_wisdom_repeatedly() {
    let read = counts(&chapters_read(PlanType::Classic));
    assert_eq!(read.len(), canon::TOTAL_CHAPTERS);
    for (unit, count) in &read {
        match unit.book {
            "Psalms" | "Proverbs" => assert!(*count == 4 || *count == 5, "{} x{}", unit, count),
            _ => assert_eq!(*count, 1, "{}", unit),
        }
    }
}

/// M'Cheyne reads every chapter at least once.
#[test]
fn mcheyne_covers_canon() {
    let read = counts(&chapters_read(PlanType::McCheyne));
    assert_eq!(read.len(), canon::TOTAL_CHAPTERS);
}

#[test]
fn assignments_are_idempotent() {
    for plan in PlanType::ALL.iter() {
        for day in &[1, 2, 150, 151, 260, 261, 364, 365] {
            assert_eq!(plan.assign(*day), plan.assign(*day));
        }
    }
}

#[test]
fn assignments_are_thread_safe() {
    let expected: Vec<_> = (1..=365).map(|d| PlanType::McCheyne.assign(d)).collect();
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| (1..=365).map(|d| PlanType::McCheyne.assign(d)).collect::<Vec<_>>()))
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

/// Dec 31 of a leap year reads the same as Dec 30 of an ordinary year
/// (both day 365), and no date produces an index past 365.
#[test]
fn leap_year_last_day_is_clamped() {
    for plan in PlanType::ALL.iter().filter(|p| p.day_index_mode() == DayIndexMode::DayOfYear) {
        let s = Schedule::new(*plan, date(2024, 1, 1));
        assert_eq!(s.day_index(date(2024, 12, 31)), 365);
        assert_eq!(s.reading(date(2024, 12, 31)), s.reading(date(2023, 12, 31)));
        assert_eq!(s.reading(date(2024, 12, 31)), s.reading(date(2024, 12, 30)));
    }

    let s = Schedule::default();
    for d in date(2024, 1, 1).iter_days().take(366 * 4) {
        let day = s.day_index(d);
        assert!(day >= 1 && day <= 365);
    }
}

#[test]
fn every_plan_has_a_reading_every_day() {
    for plan in PlanType::ALL.iter() {
        for day in 1..=365 {
            let a = plan.assign(day);
            assert!(!a.passages.is_empty(), "{} day {}", plan, day);
            assert!(!a.theme.is_empty());
        }
    }
}

#[test]
fn compressed_output_round_trips() {
    let units = vec![ChapterUnit::new("Genesis", 1), ChapterUnit::new("Genesis", 2), ChapterUnit::new("Genesis", 3)];
    assert_eq!(compress_to_strings(&units), vec!["Genesis 1-3"]);

    let units = vec![ChapterUnit::new("Genesis", 50), ChapterUnit::new("Job", 1)];
    assert_eq!(compress_to_strings(&units), vec!["Genesis 50", "Job 1"]);

    let whole: Vec<ChapterUnit> = compress(canon::sequence()).iter().flat_map(|p| p.chapters()).collect();
    assert_eq!(whole, canon::sequence().to_vec());
}
