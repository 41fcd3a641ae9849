//! Generic ways of dividing a sequence across a number of days.
//!
//! Days are always 1-based. Asking for a day outside `1..=total_days` is
//! a bug in the caller (the calendar never produces one) and panics
//! rather than quietly returning the wrong chapters.

use std::cmp;
use std::ops::Range;

fn check_day(day: u32, total_days: u32) {
    assert!(day >= 1 && day <= total_days,
            "day {} is outside 1..={}",
            day,
            total_days);
}

/// The index range of the items assigned to `day` when `len` items are
/// split evenly across `total_days` days.
///
/// Each day starts where the previous one ended, and the last day always
/// ends at `len`, so the ranges for days `1..=total_days` tile `0..len`
/// exactly.
pub fn even_split_bounds(len: usize, total_days: u32, day: u32) -> Range<usize> {
    check_day(day, total_days);
    if len == 0 {
        return 0..0;
    }

    let per_day = len as f64 / total_days as f64;
    let start = ((day - 1) as f64 * per_day).floor() as usize;
    let end = if day == total_days {
        len
    } else {
        (day as f64 * per_day).floor() as usize
    };
    cmp::min(start, len)..cmp::min(end, len)
}

/// The slice of `seq` assigned to `day` under an even split.
pub fn even_split<T>(seq: &[T], total_days: u32, day: u32) -> &[T] {
    &seq[even_split_bounds(seq.len(), total_days, day)]
}

/// Like `even_split`, but every day gets at least one item even when
/// there are fewer items than days. Neighbouring days may then share an
/// item.
pub fn even_split_at_least_one<T>(seq: &[T], total_days: u32, day: u32) -> &[T] {
    let Range { start, end } = even_split_bounds(seq.len(), total_days, day);
    if start >= seq.len() {
        return &seq[start..end];
    }
    &seq[start..cmp::max(end, start + 1)]
}

/// The position of `day` within a repeating cycle of `cycle_len` days
/// (1-based).
pub fn cycle_position(day: u32, cycle_len: u32) -> u32 {
    assert!(day >= 1 && cycle_len > 0);
    (day - 1) % cycle_len + 1
}

/// Takes `per_day` consecutive items starting at `(day - 1) * per_day`,
/// wrapping around the end of `seq`, so the sequence repeats as often as
/// its length allows.
pub fn cyclic_window<T: Copy>(seq: &[T], day: u32, per_day: usize) -> Vec<T> {
    assert!(day >= 1);
    if seq.is_empty() {
        return Vec::new();
    }
    let start = ((day as usize - 1) * per_day) % seq.len();
    (0..per_day).map(|i| seq[(start + i) % seq.len()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_without_gaps() {
        for &(len, days) in &[(1189, 365), (260, 365), (260, 260), (7, 3), (1, 365)] {
            let mut next = 0;
            for day in 1..=days {
                let r = even_split_bounds(len, days, day);
                assert_eq!(r.start, next, "len {} day {}", len, day);
                assert!(r.start <= r.end);
                next = r.end;
            }
            assert_eq!(next, len);
        }
    }

    #[test]
    fn empty_sequence_gives_empty_days() {
        assert_eq!(even_split_bounds(0, 365, 1), 0..0);
        assert_eq!(even_split_bounds(0, 365, 365), 0..0);
        let empty: [u32; 0] = [];
        assert!(even_split_at_least_one(&empty, 365, 10).is_empty());
        assert!(cyclic_window(&empty, 10, 2).is_empty());
    }

    #[test]
    fn last_day_absorbs_remainder() {
        let seq: Vec<u32> = (0..10).collect();
        assert_eq!(even_split(&seq, 3, 1), &[0, 1, 2]);
        assert_eq!(even_split(&seq, 3, 2), &[3, 4, 5]);
        assert_eq!(even_split(&seq, 3, 3), &[6, 7, 8, 9]);
    }

    #[test]
    fn at_least_one_never_empty() {
        let seq: Vec<u32> = (0..100).collect();
        for day in 1..=365 {
            assert!(!even_split_at_least_one(&seq, 365, day).is_empty());
        }
        assert_eq!(even_split_at_least_one(&seq, 365, 365), &[99]);
    }

    #[test]
    fn cyclic_window_wraps() {
        let seq: Vec<u32> = (0..181).collect();
        assert_eq!(cyclic_window(&seq, 1, 2), vec![0, 1]);
        assert_eq!(cyclic_window(&seq, 91, 2), vec![180, 0]);
        assert_eq!(cyclic_window(&seq, 92, 2), vec![1, 2]);
    }

    #[test]
    fn cycle_positions() {
        assert_eq!(cycle_position(1, 150), 1);
        assert_eq!(cycle_position(150, 150), 150);
        assert_eq!(cycle_position(151, 150), 1);
        assert_eq!(cycle_position(365, 260), 105);
    }

    #[test]
    #[should_panic]
    fn day_zero_is_rejected() {
        even_split_bounds(10, 365, 0);
    }

    #[test]
    #[should_panic]
    fn day_past_end_is_rejected() {
        even_split_bounds(10, 365, 366);
    }
}
