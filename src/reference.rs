//! Structured passage references and the compressor that turns runs of
//! chapters into them.
//!
//! Inside the crate a reference is always a `Passage` value; it only
//! becomes a string (e.g. `Genesis 1-3`) at the boundary, through its
//! `Display` implementation. `Passage` also implements `FromStr`, so
//! strings handed back by a consumer can be turned into chapter units
//! again.

use std::fmt;
use std::str::FromStr;

use crate::canon::{self, ChapterUnit};
use crate::errors::*;

/// An inclusive range of verses within a single chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRange {
    pub start: u32,
    pub end: u32,
}

/// A contiguous range of chapters within one book, optionally narrowed to
/// a range of verses (only when the passage is a single chapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passage {
    pub book: &'static str,
    pub first: u32,
    pub last: u32,
    pub verses: Option<VerseRange>,
}

impl Passage {
    /// A single whole chapter.
    pub fn chapter(book: &'static str, chapter: u32) -> Passage {
        Passage::chapters_of(book, chapter, chapter)
    }

    /// The chapters `first..=last` of `book`.
    pub fn chapters_of(book: &'static str, first: u32, last: u32) -> Passage {
        Passage {
            book: book,
            first: first,
            last: last,
            verses: None,
        }
    }

    /// Returns whether this passage covers exactly one chapter.
    pub fn is_single_chapter(&self) -> bool {
        self.first == self.last
    }

    /// Expands the passage back into one unit per chapter.
    pub fn chapters(&self) -> Vec<ChapterUnit> {
        let book = self.book;
        (self.first..=self.last).map(|c| ChapterUnit::new(book, c)).collect()
    }

    /// The name used when displaying the book. A single psalm is written
    /// "Psalm", a range of them "Psalms".
    fn display_book(&self) -> &'static str {
        if self.book == "Psalms" && self.is_single_chapter() {
            "Psalm"
        } else {
            self.book
        }
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.display_book(), self.first)?;
        match self.verses {
            Some(v) if v.start == v.end => write!(f, ":{}", v.start),
            Some(v) => write!(f, ":{}-{}", v.start, v.end),
            None if self.first == self.last => Ok(()),
            None => write!(f, "-{}", self.last),
        }
    }
}

/// Parses a `start` or `start-end` pair of positive numbers.
fn parse_range(s: &str, whole: &str) -> Result<(u32, u32)> {
    let invalid = || Error::from_kind(ErrorKind::InvalidReference(whole.to_owned()));
    let (a, b) = match s.find('-') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, s),
    };
    let a: u32 = a.trim().parse().map_err(|_| invalid())?;
    let b: u32 = b.trim().parse().map_err(|_| invalid())?;
    if a == 0 || b < a {
        return Err(invalid());
    }
    Ok((a, b))
}

impl FromStr for Passage {
    type Err = Error;

    /// Parses references of the form `Book C`, `Book C-D`, `Book C:V` and
    /// `Book C:V-W`. The book must be in the canon; `Psalm` is accepted
    /// for `Psalms`.
    fn from_str(s: &str) -> Result<Passage> {
        let s = s.trim();
        let invalid = || Error::from_kind(ErrorKind::InvalidReference(s.to_owned()));

        // Book names may themselves contain spaces ("Song of Solomon"),
        // so the numbers are whatever follows the last space
        let split = s.rfind(' ').ok_or_else(invalid)?;
        let (name, numbers) = (s[..split].trim(), &s[split + 1..]);
        let name = if name == "Psalm" { "Psalms" } else { name };
        let spec = canon::find_book(name).ok_or_else(invalid)?;

        let passage = match numbers.find(':') {
            Some(i) => {
                // Verse ranges only ever apply to a single chapter
                let (chapter, to) = parse_range(&numbers[..i], s)?;
                if chapter != to {
                    return Err(invalid());
                }
                let (start, end) = parse_range(&numbers[i + 1..], s)?;
                Passage {
                    book: spec.name,
                    first: chapter,
                    last: chapter,
                    verses: Some(VerseRange {
                        start: start,
                        end: end,
                    }),
                }
            }
            None => {
                let (first, last) = parse_range(numbers, s)?;
                Passage::chapters_of(spec.name, first, last)
            }
        };

        if passage.last > spec.chapter_count {
            return Err(invalid());
        }
        Ok(passage)
    }
}

/// Collapses consecutive chapters of the same book into single passages.
///
/// The input is not sorted: a run continues only while the book stays the
/// same and each chapter is one more than the previous, so runs never
/// cross a book boundary.
pub fn compress(units: &[ChapterUnit]) -> Vec<Passage> {
    let mut passages = Vec::new();
    // The current run, if any
    let mut run: Option<Passage> = None;

    for unit in units {
        match run {
            Some(ref mut p) if p.book == unit.book && unit.chapter == p.last + 1 => {
                p.last = unit.chapter;
            }
            _ => {
                if let Some(p) = run.take() {
                    passages.push(p);
                }
                run = Some(Passage::chapter(unit.book, unit.chapter));
            }
        }
    }

    if let Some(p) = run {
        passages.push(p);
    }
    passages
}

/// Compresses `units` and renders each passage as a display string.
pub fn compress_to_strings(units: &[ChapterUnit]) -> Vec<String> {
    compress(units).iter().map(|p| p.to_string()).collect()
}
