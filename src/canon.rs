//! The fixed table of biblical books and the flat chapter sequence built
//! from it.
//!
//! The book order here is the "chronological" order used by every plan:
//! it is not canonical order (Job follows Genesis, Hebrews sits just
//! before Revelation, and the Johannine letters come last). The order and
//! chapter counts must be reproduced exactly, since every plan's day
//! boundaries are computed from positions in this sequence.

use std::fmt;

use once_cell::sync::Lazy;

/// The literary group a book belongs to. Groups are declared in the order
/// the genre-based plan reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genre {
    Law,
    History,
    Poetry,
    Prophets,
    /// The four gospels together with Acts.
    Gospels,
    /// The letters together with Revelation.
    Epistles,
}

impl Genre {
    /// Every genre, in reading order.
    pub const ALL: [Genre; 6] = [
        Genre::Law,
        Genre::History,
        Genre::Poetry,
        Genre::Prophets,
        Genre::Gospels,
        Genre::Epistles,
    ];

    /// A short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Genre::Law => "Law",
            Genre::History => "History",
            Genre::Poetry => "Poetry",
            Genre::Prophets => "Prophets",
            Genre::Gospels => "Gospels",
            Genre::Epistles => "Epistles",
        }
    }

    /// Which testament the genre's books belong to.
    pub fn testament(self) -> Testament {
        match self {
            Genre::Law | Genre::History | Genre::Poetry | Genre::Prophets => Testament::Old,
            Genre::Gospels | Genre::Epistles => Testament::New,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    Old,
    New,
}

/// A single book of the canon together with its number of chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookSpec {
    pub name: &'static str,
    pub chapter_count: u32,
    pub genre: Genre,
}

const fn book(name: &'static str, chapter_count: u32, genre: Genre) -> BookSpec {
    BookSpec {
        name: name,
        chapter_count: chapter_count,
        genre: genre,
    }
}

use self::Genre::*;

/// The 66 books in reading order.
pub static CANON: [BookSpec; 66] = [
    book("Genesis", 50, Law),
    book("Job", 42, Poetry),
    book("Exodus", 40, Law),
    book("Leviticus", 27, Law),
    book("Numbers", 36, Law),
    book("Deuteronomy", 34, Law),
    book("Joshua", 24, History),
    book("Judges", 21, History),
    book("Ruth", 4, History),
    book("1 Samuel", 31, History),
    book("2 Samuel", 24, History),
    book("1 Kings", 22, History),
    book("2 Kings", 25, History),
    book("1 Chronicles", 29, History),
    book("2 Chronicles", 36, History),
    book("Ezra", 10, History),
    book("Nehemiah", 13, History),
    book("Esther", 10, History),
    book("Psalms", 150, Poetry),
    book("Proverbs", 31, Poetry),
    book("Ecclesiastes", 12, Poetry),
    book("Song of Solomon", 8, Poetry),
    book("Isaiah", 66, Prophets),
    book("Jeremiah", 52, Prophets),
    book("Lamentations", 5, Prophets),
    book("Ezekiel", 48, Prophets),
    book("Daniel", 12, Prophets),
    book("Hosea", 14, Prophets),
    book("Joel", 3, Prophets),
    book("Amos", 9, Prophets),
    book("Obadiah", 1, Prophets),
    book("Jonah", 4, Prophets),
    book("Micah", 7, Prophets),
    book("Nahum", 3, Prophets),
    book("Habakkuk", 3, Prophets),
    book("Zephaniah", 3, Prophets),
    book("Haggai", 2, Prophets),
    book("Zechariah", 14, Prophets),
    book("Malachi", 4, Prophets),
    book("Matthew", 28, Gospels),
    book("Mark", 16, Gospels),
    book("Luke", 24, Gospels),
    book("John", 21, Gospels),
    book("Acts", 28, Gospels),
    book("James", 5, Epistles),
    book("Galatians", 6, Epistles),
    book("1 Thessalonians", 5, Epistles),
    book("2 Thessalonians", 3, Epistles),
    book("1 Corinthians", 16, Epistles),
    book("2 Corinthians", 13, Epistles),
    book("Romans", 16, Epistles),
    book("Ephesians", 6, Epistles),
    book("Philippians", 4, Epistles),
    book("Colossians", 4, Epistles),
    book("Philemon", 1, Epistles),
    book("1 Timothy", 6, Epistles),
    book("Titus", 3, Epistles),
    book("2 Timothy", 4, Epistles),
    book("1 Peter", 5, Epistles),
    book("2 Peter", 3, Epistles),
    book("Jude", 1, Epistles),
    book("Hebrews", 13, Epistles),
    book("Revelation", 22, Epistles),
    book("1 John", 5, Epistles),
    book("2 John", 1, Epistles),
    book("3 John", 1, Epistles),
];

/// Number of chapters in the full canon.
pub const TOTAL_CHAPTERS: usize = 1189;

/// One chapter of one book (chapters are 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChapterUnit {
    pub book: &'static str,
    pub chapter: u32,
}

impl ChapterUnit {
    pub fn new(book: &'static str, chapter: u32) -> ChapterUnit {
        ChapterUnit {
            book: book,
            chapter: chapter,
        }
    }

    /// The genre of this chapter's book, if the book is in the canon.
    pub fn genre(&self) -> Option<Genre> {
        find_book(self.book).map(|b| b.genre)
    }
}

impl fmt::Display for ChapterUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)
    }
}

/// Expands a table of books into one unit per chapter, preserving
/// table order.
pub fn build_sequence(books: &[BookSpec]) -> Vec<ChapterUnit> {
    books
        .iter()
        .flat_map(|b| (1..=b.chapter_count).map(move |c| ChapterUnit::new(b.name, c)))
        .collect()
}

static SEQUENCE: Lazy<Vec<ChapterUnit>> = Lazy::new(|| build_sequence(&CANON));

/// The chapter sequence of the full canon. It is built on first use and
/// shared read-only afterwards.
pub fn sequence() -> &'static [ChapterUnit] {
    &SEQUENCE
}

/// The chapters of every book matching `pred`, in table order.
pub fn sequence_where<P>(pred: P) -> Vec<ChapterUnit>
    where P: Fn(&BookSpec) -> bool
{
    let books: Vec<BookSpec> = CANON.iter().filter(|b| pred(b)).cloned().collect();
    build_sequence(&books)
}

/// Looks up a book by its exact name.
pub fn find_book(name: &str) -> Option<&'static BookSpec> {
    CANON.iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canon_has_66_distinct_books() {
        let names: HashSet<_> = CANON.iter().map(|b| b.name).collect();
        assert_eq!(names.len(), 66);
        assert!(CANON.iter().all(|b| b.chapter_count > 0));
    }

    #[test]
    fn sequence_covers_every_chapter() {
        let seq = sequence();
        assert_eq!(seq.len(), TOTAL_CHAPTERS);
        assert_eq!(seq[0], ChapterUnit::new("Genesis", 1));
        assert_eq!(seq[50], ChapterUnit::new("Job", 1));
        assert_eq!(seq[seq.len() - 1], ChapterUnit::new("3 John", 1));
    }

    #[test]
    fn testament_split_is_39_and_27() {
        let old = CANON.iter().filter(|b| b.genre.testament() == Testament::Old).count();
        assert_eq!(old, 39);
        assert_eq!(sequence_where(|b| b.genre.testament() == Testament::New).len(), 260);
    }

    #[test]
    fn build_of_empty_table_is_empty() {
        assert!(build_sequence(&[]).is_empty());
    }

    #[test]
    fn units_know_their_genre() {
        assert_eq!(ChapterUnit::new("Acts", 1).genre(), Some(Genre::Gospels));
        assert_eq!(ChapterUnit::new("Revelation", 22).genre(), Some(Genre::Epistles));
        assert_eq!(ChapterUnit::new("Tobit", 1).genre(), None);
    }
}
