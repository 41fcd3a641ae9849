//! Looking up the text of passages.
//!
//! The scheduler never needs passage text itself; this is the collaborator
//! a front end uses to show a day's reading. `BibleText` reads a JSON file
//! laid out as
//!
//! ```text
//! { "version": "KJV",
//!   "books": { "Genesis": { "chapters": { "1": { "verses": { "1": "In the beginning..." } } } } } }
//! ```
//!
//! Lookups never fail: a passage the file doesn't contain simply has no
//! text.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::errors::*;
use crate::reference::Passage;

/// Anything that can supply the text of a passage.
pub trait PassageSource {
    fn passage_text(&self, passage: &Passage) -> Option<PassageText>;
}

/// A single verse of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// The text of a passage, in verse order, with a citation such as
/// `Genesis 1 (KJV)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageText {
    pub citation: String,
    pub verses: Vec<Verse>,
}

#[derive(Deserialize, Debug, Default)]
struct ChapterText {
    #[serde(default)]
    verses: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug, Default)]
struct BookText {
    #[serde(default)]
    chapters: BTreeMap<String, ChapterText>,
}

/// Bible text loaded from a JSON file.
#[derive(Deserialize, Debug, Default)]
pub struct BibleText {
    version: String,
    #[serde(default)]
    books: BTreeMap<String, BookText>,
}

impl BibleText {
    /// Reads Bible text in JSON format.
    pub fn from_reader<R: Read>(input: R) -> Result<BibleText> {
        serde_json::from_reader(input).chain_err(|| ErrorKind::Json("json error in bible text".into()))
    }

    /// Reads Bible text from the given file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BibleText> {
        let path = path.as_ref();
        let f = File::open(path).chain_err(|| ErrorKind::Io(format!("could not open bible text '{}'", path.display())))?;
        BibleText::from_reader(f)
    }

    /// The verses of one chapter in numeric order. Keys that are not
    /// numbers are ignored.
    fn chapter_verses(&self, book: &str, chapter: u32) -> Vec<Verse> {
        let chapter_text = self.books
            .get(book)
            .and_then(|b| b.chapters.get(&chapter.to_string()));
        let mut verses: Vec<Verse> = match chapter_text {
            Some(c) => {
                c.verses
                    .iter()
                    .filter_map(|(n, text)| {
                        n.parse().ok().map(|n| {
                            Verse {
                                chapter: chapter,
                                verse: n,
                                text: text.clone(),
                            }
                        })
                    })
                    .collect()
            }
            None => Vec::new(),
        };
        // The map is ordered as strings ("10" < "2")
        verses.sort_by_key(|v| v.verse);
        verses
    }
}

impl PassageSource for BibleText {
    fn passage_text(&self, passage: &Passage) -> Option<PassageText> {
        let mut verses = Vec::new();
        for c in passage.first..=passage.last {
            verses.extend(self.chapter_verses(passage.book, c));
        }
        if let Some(range) = passage.verses {
            verses.retain(|v| v.verse >= range.start && v.verse <= range.end);
        }

        if verses.is_empty() {
            None
        } else {
            Some(PassageText {
                citation: format!("{} ({})", passage, self.version),
                verses: verses,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": "KJV",
        "books": {
            "Genesis": { "chapters": {
                "1": { "verses": {
                    "1": "In the beginning God created the heaven and the earth.",
                    "2": "And the earth was without form, and void.",
                    "10": "And God called the dry land Earth."
                } },
                "2": { "verses": { "1": "Thus the heavens and the earth were finished." } }
            } },
            "Psalms": { "chapters": {
                "1": { "verses": { "1": "Blessed is the man that walketh not in the counsel of the ungodly." } }
            } }
        }
    }"#;

    fn bible() -> BibleText {
        BibleText::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn verses_are_in_numeric_order() {
        let text = bible().passage_text(&"Genesis 1".parse().unwrap()).unwrap();
        let numbers: Vec<u32> = text.verses.iter().map(|v| v.verse).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        assert_eq!(text.citation, "Genesis 1 (KJV)");
    }

    #[test]
    fn chapter_ranges_span_chapters() {
        let text = bible().passage_text(&"Genesis 1-2".parse().unwrap()).unwrap();
        assert_eq!(text.verses.len(), 4);
        assert_eq!(text.verses[3].chapter, 2);
    }

    #[test]
    fn verse_ranges_narrow() {
        let text = bible().passage_text(&"Genesis 1:2-10".parse().unwrap()).unwrap();
        assert_eq!(text.verses.len(), 2);
    }

    #[test]
    fn single_psalm() {
        let text = bible().passage_text(&"Psalm 1".parse().unwrap()).unwrap();
        assert_eq!(text.citation, "Psalm 1 (KJV)");
    }

    #[test]
    fn missing_text_is_none() {
        assert!(bible().passage_text(&"Exodus 3".parse().unwrap()).is_none());
        assert!(bible().passage_text(&"Genesis 3".parse().unwrap()).is_none());
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(BibleText::from_reader("{ not json".as_bytes()).is_err());
    }
}
