use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Card titles and country names, compared against upper-cased text.
const DOCUMENT_KEYWORDS: &[&str] = &[
    "中華民國",
    "身分證",
    "身份證",
    "國民身分證",
    "REPUBLIC",
    "CHINA",
    "TAIWAN",
    "IDENTITY",
    "CARD",
];

/// Field labels printed on the front of the card.
const FIELD_LABELS: &[&str] = &["姓名", "出生", "性別", "發證", "統一編號"];

const GENDER_MARKS: &[char] = &['男', '女'];

lazy_static! {
    // One letter and nine digits, e.g. A123456789
    static ref ID_NUMBER: Regex = Regex::new(r"[A-Z][0-9]{9}").unwrap();
    static ref ID_NUMBER_EXACT: Regex = Regex::new(r"^[A-Z][0-9]{9}$").unwrap();
    // Era year such as 民國75年
    static ref ROC_YEAR: Regex = Regex::new(r"民國.{0,3}[1-9][0-9]{0,2}年").unwrap();
}

/// Whether `s` is exactly a national ID number.
pub fn is_id_number_format(s: &str) -> bool {
    ID_NUMBER_EXACT.is_match(s)
}

/// Per-signal breakdown of a format score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatPoints {
    pub keywords: u32,
    pub id_number: u32,
    pub labels: u32,
    pub era_year: u32,
    pub gender: u32,
}

impl FormatPoints {
    pub fn total(&self) -> u32 {
        self.keywords + self.id_number + self.labels + self.era_year + self.gender
    }
}

/// Decides whether OCR text looks like a national ID card by adding up
/// weak signals.
#[derive(Debug, Clone)]
pub struct FormatScorer {
    threshold: u32,
}

impl FormatScorer {
    pub fn new(threshold: u32) -> Self {
        FormatScorer { threshold }
    }

    pub fn points(&self, text: &str) -> FormatPoints {
        let upper = text.to_uppercase();
        let compact: String = upper.chars().filter(|c| !c.is_whitespace()).collect();

        let count = |items: &[&str]| items.iter().filter(|k| upper.contains(*k)).count() as u32;

        FormatPoints {
            keywords: count(DOCUMENT_KEYWORDS),
            id_number: if ID_NUMBER.is_match(&compact) { 2 } else { 0 },
            labels: count(FIELD_LABELS),
            era_year: u32::from(ROC_YEAR.is_match(text)),
            gender: u32::from(text.contains(GENDER_MARKS)),
        }
    }

    pub fn score(&self, text: &str) -> bool {
        let points = self.points(text);
        let total = points.total();
        debug!("Format score {} ({:?}), threshold {}", total, points, self.threshold);
        total >= self.threshold
    }
}

impl Default for FormatScorer {
    fn default() -> Self {
        Self::new(3)
    }
}
