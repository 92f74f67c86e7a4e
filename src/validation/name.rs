use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::processing::confusion::{ConfusionTable, SimilarCharGroups};

lazy_static! {
    // Unicode punctuation (middle dots, brackets, full-width marks) plus ASCII symbols.
    static ref SEPARATORS: Regex = Regex::new(r"[\s\p{P}[:punct:]]").unwrap();
}

/// Which rule recognised the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStrategy {
    Exact,
    CaseInsensitive,
    SplitCharacters,
    ConfusionGroup,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            MatchStrategy::Exact => "exact substring",
            MatchStrategy::CaseInsensitive => "case-insensitive substring",
            MatchStrategy::SplitCharacters => "split characters",
            MatchStrategy::ConfusionGroup => "confusion group",
        };
        write!(f, "{}", name)
    }
}

/// Looks for an expected personal name inside OCR text.
///
/// Both sides are cleaned first, then four strategies are tried in order
/// and the first success wins:
///
/// 1. the name is a substring of the text
/// 2. the same, ignoring case
/// 3. enough of the name's characters occur anywhere in the text
/// 4. swapping one surname character for a look-alike present in the text
///    gives a substring
///
/// Strategies 3 and 4 only apply to names of two or more characters.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    cleanup: ConfusionTable,
    groups: SimilarCharGroups,
    split_ratio: f64,
}

impl NameMatcher {
    pub fn new(cleanup: ConfusionTable, groups: SimilarCharGroups, split_ratio: f64) -> Self {
        NameMatcher {
            cleanup,
            groups,
            split_ratio,
        }
    }

    pub fn matches(&self, extracted_text: &str, expected_name: &str) -> bool {
        self.match_strategy(extracted_text, expected_name).is_some()
    }

    /// The first strategy that recognises `expected_name`, if any.
    pub fn match_strategy(&self, extracted_text: &str, expected_name: &str) -> Option<MatchStrategy> {
        if expected_name.trim().is_empty() {
            return None;
        }

        let text = self.clean_for_matching(extracted_text);
        let name = self.clean_for_matching(expected_name);
        if name.is_empty() {
            return None;
        }

        let strategy = if text.contains(&name) {
            Some(MatchStrategy::Exact)
        } else if text.to_lowercase().contains(&name.to_lowercase()) {
            Some(MatchStrategy::CaseInsensitive)
        } else if self.split_characters_match(&text, &name) {
            Some(MatchStrategy::SplitCharacters)
        } else if self.confusion_group_match(&text, &name) {
            Some(MatchStrategy::ConfusionGroup)
        } else {
            None
        };

        match strategy {
            Some(s) => debug!("Name '{}' matched by {}", name, s),
            None => debug!("Name '{}' not found in '{}'", name, text),
        }
        strategy
    }

    /// Strip whitespace and punctuation, then apply the cleanup table.
    pub fn clean_for_matching(&self, text: &str) -> String {
        let stripped = SEPARATORS.replace_all(text, "");
        self.cleanup.apply(&stripped)
    }

    fn split_characters_match(&self, text: &str, name: &str) -> bool {
        let length = name.chars().count();
        if length < 2 {
            return false;
        }
        let found = name.chars().filter(|&c| text.contains(c)).count();
        found as f64 / length as f64 >= self.split_ratio
    }

    fn confusion_group_match(&self, text: &str, name: &str) -> bool {
        if name.chars().count() < 2 {
            return false;
        }
        for (canonical, alternates) in self.groups.iter() {
            if !name.contains(canonical) {
                continue;
            }
            for alternate in alternates.iter().filter(|a| text.contains(a.as_str())) {
                let candidate = name.replace(canonical, alternate);
                if text.contains(&candidate) {
                    debug!("Matched '{}' as '{}' ({} read as {})", name, candidate, canonical, alternate);
                    return true;
                }
            }
        }
        false
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(ConfusionTable::name_cleanup(), SimilarCharGroups::surnames(), 0.7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_cleaned_matches() {
        let matcher = NameMatcher::default();
        assert!(matcher.matches("王小明", "王小明"));
        assert!(matcher.matches("李 小 明", "李小明"));
        assert!(matcher.matches("姓名：李小明，出生", "李小明"));
        assert!(matcher.matches("李小明中華民國", "李小明"));
        assert_eq!(
            matcher.match_strategy("王 小 明", "王小明"),
            Some(MatchStrategy::Exact)
        );
    }

    #[test]
    fn test_cleanup_table_fixes_wang() {
        let matcher = NameMatcher::default();
        assert!(matcher.matches("玉小明", "王小明"));
        assert!(matcher.matches("0小明", "王小明"));
        assert_eq!(matcher.clean_for_matching(" 玉 小丶明。"), "王小明");
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = NameMatcher::default();
        assert_eq!(
            matcher.match_strategy("NAME: CHEN TA-WEI", "Chen Ta-Wei"),
            Some(MatchStrategy::CaseInsensitive)
        );
    }

    #[test]
    fn test_unicode_separators_in_names() {
        let matcher = NameMatcher::default();
        assert_eq!(
            matcher.match_strategy("CHEN‧TA-WEI", "Chen Ta-Wei"),
            Some(MatchStrategy::CaseInsensitive)
        );
        assert_eq!(
            matcher.match_strategy("JOHN·SMITH", "John Smith"),
            Some(MatchStrategy::CaseInsensitive)
        );
        assert_eq!(
            matcher.match_strategy("姓名【王小明】", "王小明"),
            Some(MatchStrategy::Exact)
        );
        assert_eq!(matcher.clean_for_matching("《王・小明》$+"), "王小明");
    }

    #[test]
    fn test_split_characters() {
        let matcher = NameMatcher::default();
        // Characters split across lines and reordered.
        assert_eq!(
            matcher.match_strategy("明 出生 小 姓名 王", "王小明"),
            Some(MatchStrategy::SplitCharacters)
        );
        // Two of three is below the ratio; no look-alike applies.
        assert!(!matcher.matches("張小明", "王小明"));
    }

    #[test]
    fn test_confusion_groups() {
        let matcher = NameMatcher::default();
        let cases = [
            ("季小明", "李小明"),
            ("木小明", "李小明"),
            ("陸大華", "陳大華"),
            ("呂小美", "吳小美"),
            ("未建國", "朱建國"),
            ("催偉明", "崔偉明"),
        ];
        for (text, name) in cases {
            assert_eq!(
                matcher.match_strategy(text, name),
                Some(MatchStrategy::ConfusionGroup),
                "{} vs {}",
                text,
                name
            );
        }
    }

    #[test]
    fn test_common_misreadings() {
        let matcher = NameMatcher::default();
        let cases = [
            ("王小明", "王小明"),
            ("王 小 明", "王小明"),
            ("玉小明", "王小明"),
            ("0小明", "王小明"),
            ("李小明中華民國", "李小明"),
            ("姓名李小明出生", "李小明"),
            ("季小明", "李小明"),
            ("木小明", "李小明"),
            ("陳大華", "陳大華"),
            ("陸大華", "陳大華"),
            ("呂小美", "吳小美"),
            ("朱 建 國", "朱建國"),
            ("未建國", "朱建國"),
            ("崔偉明", "崔偉明"),
            ("催偉明", "崔偉明"),
        ];
        for (text, name) in cases {
            assert!(matcher.matches(text, name), "{} vs {}", text, name);
        }
    }

    #[test]
    fn test_no_match() {
        let matcher = NameMatcher::default();
        assert!(!matcher.matches("", "王小明"));
        assert!(!matcher.matches("陌生人", "王小明"));
        assert!(!matcher.matches("中華民國身分證", "王小明"));
    }

    #[test]
    fn test_blank_expected_name_never_matches() {
        let matcher = NameMatcher::default();
        assert!(!matcher.matches("王小明", ""));
        assert!(!matcher.matches("王小明", "   "));
        assert!(!matcher.matches("王小明", "，。"));
    }

    #[test]
    fn test_single_character_name_needs_exact() {
        let matcher = NameMatcher::default();
        assert!(matcher.matches("姓名 李", "李"));
        assert!(!matcher.matches("姓名 季", "李"));
    }

    #[test]
    fn test_custom_ratio() {
        let lenient = NameMatcher::new(ConfusionTable::name_cleanup(), SimilarCharGroups::surnames(), 0.6);
        assert!(lenient.matches("張小明", "王小明"));
    }
}
