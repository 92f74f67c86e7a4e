// OCR confusion data for national ID cards.
//
// Substitutions are applied one rule at a time over the whole text, in the
// order they were added. A later rule sees the output of earlier ones, so
// "○" becomes "0" and then "王". Reordering rules changes results.

/// One plain-text rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

impl Substitution {
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.from, &self.to)
    }
}

/// Ordered substitution rules mapping misread characters to their
/// canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionTable {
    rules: Vec<Substitution>,
}

impl ConfusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule rewriting `from` into `to`.
    pub fn rule(mut self, from: &str, to: &str) -> Self {
        self.rules.push(Substitution {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Append one rule per variant, each rewriting into `canonical`.
    pub fn group(self, canonical: &str, variants: &[&str]) -> Self {
        variants
            .iter()
            .fold(self, |table, variant| table.rule(variant, canonical))
    }

    /// Append rules deleting each of `marks`.
    pub fn strip(self, marks: &[&str]) -> Self {
        marks.iter().fold(self, |table, mark| table.rule(mark, ""))
    }

    /// Table used on every OCR pass result.
    ///
    /// Digit and punctuation fixes come first, ideograph fixes second.
    pub fn document() -> Self {
        ConfusionTable::new()
            // punctuation and digits
            .rule("丨", "1")
            .group("0", &["○", "◯", "〇"])
            .rule("．", ".")
            .rule("，", ",")
            .rule("：", ":")
            .rule("；", ";")
            .group("1", &["ー", "│"])
            .rule("０", "0")
            .rule("１", "1")
            .rule("２", "2")
            .rule("３", "3")
            .rule("４", "4")
            .rule("５", "5")
            .rule("６", "6")
            .rule("７", "7")
            .rule("８", "8")
            .rule("９", "9")
            // ideographs
            .group("王", &["玉", "0"])
            .group("日", &["曰", "目"])
            .rule("木", "林")
            .rule("才", "材")
            .group("文", &["乂", "又"])
            .group("朱", &["未", "失"])
            .group("李", &["季", "木"])
            .group("吳", &["呂", "昊"])
            .group("黃", &["橫", "貴"])
            .group("周", &["司", "同"])
            .group("徐", &["余", "俆"])
            .group("高", &["亮", "商"])
            .group("何", &["河", "可"])
            .group("郭", &["部", "都"])
            .group("羅", &["維", "網"])
            .group("謝", &["射", "榭"])
            .group("韓", &["音", "章"])
            .group("馬", &["嗎", "媽"])
            .group("田", &["甲", "申"])
            .group("範", &["苑", "笵"])
            .group("方", &["万", "刀"])
            .group("石", &["右", "古"])
            .group("姜", &["美", "薑"])
            .group("白", &["曰", "自"])
            .group("秦", &["奏", "春"])
            .group("史", &["吏", "更"])
            .group("崔", &["催", "摧"])
    }

    /// Table used when cleaning names for comparison.
    ///
    /// Only the 王/日/文 fixes are applied so that surname look-alikes stay
    /// available to the similar-character match.
    pub fn name_cleanup() -> Self {
        ConfusionTable::new()
            .group("王", &["0", "玉"])
            .group("日", &["曰", "目"])
            .group("文", &["乂", "又"])
            .strip(&["丶", "丿", "丨", "│"])
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

}

/// Small groups of visually similar characters, canonical first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilarCharGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl SimilarCharGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, canonical: &str, alternates: &[&str]) -> Self {
        self.groups.push((
            canonical.to_string(),
            alternates.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }

    /// Common surnames and the characters OCR tends to read instead.
    pub fn surnames() -> Self {
        SimilarCharGroups::new()
            .group("王", &["玉", "主", "0", "○"])
            .group("李", &["季", "木", "材", "村"])
            .group("陳", &["陸", "隆"])
            .group("林", &["木", "材", "村"])
            .group("張", &["弦", "強"])
            .group("吳", &["呂", "昊"])
            .group("趙", &["越", "起"])
            .group("黃", &["橫", "貴"])
            .group("周", &["司", "同"])
            .group("徐", &["余", "俆"])
            .group("朱", &["未", "失"])
            .group("高", &["亮", "商"])
            .group("何", &["河", "可"])
            .group("郭", &["部", "都"])
            .group("羅", &["維", "網"])
            .group("謝", &["射", "榭"])
            .group("韓", &["音", "章"])
            .group("馬", &["嗎", "媽"])
            .group("田", &["甲", "申"])
            .group("範", &["苑", "笵"])
            .group("方", &["万", "刀"])
            .group("石", &["右", "古"])
            .group("姜", &["美", "薑"])
            .group("白", &["曰", "自"])
            .group("秦", &["奏", "春"])
            .group("史", &["吏", "更"])
            .group("崔", &["催", "摧"])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(canonical, alternates)| (canonical.as_str(), alternates.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_digits() {
        let table = ConfusionTable::document();
        assert_eq!(table.apply("Ａ１２３"), "Ａ123");
        assert_eq!(table.apply("１９８５"), "1985");
    }

    #[test]
    fn test_chained_zero_rewrite() {
        let table = ConfusionTable::document();
        // Circle becomes "0", then "0" becomes 王.
        assert_eq!(table.apply("○小明"), "王小明");
        assert_eq!(table.apply("０小明"), "王小明");
        // Every zero digit is affected, including inside numbers.
        assert_eq!(table.apply("A100"), "A1王王");
    }

    #[test]
    fn test_shadowed_rules_never_fire() {
        let table = ConfusionTable::document();
        // The earlier 木→林 and 曰→日 rules consume every occurrence.
        assert_eq!(table.apply("木"), "林");
        assert_eq!(table.apply("曰"), "日");
        assert_eq!(table.apply("季"), "李");
    }

    #[test]
    fn test_second_pass_over_current_table() {
        let table = ConfusionTable::document();
        let once = table.apply("〇");
        assert_eq!(once, "王");
        // No rule output feeds an earlier rule, so a second pass is a no-op.
        assert_eq!(table.apply(&once), once);
        // Full-width colon turns into ASCII once and stays.
        assert_eq!(table.apply("姓名：玉"), "姓名:王");
    }

    #[test]
    fn test_order_matters() {
        let forward = ConfusionTable::new().rule("○", "0").rule("0", "王");
        let reversed = ConfusionTable::new().rule("0", "王").rule("○", "0");
        assert_eq!(forward.apply("○"), "王");
        assert_eq!(reversed.apply("○"), "0");
    }

    #[test]
    fn test_name_cleanup_keeps_surname_lookalikes() {
        let table = ConfusionTable::name_cleanup();
        assert_eq!(table.apply("0小明"), "王小明");
        assert_eq!(table.apply("玉小明"), "王小明");
        assert_eq!(table.apply("木小明"), "木小明");
        assert_eq!(table.apply("王丶小丨明"), "王小明");
    }

    #[test]
    fn test_surname_groups() {
        let groups = SimilarCharGroups::surnames();
        assert_eq!(groups.len(), 27);
        assert!(!groups.is_empty());
        assert!(SimilarCharGroups::new().is_empty());
        let (canonical, alternates) = groups.iter().nth(1).unwrap();
        assert_eq!(canonical, "李");
        assert_eq!(alternates.len(), 4);
    }
}
