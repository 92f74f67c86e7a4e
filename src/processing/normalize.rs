use crate::processing::confusion::ConfusionTable;

/// Cleans raw OCR output before it is scored or matched.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    table: ConfusionTable,
}

impl TextNormalizer {
    pub fn new(table: ConfusionTable) -> Self {
        TextNormalizer { table }
    }

    /// Drop control characters, apply the confusion table, collapse
    /// whitespace runs into a single space and trim.
    pub fn normalize(&self, raw: &str) -> String {
        let visible: String = raw
            .chars()
            .filter(|&c| !c.is_control() || matches!(c, '\r' | '\n' | '\t'))
            .collect();

        let corrected = self.table.apply(&visible);

        corrected.split_whitespace().collect::<Vec<&str>>().join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(ConfusionTable::document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_control_characters() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize("A\u{0007}B\u{0000}C"), "ABC");
    }

    #[test]
    fn test_collapses_whitespace() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize("  姓名 \t\r\n 李小明\n\n出生  "),
            "姓名 李小明 出生"
        );
    }

    #[test]
    fn test_full_card_line() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize("姓名：玉小明\n中華民國身分證  A１２３４５６７８９ 男"),
            "姓名:王小明 中華民國身分證 A123456789 男"
        );
    }

    #[test]
    fn test_zero_digits_become_wang() {
        // Order-dependent rewrite kept as-is: every ASCII zero ends up as 王.
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize("A102345678"), "A1王2345678");
    }

    #[test]
    fn test_custom_table() {
        let normalizer = TextNormalizer::new(ConfusionTable::new().rule("x", "y"));
        assert_eq!(normalizer.normalize(" x  玉 "), "y 玉");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(TextNormalizer::default().normalize(" \n\t "), "");
    }
}
