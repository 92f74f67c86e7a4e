use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional bounding box of a field on the card, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RegionSpec {
    /// Name field on the front of a national ID card.
    pub const NAME_FIELD: RegionSpec = RegionSpec {
        x: 0.18,
        y: 0.45,
        width: 0.35,
        height: 0.13,
    };

    pub fn is_normalized(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

impl Default for RegionSpec {
    fn default() -> Self {
        RegionSpec::NAME_FIELD
    }
}

// Characters shared by both restricted passes: card field labels, then
// the most common surnames.
macro_rules! card_labels {
    () => {
        "中華民國身分證統一編號姓名出生年月日性別男女發證日期"
    };
}
macro_rules! common_surnames {
    () => {
        "王李陳林張吳趙黃周徐朱高何郭羅謝韓馬田範方石姜白秦史崔"
    };
}
macro_rules! given_name_chars {
    () => {
        "俊偉明志豪傑宇軒昊翔勇強智敏慧美秀芳儀雅娟玲英華麗"
    };
}

pub const NARROW_WHITELIST: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
    card_labels!(),
    common_surnames!(),
    "劉楊蔡許鄧蘇盧蔣蕭曾魏金唐詹董葉溫劉江余莊廖熊顏嚴",
    given_name_chars!(),
    "建國民族文化教育學習工作生活",
);

pub const STRICT_WHITELIST: &str = concat!(
    "0123456789",
    card_labels!(),
    common_surnames!(),
    "劉楊蔡許鄧蘇盧蔣蕭曾魏金唐詹董葉溫江余莊廖熊顏嚴黃",
    "陸孫胡朱任呂施張康賈易鄒伍茅潘葛滕奚柯尹班車成廷歐",
    "景項祝董樑杜阮藍戴應霍常萬莫習管燕米施歷連仲喬任榮",
    given_name_chars!(),
    "建國民族文化教育學習工作生活和平正義民主自由平等博愛",
    "健康快樂幸福安全環保永續發展創新科技資訊網路通訊傳播",
);

pub const ID_NUMBER_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Layout assumption handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegMode {
    Auto,
    SingleLine,
    SingleWord,
}

impl PageSegMode {
    /// Tesseract's numeric `--psm` value.
    pub fn psm(self) -> u8 {
        match self {
            PageSegMode::Auto => 3,
            PageSegMode::SingleLine => 7,
            PageSegMode::SingleWord => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Default,
    NarrowWhitelist,
    SingleLineStrict,
    IdNumber,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PassKind::Default => "default",
            PassKind::NarrowWhitelist => "narrow-whitelist",
            PassKind::SingleLineStrict => "single-line-strict",
            PassKind::IdNumber => "id-number",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageModelPenalties {
    pub non_freq_dict_word: f32,
    pub non_dict_word: f32,
}

impl Default for LanguageModelPenalties {
    fn default() -> Self {
        LanguageModelPenalties {
            non_freq_dict_word: 0.1,
            non_dict_word: 0.15,
        }
    }
}

/// Engine settings for a single recognition pass.
///
/// Values are passed per call; an engine must not let one pass's settings
/// leak into the next.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPassConfig {
    pub kind: PassKind,
    /// Overrides the engine's language when set.
    pub language: Option<String>,
    /// `None` means unrestricted.
    pub whitelist: Option<String>,
    pub page_seg_mode: PageSegMode,
    pub dpi: u32,
    pub min_linesize: f32,
    pub new_segsearch: bool,
    pub numeric_mode: bool,
    pub penalties: LanguageModelPenalties,
}

impl OcrPassConfig {
    pub fn default_pass() -> Self {
        OcrPassConfig {
            kind: PassKind::Default,
            language: None,
            whitelist: None,
            page_seg_mode: PageSegMode::Auto,
            dpi: 300,
            min_linesize: 2.5,
            new_segsearch: true,
            numeric_mode: false,
            penalties: LanguageModelPenalties::default(),
        }
    }

    pub fn narrow_whitelist() -> Self {
        OcrPassConfig {
            kind: PassKind::NarrowWhitelist,
            whitelist: Some(NARROW_WHITELIST.to_string()),
            page_seg_mode: PageSegMode::SingleWord,
            dpi: 600,
            min_linesize: 1.0,
            ..Self::default_pass()
        }
    }

    /// Personal names rarely appear in a dictionary, so this pass lowers
    /// the cost of non-dictionary words.
    pub fn single_line_strict() -> Self {
        OcrPassConfig {
            kind: PassKind::SingleLineStrict,
            whitelist: Some(STRICT_WHITELIST.to_string()),
            page_seg_mode: PageSegMode::SingleLine,
            dpi: 400,
            min_linesize: 0.8,
            new_segsearch: false,
            penalties: LanguageModelPenalties {
                non_freq_dict_word: 0.5,
                non_dict_word: 0.8,
            },
            ..Self::default_pass()
        }
    }

    pub fn id_number() -> Self {
        OcrPassConfig {
            kind: PassKind::IdNumber,
            language: Some("eng".to_string()),
            whitelist: Some(ID_NUMBER_WHITELIST.to_string()),
            page_seg_mode: PageSegMode::SingleWord,
            numeric_mode: true,
            ..Self::default_pass()
        }
    }

    /// Escalation order used when extracting card text.
    pub fn escalation() -> Vec<OcrPassConfig> {
        vec![
            Self::default_pass(),
            Self::narrow_whitelist(),
            Self::single_line_strict(),
        ]
    }

    /// Every Tesseract variable this pass controls, with its value.
    ///
    /// The list is complete: an unrestricted pass clears the whitelist, so a
    /// reused handle carries nothing over from the previous pass.
    pub fn engine_variables(&self) -> Vec<(&'static str, String)> {
        let flag = |on: bool| String::from(if on { "1" } else { "0" });
        vec![
            ("tessedit_pageseg_mode", self.page_seg_mode.psm().to_string()),
            ("user_defined_dpi", self.dpi.to_string()),
            ("textord_min_linesize", self.min_linesize.to_string()),
            ("enable_new_segsearch", flag(self.new_segsearch)),
            (
                "language_model_penalty_non_freq_dict_word",
                self.penalties.non_freq_dict_word.to_string(),
            ),
            (
                "language_model_penalty_non_dict_word",
                self.penalties.non_dict_word.to_string(),
            ),
            ("classify_bln_numeric_mode", flag(self.numeric_mode)),
            ("preserve_interword_spaces", "1".to_string()),
            (
                "tessedit_char_whitelist",
                self.whitelist.clone().unwrap_or_default(),
            ),
        ]
    }
}
