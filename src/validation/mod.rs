pub mod format;
pub mod name;

pub use format::{is_id_number_format, FormatScorer};
pub use name::{MatchStrategy, NameMatcher};
