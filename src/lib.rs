pub mod config;
pub mod id_card_validator;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use config::ValidatorConfig;
pub use id_card_validator::IdCardValidator;
pub use utils::IdCardError;
