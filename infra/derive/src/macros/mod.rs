pub mod config_enum;
pub mod configurable;
pub mod error;
