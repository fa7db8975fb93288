/// Database configuration and connection management
pub mod database;

/// Product catalog loading from TOML
pub mod catalog;
