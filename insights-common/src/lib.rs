pub mod categories;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod metrics;
pub mod profile;
pub mod recommend;
pub mod tables;
