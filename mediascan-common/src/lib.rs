//! # mediascan common library
//!
//! Shared code for the mediascan tools:
//! - Database bootstrap (schema creation, category seeding)
//! - Row models for `media_category` and `media`
//! - Configuration loading (database location, log level)
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
