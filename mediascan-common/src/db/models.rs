//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored for attributes that are not extracted yet
pub const UNKNOWN_ATTRIBUTE: &str = "Unknown";

/// Row of the `media_category` table
///
/// Seeded once at bootstrap; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCategory {
    pub id: i64,
    pub name: String,
}

/// Row of the `media` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: i64,
    /// Absolute path; unique across all records
    pub file_path: String,
    /// Size in bytes
    pub file_size: i64,
    /// References `media_category.id`
    pub category_id: i64,
    /// Duration in seconds
    pub duration: f64,
    /// "WIDTHxHEIGHT" or [`UNKNOWN_ATTRIBUTE`]
    pub resolution: String,
    pub codec: String,
    /// Bits per second
    pub bit_rate: i64,
    pub date_created: Option<DateTime<Utc>>,
}

/// Insert payload for the `media` table (id is generated by storage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMediaRecord {
    pub file_path: String,
    pub file_size: i64,
    pub category_id: i64,
    pub duration: f64,
    pub resolution: String,
    pub codec: String,
    pub bit_rate: i64,
    pub date_created: Option<DateTime<Utc>>,
}

impl NewMediaRecord {
    /// Record with placeholder values for every attribute that needs
    /// content inspection (duration, resolution, codec, bit rate)
    pub fn placeholder(file_path: String, file_size: i64, category_id: i64) -> Self {
        Self {
            file_path,
            file_size,
            category_id,
            duration: 0.0,
            resolution: UNKNOWN_ATTRIBUTE.to_string(),
            codec: UNKNOWN_ATTRIBUTE.to_string(),
            bit_rate: 0,
            date_created: None,
        }
    }
}

/// Partial update for a `media` row
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaUpdate {
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub category_id: Option<i64>,
    pub duration: Option<f64>,
    pub resolution: Option<String>,
    pub codec: Option<String>,
    pub bit_rate: Option<i64>,
    pub date_created: Option<DateTime<Utc>>,
}

impl MediaUpdate {
    /// True when the update would not change any column
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
