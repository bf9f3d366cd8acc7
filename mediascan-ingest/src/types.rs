//! Media categories known to the classifier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category a file can be classified into
///
/// The string form matches the `media_category.name` seeded at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    /// All kinds in default classification order
    pub const ALL: [MediaKind; 3] = [MediaKind::Video, MediaKind::Audio, MediaKind::Image];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
        }
    }

    /// Default extension set for this kind (lowercase, no leading dot)
    pub fn default_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => &["mp4", "mkv", "avi", "mov", "wmv"],
            MediaKind::Audio => &["mp3", "wav", "flac", "aac", "ogg"],
            MediaKind::Image => &["jpg", "jpeg", "png", "bmp", "gif", "tiff"],
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            "image" => Ok(MediaKind::Image),
            other => Err(format!("Unknown media kind: {}", other)),
        }
    }
}
