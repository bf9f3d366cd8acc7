//! Extension-based validation

use super::Validator;
use crate::types::MediaKind;

/// Rules a base name must satisfy before its extension is considered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Exactly one `.`, no path separators, non-blank stem
    ///
    /// `document.txt` is well-formed; `archive.tar.gz`, `.mp4` and
    /// `dir/a.mp4` are rejected.
    #[default]
    Strict,
    /// Non-blank stem, no path separators; extension after the last `.`
    ///
    /// Accepts `my.holiday.mp4`.
    Lenient,
}

impl NamePolicy {
    /// Extract the extension of `file_name` under this policy
    pub fn extension<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return None;
        }

        if *self == NamePolicy::Strict && file_name.matches('.').count() != 1 {
            return None;
        }

        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.trim().is_empty() || ext.is_empty() {
            return None;
        }

        Some(ext)
    }
}

/// Accepts names whose extension is in a fixed set (case-insensitive)
#[derive(Debug, Clone)]
pub struct ExtensionValidator {
    extensions: Vec<String>,
    policy: NamePolicy,
}

impl ExtensionValidator {
    /// Validator for an explicit extension set
    ///
    /// Extensions are normalized to lowercase; a leading `.` is optional.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            extensions,
            policy: NamePolicy::default(),
        }
    }

    /// Validator for a kind's default extension set
    pub fn for_kind(kind: MediaKind) -> Self {
        Self::new(kind.default_extensions())
    }

    pub fn video() -> Self {
        Self::for_kind(MediaKind::Video)
    }

    pub fn audio() -> Self {
        Self::for_kind(MediaKind::Audio)
    }

    pub fn image() -> Self {
        Self::for_kind(MediaKind::Image)
    }

    pub fn with_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> NamePolicy {
        self.policy
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Validator for ExtensionValidator {
    fn validate(&self, file_name: &str) -> bool {
        match self.policy.extension(file_name) {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extensions() {
        let validator = ExtensionValidator::video();
        for name in ["movie.mp4", "movie.mkv", "movie.avi", "movie.mov", "movie.wmv"] {
            assert!(validator.validate(name), "{} should be video", name);
        }
        assert!(!validator.validate("song.mp3"));
        assert!(!validator.validate("document.txt"));
    }

    #[test]
    fn test_audio_extensions() {
        let validator = ExtensionValidator::audio();
        for name in ["song.mp3", "track.wav", "audio.flac", "sample.aac", "music.ogg"] {
            assert!(validator.validate(name), "{} should be audio", name);
        }
        assert!(!validator.validate("movie.mp4"));
    }

    #[test]
    fn test_image_extensions() {
        let validator = ExtensionValidator::image();
        for name in ["a.jpg", "a.jpeg", "a.png", "a.bmp", "a.gif", "a.tiff"] {
            assert!(validator.validate(name), "{} should be image", name);
        }
        assert!(!validator.validate("a.psd"));
    }

    #[test]
    fn test_case_insensitive() {
        let validator = ExtensionValidator::audio();
        assert!(validator.validate("song.MP3"));
        assert!(validator.validate("track.WaV"));
    }

    #[test]
    fn test_malformed_names_rejected() {
        let validator = ExtensionValidator::video();
        for name in ["", "movie", ".mp4", "   .mp4", "movie.", "a..mp4", "dir/a.mp4", "dir\\a.mp4"] {
            assert!(!validator.validate(name), "{:?} should be rejected", name);
        }
    }

    #[test]
    fn test_strict_policy_rejects_multiple_dots() {
        let validator = ExtensionValidator::video();
        assert!(!validator.validate("my.holiday.mp4"));
        assert_eq!(NamePolicy::Strict.extension("document.txt"), Some("txt"));
        assert_eq!(NamePolicy::Strict.extension("archive.tar.gz"), None);
    }

    #[test]
    fn test_lenient_policy_uses_last_dot() {
        let validator = ExtensionValidator::video().with_policy(NamePolicy::Lenient);
        assert!(validator.validate("my.holiday.mp4"));
        assert!(!validator.validate(".mp4"));
        assert!(!validator.validate("dir/a.mp4"));
        assert_eq!(NamePolicy::Lenient.extension("archive.tar.gz"), Some("gz"));
    }

    #[test]
    fn test_custom_extensions_normalized() {
        let validator = ExtensionValidator::new([".WEBM", "m4v", ""]);
        assert_eq!(validator.extensions(), &["webm".to_string(), "m4v".to_string()]);
        assert!(validator.validate("clip.webm"));
        assert!(validator.validate("clip.M4V"));
    }

    #[test]
    fn test_non_ascii_names_do_not_panic() {
        let validator = ExtensionValidator::image();
        assert!(validator.validate("フォト.jpg"));
        assert!(!validator.validate("フォト.ジェイペグ"));
        assert!(!validator.validate("é"));
    }
}
