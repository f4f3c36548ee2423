//! Game settings
//!
//! Read once at startup from a JSON file. A missing file means defaults;
//! nothing is ever written back.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "KUINVADERS_CONFIG";
/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kuinvaders.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed of the single PRNG behind enemy fire; a fixed seed replays identically.
    pub seed: u64,
    /// Frames per second the frame driver paces itself to.
    pub frame_rate: u32,
    /// Key that fires (space always fires as well).
    pub fire_key: char,
    /// Frames a press/repeat keeps a key held on terminals without release events.
    pub hold_window_frames: u64,
    /// Where log output goes.
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            frame_rate: 60,
            fire_key: 'a',
            hold_window_frames: 4,
            log_file: PathBuf::from("kuinvaders.log"),
        }
    }
}

impl Settings {
    /// Path from `KUINVADERS_CONFIG`, else `kuinvaders.json`.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`. A missing file yields the defaults; an
    /// unreadable or malformed one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", path.display()));
            }
        };
        let settings = Self::from_json(&json)
            .with_context(|| format!("malformed settings in {}", path.display()))?;
        Ok(settings.sanitized())
    }

    /// Like [`Settings::load`], but falls back to the defaults and hands the
    /// error back so it can be logged once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Clamp values the frame driver cannot work with. The quit key and
    /// unprintable keys cannot fire.
    fn sanitized(mut self) -> Self {
        self.frame_rate = self.frame_rate.clamp(1, 240);
        self.hold_window_frames = self.hold_window_frames.max(1);
        if !self.fire_key.is_ascii_graphic() || self.fire_key.eq_ignore_ascii_case(&'q') {
            self.fire_key = Self::default().fire_key;
        }
        self
    }

    pub fn frame_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_seed() {
        let settings = Settings::default();
        assert_eq!(settings.seed, 0);
        assert_eq!(settings.frame_rate, 60);
        assert_eq!(settings.fire_key, 'a');
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "fire_key": "z" }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.fire_key, 'z');
        assert_eq!(settings.frame_rate, 60);
        assert_eq!(settings.log_file, PathBuf::from("kuinvaders.log"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ seed: ").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/kuinvaders.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kuinvaders.json");
        std::fs::write(&path, "{ \"seed\": ").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("kuinvaders.json"));

        let (settings, error) = Settings::load_or_default(&path);
        assert_eq!(settings, Settings::default());
        assert!(error.is_some());
    }

    #[test]
    fn test_valid_file_is_loaded_and_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kuinvaders.json");
        std::fs::write(&path, r#"{ "seed": 42, "frame_rate": 1000 }"#).unwrap();

        let (settings, error) = Settings::load_or_default(&path);
        assert!(error.is_none());
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.frame_rate, 240);
    }

    #[test]
    fn test_sanitized_clamps_frame_rate() {
        let settings = Settings { frame_rate: 0, hold_window_frames: 0, ..Settings::default() }
            .sanitized();
        assert_eq!(settings.frame_rate, 1);
        assert_eq!(settings.hold_window_frames, 1);
    }

    #[test]
    fn test_quit_key_cannot_fire() {
        for key in ['q', 'Q', '\t'] {
            let settings = Settings { fire_key: key, ..Settings::default() }.sanitized();
            assert_eq!(settings.fire_key, 'a');
        }
        let settings = Settings { fire_key: 'z', ..Settings::default() }.sanitized();
        assert_eq!(settings.fire_key, 'z');
    }

    #[test]
    fn test_frame_period_at_60_fps() {
        let period = Settings::default().frame_period();
        assert_eq!(period, std::time::Duration::from_secs(1) / 60);
    }
}
