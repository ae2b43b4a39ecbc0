//! Run settings and the config file they are loaded from.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! `~/.config/epg-trim/config.toml` (or an explicit `--config` file), and
//! command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use epg_trim_core::DEFAULT_MIN_SIMILARITY;

use crate::error::SettingsError;

pub const DEFAULT_PLAYLIST_SOURCE: &str = "http://8b7a69015e35.goodstreem.org/playlists/uplist/067f288518a068f4f0f8f3152e06405f/playlist.m3u8";
pub const DEFAULT_GUIDE_SOURCE: &str = "http://epg.one/epg2.xml.gz";
pub const DEFAULT_PLAYLIST_OUTPUT: &str = "playlist_su_epg.m3u8";
pub const DEFAULT_GUIDE_OUTPUT: &str = "epg_su_filtru.xml.gz";

/// Canonical path to the config file: `~/.config/epg-trim/config.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("epg-trim").join("config.toml")
}

/// Everything a trim run needs to know.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Playlist URL or local path
    pub playlist_source: String,
    /// Gzip-compressed XMLTV guide URL or local path
    pub guide_source: String,
    pub playlist_output: PathBuf,
    pub guide_output: PathBuf,
    /// Guide location written into the playlist header. Defaults to the
    /// file name of `guide_output`.
    pub tvg_url: Option<String>,
    pub min_similarity: f64,
    pub playlist_timeout_secs: u64,
    pub guide_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playlist_source: DEFAULT_PLAYLIST_SOURCE.to_string(),
            guide_source: DEFAULT_GUIDE_SOURCE.to_string(),
            playlist_output: PathBuf::from(DEFAULT_PLAYLIST_OUTPUT),
            guide_output: PathBuf::from(DEFAULT_GUIDE_OUTPUT),
            tvg_url: None,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            playlist_timeout_secs: 60,
            guide_timeout_secs: 120,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`settings_path`] when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (settings_path(), false),
        };
        if !required && !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Parse and validate settings from TOML text. Absent keys keep their
    /// defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load, apply command-line overrides, then validate the result.
    pub fn resolve(
        path: Option<&Path>,
        overrides: &SettingsOverrides,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::load(path)?;
        overrides.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.min_similarity.is_finite() || !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(SettingsError::invalid(format!(
                "min_similarity must be between 0 and 1, got {}",
                self.min_similarity
            )));
        }
        if self.playlist_timeout_secs == 0 || self.guide_timeout_secs == 0 {
            return Err(SettingsError::invalid("timeouts must be at least 1 second"));
        }
        if self.playlist_source.trim().is_empty() || self.guide_source.trim().is_empty() {
            return Err(SettingsError::invalid("sources must not be empty"));
        }
        if self.playlist_output.as_os_str().is_empty() || self.guide_output.as_os_str().is_empty()
        {
            return Err(SettingsError::invalid("output paths must not be empty"));
        }
        Ok(())
    }

    /// Guide location advertised in the playlist header.
    pub fn tvg_url(&self) -> String {
        if let Some(ref url) = self.tvg_url {
            return url.clone();
        }
        match self.guide_output.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.guide_output.to_string_lossy().into_owned(),
        }
    }

    pub fn playlist_timeout(&self) -> Duration {
        Duration::from_secs(self.playlist_timeout_secs)
    }

    pub fn guide_timeout(&self) -> Duration {
        Duration::from_secs(self.guide_timeout_secs)
    }
}

/// Values given on the command line. `None` keeps the loaded value.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub playlist_source: Option<String>,
    pub guide_source: Option<String>,
    pub playlist_output: Option<PathBuf>,
    pub guide_output: Option<PathBuf>,
    pub tvg_url: Option<String>,
    pub min_similarity: Option<f64>,
}

impl SettingsOverrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref v) = self.playlist_source {
            settings.playlist_source = v.clone();
        }
        if let Some(ref v) = self.guide_source {
            settings.guide_source = v.clone();
        }
        if let Some(ref v) = self.playlist_output {
            settings.playlist_output = v.clone();
        }
        if let Some(ref v) = self.guide_output {
            settings.guide_output = v.clone();
        }
        if let Some(ref v) = self.tvg_url {
            settings.tvg_url = Some(v.clone());
        }
        if let Some(v) = self.min_similarity {
            settings.min_similarity = v;
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
