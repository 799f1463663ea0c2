use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::presenter::PresenterOptions;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "fagvalg";

pub const KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.start_slide",
    "input.swipe_threshold",
    "animation.stagger_ms",
    "animation.transition_ms",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Minimum horizontal travel of a swipe, in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe_threshold: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<u64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `fagvalg config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the user config, falling back to defaults when it is missing or broken.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, format!("# fagvalg configuration\n{yaml}"))?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let n = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid start_slide: {value}. Must be a slide number (1 or higher).")
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(n);
            }
            "input.swipe_threshold" => {
                let px = value
                    .parse::<f32>()
                    .ok()
                    .filter(|px| px.is_finite() && *px > 0.0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid swipe_threshold: {value}. Must be a positive number of points.")
                    })?;
                self.input
                    .get_or_insert_with(InputConfig::default)
                    .swipe_threshold = Some(px);
            }
            "animation.stagger_ms" | "animation.transition_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid duration: {value}. Must be whole milliseconds.")
                })?;
                if ms > 5_000 {
                    anyhow::bail!("Invalid duration: {value}. Must be at most 5000 ms.");
                }
                let animation = self.animation.get_or_insert_with(AnimationConfig::default);
                if key == "animation.stagger_ms" {
                    animation.stagger_ms = Some(ms);
                } else {
                    animation.transition_ms = Some(ms);
                }
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    /// Presenter timing with the configured overrides applied.
    pub fn presenter_options(&self) -> PresenterOptions {
        let mut options = PresenterOptions::default();
        if let Some(px) = self.input.as_ref().and_then(|i| i.swipe_threshold) {
            options.swipe_threshold = px;
        }
        if let Some(animation) = &self.animation {
            if let Some(ms) = animation.stagger_ms {
                options.stagger_ms = ms;
            }
            if let Some(ms) = animation.transition_ms {
                options.transition_ms = ms;
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes_empty() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }

    #[test]
    fn test_set_and_read_back() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.start_slide", "3").unwrap();
        config.set("input.swipe_threshold", "80").unwrap();
        config.set("animation.stagger_ms", "0").unwrap();
        assert_eq!(config.theme(), Some("dark"));
        assert_eq!(config.start_slide(), Some(3));

        let options = config.presenter_options();
        assert_eq!(options.swipe_threshold, 80.0);
        assert_eq!(options.stagger_ms, 0);
        assert_eq!(options.transition_ms, PresenterOptions::default().transition_ms);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.start_slide", "0").is_err());
        assert!(config.set("defaults.start_slide", "first").is_err());
        assert!(config.set("input.swipe_threshold", "-4").is_err());
        assert!(config.set("input.swipe_threshold", "NaN").is_err());
        assert!(config.set("animation.transition_ms", "9999").is_err());
        assert!(config.set("nope", "1").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_yaml_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("fagvalg-config-{}", std::process::id()));
        let path = dir.join(FILENAME);
        let mut config = Config::default();
        config.set("animation.transition_ms", "250").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_mentions_command() {
        let err = Config::load_from(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("fagvalg config show"));
    }

    #[test]
    fn test_unknown_top_level_keys_are_tolerated() {
        let config: Config = serde_yaml::from_str("defaults:\n  theme: light\nlegacy: 1\n").unwrap();
        assert_eq!(config.theme(), Some("light"));
    }
}
