// Configuration for the handset host
//
// Settings are stored as JSON. Every field has a default, so a partial file
// (or no file at all) yields a usable configuration.

use crate::pages;
use anyhow::{Context, Result};
use embedded_graphics::prelude::Size;
use handset_ui::ChromeSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_VERSION: u32 = 1;
const MIN_TICK_MS: u64 = 5;
const MAX_TICK_MS: u64 = 1000;

/// Handset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandsetConfig {
    /// Configuration schema version for future migrations
    pub version: u32,

    /// Interval between UI ticks in milliseconds
    pub tick_ms: u64,

    /// Page shown at startup
    pub start_page: u16,

    /// Firmware label shown in the footer; defaults to the crate version
    pub version_label: Option<String>,

    pub screen_width: u32,
    pub screen_height: u32,

    pub battery: BatteryConfig,
    pub link: LinkConfig,

    /// Write a PPM snapshot of the frame here on the `dump` command
    pub frame_dump: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub start_percent: u8,
    pub drain_per_minute: f32,
    pub charging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Time a pairing attempt takes to complete
    pub pairing_ms: u64,

    /// Signal strength while connected, in dBm
    pub base_rssi: i8,

    /// Control packets per second while connected
    pub send_rate: u16,

    /// Start already paired and connected
    pub auto_pair: bool,

    pub peer_mac: [u8; 6],
}

impl Default for HandsetConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tick_ms: 20,
            start_page: pages::HOME.0,
            version_label: None,
            screen_width: handset_ui::chrome::SCREEN_WIDTH,
            screen_height: handset_ui::chrome::SCREEN_HEIGHT,
            battery: BatteryConfig::default(),
            link: LinkConfig::default(),
            frame_dump: None,
        }
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            start_percent: 87,
            drain_per_minute: 0.5,
            charging: false,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            pairing_ms: 3000,
            base_rssi: -58,
            send_rate: 50,
            auto_pair: false,
            peer_mac: [0x24, 0x6F, 0x28, 0x0A, 0xB1, 0x3C],
        }
    }
}

impl HandsetConfig {
    /// Load configuration from `path`, or use defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                log::info!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&self.tick_ms) {
            anyhow::bail!(
                "Invalid tick interval {} ms: must be between {MIN_TICK_MS} and {MAX_TICK_MS}",
                self.tick_ms
            );
        }

        if self.battery.start_percent > 100 {
            anyhow::bail!(
                "Invalid battery start level {}%: must be at most 100",
                self.battery.start_percent
            );
        }

        let content = self.chrome_settings().content_area().size;
        let min = pages::MIN_CONTENT;
        if content.width < min.width || content.height < min.height {
            anyhow::bail!(
                "Invalid screen size {}x{}: content area {}x{} is smaller than {}x{}",
                self.screen_width,
                self.screen_height,
                content.width,
                content.height,
                min.width,
                min.height
            );
        }

        if !pages::ALL.iter().any(|id| id.0 == self.start_page) {
            anyhow::bail!("Unknown start page: {}", self.start_page);
        }

        Ok(())
    }

    /// Layout for the chrome built from the screen size and version label
    pub fn chrome_settings(&self) -> ChromeSettings {
        let mut settings = ChromeSettings {
            screen: Size::new(self.screen_width, self.screen_height),
            ..ChromeSettings::default()
        };
        if let Some(label) = &self.version_label {
            settings.version.clone_from(label);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        HandsetConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handset.json");
        std::fs::write(&path, r#"{ "tick_ms": 50, "battery": { "charging": true } }"#).unwrap();

        let config = HandsetConfig::load_from_file(&path).unwrap();
        assert_eq!(config.tick_ms, 50);
        assert!(config.battery.charging);
        assert_eq!(
            config.battery.start_percent,
            BatteryConfig::default().start_percent
        );
        assert_eq!(config.link, LinkConfig::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("handset.json");
        let config = HandsetConfig {
            start_page: pages::REMOTE.0,
            version_label: Some("v9.9.9".into()),
            frame_dump: Some(PathBuf::from("/tmp/frame.ppm")),
            ..HandsetConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(HandsetConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = HandsetConfig::load_from_file(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.json"));
    }

    #[test]
    fn missing_path_falls_back_to_defaults() {
        assert_eq!(
            HandsetConfig::load_or_default(None).unwrap(),
            HandsetConfig::default()
        );
    }

    #[test]
    fn rejects_bad_values() {
        let tick = HandsetConfig {
            tick_ms: 0,
            ..HandsetConfig::default()
        };
        assert!(tick.validate().is_err());

        let mut battery = HandsetConfig::default();
        battery.battery.start_percent = 140;
        assert!(battery.validate().is_err());

        let screen = HandsetConfig {
            screen_height: 60,
            ..HandsetConfig::default()
        };
        assert!(screen.validate().is_err());

        let page = HandsetConfig {
            start_page: 3,
            ..HandsetConfig::default()
        };
        assert!(page.validate().is_err());
    }

    #[test]
    fn rejects_screens_the_pages_cannot_lay_out() {
        for (width, height) in [(320, 240), (100, 320), (480, 300), (0, 320)] {
            let config = HandsetConfig {
                screen_width: width,
                screen_height: height,
                start_page: pages::CONNECTION.0,
                ..HandsetConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("Invalid screen size"), "{err}");
        }

        let larger = HandsetConfig {
            screen_width: 800,
            screen_height: 480,
            ..HandsetConfig::default()
        };
        larger.validate().unwrap();
    }

    #[test]
    fn chrome_settings_use_label_and_size() {
        let config = HandsetConfig {
            version_label: Some("fw 2.1".into()),
            screen_width: 320,
            screen_height: 240,
            ..HandsetConfig::default()
        };
        let settings = config.chrome_settings();
        assert_eq!(settings.version, "fw 2.1");
        assert_eq!(settings.screen, Size::new(320, 240));
        assert_eq!(settings.content_area().size, Size::new(320, 160));
    }
}
