use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Window knobs shared by every demo, read from an optional `settings.toml`
/// next to the binary's working directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub width: u32,
    pub height: u32,
    pub msaa: u8,
    pub vsync: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            msaa: 4,
            vsync: true,
        }
    }
}

impl DisplaySettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let src = std::fs::read_to_string(path)?;

        Ok(toml::from_str(&src)?)
    }

    /// Missing file means defaults; an unreadable file is only worth a
    /// warning, the demos should still come up.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.as_ref().display());
                Self::default()
            }
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse settings file: {0}")]
    Format(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = DisplaySettings::default();

        assert_eq!(settings.width, 640);
        assert_eq!(settings.height, 480);
        assert!(settings.vsync);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let settings: DisplaySettings = toml::from_str("width = 1280\nheight = 720\n").unwrap();

        assert_eq!(settings.width, 1280);
        assert_eq!(settings.height, 720);
        assert_eq!(settings.msaa, 4);
        assert!(settings.vsync);
    }

    #[test]
    fn full_file() {
        let src = "width = 800\nheight = 600\nmsaa = 0\nvsync = false\n";
        let settings: DisplaySettings = toml::from_str(src).unwrap();

        assert_eq!(settings.msaa, 0);
        assert!(!settings.vsync);
    }
}
