use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub fern: FernSettings,
}

/// Defaults for the growth parameters; command-line flags win over these.
#[derive(Debug, Default, Deserialize)]
pub struct FernSettings {
    pub angle: Option<f64>,       // branch angle in degrees
    pub generations: Option<u32>, // generation cap
    pub cooldown: Option<f64>,    // seconds between accepted triggers
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fernart")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_settings() {
        let settings: Settings = toml::from_str(
            "[fern]\n\
             angle = 30.0\n\
             generations = 5\n",
        )
        .unwrap();
        assert_eq!(settings.fern.angle, Some(30.0));
        assert_eq!(settings.fern.generations, Some(5));
        assert_eq!(settings.fern.cooldown, None);
    }

    #[test]
    fn empty_file_means_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.fern.angle.is_none());
    }
}
