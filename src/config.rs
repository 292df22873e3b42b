use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

/// Display refresh rate the timers are meant to run at.
pub const FRAME_RATE: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Instructions per second.
    pub clock_speed: u32,
    pub sound_enabled: bool,
    /// Fixed seed for `RND`; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_speed: 600,
            sound_enabled: true,
            seed: None,
        }
    }
}

impl Config {
    /// Reads the config at `path`, falling back to defaults if there is no
    /// such file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn steps_per_frame(&self) -> usize {
        (self.clock_speed / FRAME_RATE).max(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.steps_per_frame(), 10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config: Config =
            serde_json::from_str(r#"{"clock_speed": 1200, "background_color": [0, 0, 0]}"#)
                .unwrap();
        assert_eq!(config.clock_speed, 1200);
        assert_eq!(config.seed, None);
        assert_eq!(config.steps_per_frame(), 20);
    }

    #[test]
    fn test_render_only_keys_are_ignored() {
        let config: Config = serde_json::from_str(
            r#"{"display_scale": 20, "foreground_color": [255, 255, 255], "sound_enabled": false}"#,
        )
        .unwrap();
        assert!(!config.sound_enabled);
        assert_eq!(config.clock_speed, 600);
        let saved = serde_json::to_string(&config).unwrap();
        assert!(!saved.contains("display_scale"));
    }

    #[test]
    fn test_slow_clock_still_steps() {
        let config = Config {
            clock_speed: 30,
            ..Config::default()
        };
        assert_eq!(config.steps_per_frame(), 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() -> anyhow::Result<()> {
        let config = Config::load("no/such/config.json")?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("snap8-config-{}.json", std::process::id()));
        let config = Config {
            seed: Some(42),
            ..Config::default()
        };
        config.save(&path)?;
        let loaded = Config::load(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }
}
