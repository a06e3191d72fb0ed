//! Configuration
//!
//! Settings are read from an optional JSON file; every field has a default so
//! partial files are fine. Command-line flags override file values.

use crate::error::{Result, SpotlightError};
use crate::page::Selector;
use crate::shortcut::{Chord, DEFAULT_SHORTCUT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Palette configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotlightConfig {
    /// Selector identifying candidate elements on the page
    pub target: String,
    /// Chord that reveals the palette
    pub shortcut: String,
    /// Maximum suggestion rows shown at once
    pub visible_rows: usize,
    /// Open activated targets with the system opener
    pub open_links: bool,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            target: "a".to_string(),
            shortcut: DEFAULT_SHORTCUT.to_string(),
            visible_rows: 10,
            open_links: true,
        }
    }
}

impl SpotlightConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SpotlightError::ConfigError(path.display().to_string(), e.to_string()))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| SpotlightError::ConfigError(path.display().to_string(), e.to_string()))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Check that the selector and shortcut parse
    pub fn validate(&self) -> Result<()> {
        self.selector()?;
        self.chord()?;
        if self.visible_rows == 0 {
            return Err(SpotlightError::ConfigError(
                "visible_rows".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn selector(&self) -> Result<Selector> {
        Selector::parse(&self.target)
    }

    pub fn chord(&self) -> Result<Chord> {
        self.shortcut.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = SpotlightConfig::default();
        config.validate().unwrap();
        assert_eq!(config.chord().unwrap(), Chord::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(r#"{ "target": "nav a.link" }"#);
        // Combinators are rejected at load time.
        assert!(SpotlightConfig::load(file.path()).is_err());

        let file = write_config(r#"{ "target": "a.link", "open_links": false }"#);
        let config = SpotlightConfig::load(file.path()).unwrap();
        assert_eq!(config.target, "a.link");
        assert!(!config.open_links);
        assert_eq!(config.shortcut, DEFAULT_SHORTCUT);
        assert_eq!(config.visible_rows, 10);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let file = write_config("{ target: ");
        let err = SpotlightConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, SpotlightError::ConfigError(_, _)));
    }

    #[test]
    fn bad_shortcut_is_rejected() {
        let file = write_config(r#"{ "shortcut": "ctrl+" }"#);
        let err = SpotlightConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, SpotlightError::InvalidShortcut(_, _)));
    }

    #[test]
    fn zero_rows_is_rejected() {
        let config = SpotlightConfig {
            visible_rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = SpotlightConfig::load(Path::new("/no/such/spotlight.json")).unwrap_err();
        assert!(matches!(err, SpotlightError::ConfigError(_, _)));
    }
}
