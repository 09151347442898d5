//! Board document configuration.

use crate::board::Board;
use crate::entry::BoardEntry;
use crate::invariants::{Invariant, UniquePositions};
use crate::lineup::standard_lineup;
use crate::patch::AttributePath;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Where the board lives in a document and what a reset installs.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Type tag written to the document root's `_type`.
    #[serde(default = "default_type_name")]
    type_name: String,

    /// Attribute that holds the board entries.
    #[serde(default = "default_board_attribute")]
    board_attribute: String,

    /// Layout installed by initialize and reset.
    #[serde(default = "standard_lineup")]
    lineup: Vec<BoardEntry>,
}

fn default_type_name() -> String {
    "chessBoard".to_string()
}

fn default_board_attribute() -> String {
    "board".to_string()
}

/// Document attribute holding the type tag.
pub const TYPE_TAG: &str = "_type";

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            type_name: default_type_name(),
            board_attribute: default_board_attribute(),
            lineup: standard_lineup(),
        }
    }
}

impl BoardConfig {
    /// Creates a configuration with an explicit starting layout.
    #[instrument(skip(lineup), fields(entries = lineup.len()))]
    pub fn new(
        type_name: impl Into<String> + std::fmt::Debug,
        board_attribute: impl Into<String> + std::fmt::Debug,
        lineup: Vec<BoardEntry>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            type_name: type_name.into(),
            board_attribute: board_attribute.into(),
            lineup,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(type_name = %config.type_name, board = %config.board_attribute, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks names are usable and the lineup has one entry per position.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.type_name.trim().is_empty() {
            return Err(ConfigError::new("type_name must not be empty"));
        }
        if self.board_attribute.trim().is_empty() {
            return Err(ConfigError::new("board_attribute must not be empty"));
        }
        if self.board_attribute == TYPE_TAG {
            return Err(ConfigError::new(format!(
                "board_attribute cannot be the type tag {}",
                TYPE_TAG
            )));
        }
        let lineup = Board::from_entries(self.lineup.iter().cloned());
        if !UniquePositions::holds(&lineup) {
            return Err(ConfigError::new(format!(
                "lineup repeats positions: {}",
                UniquePositions::duplicates(&lineup).join(", ")
            )));
        }
        Ok(())
    }

    /// Path of the board attribute.
    pub fn board_path(&self) -> AttributePath {
        AttributePath::attribute(&self.board_attribute)
    }

    /// Path of the root type tag.
    pub fn type_path(&self) -> AttributePath {
        AttributePath::attribute(TYPE_TAG)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.type_name(), "chessBoard");
        assert_eq!(config.board_attribute(), "board");
        assert_eq!(config.lineup().len(), 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_takes_defaults() {
        let config = BoardConfig::from_toml("").expect("empty config");
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_custom_lineup_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
type_name = "checkers"
board_attribute = "squares"

[[lineup]]
position = "b1"
piece = "w"

[[lineup]]
position = "a2"
piece = "w"
"#
        )
        .expect("write config");

        let config = BoardConfig::from_file(file.path()).expect("valid config");
        assert_eq!(config.type_name(), "checkers");
        assert_eq!(config.board_path().to_string(), "squares");
        assert_eq!(config.lineup().len(), 2);
    }

    #[test]
    fn test_duplicate_lineup_rejected() {
        let result = BoardConfig::new(
            "chessBoard",
            "board",
            vec![BoardEntry::new("a1", "R"), BoardEntry::new("a1", "r")],
        );
        let err = result.expect_err("duplicate positions");
        assert!(err.message.contains("a1"));
    }

    #[test]
    fn test_board_attribute_cannot_be_type_tag() {
        assert!(BoardConfig::new("chessBoard", "_type", Vec::new()).is_err());
    }

    #[test]
    fn test_missing_file_reports_error() {
        let err = BoardConfig::from_file("/nonexistent/board.toml").expect_err("missing file");
        assert!(err.message.starts_with("Failed to read config file"));
    }
}
