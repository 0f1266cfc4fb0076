//! Component configuration.
//!
//! [`ChatkitConfig`] collects the externally settable options of every
//! component. It is usually loaded from TOML:
//!
//! ```toml
//! prefix = "cds-aichat"
//!
//! [carousel]
//! next_btn_text = "Next"
//! previous_btn_text = "Previous"
//! edge_behavior = "clamp"
//!
//! [header]
//! title_text = "Workspace"
//! subtitle_text = "Draft"
//!
//! [shell]
//! header_open = false
//! ```
//!
//! Every field is optional; missing fields take their defaults.
//!
//! ```
//! use chatkit::config::ChatkitConfig;
//!
//! let config = ChatkitConfig::from_toml_str("[carousel]\nnext_btn_text = \"Next\"").unwrap();
//! let carousel = config.carousel();
//! assert_eq!(carousel.next_btn_text(), Some("Next"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::carousel::{Carousel, EdgeBehavior, TransitionMode};
use crate::error::ConfigError;
use crate::logging::targets;
use crate::workspace_shell::{DEFAULT_HEADER_SLOT, WorkspaceShell, WorkspaceShellHeader};

/// Default component namespace.
pub const DEFAULT_PREFIX: &str = "cds-aichat";

/// Carousel options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Tooltip of the next button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_btn_text: Option<String>,
    /// Tooltip of the previous button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_btn_text: Option<String>,
    /// What the default engine does at the first and last view.
    pub edge_behavior: EdgeBehavior,
    /// When the default engine reports completed transitions.
    pub transition_mode: TransitionMode,
}

/// Workspace shell header options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Title shown in the disclosure summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_text: Option<String>,
    /// Subtitle shown under the summary.
    #[serde(rename = "subtitle_text", skip_serializing_if = "Option::is_none")]
    pub sub_title_text: Option<String>,
    /// Slot the header projects into.
    pub slot: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title_text: None,
            sub_title_text: None,
            slot: DEFAULT_HEADER_SLOT.to_string(),
        }
    }
}

/// Workspace shell options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Initial header state.
    pub header_open: bool,
}

/// Configuration for all components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatkitConfig {
    /// Namespace prefixed to component tags and event names.
    pub prefix: String,
    /// Carousel options.
    pub carousel: CarouselConfig,
    /// Header options.
    pub header: HeaderConfig,
    /// Shell options.
    pub shell: ShellConfig,
}

impl Default for ChatkitConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            carousel: CarouselConfig::default(),
            header: HeaderConfig::default(),
            shell: ShellConfig::default(),
        }
    }
}

impl ChatkitConfig {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), prefix = %config.prefix, "configuration loaded");
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::invalid_value("prefix", "must not be empty"));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid_value("prefix", "must not contain whitespace"));
        }
        if self.header.slot.is_empty() {
            return Err(ConfigError::invalid_value("header.slot", "must not be empty"));
        }
        Ok(())
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// A carousel built from this configuration.
    pub fn carousel(&self) -> Carousel {
        Carousel::from_config(&self.prefix, &self.carousel)
    }

    /// A workspace shell header built from this configuration.
    pub fn header(&self) -> WorkspaceShellHeader {
        WorkspaceShellHeader::from_config(&self.prefix, &self.header)
    }

    /// A workspace shell built from this configuration.
    pub fn shell(&self) -> WorkspaceShell {
        WorkspaceShell::from_config(&self.prefix, &self.shell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[test]
    fn test_defaults() {
        let config = ChatkitConfig::from_toml_str("").unwrap();
        assert_eq!(config, ChatkitConfig::default());
        assert_eq!(config.prefix, "cds-aichat");
        assert_eq!(config.header.slot, "header");
        assert_eq!(config.carousel.edge_behavior, EdgeBehavior::Clamp);
        assert!(!config.shell.header_open);
    }

    #[test]
    fn test_parse_sections() {
        let config = ChatkitConfig::from_toml_str(
            r#"
prefix = "acme"

[carousel]
previous_btn_text = "Back"
edge_behavior = "wrap"
transition_mode = "deferred"

[header]
title_text = "Workspace"
subtitle_text = "Draft"

[shell]
header_open = true
"#,
        )
        .unwrap();

        assert_eq!(config.carousel.previous_btn_text.as_deref(), Some("Back"));
        assert_eq!(config.carousel.edge_behavior, EdgeBehavior::Wrap);
        assert_eq!(config.carousel.transition_mode, TransitionMode::Deferred);
        assert_eq!(config.header.sub_title_text.as_deref(), Some("Draft"));

        assert_eq!(config.carousel().base().tag(), "acme-carousel");
        assert_eq!(config.header().title_text(), Some("Workspace"));
        assert!(config.shell().header_open());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ChatkitConfig::from_toml_str("prefix = \"\""),
            Err(ConfigError::InvalidValue { field, .. }) if field == "prefix"
        ));
        assert!(ChatkitConfig::from_toml_str("prefix = \"a b\"").is_err());
        assert!(matches!(
            ChatkitConfig::from_toml_str("[header]\nslot = \"\""),
            Err(ConfigError::InvalidValue { field, .. }) if field == "header.slot"
        ));
        assert!(matches!(
            ChatkitConfig::from_toml_str("[carousel]\nedge_behavior = \"bounce\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = ChatkitConfig::default();
        config.header.title_text = Some("Workspace".into());
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("title_text = \"Workspace\""));
        assert_eq!(ChatkitConfig::from_toml_str(&text).unwrap(), config);
    }
}
