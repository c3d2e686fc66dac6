//! Compiler configuration files

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tn_render::RenderOptions;

/// Configuration for one compilation run (e.g., `tern.toml`)
///
/// ```toml
/// [render]
/// indent = true
/// indent_width = 4
///
/// [diagnostics]
/// warnings_as_errors = false
/// check_labels = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Output layout
    #[serde(default)]
    pub render: RenderOptions,

    /// When diagnostics stop compilation
    #[serde(default)]
    pub diagnostics: DiagnosticPolicy,
}

/// Diagnostic gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticPolicy {
    /// Refuse to render when any warning was reported
    #[serde(default)]
    pub warnings_as_errors: bool,

    /// Report branch and jump targets that have no label
    #[serde(default = "default_check_labels")]
    pub check_labels: bool,
}

impl Default for DiagnosticPolicy {
    fn default() -> Self {
        Self {
            warnings_as_errors: false,
            check_labels: default_check_labels(),
        }
    }
}

fn default_check_labels() -> bool {
    true
}

impl CompileConfig {
    /// Parse a configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse compiler configuration")
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load `path` if it exists, falling back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize compiler configuration")
    }
}
