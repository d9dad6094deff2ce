//! # Digitizer Configuration
//!
//! Settings shared by every host: canvas style for the renderer and tick
//! layout for the exporter. Configuration files are TOML; every key is
//! optional and falls back to its default.
//!
//! ## Example TOML
//!
//! ```toml
//! [render]
//! segment_color = "#1f2937"
//! segment_width = 2.5
//! preview_dash = [4.0, 4.0]
//!
//! [export]
//! clearance = 12.0
//! ```
//!
//! ## Example
//!
//! ```rust
//! use profile_core::config::DigitizerConfig;
//!
//! let config = DigitizerConfig::from_toml_str("[export]\nclearance = 12.0\n")?;
//! assert_eq!(config.export.clearance, 12.0);
//! assert_eq!(config.render.segment_width, 2.0); // default kept
//! # Ok::<(), profile_core::errors::ProfileError>(())
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{ProfileError, ProfileResult};
use crate::export::ExportOptions;
use crate::render::RenderConfig;

/// Root configuration, one table per concern.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DigitizerConfig {
    /// Canvas colors, stroke widths and marker sizes
    #[serde(default)]
    pub render: RenderConfig,

    /// Dimension tick layout for geometry export
    #[serde(default)]
    pub export: ExportOptions,
}

impl DigitizerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> ProfileResult<Self> {
        let config: DigitizerConfig =
            toml::from_str(source).map_err(|e| ProfileError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> ProfileResult<Self> {
        let source = fs::read_to_string(path)
            .map_err(|e| ProfileError::file_error("read config", path.display().to_string(), e.to_string()))?;
        let config = Self::from_toml_str(&source)?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> ProfileResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("no configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml_string(&self) -> ProfileResult<String> {
        toml::to_string_pretty(self).map_err(|e| ProfileError::serialization(e.to_string()))
    }

    pub fn validate(&self) -> ProfileResult<()> {
        self.render.validate()?;
        self.export.validate()?;
        Ok(())
    }
}
