//! User configuration.
//!
//! Settings are read from a TOML file, either given explicitly or found at
//! `$XDG_CONFIG_HOME/splanner/config.toml`:
//!
//! ```toml
//! [template]
//! path = "/home/user/pybricks/pysplanner.py"
//!
//! [curve]
//! tension = 0.5
//! density = 0.035
//! closed = false
//! ```
//!
//! Every key is optional; absent keys fall back to the defaults.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::{
    codegen::FileTemplate,
    curve::CurveParams,
    error::{IoResultExt, Result, ResultExt, SplanError},
};

/// Name of the configuration file inside the XDG config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the code template comes from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Local copy of the hub script template
    pub path: Option<PathBuf>,
}

/// All user-tunable settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplannerConfig {
    pub template: TemplateConfig,
    pub curve: CurveParams,
}

impl SplannerConfig {
    /// Loads the explicit file if given, else the XDG file if present, else
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SplanError::FileSystem` if an explicit file cannot be read and
    /// `SplanError::Configuration` if any file is not valid configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    debug!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path).at_path(&path)?;
        let config = Self::from_toml_str(&text)
            .with_context(format!("Invalid configuration in {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).with_context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the XDG configuration file if it exists.
    pub fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("splanner").find_config_file(CONFIG_FILE_NAME)
    }

    fn validate(&self) -> Result<()> {
        let CurveParams {
            tension, density, ..
        } = self.curve;
        if !tension.is_finite() {
            return Err(SplanError::Configuration {
                message: format!("curve.tension must be finite, got {tension}"),
            });
        }
        if !(density.is_finite() && density > 0.0) {
            return Err(SplanError::Configuration {
                message: format!("curve.density must be positive, got {density}"),
            });
        }
        Ok(())
    }

    /// Template source named by the configuration, if any.
    pub fn template_source(&self) -> Option<FileTemplate> {
        self.template.path.as_ref().map(FileTemplate::new)
    }
}
