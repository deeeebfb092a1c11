use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::convert::DEFAULT_MARKER;
use crate::pivot::{DEFAULT_IN_FILE, DEFAULT_MAX_HARMONIC};

/// Default location of the configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Shared configuration for both tools
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pivot: PivotSettings,
    #[serde(default)]
    pub convert: ConvertSettings,
}

/// Defaults for the harmonic pivot
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PivotSettings {
    /// Input CSV used when `--inFile` is not given
    pub in_file: PathBuf,
    /// Harmonic column count used when `--maxHarmonic` is not given
    pub max_harmonic: usize,
}

/// Defaults for the tracker dump converter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Line prefix that starts the record section
    pub marker: String,
}

impl Default for PivotSettings {
    fn default() -> Self {
        PivotSettings {
            in_file: PathBuf::from(DEFAULT_IN_FILE),
            max_harmonic: DEFAULT_MAX_HARMONIC,
        }
    }
}

impl Default for ConvertSettings {
    fn default() -> Self {
        ConvertSettings {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults if it doesn't exist
pub fn load_config_from(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    match File::open(path) {
        Ok(mut file) => {
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            Ok(toml::from_str(&contents)?)
        }
        Err(_) => {
            tracing::debug!("No {} found, using defaults", path.display());
            Ok(Config::default())
        }
    }
}

/// Load configuration from config.toml
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    load_config_from(Path::new(CONFIG_FILE))
}
