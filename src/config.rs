use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::Commodity;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "USDA_DASHBOARD_CONFIG";
/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Startup settings. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV or Parquet file with the production records.
    pub data_path: PathBuf,
    /// Commodities ticked when the dashboard opens.
    pub initial_commodities: Vec<String>,
    /// States selected in the table filter when the dashboard opens.
    pub initial_states: Vec<String>,
    /// First year of the initial range; the range always ends at the last year.
    pub initial_year_start: i32,
    pub dark_mode: bool,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("../SQL/USDA_production_2023.csv"),
            initial_commodities: vec!["Yogurt".into(), "Honey".into()],
            initial_states: vec!["CALIFORNIA".into(), "WISCONSIN".into(), "NEW YORK".into()],
            initial_year_start: 2000,
            dark_mode: false,
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the configuration from, in order of precedence:
    /// `$USDA_DASHBOARD_CONFIG`, `./dashboard.json`, built-in defaults.
    /// A positional data path argument overrides `data_path`.
    pub fn load(data_path_arg: Option<PathBuf>) -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(path) = data_path_arg {
            config.data_path = path;
        }
        Ok(config)
    }

    /// Configured commodities; unknown names are skipped with a warning.
    pub fn commodities(&self) -> Vec<Commodity> {
        self.initial_commodities
            .iter()
            .filter_map(|name| match name.parse() {
                Ok(c) => Some(c),
                Err(_) => {
                    log::warn!("Ignoring unknown commodity '{name}' in config");
                    None
                }
            })
            .collect()
    }
}
