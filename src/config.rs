//! Pipeline configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NetworkError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub ego: EgoConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Extension of the snapshot files to pick up, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// First year of the synthetic labels used when filenames carry no year.
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    /// Closing year of each evaluation cycle.
    #[serde(default = "default_cycle_end_years")]
    pub cycle_end_years: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_percentile")]
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EgoConfig {
    #[serde(default)]
    pub center: Option<String>,
    #[serde(default = "default_radius")]
    pub radius: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving Graphviz files of the derived networks.
    #[serde(default)]
    pub dot_dir: Option<PathBuf>,
    /// Directory receiving node-link JSON files of the derived networks.
    #[serde(default)]
    pub json_dir: Option<PathBuf>,
    /// Number of highest-degree nodes labelled in DOT output. Unset labels all.
    #[serde(default = "default_label_top")]
    pub label_top: Option<usize>,
}

fn default_extension() -> String {
    "json".to_string()
}
fn default_base_year() -> i32 {
    2010
}
fn default_cycle_end_years() -> Vec<i32> {
    vec![2012, 2016, 2020, 2024]
}
fn default_percentile() -> f64 {
    80.0
}
fn default_radius() -> usize {
    1
}
fn default_label_top() -> Option<usize> {
    Some(5)
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            base_year: default_base_year(),
            cycle_end_years: default_cycle_end_years(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            percentile: default_percentile(),
        }
    }
}

impl Default for EgoConfig {
    fn default() -> Self {
        Self {
            center: None,
            radius: default_radius(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dot_dir: None,
            json_dir: None,
            label_top: default_label_top(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(content).map_err(|e| NetworkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NetworkError::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        check_percentile(self.core.percentile)?;
        if self.input.extension.trim_start_matches('.').is_empty() {
            return Err(NetworkError::Config(
                "input extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_percentile(p: f64) -> Result<()> {
    if (0.0..=100.0).contains(&p) {
        Ok(())
    } else {
        Err(NetworkError::InvalidPercentile(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.input.extension, "json");
        assert_eq!(config.input.base_year, 2010);
        assert_eq!(config.core.percentile, 80.0);
        assert_eq!(config.ego.radius, 1);
        assert!(config.ego.center.is_none());
        assert_eq!(config.output.label_top, Some(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            [core]
            percentile = 90.0

            [ego]
            center = "57214422700"
            "#,
        )
        .unwrap();
        assert_eq!(config.core.percentile, 90.0);
        assert_eq!(config.ego.center.as_deref(), Some("57214422700"));
        assert_eq!(config.ego.radius, 1);
        assert_eq!(config.input.cycle_end_years, vec![2012, 2016, 2020, 2024]);
        assert_eq!(config.output.label_top, Some(5));

        let config = PipelineConfig::from_toml("[output]\nlabel_top = 10\n").unwrap();
        assert_eq!(config.output.label_top, Some(10));
        assert!(config.output.dot_dir.is_none());
    }

    #[test]
    fn test_rejects_out_of_range_percentile() {
        let err = PipelineConfig::from_toml("[core]\npercentile = 120.0\n").unwrap_err();
        assert!(matches!(err, NetworkError::InvalidPercentile(p) if p == 120.0));
        assert!(check_percentile(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_empty_extension() {
        let err = PipelineConfig::from_toml("[input]\nextension = \"\"\n").unwrap_err();
        assert!(matches!(err, NetworkError::Config(_)));
    }
}
