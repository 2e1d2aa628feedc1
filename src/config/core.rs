use serde::{Deserialize, Serialize};

use crate::costing::MissingUnitFactorPolicy;
use crate::io::output::OutputFormat;
use crate::projection::{DEFAULT_DEFERRAL_YEARS, DEFAULT_UNIT_FACTOR_MULTIPLIERS};

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".isdc-estimator.toml";

/// Root configuration structure for isdc-estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Price items on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub unit_factors: UnitFactorConfig,

    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            unit_factors: UnitFactorConfig::default(),
            sensitivity: SensitivityConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Render as the TOML written by `isdc-estimator init`.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitFactorConfig {
    /// What happens when a category code has no unit factor
    #[serde(default)]
    pub missing_policy: MissingUnitFactorPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    #[serde(default = "default_multipliers")]
    pub unit_factor_multipliers: Vec<f64>,

    #[serde(default = "default_deferrals")]
    pub deferral_years: Vec<i32>,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            unit_factor_multipliers: default_multipliers(),
            deferral_years: default_deferrals(),
        }
    }
}

fn default_multipliers() -> Vec<f64> {
    DEFAULT_UNIT_FACTOR_MULTIPLIERS.to_vec()
}

fn default_deferrals() -> Vec<i32> {
    DEFAULT_DEFERRAL_YEARS.to_vec()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: EstimatorConfig = toml::from_str("").unwrap();
        assert_eq!(config, EstimatorConfig::default());
        assert!(config.parallel);
        assert_eq!(config.sensitivity.deferral_years, vec![5, 10, 20, 30]);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: EstimatorConfig = toml::from_str(
            r#"
            parallel = false
            [unit_factors]
            missing_policy = "reject"
            [sensitivity]
            deferral_years = [15]
            "#,
        )
        .unwrap();

        assert!(!config.parallel);
        assert_eq!(
            config.unit_factors.missing_policy,
            MissingUnitFactorPolicy::Reject
        );
        assert_eq!(config.sensitivity.deferral_years, vec![15]);
        assert_eq!(config.sensitivity.unit_factor_multipliers, vec![0.8, 0.9, 1.1, 1.2]);
        assert_eq!(config.output.default_format, OutputFormat::Terminal);
    }

    #[test]
    fn test_rendered_default_parses_back() {
        let rendered = EstimatorConfig::default().to_toml_string().unwrap();
        let parsed: EstimatorConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, EstimatorConfig::default());
    }
}
