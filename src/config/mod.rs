// Core configuration types
mod core;
mod loader;
pub mod validation;

pub use self::core::{
    EstimatorConfig, OutputConfig, SensitivityConfig, UnitFactorConfig, CONFIG_FILE_NAME,
};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config,
};
pub use validation::{
    run_validation, validate_config, validate_project, validate_snapshot, EstimatorValidation,
};

use std::path::Path;

/// Resolve the effective configuration: an explicit path must load, a
/// discovered file falls back to defaults when broken.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<EstimatorConfig> {
    match explicit {
        Some(path) => load_config_from_path(path),
        None => Ok(load_config()),
    }
}
