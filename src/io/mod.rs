pub mod output;

pub use output::{create_writer, OutputFormat, OutputWriter};

use crate::core::ProjectSnapshot;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Load a snapshot file. `.toml` files are parsed as TOML, anything else as
/// JSON.
pub fn read_snapshot(path: &Path) -> Result<ProjectSnapshot> {
    let contents = read_file(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let snapshot = if is_toml {
        ProjectSnapshot::from_toml_str(&contents)
            .with_context(|| format!("Invalid TOML snapshot {}", path.display()))?
    } else {
        ProjectSnapshot::from_json_str(&contents)
            .with_context(|| format!("Invalid JSON snapshot {}", path.display()))?
    };
    log::debug!(
        "Loaded snapshot {} with {} items",
        path.display(),
        snapshot.items.len()
    );
    Ok(snapshot)
}

/// Report destination: the named file, or stdout.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_reads_toml_and_json_snapshots() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("plant.toml");
        fs::write(
            &toml_path,
            indoc! {r#"
                [project.rates]
                reference_labor_rate = 50.0

                [[items]]
                id = "pump"
                isdc_code = "010101"
                basic_workforce = 10.0
            "#},
        )
        .unwrap();
        let json_path = dir.path().join("plant.json");
        fs::write(
            &json_path,
            r#"{"project": {"rates": {"reference_labor_rate": 50.0}}, "items": []}"#,
        )
        .unwrap();

        let from_toml = read_snapshot(&toml_path).unwrap();
        assert_eq!(from_toml.items.len(), 1);
        assert_eq!(from_toml.items[0].id, "pump");
        assert!(from_toml.items[0].is_activated);

        let from_json = read_snapshot(&json_path).unwrap();
        assert!(from_json.items.is_empty());
    }

    #[test]
    fn test_bad_snapshot_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let message = format!("{:#}", read_snapshot(&path).unwrap_err());
        assert!(message.contains("broken.json"));
    }
}
