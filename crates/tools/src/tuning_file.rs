use anyhow::{Context, Result};
use delve_core::TuningConfig;
use std::fs;
use std::path::Path;

/// Reads a TOML tuning file. Omitted tables and keys keep their defaults.
pub fn load(path: &Path) -> Result<TuningConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tuning file: {}", path.display()))?;
    let tuning = parse(&text).with_context(|| format!("Invalid tuning in {}", path.display()))?;
    Ok(tuning)
}

pub fn parse(text: &str) -> Result<TuningConfig> {
    let tuning: TuningConfig = toml::from_str(text).context("Failed to parse tuning TOML")?;
    tuning.validate()?;
    Ok(tuning)
}

pub fn load_or_default(path: Option<&Path>) -> Result<TuningConfig> {
    match path {
        Some(path) => load(path),
        None => Ok(TuningConfig::default()),
    }
}

pub fn render_defaults() -> Result<String> {
    toml::to_string_pretty(&TuningConfig::default()).context("Failed to render default tuning")
}
