//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs, PresetArg};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path, formatter),
        ConfigAction::Init { preset, force } => init_config(path, preset, force, formatter),
    }
}

/// Print the effective configuration.
fn show_config(config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    let origin = if path.exists() {
        format!("Loaded from {}", path.display())
    } else {
        format!("No file at {}; using defaults", path.display())
    };
    eprintln!("{}", formatter.info(&origin));
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Write a fresh configuration file.
fn init_config(path: &Path, preset: PresetArg, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    let config = Config {
        normalizer: preset.into(),
        ..Config::default()
    };
    config.save_to(path)?;

    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
    Ok(())
}
