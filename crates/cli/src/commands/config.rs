use anyhow::{Context, Result};
use classify_core::config::AppConfig;

/// Validate the effective configuration and print it as YAML.
pub fn show_config_command(config: &AppConfig) -> Result<()> {
    config.resolve(0).context("Invalid configuration")?;
    config.classifier_set().context("Invalid classifier configuration")?;

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    match &config.config_path {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no config file found; showing defaults"),
    }
    print!("{yaml}");
    Ok(())
}
