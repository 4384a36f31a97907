use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use super::{AppConfig, APP_NAME};

/// Prefix for environment overrides (`CLASSIFY_SCOPE`, ...).
pub const ENV_PREFIX: &str = "CLASSIFY";

/// Config file locations searched, in order, when no explicit path is given:
/// 1. `./.classify.yaml`
/// 2. `./.classify/config.yaml`
/// 3. `~/.classify.yaml`
/// 4. `$XDG_CONFIG_HOME/classify/config.yaml` (default `~/.config`)
/// 5. `<dir>/classify/config.yaml` for each `$XDG_CONFIG_DIRS` entry
pub fn candidate_paths(
    cwd: &Path,
    home: Option<&Path>,
    xdg_config_home: Option<&Path>,
    xdg_config_dirs: &[PathBuf],
) -> Vec<PathBuf> {
    let mut paths = vec![
        cwd.join(format!(".{APP_NAME}.yaml")),
        cwd.join(format!(".{APP_NAME}")).join("config.yaml"),
    ];
    if let Some(home) = home {
        paths.push(home.join(format!(".{APP_NAME}.yaml")));
    }
    let xdg = xdg_config_home.map(Path::to_path_buf).or_else(|| home.map(|h| h.join(".config")));
    if let Some(xdg) = xdg {
        paths.push(xdg.join(APP_NAME).join("config.yaml"));
    }
    paths.extend(xdg_config_dirs.iter().map(|dir| dir.join(APP_NAME).join("config.yaml")));
    paths
}

/// Split a `$XDG_CONFIG_DIRS` value, falling back to `/etc/xdg` when unset or empty.
pub fn xdg_config_dirs(raw: Option<&OsStr>) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = raw
        .map(|raw| env::split_paths(raw).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default();
    if dirs.is_empty() {
        vec![PathBuf::from("/etc/xdg")]
    } else {
        dirs
    }
}

/// First existing candidate config file, if any.
pub fn discover_config(
    cwd: &Path,
    home: Option<&Path>,
    xdg_config_home: Option<&Path>,
    xdg_config_dirs: &[PathBuf],
) -> Option<PathBuf> {
    candidate_paths(cwd, home, xdg_config_home, xdg_config_dirs)
        .into_iter()
        .find(|p| p.is_file())
}

/// Load the application config.
///
/// An explicit path must exist and parse. Without one, the usual locations are
/// searched and a missing config simply yields the defaults. Environment
/// overrides are applied last.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!("Unable to read config: {}", path.display()));
            }
            Some(path.to_path_buf())
        }
        None => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            let home = env::var_os("HOME").map(PathBuf::from);
            let xdg = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
            let dirs = xdg_config_dirs(env::var_os("XDG_CONFIG_DIRS").as_deref());
            discover_config(&cwd, home.as_deref(), xdg.as_deref(), &dirs)
        }
    };

    let mut config = match &path {
        Some(path) => read_config_file(path)?,
        None => {
            debug!("No config file found, using defaults");
            AppConfig::default()
        }
    };
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

/// Parse a YAML config file. An empty file is the default config.
pub fn read_config_file(path: &Path) -> Result<AppConfig> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let mut config: AppConfig = if body.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str(&body)
            .with_context(|| format!("Failed to parse config YAML at {}", path.display()))?
    };
    config.config_path = Some(path.to_path_buf());
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Apply `CLASSIFY_*` overrides for the scalar settings.
///
/// Blank values are ignored. A value that does not parse for its key is an
/// error naming the variable.
pub fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let var = |name: &str| {
        let key = format!("{ENV_PREFIX}_{name}");
        lookup(&key).filter(|v| !v.trim().is_empty()).map(|v| (key, v))
    };
    if let Some((_, output)) = var("OUTPUT") {
        config.output = output;
    }
    if let Some((_, scope)) = var("SCOPE") {
        config.scope = scope;
    }
    if let Some((key, quiet)) = var("QUIET") {
        config.quiet = parse_bool(&quiet).with_context(|| format!("Invalid {key}"))?;
    }
    if let Some((_, level)) = var("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some((key, structured)) = var("LOG_STRUCTURED") {
        config.log.structured = parse_bool(&structured).with_context(|| format!("Invalid {key}"))?;
    }
    if let Some((_, file)) = var("LOG_FILE") {
        config.log.file = file;
    }
    if let Some((key, parallelism)) = var("FILE_CLASSIFICATION_PARALLELISM") {
        config.file_classification.parallelism = parallelism
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: {parallelism:?}"))?;
    }
    if let Some((key, max_read)) = var("FILE_CLASSIFICATION_MAX_READ_BYTES") {
        config.file_classification.max_read_bytes =
            max_read.trim().parse().with_context(|| format!("Invalid {key}: {max_read:?}"))?;
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got {other:?}")),
    }
}
