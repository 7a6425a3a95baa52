//! Config file discovery and loading.
//!
//! The first file found wins:
//! 1. An explicit path (must exist)
//! 2. `{workspace}/bitgrant.toml`
//! 3. `~/.bitgrant/config.toml`
//! 4. The embedded `defaults.toml`
//!
//! Keys missing from a file take their default values.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// File name looked up in the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = "bitgrant.toml";

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A configuration file.
    File(PathBuf),
    /// The embedded defaults.
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("<embedded defaults>"),
        }
    }
}

/// A validated configuration and its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The configuration.
    pub config: Config,
    /// Where it was loaded from.
    pub source: ConfigSource,
}

/// Discover and load the configuration.
///
/// `explicit` bypasses discovery. `workspace_root` is searched for
/// `bitgrant.toml`; `home_override` replaces the user's `~/.bitgrant`
/// directory.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the explicit file is missing, any discovered
/// file is malformed or oversized, or the configuration fails validation.
pub fn load(
    explicit: Option<&Path>,
    workspace_root: Option<&Path>,
    home_override: Option<&Path>,
) -> ConfigResult<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file(path)?;
        info!(path = %path.display(), "loaded config");
        return Ok(LoadedConfig {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        });
    }

    let mut candidates = Vec::new();
    if let Some(root) = workspace_root {
        candidates.push(root.join(WORKSPACE_CONFIG_FILE));
    }
    match home_override {
        Some(dir) => candidates.push(dir.join("config.toml")),
        None => match home_directory() {
            Ok(home) => candidates.push(home.join(".bitgrant").join("config.toml")),
            Err(e) => debug!(error = %e, "skipping user config"),
        },
    }

    for path in candidates {
        if let Some(content) = try_read_file(&path)? {
            let config = parse(&content, &path.display().to_string())?;
            validate::validate(&config)?;
            info!(path = %path.display(), "loaded config");
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::File(path),
            });
        }
    }

    debug!("no config file found, using embedded defaults");
    Ok(LoadedConfig {
        config: defaults()?,
        source: ConfigSource::Defaults,
    })
}

/// The embedded default configuration.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the embedded defaults do not parse.
pub fn defaults() -> ConfigResult<Config> {
    parse(DEFAULTS_TOML, "<embedded defaults>")
}

/// Load a config from a specific file path.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = try_read_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;

    let config = parse(&content, &path.display().to_string())?;
    validate::validate(&config)?;
    Ok(config)
}

/// Parse and validate a config from a string.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the content does not parse or validate.
pub fn load_str(content: &str) -> ConfigResult<Config> {
    let config = parse(content, "<string>")?;
    validate::validate(&config)?;
    Ok(config)
}

fn parse(content: &str, origin: &str) -> ConfigResult<Config> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })
}

/// Read a file, returning `None` if it doesn't exist.
///
/// Uses a single read operation; the size limit is checked on the content.
fn try_read_file(path: &Path) -> ConfigResult<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {size} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }

    Ok(Some(content))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const POSTS: &str = r#"
[[families]]
on = "post"
capabilities = ["create", "review", "update", "delete"]
default = ["create", "update"]
"#;

    #[test]
    fn test_defaults_parse() {
        let val: toml::Value = toml::from_str(DEFAULTS_TOML).unwrap();
        assert!(val.as_table().unwrap().contains_key("logging"));
        assert!(val.as_table().unwrap().contains_key("gate"));
    }

    #[test]
    fn test_defaults_match_config_default() {
        assert_eq!(defaults().unwrap(), Config::default());
    }

    #[test]
    fn test_load_str_fills_missing_sections() {
        let config = load_str(POSTS).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.gate.deny_message, "Access Denied");
        let family = config.family("post").unwrap();
        assert_eq!(family.capabilities.len(), 4);
        assert_eq!(family.default, vec!["create", "update"]);
    }

    #[test]
    fn test_load_str_rejects_unknown_family_keys() {
        let result = load_str("[[families]]\ncapabilities = [\"a\"]\ndefaults = [\"a\"]\n");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/bitgrant.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_try_read_file_missing() {
        let result = try_read_file(Path::new("/nonexistent/bitgrant.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.toml");
        let padding = "#".repeat(1_048_577);
        fs::write(&path, padding).unwrap();
        let result = load_file(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_explicit_path_wins() {
        let workspace = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(workspace.path().join(WORKSPACE_CONFIG_FILE), "[logging]\nlevel = \"warn\"\n")
            .unwrap();
        let explicit = home.path().join("custom.toml");
        fs::write(&explicit, POSTS).unwrap();

        let loaded = load(
            Some(explicit.as_path()),
            Some(workspace.path()),
            Some(home.path()),
        )
        .unwrap();
        assert_eq!(loaded.source, ConfigSource::File(explicit));
        assert_eq!(loaded.config.families.len(), 1);
        assert_eq!(loaded.config.logging.level, "info");
    }

    #[test]
    fn test_workspace_before_home() {
        let workspace = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(workspace.path().join(WORKSPACE_CONFIG_FILE), "[logging]\nlevel = \"warn\"\n")
            .unwrap();
        fs::write(home.path().join("config.toml"), "[logging]\nlevel = \"debug\"\n").unwrap();

        let loaded = load(None, Some(workspace.path()), Some(home.path())).unwrap();
        assert_eq!(loaded.config.logging.level, "warn");
    }

    #[test]
    fn test_home_config() {
        let workspace = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[logging]\nlevel = \"debug\"\n").unwrap();

        let loaded = load(None, Some(workspace.path()), Some(home.path())).unwrap();
        assert_eq!(loaded.config.logging.level, "debug");
        assert_eq!(
            loaded.source,
            ConfigSource::File(home.path().join("config.toml"))
        );
    }

    #[test]
    fn test_falls_back_to_defaults() {
        let workspace = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let loaded = load(None, Some(workspace.path()), Some(home.path())).unwrap();
        assert_eq!(loaded.source, ConfigSource::Defaults);
        assert_eq!(loaded.config, Config::default());
        assert_eq!(loaded.source.to_string(), "<embedded defaults>");
    }

    #[test]
    fn test_invalid_discovered_file_is_an_error() {
        let workspace = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(
            workspace.path().join(WORKSPACE_CONFIG_FILE),
            "[logging]\nformat = \"xml\"\n",
        )
        .unwrap();
        let result = load(None, Some(workspace.path()), Some(home.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
