//! Configuration file management for pei.
//!
//! Provides a TOML-based config file at `~/.config/pei/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pei_core::simulator::SimulatorSettings;

/// Env var overriding the generation strategy.
pub const GENERATOR_ENV: &str = "PEI_GENERATOR";
/// Env var overriding the log filter (after `RUST_LOG`).
pub const LOG_ENV: &str = "PEI_LOG";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub generation: GenerationSection,
    pub ui: UiSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    /// Registered strategy name.
    pub generator: String,
    pub tick_interval_ms: u64,
    pub progress_step: u8,
    pub completion_delay_ms: u64,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            generator: "template".to_string(),
            tick_interval_ms: SimulatorSettings::DEFAULT_TICK_INTERVAL.as_millis() as u64,
            progress_step: SimulatorSettings::DEFAULT_PROGRESS_STEP,
            completion_delay_ms: SimulatorSettings::DEFAULT_COMPLETION_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// How often the TUI redraws when no key is pressed.
    pub tick_rate_ms: u64,
    /// Start the dashboard with demonstration entries.
    pub seed_dashboard: bool,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            seed_dashboard: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the pei config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/pei` or `~/.config/pei`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("pei");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pei")
}

/// Return the path to the pei config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where the TUI writes its log while it owns the terminal.
pub fn log_path() -> PathBuf {
    config_dir().join("pei.log")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. Returns an error if it does not exist.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct PeiConfig {
    pub generator: String,
    pub simulator: SimulatorSettings,
    pub tick_rate: Duration,
    pub seed_dashboard: bool,
    pub log_filter: String,
}

impl PeiConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Generator: `cli_generator` > `PEI_GENERATOR` env > `generation.generator` > `"template"`
    /// - Log filter: `PEI_LOG` env > `log.filter` > `"info"` (`RUST_LOG` still wins at subscriber init)
    ///
    /// A missing config file means defaults; a malformed one is an error.
    pub fn resolve(cli_generator: Option<&str>) -> Result<Self> {
        let path = config_path();
        let file = if path.exists() {
            load_config_from(&path)?
        } else {
            ConfigFile::default()
        };
        Ok(Self::from_file(cli_generator, file))
    }

    pub fn from_file(cli_generator: Option<&str>, file: ConfigFile) -> Self {
        let generator = if let Some(name) = cli_generator {
            name.to_string()
        } else if let Ok(name) = std::env::var(GENERATOR_ENV) {
            name
        } else {
            file.generation.generator
        };

        let log_filter = std::env::var(LOG_ENV).unwrap_or(file.log.filter);

        Self {
            generator,
            simulator: SimulatorSettings {
                tick_interval: Duration::from_millis(file.generation.tick_interval_ms),
                progress_step: file.generation.progress_step,
                completion_delay: Duration::from_millis(file.generation.completion_delay_ms),
            },
            tick_rate: Duration::from_millis(file.ui.tick_rate_ms.max(1)),
            seed_dashboard: file.ui.seed_dashboard,
            log_filter,
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    #[test]
    fn defaults_match_simulator_defaults() {
        let _lock = lock_env();
        unsafe { std::env::remove_var(GENERATOR_ENV) };
        unsafe { std::env::remove_var(LOG_ENV) };

        let config = PeiConfig::from_file(None, ConfigFile::default());
        assert_eq!(config.generator, "template");
        assert_eq!(config.simulator, SimulatorSettings::default());
        assert_eq!(config.tick_rate, Duration::from_millis(100));
        assert!(config.seed_dashboard);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("pei").join("config.toml");

        let mut saved = ConfigFile::default();
        saved.generation.progress_step = 25;
        saved.ui.seed_dashboard = false;
        save_config_to(&saved, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        save_config_to(&ConfigFile::default(), &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            [generation]
            tick_interval_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(file.generation.tick_interval_ms, 50);
        assert_eq!(file.generation.generator, "template");
        assert_eq!(file.generation.progress_step, 15);
        assert_eq!(file.ui, UiSection::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[generation\nprogress_step = ").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(
            format!("{err:#}").contains("failed to parse config file"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        unsafe { std::env::set_var(GENERATOR_ENV, "from-env") };

        let mut file = ConfigFile::default();
        file.generation.generator = "from-file".to_string();
        let config = PeiConfig::from_file(Some("from-cli"), file);
        assert_eq!(config.generator, "from-cli");

        unsafe { std::env::remove_var(GENERATOR_ENV) };
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        unsafe { std::env::set_var(GENERATOR_ENV, "from-env") };
        unsafe { std::env::set_var(LOG_ENV, "pei_core=debug") };

        let mut file = ConfigFile::default();
        file.generation.generator = "from-file".to_string();
        let config = PeiConfig::from_file(None, file);
        assert_eq!(config.generator, "from-env");
        assert_eq!(config.log_filter, "pei_core=debug");

        unsafe { std::env::remove_var(GENERATOR_ENV) };
        unsafe { std::env::remove_var(LOG_ENV) };
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let _lock = lock_env();
        unsafe { std::env::remove_var(GENERATOR_ENV) };
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let result = PeiConfig::resolve(None);

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        let config = result.unwrap();
        assert_eq!(config.generator, "template");
    }

    #[test]
    fn resolve_reads_saved_config_from_config_dir() {
        let _lock = lock_env();
        unsafe { std::env::remove_var(GENERATOR_ENV) };
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let mut file = ConfigFile::default();
        file.generation.progress_step = 40;
        file.ui.seed_dashboard = false;
        let saved = save_config(&file);
        let result = PeiConfig::resolve(None);

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        saved.unwrap();
        assert!(tmp.path().join("pei").join("config.toml").exists());
        let config = result.unwrap();
        assert_eq!(config.simulator.progress_step, 40);
        assert!(!config.seed_dashboard);
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("pei/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
