//! TOML configuration for gcdctl.
//!
//! Layered lookup: an explicit `--config` path, then the `GCDCTL_CONFIG`
//! environment variable, then `/etc/gcdctl/gcdctl.toml`, then compiled-in
//! defaults. Every section and field is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "GCDCTL_CONFIG";

/// Standard system location of the configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/gcdctl/gcdctl.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the gcdctl process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GcdctlConfig {
    pub utility: UtilityConfig,
    pub launcher: LauncherConfig,
    pub logging: LoggingConfig,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// An optional configuration file that was found but could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConfig {
    pub path: PathBuf,
    pub error: String,
}

/// Result of configuration lookup.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: GcdctlConfig,
    pub source: ConfigSource,
    /// Files passed over on the way to `source`, in lookup order. Lookup runs
    /// before logging is initialised, so the caller reports these.
    pub skipped: Vec<SkippedConfig>,
}

impl ResolvedConfig {
    /// Emit a warning for every skipped file.
    pub fn log_skipped(&self) {
        for skipped in &self.skipped {
            warn!(
                path = %skipped.path.display(),
                error = skipped.error.as_str(),
                "config file could not be loaded, skipped"
            );
        }
    }
}

impl GcdctlConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded gcdctl configuration");
        Ok(config)
    }

    /// Load from `explicit` when given (failing hard if it cannot be read),
    /// otherwise fall back through the environment and system locations.
    pub fn resolve(explicit: Option<&Path>) -> Result<ResolvedConfig> {
        match explicit {
            Some(path) => Ok(ResolvedConfig {
                config: Self::load(path)?,
                source: ConfigSource::File(path.to_path_buf()),
                skipped: Vec::new(),
            }),
            None => Ok(Self::load_or_default()),
        }
    }

    /// Try to load configuration from, in order:
    /// 1. The path specified by the `GCDCTL_CONFIG` environment variable.
    /// 2. `/etc/gcdctl/gcdctl.toml`.
    /// 3. Fall back to compiled-in defaults.
    pub fn load_or_default() -> ResolvedConfig {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_first(env_path, Path::new(SYSTEM_CONFIG_PATH))
    }

    /// Load `env_path` if given, then `system_path` if it exists, else defaults.
    fn load_first(env_path: Option<PathBuf>, system_path: &Path) -> ResolvedConfig {
        let mut skipped = Vec::new();

        let candidates = env_path
            .into_iter()
            .chain(system_path.exists().then(|| system_path.to_path_buf()));
        for path in candidates {
            match Self::load(&path) {
                Ok(config) => {
                    return ResolvedConfig {
                        config,
                        source: ConfigSource::File(path),
                        skipped,
                    }
                }
                Err(e) => skipped.push(SkippedConfig {
                    path,
                    error: format!("{e:#}"),
                }),
            }
        }

        debug!("no config file found, using compiled-in defaults");
        ResolvedConfig {
            config: Self::default(),
            source: ConfigSource::Defaults,
            skipped,
        }
    }
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Settings for driving DFHRMUTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityConfig {
    /// Maximum number of DFHRMUTL runs per operation.
    pub retry_attempts: u32,
    /// Record length of the SYSPRINT capture dataset.
    pub sysprint_record_length: u32,
    /// High-level qualifier for generated SYSPRINT capture dataset names.
    pub capture_hlq: String,
}

impl UtilityConfig {
    /// Attempts actually made; a configured zero still runs once.
    pub fn attempts(&self) -> u32 {
        self.retry_attempts.max(1)
    }
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 10,
            sysprint_record_length: 133,
            capture_hlq: "GCDCTL".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Launcher
// ---------------------------------------------------------------------------

/// The external launcher that runs batch programs on this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Path (or bare command name resolved via `$PATH`) to the launcher.
    pub program: String,
    /// Scratch directory for SYSIN staging and SYSPRINT captures.
    pub work_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            program: "mvscmd".to_string(),
            work_dir: std::env::temp_dir().join("gcdctl"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log output settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Emit JSON log lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = GcdctlConfig::default();

        assert_eq!(cfg.utility.retry_attempts, 10);
        assert_eq!(cfg.utility.sysprint_record_length, 133);
        assert_eq!(cfg.utility.capture_hlq, "GCDCTL");

        assert_eq!(cfg.launcher.program, "mvscmd");
        assert!(cfg.launcher.work_dir.ends_with("gcdctl"));

        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: GcdctlConfig = toml::from_str(
            r#"
            [utility]
            retry_attempts = 3

            [launcher]
            program = "/usr/lpp/IBM/zoautil/bin/mvscmd"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.utility.retry_attempts, 3);
        assert_eq!(cfg.utility.sysprint_record_length, 133);
        assert_eq!(cfg.launcher.program, "/usr/lpp/IBM/zoautil/bin/mvscmd");
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn test_zero_attempts_still_runs_once() {
        let cfg = UtilityConfig {
            retry_attempts: 0,
            ..UtilityConfig::default()
        };
        assert_eq!(cfg.attempts(), 1);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(GcdctlConfig::resolve(Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gcdctl.toml");
        std::fs::write(&path, "[logging]\njson = true\n").unwrap();

        let resolved = GcdctlConfig::resolve(Some(&path)).unwrap();
        assert!(resolved.config.logging.json);
        assert_eq!(resolved.source, ConfigSource::File(path));
        assert!(resolved.skipped.is_empty());
    }

    #[test]
    fn test_malformed_env_file_is_skipped_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[utility\nretry_attempts = ").unwrap();
        let system = dir.path().join("gcdctl.toml");
        std::fs::write(&system, "[utility]\nretry_attempts = 4\n").unwrap();

        let resolved = GcdctlConfig::load_first(Some(broken.clone()), &system);

        assert_eq!(resolved.config.utility.retry_attempts, 4);
        assert_eq!(resolved.source, ConfigSource::File(system));
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.skipped[0].path, broken);
        assert!(resolved.skipped[0].error.contains("failed to parse config file"));
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing_env = dir.path().join("missing.toml");
        let missing_system = dir.path().join("etc-gcdctl.toml");

        let resolved = GcdctlConfig::load_first(Some(missing_env.clone()), &missing_system);

        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert_eq!(resolved.config.utility, UtilityConfig::default());
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.skipped[0].path, missing_env);
    }
}
