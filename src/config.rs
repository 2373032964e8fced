//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <path>`, else `$XDG_CONFIG_HOME/brig/config`,
//!    else `~/.config/brig.gs`
//! 3. Environment variables: `BRIG_*` prefix
//! 4. Command-line flags

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};

/// Base URL used when no layer sets one.
pub const DEFAULT_BASE_URL: &str = "http://brig.gs";

/// Prefix of recognized environment variables (`BRIG_API_TOKEN`, ...).
pub const ENV_PREFIX: &str = "BRIG";

const LEGACY_CONFIG_FILE: &str = "brig.gs";

const KEY_API_TOKEN: &str = "api_token";
const KEY_BASE_URL: &str = "base_url";
const KEY_TIMEOUT: &str = "timeout";

/// Effective client configuration, resolved once per invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Sent verbatim in the `Authorization` header
    pub api_token: String,
    /// Root of the shortener service, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds (`None` keeps the transport default)
    #[serde(rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Values contributed by a single layer; `None` means "not specified here".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl RawSettings {
    /// Read recognized keys from a built `Config`, accepting both
    /// `api_token` and `API_TOKEN` spellings.
    fn from_config(config: &Config, origin: &str) -> ApplicationResult<Self> {
        let timeout_secs = match lookup(config, KEY_TIMEOUT) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ApplicationError::config(format!("{origin}: invalid timeout '{raw}': {e}"))
            })?),
            None => None,
        };
        Ok(Self {
            api_token: lookup(config, KEY_API_TOKEN),
            base_url: lookup(config, KEY_BASE_URL),
            timeout_secs,
        })
    }
}

fn is_known_key(key: &str) -> bool {
    [KEY_API_TOKEN, KEY_BASE_URL, KEY_TIMEOUT]
        .iter()
        .any(|known| known.eq_ignore_ascii_case(key))
}

fn lookup(config: &Config, key: &str) -> Option<String> {
    config
        .get_string(key)
        .or_else(|_| config.get_string(&key.to_uppercase()))
        .ok()
}

/// Get the XDG config directory for brig.
fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "brig").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the XDG config file.
fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config"))
}

/// Path used by earlier brig releases: `~/.config/brig.gs`.
fn legacy_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".config").join(LEGACY_CONFIG_FILE))
}

/// Config file used when `--config` is not given.
///
/// The XDG file wins; `~/.config/brig.gs` is only picked when it exists and
/// the XDG file does not.
pub fn default_config_path() -> Option<PathBuf> {
    pick_default_path(global_config_path(), legacy_config_path())
}

fn pick_default_path(xdg: Option<PathBuf>, legacy: Option<PathBuf>) -> Option<PathBuf> {
    match (xdg, legacy) {
        (Some(xdg), _) if xdg.is_file() => Some(xdg),
        (_, Some(legacy)) if legacy.is_file() => {
            debug!("using legacy config file {}", legacy.display());
            Some(legacy)
        }
        (xdg, legacy) => xdg.or(legacy),
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(raw.as_ref())
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(raw.as_ref()).into_owned());
    PathBuf::from(expanded)
}

/// Pick the parser from the file extension.
///
/// `None` means plain `KEY=value` lines, read by [`parse_key_value`].
fn file_format(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Some(FileFormat::Yaml),
        Some("toml") => Some(FileFormat::Toml),
        Some("json") => Some(FileFormat::Json),
        _ => None,
    }
}

/// Parse `KEY=value` lines.
///
/// Lines are trimmed, blank lines and `#` comments skipped. Everything after
/// the first `=` is the value, unchanged: no quoting, escapes or inline comments.
fn parse_key_value(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match line.split_once('=') {
            Some((key, value)) => Some((key.trim().to_string(), value.to_string())),
            None => {
                debug!("ignoring config line without '='");
                None
            }
        })
        .collect()
}

/// Environment source for `BRIG_*` variables.
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).prefix_separator("_")
}

fn load_file(path: &Path) -> ApplicationResult<RawSettings> {
    let builder = match file_format(path) {
        Some(format) => {
            Config::builder().add_source(File::from(path).format(format).required(true))
        }
        None => {
            let content = fs::read_to_string(path).map_err(|e| {
                ApplicationError::config(format!("load {}: {e}", path.display()))
            })?;
            parse_key_value(&content)
                .into_iter()
                .filter(|(key, _)| is_known_key(key))
                .try_fold(Config::builder(), |builder, (key, value)| {
                    builder.set_override(key, value)
                })
                .map_err(|e| config_err(&format!("load {}", path.display()), e))?
        }
    };
    let config = builder
        .build()
        .map_err(|e| config_err(&format!("load {}", path.display()), e))?;
    RawSettings::from_config(&config, &path.display().to_string())
}

fn load_env(env: Environment) -> ApplicationResult<RawSettings> {
    let config = Config::builder()
        .add_source(env)
        .build()
        .map_err(|e| config_err("read environment", e))?;
    RawSettings::from_config(&config, "environment")
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn apply(self, overlay: &RawSettings) -> Self {
        Self {
            api_token: overlay.api_token.clone().unwrap_or(self.api_token),
            base_url: overlay.base_url.clone().unwrap_or(self.base_url),
            timeout_secs: overlay.timeout_secs.or(self.timeout_secs),
        }
    }

    fn normalize(mut self) -> Self {
        self.api_token = self.api_token.trim().to_string();
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Load settings from the real environment.
    ///
    /// `config_path` replaces the default config file location; `flags` are
    /// the command-line overrides.
    pub fn load(config_path: Option<&Path>, flags: &RawSettings) -> ApplicationResult<Self> {
        Self::resolve(config_path, env_source(), flags)
    }

    /// Resolve settings from explicit sources. Used directly by tests to inject
    /// the environment.
    pub fn resolve(
        config_path: Option<&Path>,
        env: Environment,
        flags: &RawSettings,
    ) -> ApplicationResult<Self> {
        let mut current = Self::default();

        let path = match config_path {
            Some(p) => Some(expand_path(p)),
            None => default_config_path(),
        };
        match path {
            Some(path) if path.is_file() => {
                debug!("loading config file {}", path.display());
                current = current.apply(&load_file(&path)?);
            }
            Some(path) if config_path.is_some() => {
                warn!("config file not found: {}", path.display());
            }
            Some(path) => debug!("no config file at {}", path.display()),
            None => debug!("no config directory available"),
        }

        current = current.apply(&load_env(env)?);
        current = current.apply(flags);

        Ok(current.normalize())
    }

    /// Fail fast when a value every operation needs is missing.
    pub fn ensure_ready(&self) -> ApplicationResult<()> {
        if self.api_token.trim().is_empty() {
            return Err(ApplicationError::config("no API token set"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ApplicationError::config("no base URL set"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Show the effective configuration as TOML, token masked.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        let shown = Self {
            api_token: mask_token(&self.api_token),
            ..self.clone()
        };
        toml::to_string_pretty(&shown)
            .map_err(|e| ApplicationError::config(format!("serialize config: {e}")))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# brig configuration
#
# Precedence (lowest to highest):
#   this file  <  BRIG_* environment variables  <  command-line flags
#
# Keys may be written in lower or upper case (api_token or API_TOKEN).

# Token sent verbatim in the Authorization header
# API_TOKEN=

# Root URL of the shortener service
# BASE_URL={DEFAULT_BASE_URL}

# Request timeout in seconds (default: transport default)
# TIMEOUT=30
"#
        )
    }
}

/// Keep the last four characters of a token visible.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

fn config_err(action: &str, e: ConfigError) -> ApplicationError {
    ApplicationError::config(format!("{action}: {e}"))
}
