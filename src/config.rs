use crate::env::UnknownVariablePolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MINI_SHELL_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub shell: ShellSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShellSettings {
    pub prompt: String,
    pub unknown_variables: UnknownVariablePolicy,
    /// Where line-editor history is persisted. Falls back to the user data dir.
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// A `tracing_subscriber::EnvFilter` directive, e.g. `warn` or `mini_shell=debug`.
    pub level: String,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    #[serde(default)]
    shell: ShellOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ShellOverlay {
    prompt: Option<String>,
    unknown_variables: Option<UnknownVariablePolicy>,
    history_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LoggingOverlay {
    level: Option<String>,
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the user file: `path` if given, else `$MINI_SHELL_CONFIG`,
    ///    else `<config dir>/mini_shell/config.toml` when it exists.
    ///
    /// An explicitly named file must exist; the discovered one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default_config();
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let user_file = match explicit {
            Some(p) => Some(p),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(file) = user_file {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("can't read config {}", file.display()))?;
            config
                .merge_str(&content)
                .with_context(|| format!("invalid config {}", file.display()))?;
        }
        Ok(config)
    }

    /// Merge a TOML overlay on top of this config. Scalars override.
    pub fn merge_str(&mut self, content: &str) -> Result<()> {
        let overlay: ConfigOverlay = toml::from_str(content)?;
        self.apply_overlay(overlay);
        Ok(())
    }

    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let shell = overlay.shell;
        if let Some(prompt) = shell.prompt {
            self.shell.prompt = prompt;
        }
        if let Some(policy) = shell.unknown_variables {
            self.shell.unknown_variables = policy;
        }
        if let Some(history) = shell.history_file {
            self.shell.history_file = Some(history);
        }
        if let Some(level) = overlay.logging.level {
            self.logging.level = level;
        }
    }

    /// History file to load and save, if any location is known.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.shell
            .history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("mini_shell").join("history.txt")))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mini_shell").join("config.toml"))
}
