//! Configuration loading: embedded defaults plus a user overlay.
//!
//! The embedded `config.default.toml` always parses (it ships with the
//! binary); the user file is optional and may be broken — any problem
//! reading or parsing it falls back to the defaults, because a
//! misconfigured gate must still gate. User lists extend the defaults,
//! scalars override them.

use serde::Deserialize;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Environment variable overriding the user config path.
pub const CONFIG_PATH_ENV: &str = "HALL_PASS_CONFIG";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CommandsConfig {
    /// User additions to the built-in safelist.
    #[serde(default)]
    pub safe: Vec<String>,
    /// User additions to the DB-client set.
    #[serde(default)]
    pub db_clients: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub protected_branches: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PathsConfig {
    #[serde(default)]
    pub protected: Vec<String>,
    #[serde(default)]
    pub read_only: Vec<String>,
    #[serde(default)]
    pub no_delete: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Empty means the default location under `~/.local/share/hall-pass`.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct DebugConfig {
    #[serde(default)]
    pub enabled: bool,
}

// ── User overlay: every field optional so absence is distinguishable ──

#[derive(Debug, Deserialize, Default)]
struct UserConfig {
    #[serde(default)]
    commands: UserCommands,
    #[serde(default)]
    git: UserGit,
    #[serde(default)]
    paths: UserPaths,
    #[serde(default)]
    audit: UserAudit,
    #[serde(default)]
    debug: UserDebug,
}

#[derive(Debug, Deserialize, Default)]
struct UserCommands {
    #[serde(default)]
    safe: Vec<String>,
    #[serde(default)]
    db_clients: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UserGit {
    #[serde(default)]
    protected_branches: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UserPaths {
    #[serde(default)]
    protected: Vec<String>,
    #[serde(default)]
    read_only: Vec<String>,
    #[serde(default)]
    no_delete: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UserAudit {
    enabled: Option<bool>,
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct UserDebug {
    enabled: Option<bool>,
}

/// Append user items not already present.
fn extend_list(base: &mut Vec<String>, additions: Vec<String>) {
    for item in additions {
        if !base.contains(&item) {
            base.push(item);
        }
    }
}

impl Config {
    /// The embedded defaults alone.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Defaults merged with the user file, if one exists and parses.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(user) = Self::load_user() {
            config.apply(user);
        }
        config
    }

    fn user_config_path() -> Option<std::path::PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(std::path::PathBuf::from(path));
        }
        let home = std::env::var_os("HOME")?;
        Some(std::path::Path::new(&home).join(".config/hall-pass/config.toml"))
    }

    fn load_user() -> Option<UserConfig> {
        let path = Self::user_config_path()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(user) => Some(user),
            Err(e) => {
                eprintln!("hall-pass: ignoring malformed config {}: {e}", path.display());
                None
            }
        }
    }

    fn apply(&mut self, user: UserConfig) {
        extend_list(&mut self.commands.safe, user.commands.safe);
        extend_list(&mut self.commands.db_clients, user.commands.db_clients);
        extend_list(&mut self.git.protected_branches, user.git.protected_branches);
        extend_list(&mut self.paths.protected, user.paths.protected);
        extend_list(&mut self.paths.read_only, user.paths.read_only);
        extend_list(&mut self.paths.no_delete, user.paths.no_delete);
        if let Some(enabled) = user.audit.enabled {
            self.audit.enabled = enabled;
        }
        if let Some(path) = user.audit.path {
            self.audit.path = path;
        }
        if let Some(enabled) = user.debug.enabled {
            self.debug.enabled = enabled;
        }
    }

    #[cfg(test)]
    fn apply_str(&mut self, toml_str: &str) {
        let user: UserConfig = toml::from_str(toml_str).unwrap();
        self.apply(user);
    }
}
