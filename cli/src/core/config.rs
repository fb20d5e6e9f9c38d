//! # folio Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, and validates folio's configuration. It supports
//! a multi-level approach that combines defaults, user settings, project
//! overrides and a couple of environment variables.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence, highest first):
//! 1. Environment overrides (`FOLIO_KNOWLEDGE_FILE`, `FOLIO_SITE_DIR`)
//! 2. An explicit `--config <path>` file (replaces 3 and 4 entirely)
//! 3. Project-specific `.folio.toml` in the current directory or ancestors
//! 4. User-specific `<config dir>/folio/config.toml`
//! 5. Default values defined in the code
//!
//! Files are merged key by key: any key the project file sets wins, even when
//! it sets the default value. Relative paths inside a file are resolved
//! against that file's directory, so a `.folio.toml` found in an ancestor
//! works from any subdirectory. Environment overrides stay relative to the
//! current directory.
//!
//! Command-line flags of individual commands (e.g. `folio srv --port`) are
//! merged on top of this by the command itself.
//!
//! ## Examples
//!
//! ```toml
//! [knowledge]
//! file = "~/portfolio/knowledge.toml"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! site_dir = "dist/public"
//!
//! [llm]
//! enabled = true
//! api_key_env = "PERPLEXITY_API_KEY"
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! let port = cfg.server.port;
//! ```
//!
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the project configuration file searched for upwards from the
/// current directory.
const PROJECT_CONFIG_FILENAME: &str = ".folio.toml";

/// Environment variable overriding `[knowledge] file`.
pub const ENV_KNOWLEDGE_FILE: &str = "FOLIO_KNOWLEDGE_FILE";
/// Environment variable overriding `[server] site_dir`.
pub const ENV_SITE_DIR: &str = "FOLIO_SITE_DIR";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Where the owner profile comes from.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// TOML file holding the knowledge base (can use ~). The built-in
    /// profile is used when unset.
    pub file: Option<String>,
}

/// Defaults for `folio srv`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    /// IP address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the built site to serve (can use ~). API only when unset.
    #[serde(default)]
    pub site_dir: Option<String>,
    /// Send permissive CORS headers.
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

/// Settings for the optional chat-completions relay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in a config file.
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub presence_penalty: f32,
    #[serde(default = "default_llm_frequency_penalty")]
    pub frequency_penalty: f32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_enable_cors() -> bool {
    true
}
fn default_llm_endpoint() -> String {
    "https://api.perplexity.ai/chat/completions".to_string()
}
fn default_llm_model() -> String {
    "llama-3.1-sonar-small-128k-online".to_string()
}
fn default_llm_api_key_env() -> String {
    "PERPLEXITY_API_KEY".to_string()
}
fn default_llm_temperature() -> f32 {
    0.2
}
fn default_llm_max_tokens() -> u32 {
    250
}
fn default_llm_top_p() -> f32 {
    0.9
}
fn default_llm_frequency_penalty() -> f32 {
    1.0
}
fn default_llm_timeout_secs() -> u64 {
    20
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_dir: None,
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key_env: default_llm_api_key_env(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            top_p: default_llm_top_p(),
            presence_penalty: 0.0,
            frequency_penalty: default_llm_frequency_penalty(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Loads the effective configuration.
///
/// With `explicit` set, only that file is read (it must exist). Otherwise the
/// user and project files are merged key by key. Environment overrides, path
/// expansion and validation are applied in both cases.
///
/// Relative `knowledge.file` and `server.site_dir` values in a file are
/// resolved against the directory holding that file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)?
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<toml::Table>> {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "folio", "folio") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_table(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<toml::Table>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_table(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.folio.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for `.folio.toml`.
/// The search stops at the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let table = load_config_table(path)?;
    config_from_table(table)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// # Load Config Table (`load_config_table`)
///
/// Reads one configuration file as a raw TOML table, keeping only the keys
/// the file actually sets.
///
/// ## Process
///
/// 1. Read the file.
/// 2. Deserialize it into `Config` once, so unknown keys and wrong types are
///    reported against this file.
/// 3. Re-parse it as a table and rebase its relative paths onto the file's
///    directory.
///
/// ## Errors
///
/// Fails if the file cannot be read or is not a valid folio configuration.
fn load_config_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    let mut table: toml::Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    if let Some(base) = path.parent() {
        rebase_relative_paths(&mut table, base);
    }
    Ok(table)
}

/// Keys holding filesystem paths, as `(section, key)`.
const PATH_KEYS: [(&str, &str); 2] = [("knowledge", "file"), ("server", "site_dir")];

/// Joins relative path values onto `base`. `~` paths are expanded first and
/// are therefore left alone.
fn rebase_relative_paths(table: &mut toml::Table, base: &Path) {
    for (section, key) in PATH_KEYS {
        let Some(toml::Value::String(value)) = table
            .get_mut(section)
            .and_then(|section| section.get_mut(key))
        else {
            continue;
        };
        let expanded = shellexpand::tilde(value.as_str()).into_owned();
        let candidate = Path::new(&expanded);
        if candidate.is_relative() {
            *value = base.join(candidate).to_string_lossy().into_owned();
            debug!("Resolved {}.{} against {}: {}", section, key, base.display(), value);
        }
    }
}

fn config_from_table(table: toml::Table) -> Result<Config> {
    Ok(toml::Value::Table(table).try_into::<Config>()?)
}

/// Overlays `overlay` onto `base`. Nested tables merge recursively, any
/// other value set in `overlay` replaces the one in `base`.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(nested) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, nested),
                _ => {
                    base.insert(key, toml::Value::Table(nested));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Every key the project file sets wins over the user file, including keys
/// set back to their default value.
fn merge_configs(user: toml::Table, project: Option<toml::Table>) -> Result<Config> {
    let mut merged = user;
    if let Some(project) = project {
        merge_tables(&mut merged, project);
    }
    config_from_table(merged).context("Failed to combine user and project configuration")
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(file) = lookup(ENV_KNOWLEDGE_FILE).filter(|v| !v.is_empty()) {
        debug!("{} overrides knowledge file: {}", ENV_KNOWLEDGE_FILE, file);
        config.knowledge.file = Some(file);
    }
    if let Some(dir) = lookup(ENV_SITE_DIR).filter(|v| !v.is_empty()) {
        debug!("{} overrides site directory: {}", ENV_SITE_DIR, dir);
        config.server.site_dir = Some(dir);
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(file) = config.knowledge.file.as_mut() {
        *file = shellexpand::tilde(file).into_owned();
        debug!("Expanded knowledge file path: {}", file);
    }
    if let Some(dir) = config.server.site_dir.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded site directory: {}", dir);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    if let Some(file) = &config.knowledge.file {
        let path = PathBuf::from(file);
        if !path.is_file() {
            return Err(anyhow!(FolioError::Config(format!(
                "Knowledge file '{}' does not exist or is not a file.",
                path.display()
            ))));
        }
    }
    if let Some(dir) = &config.server.site_dir {
        let path = PathBuf::from(dir);
        if !path.exists() {
            warn!("Configured site directory '{}' does not exist.", path.display());
        } else if !path.is_dir() {
            return Err(anyhow!(FolioError::Config(format!(
                "Configured site path '{}' exists but is not a directory.",
                path.display()
            ))));
        }
    }
    if config.server.host.parse::<std::net::IpAddr>().is_err() {
        return Err(anyhow!(FolioError::Config(format!(
            "Invalid server host '{}'. Expected an IP address.",
            config.server.host
        ))));
    }
    let llm = &config.llm;
    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(anyhow!(FolioError::Config(format!(
            "LLM temperature {} is outside 0.0..=2.0.",
            llm.temperature
        ))));
    }
    if llm.max_tokens == 0 {
        return Err(anyhow!(FolioError::Config(
            "LLM max_tokens must be greater than zero.".to_string()
        )));
    }
    if llm.enabled && !llm.endpoint.starts_with("http") {
        return Err(anyhow!(FolioError::Config(format!(
            "LLM endpoint '{}' is not an http(s) URL.",
            llm.endpoint
        ))));
    }
    debug!("Configuration validation successful.");
    Ok(())
}
