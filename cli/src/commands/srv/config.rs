//! # Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Produces the effective `ServerConfig` for `folio srv` from two inputs:
//! 1. Command-line arguments (highest priority)
//! 2. The `[server]` section of the loaded configuration (see `core::config`)
//!
//! ## Architecture
//!
//! 1. Start from the `[server]` settings
//! 2. Apply each CLI argument that was passed, even one equal to the default
//! 3. Resolve the site directory to an absolute, canonical path
//!
//! ## Examples
//!
//! ```toml
//! # .folio.toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! site_dir = "dist/public"
//! ```
//!
//! ```bash
//! # Port 9000 wins over the file's 8080; host and site_dir come from the file.
//! folio srv --port 9000
//! ```
//!
use crate::core::config::ServerSettings;
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;

/// # Server Command Arguments (`SrvArgs`)
///
/// Arguments for `folio srv`. Options that are not passed defer to the
/// configuration file, whose own defaults are port 5000 on `127.0.0.1`.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SrvArgs {
    /// Port to listen on. The next free port is tried if it is taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Address to bind. `0.0.0.0` listens on all interfaces.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Directory of the built static site, served for all non-API paths.
    #[arg(long, value_name = "DIR")]
    pub site: Option<PathBuf>,

    /// Disable the permissive CORS headers.
    #[arg(long)]
    pub no_cors: bool,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// Settings the server runs with after merging arguments over the
/// configuration file. `site_dir`, when present, is canonical and known to
/// be a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub site_dir: Option<PathBuf>,
    pub enable_cors: bool,
}

/// # Resolve Server Configuration (`resolve_server_config`)
///
/// Merges `args` over `settings` and validates the site directory.
///
/// ## Arguments
///
/// * `args`: Parsed `folio srv` arguments.
/// * `settings`: The `[server]` section of the effective configuration.
///
/// ## Returns
///
/// * `Result<ServerConfig>`: The merged configuration, or an error if the
///   configured host is not an IP address or the site directory is unusable.
pub async fn resolve_server_config(args: &SrvArgs, settings: &ServerSettings) -> Result<ServerConfig> {
    let mut config = ServerConfig::from_settings(settings)?;

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(site) = &args.site {
        config.site_dir = Some(site.clone());
    }
    if args.no_cors {
        config.enable_cors = false;
    }

    if let Some(dir) = config.site_dir.take() {
        config.site_dir = Some(resolve_site_dir(dir).await?);
    }
    debug!("Effective server config: {:?}", config);
    Ok(config)
}

impl ServerConfig {
    fn from_settings(settings: &ServerSettings) -> Result<Self> {
        let host = settings.host.parse::<IpAddr>().map_err(|e| {
            anyhow!(FolioError::Config(format!(
                "Invalid server host '{}': {}",
                settings.host, e
            )))
        })?;
        Ok(Self {
            host,
            port: settings.port,
            site_dir: settings.site_dir.as_ref().map(PathBuf::from),
            enable_cors: settings.enable_cors,
        })
    }
}

/// Makes `dir` absolute and canonical, failing unless it is an existing directory.
async fn resolve_site_dir(dir: PathBuf) -> Result<PathBuf> {
    let absolute = if dir.is_absolute() {
        dir
    } else {
        env::current_dir()
            .context("Failed to get current working directory")?
            .join(dir)
    };

    let canonical = tokio::fs::canonicalize(&absolute).await.map_err(|e| {
        anyhow!(FolioError::FileSystem(format!(
            "Site directory '{}' could not be found or accessed: {}",
            absolute.display(),
            e
        )))
    })?;
    let metadata = tokio::fs::metadata(&canonical)
        .await
        .with_context(|| format!("Failed to get metadata for '{}'", canonical.display()))?;
    if !metadata.is_dir() {
        return Err(anyhow!(FolioError::FileSystem(format!(
            "Site path is not a directory: {}",
            canonical.display()
        ))));
    }
    debug!("Resolved site directory to: {}", canonical.display());
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn default_args() -> SrvArgs {
        SrvArgs::parse_from([""])
    }

    #[tokio::test]
    async fn test_no_args_gives_settings_defaults() -> Result<()> {
        let args = default_args();
        assert_eq!(args.port, None);
        assert_eq!(args.host, None);
        assert!(args.site.is_none());
        assert!(!args.no_cors);

        let config = resolve_server_config(&args, &ServerSettings::default()).await?;
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(())
    }

    #[tokio::test]
    async fn test_settings_used_when_args_default() -> Result<()> {
        let settings = ServerSettings {
            host: "0.0.0.0".into(),
            port: 8080,
            site_dir: None,
            enable_cors: true,
        };
        let config = resolve_server_config(&default_args(), &settings).await?;
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.port, 8080);
        assert!(config.enable_cors);
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_args_override_settings() -> Result<()> {
        let settings = ServerSettings {
            port: 8080,
            ..ServerSettings::default()
        };
        let args = SrvArgs::parse_from(["", "--port", "9000", "--host", "0.0.0.0", "--no-cors"]);
        let config = resolve_server_config(&args, &settings).await?;
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(!config.enable_cors);
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_default_values_override_settings() -> Result<()> {
        let settings = ServerSettings {
            host: "0.0.0.0".into(),
            port: 8080,
            ..ServerSettings::default()
        };
        let args = SrvArgs::parse_from(["", "--port", "5000", "--host", "127.0.0.1"]);
        let config = resolve_server_config(&args, &settings).await?;
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(())
    }

    #[tokio::test]
    async fn test_site_dir_is_canonicalized() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let args = SrvArgs {
            site: Some(temp_dir.path().to_path_buf()),
            ..default_args()
        };
        let config = resolve_server_config(&args, &ServerSettings::default()).await?;
        assert_eq!(
            config.site_dir,
            Some(std::fs::canonicalize(temp_dir.path())?)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_site_dir_fails() {
        let settings = ServerSettings {
            site_dir: Some("/path/that/definitely/does/not/exist".into()),
            ..ServerSettings::default()
        };
        let result = resolve_server_config(&default_args(), &settings).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("could not be found or accessed"));
    }

    #[tokio::test]
    async fn test_site_path_that_is_a_file_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("index.html");
        std::fs::write(&file, "<html></html>")?;
        let args = SrvArgs {
            site: Some(file),
            ..default_args()
        };
        let result = resolve_server_config(&args, &ServerSettings::default()).await;
        assert!(result.unwrap_err().to_string().contains("not a directory"));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_settings_host_fails() {
        let settings = ServerSettings {
            host: "localhost".into(),
            ..ServerSettings::default()
        };
        assert!(resolve_server_config(&default_args(), &settings).await.is_err());
    }
}
