use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_SERVER_ENV: &str = "SPLICECTL_API_SERVER";
pub const CA_CERT_ENV: &str = "SPLICECTL_CA_CERT";
pub const API_VERSION_ENV: &str = "SPLICECTL_API_VERSION";

/// On-disk form of `config.toml`. Every key is optional; required values are
/// enforced after flag/env/file resolution so the error can name all sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_server: Option<String>,
    #[serde(default)]
    pub ca_cert: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Resolved process-wide settings, constructed once at startup and passed by
/// reference into every handler.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_server: String,
    /// PEM contents of the trust bundle, already read from disk.
    pub ca_bundle: Option<String>,
    /// Optional negotiation override; skips the server version round-trip.
    pub api_version: Option<String>,
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "splicectl")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(cli_server: Option<&str>, cli_ca_cert: Option<&Path>) -> Result<Settings> {
    let path = default_config_path()?;
    let file = if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        parse_config(&contents)?
    } else {
        ConfigFile::default()
    };

    let sources = resolve(file, cli_server, cli_ca_cert, &|name| {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    })?;

    let ca_bundle = match &sources.ca_cert {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read CA bundle from {}", path.display()))?,
        ),
        None => None,
    };

    Ok(Settings {
        api_server: sources.api_server,
        ca_bundle,
        api_version: sources.api_version,
    })
}

pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    toml::from_str(contents).context("failed to parse config TOML")
}

#[derive(Debug, PartialEq, Eq)]
struct ResolvedSources {
    api_server: String,
    ca_cert: Option<PathBuf>,
    api_version: Option<String>,
}

/// Precedence for every setting: CLI flag, then environment, then config
/// file. A missing api_server is a startup error, never deferred.
fn resolve(
    file: ConfigFile,
    cli_server: Option<&str>,
    cli_ca_cert: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedSources> {
    let api_server = cli_server
        .map(str::to_string)
        .or_else(|| env(API_SERVER_ENV))
        .or(file.api_server);
    let Some(api_server) = api_server else {
        bail!(
            "no API server configured\nSet api_server in the config file, export {}, or pass --server.",
            API_SERVER_ENV
        );
    };

    let ca_cert = cli_ca_cert
        .map(Path::to_path_buf)
        .or_else(|| env(CA_CERT_ENV).map(|v| expand_tilde(&v)))
        .or_else(|| file.ca_cert.as_deref().map(expand_tilde));

    let api_version = env(API_VERSION_ENV).or(file.api_version);

    Ok(ResolvedSources {
        api_server,
        ca_cert,
        api_version,
    })
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}
