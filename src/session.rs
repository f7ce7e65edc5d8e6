use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TOKEN_BEARER_ENV: &str = "SPLICECTL_TOKEN_BEARER";
pub const SESSION_ID_ENV: &str = "SPLICECTL_SESSION_ID";

/// Tokens from a pre-established Ops Center login. The login flow itself
/// lives outside this tool; commands only ever read the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token_bearer: String,
    pub session_id: String,
}

pub fn default_session_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "splicectl")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("session.toml"))
}

impl Session {
    pub fn read(path: &Path) -> Result<Session> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let session: Session =
            toml::from_str(&content).context("failed to parse session TOML")?;
        Ok(session)
    }

    /// Environment tokens win over the session file so scripted use never
    /// touches the home directory.
    pub fn load() -> Result<Session> {
        if let Some(session) = Session::from_env() {
            return Ok(session);
        }
        let path = default_session_path()?;
        if !path.exists() {
            bail!(
                "no session found at {}\nLog on to the Ops Center to create one, or set {} and {}.",
                path.display(),
                TOKEN_BEARER_ENV,
                SESSION_ID_ENV
            );
        }
        Session::read(&path)
    }

    fn from_env() -> Option<Session> {
        let token_bearer = std::env::var(TOKEN_BEARER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let session_id = std::env::var(SESSION_ID_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        Some(Session {
            token_bearer,
            session_id,
        })
    }
}
