use anyhow::{bail, Context, Result};
use semver::Version;
use serde::Deserialize;
use std::time::Duration;
use ureq::tls::{Certificate, RootCerts, TlsConfig};
use ureq::Agent;

use crate::session::Session;

const TOKEN_BEARER_HEADER: &str = "X-Token-Bearer";
const TOKEN_SESSION_HEADER: &str = "X-Token-Session";
const VERSION_URI: &str = "splicectl/v1/version";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One HTTP client per process invocation. Carries the negotiated base URL,
/// the session tokens, and (optionally) a pinned root-CA trust store.
pub struct RestClient {
    agent: Agent,
    api_server: String,
    token_bearer: String,
    session_id: String,
}

impl RestClient {
    pub fn new(api_server: &str, ca_bundle: Option<&str>, session: &Session) -> Result<RestClient> {
        Ok(RestClient {
            agent: build_agent(ca_bundle)?,
            api_server: api_server.trim_end_matches('/').to_string(),
            token_bearer: session.token_bearer.clone(),
            session_id: session.session_id.clone(),
        })
    }

    fn url(&self, uri: &str) -> String {
        format!("{}/{}", self.api_server, uri)
    }

    pub fn get(&self, uri: &str) -> Result<String> {
        let url = self.url(uri);
        let mut resp = self
            .agent
            .get(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header(TOKEN_BEARER_HEADER, &self.token_bearer)
            .header(TOKEN_SESSION_HEADER, &self.session_id)
            .call()
            .with_context(|| format!("request to {} failed", url))?;
        resp.body_mut()
            .read_to_string()
            .with_context(|| format!("failed to read response from {}", url))
    }

    pub fn post(&self, uri: &str, body: Option<&[u8]>) -> Result<String> {
        let url = self.url(uri);
        let request = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header(TOKEN_BEARER_HEADER, &self.token_bearer)
            .header(TOKEN_SESSION_HEADER, &self.session_id);
        let mut resp = match body {
            Some(bytes) => request.send(bytes),
            None => request.send_empty(),
        }
        .with_context(|| format!("request to {} failed", url))?;
        resp.body_mut()
            .read_to_string()
            .with_context(|| format!("failed to read response from {}", url))
    }

    /// Ask the server which API contract it speaks. Resolved once per process
    /// and reused for every gate decision.
    pub fn fetch_api_version(&self) -> Result<Version> {
        let url = self.url(VERSION_URI);
        let detail: VersionResponse = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header(TOKEN_BEARER_HEADER, &self.token_bearer)
            .header(TOKEN_SESSION_HEADER, &self.session_id)
            .call()
            .with_context(|| format!("could not negotiate API version with {}", url))?
            .body_mut()
            .read_json::<VersionResponse>()
            .context("could not parse version response")?;
        Version::parse(&detail.version)
            .with_context(|| format!("server reported invalid version {:?}", detail.version))
    }
}

#[derive(Deserialize)]
struct VersionResponse {
    version: String,
}

fn build_agent(ca_bundle: Option<&str>) -> Result<Agent> {
    let mut config = Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .http_status_as_error(false);

    if let Some(pem) = ca_bundle {
        let blocks = pem_blocks(pem);
        if blocks.is_empty() {
            bail!("CA bundle contains no certificates");
        }
        let mut certs = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let cert = Certificate::from_pem(block.as_bytes())
                .context("failed to parse certificate in CA bundle")?;
            certs.push(cert);
        }
        config = config.tls_config(
            TlsConfig::builder()
                .root_certs(RootCerts::new_with_certs(&certs))
                .build(),
        );
    }

    Ok(config.build().into())
}

/// Split a PEM bundle into individual certificate blocks. Text outside the
/// BEGIN/END markers (comments, key material) is ignored.
fn pem_blocks(pem: &str) -> Vec<&str> {
    const BEGIN: &str = "-----BEGIN CERTIFICATE-----";
    const END: &str = "-----END CERTIFICATE-----";

    let mut blocks = Vec::new();
    let mut rest = pem;
    while let Some(start) = rest.find(BEGIN) {
        let Some(end) = rest[start..].find(END) else {
            break;
        };
        let end = start + end + END.len();
        blocks.push(&rest[start..end]);
        rest = &rest[end..];
    }
    blocks
}
