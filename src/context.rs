use anyhow::{Context as _, Result};
use semver::Version;

use crate::cli::Cli;
use crate::config;
use crate::endpoints::{self, Endpoint};
use crate::gates::GateTable;
use crate::render::OutputFormat;
use crate::rest::RestClient;
use crate::session::Session;

/// Everything a command handler needs, built once at startup and passed by
/// reference. Replaces the process-wide globals older releases carried.
pub struct Context {
    pub rest: RestClient,
    pub gates: GateTable,
    /// The server's negotiated API version, resolved once per process.
    pub effective: Version,
    output: Option<OutputFormat>,
    pub no_headers: bool,
}

impl Context {
    pub fn build(cli: &Cli) -> Result<Context> {
        let settings = config::load(cli.server.as_deref(), cli.ca_cert.as_deref())?;
        let session = Session::load()?;
        let rest = RestClient::new(&settings.api_server, settings.ca_bundle.as_deref(), &session)?;
        let gates = endpoints::gate_table()?;

        let effective = match &settings.api_version {
            Some(v) => Version::parse(v)
                .with_context(|| format!("invalid api_version override {:?}", v))?,
            None => rest.fetch_api_version()?,
        };

        Ok(Context {
            rest,
            gates,
            effective,
            output: cli.output,
            no_headers: cli.no_headers,
        })
    }

    /// The user's explicit `-o` wins; otherwise each endpoint's documented
    /// default applies.
    pub fn format_for(&self, endpoint: &Endpoint) -> OutputFormat {
        self.output.unwrap_or(endpoint.default_format)
    }

    #[cfg(test)]
    pub fn with_output(mut self, output: Option<OutputFormat>) -> Context {
        self.output = output;
        self
    }
}
