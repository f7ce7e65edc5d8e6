use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::render::OutputFormat;

#[derive(Parser)]
#[command(
    name = "splicectl",
    version,
    about = "Command line client for the cluster Ops Center API"
)]
pub struct Cli {
    /// API server base URL (overrides config)
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// PEM bundle with additional trusted root CAs
    #[arg(long, global = true, value_name = "FILE")]
    pub ca_cert: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Omit the header row in text output
    #[arg(long, global = true)]
    pub no_headers: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Retrieve cluster objects
    #[command(subcommand)]
    Get(GetTarget),
    /// Submit configuration changes
    #[command(subcommand)]
    Apply(ApplyTarget),
    /// Roll a versioned configuration back to an earlier vault version
    #[command(subcommand)]
    Rollback(RollbackTarget),
    /// List the stored versions of a configuration object
    #[command(subcommand)]
    Versions(VersionsTarget),
    /// Restart cluster components
    #[command(subcommand)]
    Restart(RestartTarget),
    /// List cluster objects
    #[command(subcommand)]
    List(ListTarget),
}

#[derive(Subcommand)]
pub enum GetTarget {
    /// Get a list of Cloud Manager accounts
    Accounts,
    /// Get the default CR for the cluster
    DefaultCr {
        /// Version to retrieve, default latest
        #[arg(long, default_value_t = 0)]
        version: u64,
    },
    /// Get the CR for a specific workspace
    DatabaseCr {
        #[command(flatten)]
        database: DatabaseNameArgs,
        /// Version to retrieve, default latest
        #[arg(long, default_value_t = 0)]
        version: u64,
    },
    /// Get the data stored at a specific vault key
    VaultKey {
        /// Vault key path
        #[arg(long)]
        keypath: String,
        /// Version to retrieve, default latest
        #[arg(long, default_value_t = 0)]
        version: u64,
    },
}

#[derive(Subcommand)]
pub enum ApplyTarget {
    /// Submit a new CR for a specified workspace
    DatabaseCr {
        #[command(flatten)]
        database: DatabaseNameArgs,
        /// Input file (JSON or YAML)
        #[arg(short = 'f', long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum RollbackTarget {
    /// Roll the cluster default CR back to a vault version
    DefaultCr {
        /// Vault version to roll back to
        #[arg(short = 'v', long)]
        version: u64,
    },
    /// Roll a workspace CR back to a vault version
    DatabaseCr {
        #[command(flatten)]
        database: DatabaseNameArgs,
        /// Vault version to roll back to
        #[arg(short = 'v', long)]
        version: u64,
    },
    /// Roll the cloud manager settings back to a vault version
    CmSettings {
        /// Cloud manager component
        #[arg(short = 'c', long, value_enum)]
        component: Component,
        /// Vault version to roll back to
        #[arg(short = 'v', long)]
        version: u64,
    },
}

#[derive(Subcommand)]
pub enum VersionsTarget {
    /// Versions of the cluster default CR
    DefaultCr,
    /// Versions of a workspace CR
    DatabaseCr {
        #[command(flatten)]
        database: DatabaseNameArgs,
    },
    /// Versions of the cloud manager settings
    CmSettings {
        /// Cloud manager component
        #[arg(short = 'c', long, value_enum)]
        component: Component,
    },
}

#[derive(Subcommand)]
pub enum RestartTarget {
    /// Restart a workspace database
    #[command(alias = "database")]
    Workspace {
        #[command(flatten)]
        database: DatabaseNameArgs,
        /// Force the restart
        #[arg(short = 'f', long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ListTarget {
    /// List the workspaces in the cluster
    #[command(alias = "database")]
    Workspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Component {
    Ui,
    Api,
}

impl Component {
    pub fn as_str(self) -> &'static str {
        match self {
            Component::Ui => "ui",
            Component::Api => "api",
        }
    }
}

/// Workspace name flags. `--database-name`/`-d` is preferred; `--workspace`
/// and `--database` are accepted aliases kept from older releases.
#[derive(Debug, Default, Args)]
pub struct DatabaseNameArgs {
    /// Workspace (database) name
    #[arg(short = 'd', long = "database-name", value_name = "NAME")]
    pub database_name: Option<String>,

    /// Alias for --database-name
    #[arg(long, value_name = "NAME")]
    pub workspace: Option<String>,

    /// Alias for --database-name
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,
}

impl DatabaseNameArgs {
    /// Preference order when several are supplied: --database-name, then
    /// --workspace, then --database, with a notice naming the winner.
    pub fn resolve(&self) -> Result<String> {
        let supplied: Vec<(&str, &String)> = [
            ("--database-name", &self.database_name),
            ("--workspace", &self.workspace),
            ("--database", &self.database),
        ]
        .into_iter()
        .filter_map(|(flag, value)| value.as_ref().map(|v| (flag, v)))
        .collect();

        match supplied.as_slice() {
            [] => bail!("a workspace name is required; supply --database-name <NAME>"),
            [(_, name)] => Ok((*name).clone()),
            [(flag, name), ..] => {
                eprintln!(
                    "multiple workspace name flags supplied; using {} {}",
                    flag, name
                );
                Ok((*name).clone())
            }
        }
    }
}
