use anyhow::Result;

use crate::gates::DisplayMode::{self, Legacy, Structured};
use crate::gates::GateTable;
use crate::objects::Shape;
use crate::render::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One row of the command table: everything a handler needs besides its
/// query parameters. The default format is part of each endpoint's contract
/// (`text` for record-like responses, `yaml` for free-form trees).
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub shape: Shape,
    pub default_format: OutputFormat,
    pub gates: &'static [(&'static str, DisplayMode)],
}

pub const GET_ACCOUNTS: Endpoint = Endpoint {
    name: "get_accounts",
    method: Method::Get,
    path: "splicectl/v1/cm/accounts",
    shape: Shape::Accounts,
    default_format: OutputFormat::Text,
    gates: &[(">=0.1.7", Structured)],
};

pub const GET_DEFAULT_CR: Endpoint = Endpoint {
    name: "get_default-cr",
    method: Method::Get,
    path: "splicectl/v1/vault/defaultcr",
    shape: Shape::Tree,
    default_format: OutputFormat::Yaml,
    gates: &[(">=0.0.14 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const GET_DATABASE_CR: Endpoint = Endpoint {
    name: "get_database-cr",
    method: Method::Get,
    path: "splicectl/v1/vault/databasecr",
    shape: Shape::Tree,
    default_format: OutputFormat::Yaml,
    gates: &[(">=0.0.14 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const GET_VAULT_KEY: Endpoint = Endpoint {
    name: "get_vault-key",
    method: Method::Get,
    path: "splicectl/v1/vault/vaultkey",
    shape: Shape::Tree,
    default_format: OutputFormat::Yaml,
    gates: &[(">=0.0.14 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const APPLY_DATABASE_CR: Endpoint = Endpoint {
    name: "apply_database-cr",
    method: Method::Post,
    path: "splicectl/v1/vault/databasecr",
    shape: Shape::VaultVersion,
    default_format: OutputFormat::Text,
    gates: &[(">=0.0.14 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const ROLLBACK_DEFAULT_CR: Endpoint = Endpoint {
    name: "rollback_default-cr",
    method: Method::Post,
    path: "splicectl/v1/vault/rollbackdefaultcr",
    shape: Shape::VaultVersion,
    default_format: OutputFormat::Text,
    gates: &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const ROLLBACK_DATABASE_CR: Endpoint = Endpoint {
    name: "rollback_database-cr",
    method: Method::Post,
    path: "splicectl/v1/vault/rollbackdatabasecr",
    shape: Shape::VaultVersion,
    default_format: OutputFormat::Text,
    gates: &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

// The cm-settings pair predates version negotiation on the server side and
// stays unregistered: no constraint, always structured.
pub const ROLLBACK_CM_SETTINGS: Endpoint = Endpoint {
    name: "rollback_cm-settings",
    method: Method::Post,
    path: "splicectl/v1/vault/rollbackcmsettings",
    shape: Shape::VaultVersion,
    default_format: OutputFormat::Text,
    gates: &[],
};

pub const VERSIONS_DEFAULT_CR: Endpoint = Endpoint {
    name: "versions_default-cr",
    method: Method::Get,
    path: "splicectl/v1/vault/defaultcrversions",
    shape: Shape::VersionList,
    default_format: OutputFormat::Text,
    gates: &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const VERSIONS_DATABASE_CR: Endpoint = Endpoint {
    name: "versions_database-cr",
    method: Method::Get,
    path: "splicectl/v1/vault/databasecrversions",
    shape: Shape::VersionList,
    default_format: OutputFormat::Text,
    gates: &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const VERSIONS_CM_SETTINGS: Endpoint = Endpoint {
    name: "versions_cm-settings",
    method: Method::Get,
    path: "splicectl/v1/vault/cmsettingsversions",
    shape: Shape::VersionList,
    default_format: OutputFormat::Text,
    gates: &[],
};

pub const RESTART_DATABASE: Endpoint = Endpoint {
    name: "restart_database",
    method: Method::Post,
    path: "splicectl/v1/splicedb/splicedatabaserestart",
    shape: Shape::ActionStatus,
    default_format: OutputFormat::Text,
    gates: &[(">=0.1.6", Structured)],
};

pub const LIST_DATABASE: Endpoint = Endpoint {
    name: "list_database",
    method: Method::Get,
    path: "splicectl/v1/splicedb/splicedatabases",
    shape: Shape::Databases,
    default_format: OutputFormat::Text,
    gates: &[(">=0.0.15 <0.0.17", Legacy), (">=0.0.17", Structured)],
};

pub const ALL: &[&Endpoint] = &[
    &GET_ACCOUNTS,
    &GET_DEFAULT_CR,
    &GET_DATABASE_CR,
    &GET_VAULT_KEY,
    &APPLY_DATABASE_CR,
    &ROLLBACK_DEFAULT_CR,
    &ROLLBACK_DATABASE_CR,
    &ROLLBACK_CM_SETTINGS,
    &VERSIONS_DEFAULT_CR,
    &VERSIONS_DATABASE_CR,
    &VERSIONS_CM_SETTINGS,
    &RESTART_DATABASE,
    &LIST_DATABASE,
];

/// Build the gate table from every registered endpoint. Malformed or
/// overlapping ranges abort startup here, never per-request.
pub fn gate_table() -> Result<GateTable> {
    GateTable::build(
        ALL.iter()
            .filter(|ep| !ep.gates.is_empty())
            .map(|ep| (ep.name, ep.gates)),
    )
}
