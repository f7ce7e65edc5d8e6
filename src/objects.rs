use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::render::{Payload, TableView};

/// Response shape declared per endpoint. `Tree` covers the free-form
/// configuration documents (default-cr, database-cr, vault-key) that have no
/// statically known columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Accounts,
    VaultVersion,
    VersionList,
    ActionStatus,
    Databases,
    Tree,
}

/// Parse a raw response body according to its declared shape. A body that
/// does not match is a fatal error; no partial rendering is meaningful.
pub fn parse(shape: Shape, raw: &str) -> Result<Payload> {
    match shape {
        Shape::Accounts => typed::<AccountList>(raw),
        Shape::VaultVersion => typed::<VaultVersion>(raw),
        Shape::VersionList => {
            let list = restructure_versions(raw)?;
            payload(raw, &list)
        }
        Shape::ActionStatus => typed::<ActionStatus>(raw),
        Shape::Databases => typed::<DatabaseList>(raw),
        Shape::Tree => {
            let tree: Value =
                serde_json::from_str(raw).context("could not parse server response as JSON")?;
            Ok(Payload {
                raw: raw.to_string(),
                tree,
                table: None,
            })
        }
    }
}

fn typed<T>(raw: &str) -> Result<Payload>
where
    T: DeserializeOwned + Serialize + Tabular,
{
    let value: T = serde_json::from_str(raw).context("could not parse server response")?;
    payload(raw, &value)
}

fn payload<T: Serialize + Tabular>(raw: &str, value: &T) -> Result<Payload> {
    let tree = serde_json::to_value(value).context("failed to build canonical JSON tree")?;
    Ok(Payload {
        raw: raw.to_string(),
        tree,
        table: Some(value.table()),
    })
}

trait Tabular {
    fn table(&self) -> TableView;
}

fn format_time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

// --- Cloud manager accounts ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountList {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl Tabular for AccountList {
    fn table(&self) -> TableView {
        TableView {
            headers: vec!["ACCOUNTID", "EMAIL", "FIRSTNAME", "LASTNAME"],
            rows: self
                .accounts
                .iter()
                .map(|a| {
                    vec![
                        a.account_id.clone(),
                        a.email_address.clone(),
                        a.first_name.clone(),
                        a.last_name.clone(),
                    ]
                })
                .collect(),
        }
    }
}

// --- Vault version (apply/rollback responses) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultVersion {
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
}

impl Tabular for VaultVersion {
    fn table(&self) -> TableView {
        TableView {
            headers: vec!["VERSION", "CREATED"],
            rows: vec![vec![
                self.version.to_string(),
                self.created_time.as_ref().map(format_time).unwrap_or_default(),
            ]],
        }
    }
}

// --- Stored version metadata (versions subcommands) ---

/// Wire form: vault-style metadata keyed by version number,
/// `{"versions": {"1": {"created_time": ..., "destroyed": ...}, ...}}`.
#[derive(Debug, Deserialize)]
struct RawVersionMetadata {
    versions: BTreeMap<String, RawVersionEntry>,
}

#[derive(Debug, Deserialize)]
struct RawVersionEntry {
    created_time: DateTime<Utc>,
    #[serde(default)]
    destroyed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionList {
    pub versions: Vec<VersionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: u64,
    pub created_time: DateTime<Utc>,
    pub destroyed: bool,
}

/// Restructure the vault metadata map into rows sorted by version number.
/// The map keys sort lexically ("10" before "2"), so a numeric sort is
/// required after parsing them.
pub fn restructure_versions(raw: &str) -> Result<VersionList> {
    let meta: RawVersionMetadata =
        serde_json::from_str(raw).context("could not parse version metadata response")?;

    let mut versions = Vec::with_capacity(meta.versions.len());
    for (key, entry) in &meta.versions {
        let version: u64 = key
            .parse()
            .with_context(|| format!("invalid version key {:?} in server response", key))?;
        versions.push(VersionInfo {
            version,
            created_time: entry.created_time,
            destroyed: entry.destroyed,
        });
    }
    versions.sort_by_key(|v| v.version);
    Ok(VersionList { versions })
}

impl Tabular for VersionList {
    fn table(&self) -> TableView {
        TableView {
            headers: vec!["VERSION", "CREATED", "DESTROYED"],
            rows: self
                .versions
                .iter()
                .map(|v| {
                    vec![
                        v.version.to_string(),
                        format_time(&v.created_time),
                        v.destroyed.to_string(),
                    ]
                })
                .collect(),
        }
    }
}

// --- Action status (restart) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Tabular for ActionStatus {
    fn table(&self) -> TableView {
        TableView {
            headers: vec!["STATUS", "MESSAGE"],
            rows: vec![vec![
                self.status.clone(),
                self.message.clone().unwrap_or_default(),
            ]],
        }
    }
}

// --- Workspace list ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseList {
    pub databases: Vec<Database>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub status: String,
}

impl Tabular for DatabaseList {
    fn table(&self) -> TableView {
        TableView {
            headers: vec!["NAME", "STATUS"],
            rows: self
                .databases
                .iter()
                .map(|d| vec![d.name.clone(), d.status.clone()])
                .collect(),
        }
    }
}
