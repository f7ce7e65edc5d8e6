use anyhow::Result;

use crate::cli::GetTarget;
use crate::commands::{query_string, run_endpoint};
use crate::context::Context;
use crate::endpoints;

pub fn cmd_get(ctx: &Context, target: GetTarget) -> Result<()> {
    match target {
        GetTarget::Accounts => run_endpoint(ctx, &endpoints::GET_ACCOUNTS, None, None),
        GetTarget::DefaultCr { version } => {
            let query = query_string(&[("version", &version.to_string())]);
            run_endpoint(ctx, &endpoints::GET_DEFAULT_CR, Some(&query), None)
        }
        GetTarget::DatabaseCr { database, version } => {
            let database_name = database.resolve()?;
            let query = query_string(&[
                ("version", &version.to_string()),
                ("database-name", &database_name),
            ]);
            run_endpoint(ctx, &endpoints::GET_DATABASE_CR, Some(&query), None)
        }
        GetTarget::VaultKey { keypath, version } => {
            // Vault keys are addressed without the "secrets/" mount prefix,
            // but operators habitually paste paths that include it.
            let keypath = keypath.strip_prefix("secrets/").unwrap_or(&keypath);
            let query = query_string(&[
                ("version", &version.to_string()),
                ("keypath", keypath),
            ]);
            run_endpoint(ctx, &endpoints::GET_VAULT_KEY, Some(&query), None)
        }
    }
}
