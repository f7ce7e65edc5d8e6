use anyhow::Result;

use crate::cli::RollbackTarget;
use crate::commands::{query_string, run_endpoint};
use crate::context::Context;
use crate::endpoints;

pub fn cmd_rollback(ctx: &Context, target: RollbackTarget) -> Result<()> {
    match target {
        RollbackTarget::DefaultCr { version } => {
            let query = query_string(&[("version", &version.to_string())]);
            run_endpoint(ctx, &endpoints::ROLLBACK_DEFAULT_CR, Some(&query), None)
        }
        RollbackTarget::DatabaseCr { database, version } => {
            let database_name = database.resolve()?;
            let query = query_string(&[
                ("version", &version.to_string()),
                ("database-name", &database_name),
            ]);
            run_endpoint(ctx, &endpoints::ROLLBACK_DATABASE_CR, Some(&query), None)
        }
        RollbackTarget::CmSettings { component, version } => {
            let query = query_string(&[
                ("component", component.as_str()),
                ("version", &version.to_string()),
            ]);
            run_endpoint(ctx, &endpoints::ROLLBACK_CM_SETTINGS, Some(&query), None)
        }
    }
}
