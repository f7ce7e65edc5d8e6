use anyhow::Result;

use crate::cli::RestartTarget;
use crate::commands::{query_string, run_endpoint};
use crate::context::Context;
use crate::endpoints;

pub fn cmd_restart(ctx: &Context, target: RestartTarget) -> Result<()> {
    match target {
        RestartTarget::Workspace { database, force } => {
            let database_name = database.resolve()?;
            let query = query_string(&[
                ("database-name", &database_name),
                ("force", if force { "true" } else { "false" }),
            ]);
            run_endpoint(ctx, &endpoints::RESTART_DATABASE, Some(&query), None)
        }
    }
}
