use anyhow::Result;

use crate::cli::VersionsTarget;
use crate::commands::{query_string, run_endpoint};
use crate::context::Context;
use crate::endpoints;

pub fn cmd_versions(ctx: &Context, target: VersionsTarget) -> Result<()> {
    match target {
        VersionsTarget::DefaultCr => {
            run_endpoint(ctx, &endpoints::VERSIONS_DEFAULT_CR, None, None)
        }
        VersionsTarget::DatabaseCr { database } => {
            let database_name = database.resolve()?;
            let query = query_string(&[("database-name", &database_name)]);
            run_endpoint(ctx, &endpoints::VERSIONS_DATABASE_CR, Some(&query), None)
        }
        VersionsTarget::CmSettings { component } => {
            let query = query_string(&[("component", component.as_str())]);
            run_endpoint(ctx, &endpoints::VERSIONS_CM_SETTINGS, Some(&query), None)
        }
    }
}
