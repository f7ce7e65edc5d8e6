use anyhow::Result;

use crate::cli::ListTarget;
use crate::commands::run_endpoint;
use crate::context::Context;
use crate::endpoints;

pub fn cmd_list(ctx: &Context, target: ListTarget) -> Result<()> {
    match target {
        ListTarget::Workspace => run_endpoint(ctx, &endpoints::LIST_DATABASE, None, None),
    }
}
