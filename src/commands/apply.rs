use anyhow::{bail, Context as _, Result};

use crate::cli::ApplyTarget;
use crate::commands::{query_string, run_endpoint};
use crate::context::Context;
use crate::endpoints;

pub fn cmd_apply(ctx: &Context, target: ApplyTarget) -> Result<()> {
    match target {
        ApplyTarget::DatabaseCr { database, file } => {
            let database_name = database.resolve()?;
            let contents = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let body = want_json(&contents)
                .context("the input data must be in either JSON or YAML format")?;
            let query = query_string(&[("database-name", &database_name)]);
            run_endpoint(ctx, &endpoints::APPLY_DATABASE_CR, Some(&query), Some(&body))
        }
    }
}

/// The wire always carries JSON. JSON input passes through untouched; YAML
/// documents are converted; plain scalars and anything else are rejected.
fn want_json(input: &[u8]) -> Result<Vec<u8>> {
    if serde_json::from_slice::<serde_json::Value>(input).is_ok() {
        return Ok(input.to_vec());
    }
    let value: serde_json::Value =
        serde_yaml::from_slice(input).context("input is neither valid JSON nor valid YAML")?;
    if !(value.is_object() || value.is_array()) {
        bail!("input is not a structured document");
    }
    serde_json::to_vec(&value).context("failed to re-encode YAML input as JSON")
}
