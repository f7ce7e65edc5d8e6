/// One generic runner executes every endpoint: resolve the version gate,
/// issue the request, then either echo the raw body (legacy servers, `raw`
/// format) or parse and render per the endpoint's declared shape.
mod apply;
mod get;
mod list;
mod restart;
mod rollback;
mod versions;

pub use apply::*;
pub use get::*;
pub use list::*;
pub use restart::*;
pub use rollback::*;
pub use versions::*;

use anyhow::{bail, Result};
use url::form_urlencoded;

use crate::context::Context;
use crate::endpoints::{Endpoint, Method};
use crate::gates::DisplayMode;
use crate::objects::{self, Shape};
use crate::render::{self, OutputFormat, RenderOpts};

pub fn run_endpoint(
    ctx: &Context,
    endpoint: &Endpoint,
    query: Option<&str>,
    body: Option<&[u8]>,
) -> Result<()> {
    let resolution = ctx.gates.resolve(endpoint.name, &ctx.effective);
    let Some(mode) = resolution.mode else {
        match resolution.min_required {
            Some(min) => bail!(
                "{} requires server version >= {}; server reports {}",
                endpoint.name,
                min,
                ctx.effective
            ),
            None => bail!("{} cannot be dispatched against this server", endpoint.name),
        }
    };

    let path = match query {
        Some(query) => format!("{}?{}", endpoint.path, query),
        None => endpoint.path.to_string(),
    };
    let raw = match endpoint.method {
        Method::Get => ctx.rest.get(&path),
        Method::Post => ctx.rest.post(&path, body),
    }?;

    let out = render_response(
        mode,
        ctx.format_for(endpoint),
        endpoint.shape,
        &raw,
        RenderOpts {
            no_headers: ctx.no_headers,
        },
    )?;
    println!("{}", out);
    Ok(())
}

/// Dispatch one response. Legacy servers and the `raw` selector both echo the
/// body verbatim, before any parsing, so they never fail on shape mismatches.
pub fn render_response(
    mode: DisplayMode,
    format: OutputFormat,
    shape: Shape,
    raw: &str,
    opts: RenderOpts,
) -> Result<String> {
    if mode == DisplayMode::Legacy || format.canonical() == OutputFormat::Raw {
        return Ok(raw.to_string());
    }
    let payload = objects::parse(shape, raw)?;
    render::render(format, &payload, opts)
}

pub(crate) fn query_string(pairs: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
