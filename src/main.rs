mod cli;
mod commands;
mod config;
mod context;
mod endpoints;
mod gates;
mod objects;
mod render;
mod rest;
mod session;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use context::Context;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::build(&cli)?;

    match cli.command {
        Command::Get(target) => commands::cmd_get(&ctx, target),
        Command::Apply(target) => commands::cmd_apply(&ctx, target),
        Command::Rollback(target) => commands::cmd_rollback(&ctx, target),
        Command::Versions(target) => commands::cmd_versions(&ctx, target),
        Command::Restart(target) => commands::cmd_restart(&ctx, target),
        Command::List(target) => commands::cmd_list(&ctx, target),
    }
}
