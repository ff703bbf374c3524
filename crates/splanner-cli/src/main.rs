//! splanner CLI Application
//!
//! Command-line front end for authoring robot path plans, previewing their
//! curves and generating hub scripts.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use splanner_core::SplannerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        no_color,
        command,
    } = Args::parse();

    let config =
        SplannerConfig::load(config.as_deref()).context("Failed to load configuration")?;
    let renderer = TerminalRenderer::new(!no_color);

    info!("splanner started");

    let cli = Cli::new(renderer, config);
    match command {
        Commands::New(args) => cli.create_plan(args).await,
        Commands::Show(args) => cli.show_plan(args).await,
        Commands::Run { command } => cli.handle_run_command(command).await,
        Commands::Point { command } => cli.handle_point_command(command).await,
        Commands::Action { command } => cli.handle_action_command(command).await,
        Commands::Curve(args) => cli.sample_curve(args).await,
        Commands::Generate(args) => cli.generate(args).await,
        Commands::Send(args) => cli.send(args).await,
        Commands::Schema => cli.print_schema(),
    }
}
