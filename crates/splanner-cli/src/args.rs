use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    ActionCommands, CurveArgs, GenerateArgs, NewPlanArgs, PlanFileArgs, PointCommands,
    RunCommands, SendArgs,
};

/// Command-line front end for authoring wheeled-robot path plans
///
/// splanner edits `.pysplan` plan files: named runs of waypoints with
/// actions anchored to them. It previews the smoothed path, merges a plan
/// into a hub script template and pushes the result to a connected hub.
#[derive(Parser)]
#[command(version, about, name = "splanner")]
pub struct Args {
    /// Path to a TOML configuration file. Defaults to
    /// $XDG_CONFIG_HOME/splanner/config.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the splanner CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new plan file
    New(NewPlanArgs),
    /// Show a plan with its runs, points and actions
    #[command(alias = "s")]
    Show(PlanFileArgs),
    /// Manage runs within a plan
    #[command(alias = "r")]
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
    /// Manage waypoints within a run
    #[command(alias = "p")]
    Point {
        #[command(subcommand)]
        command: PointCommands,
    },
    /// Manage actions anchored to waypoints
    #[command(alias = "a")]
    Action {
        #[command(subcommand)]
        command: ActionCommands,
    },
    /// Sample the smoothed path through a run
    Curve(CurveArgs),
    /// Generate a hub script from a plan
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Generate a hub script and send it to a connected hub
    Send(SendArgs),
    /// Print the JSON Schema of the plan file format
    Schema,
}
