//! Command-line argument wrappers and command handlers
//!
//! Argument structures carry clap attributes and convert into the core's
//! interface-agnostic parameter and command types:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params / PlanCommand → PlanSession
//! ```
//!
//! Every editing command opens the plan file, applies one [`PlanCommand`]
//! through a session and writes the file back only when the command
//! succeeded.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use log::{debug, info};
use splanner_core::{
    codegen::{deliver_script, DeviceChannel, FileTemplate, StreamChannel},
    curve::polyline_length,
    display::{CommandResult, CurvePoints, GenerateResult, OperationStatus, RunList},
    models::{Action, ActionArg, Hub, MotorPort},
    params::{CreatePlan, PlacePoint, PointRef},
    session::{PlanCommand, PlanSession, SessionBuilder},
    CurveParams, GeneratedScript, PlanDocument, SplannerConfig,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// CLI Argument Wrapper Implementations
// ============================================================================

/// A plan file to operate on
#[derive(Args)]
pub struct PlanFileArgs {
    /// Path to the .pysplan plan file
    pub file: PathBuf,
}

/// Create a new plan file
#[derive(Args)]
pub struct NewPlanArgs {
    /// Path of the plan file to create
    pub file: PathBuf,
    /// Name of the plan
    pub name: String,
    /// Port of the left drive motor
    #[arg(long, default_value = "A")]
    pub left: MotorPort,
    /// Port of the right drive motor
    #[arg(long, default_value = "B")]
    pub right: MotorPort,
    /// Wheel diameter in millimeters
    #[arg(long, default_value_t = 56.0)]
    pub wheel_diameter: f64,
    /// Distance between the wheels in millimeters
    #[arg(long, default_value_t = 112.0)]
    pub axle_track: f64,
    /// Hub the plan targets (spike or ev3)
    #[arg(long)]
    pub hub: Option<Hub>,
    /// Name of a first run to create
    #[arg(long)]
    pub run: Option<String>,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl From<NewPlanArgs> for CreatePlan {
    fn from(val: NewPlanArgs) -> Self {
        CreatePlan {
            name: val.name,
            left_motor_port: val.left,
            right_motor_port: val.right,
            wheel_diameter: val.wheel_diameter,
            axle_track: val.axle_track,
            hub_type: val.hub,
            first_run: val.run,
        }
    }
}

/// Append a run to a plan
#[derive(Args)]
pub struct AddRunArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// Name of the new run
    pub name: String,
}

impl From<AddRunArgs> for PlanCommand {
    fn from(val: AddRunArgs) -> Self {
        PlanCommand::CreateRun { name: val.name }
    }
}

/// Rename a run
#[derive(Args)]
pub struct RenameRunArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    pub run: usize,
    /// New name of the run
    pub name: String,
}

impl From<RenameRunArgs> for PlanCommand {
    fn from(val: RenameRunArgs) -> Self {
        PlanCommand::RenameRun {
            run: val.run,
            name: val.name,
        }
    }
}

/// Remove a run with all its points and actions
#[derive(Args)]
pub struct RemoveRunArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    pub run: usize,
}

impl From<RemoveRunArgs> for PlanCommand {
    fn from(val: RemoveRunArgs) -> Self {
        PlanCommand::RemoveRun { run: val.run }
    }
}

#[derive(Subcommand)]
pub enum RunCommands {
    /// Append a run
    #[command(alias = "a")]
    Add(AddRunArgs),
    /// Rename a run
    Rename(RenameRunArgs),
    /// Remove a run
    #[command(alias = "rm")]
    Remove(RemoveRunArgs),
    /// List the runs of a plan
    #[command(aliases = ["l", "ls"])]
    List(PlanFileArgs),
}

/// Append a waypoint to a run
#[derive(Args)]
pub struct AddPointArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    pub run: usize,
    #[arg(allow_negative_numbers = true)]
    pub x: f64,
    #[arg(allow_negative_numbers = true)]
    pub y: f64,
}

impl From<AddPointArgs> for PlacePoint {
    fn from(val: AddPointArgs) -> Self {
        PlacePoint {
            run: val.run,
            x: val.x,
            y: val.y,
        }
    }
}

/// Move a waypoint; its actions stay anchored to it
#[derive(Args)]
pub struct ReplacePointArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    pub run: usize,
    /// 0-based index of the point within the run
    pub index: usize,
    #[arg(allow_negative_numbers = true)]
    pub x: f64,
    #[arg(allow_negative_numbers = true)]
    pub y: f64,
}

/// Address a single waypoint or action
#[derive(Args)]
pub struct PointRefArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    pub run: usize,
    /// 0-based index within the run
    pub index: usize,
}

impl From<PointRefArgs> for PointRef {
    fn from(val: PointRefArgs) -> Self {
        PointRef {
            run: val.run,
            index: val.index,
        }
    }
}

#[derive(Subcommand)]
pub enum PointCommands {
    /// Append a waypoint to a run
    #[command(alias = "a")]
    Add(AddPointArgs),
    /// Move a waypoint
    Replace(ReplacePointArgs),
    /// Remove a waypoint and the actions anchored to it
    #[command(alias = "rm")]
    Remove(PointRefArgs),
}

/// Anchor an action to a waypoint
#[derive(Args)]
pub struct AddActionArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    pub run: usize,
    /// 0-based index of the waypoint the action runs at
    pub point: usize,
    /// Name of the routine on the robot
    pub operation: String,
    /// Stop at the waypoint until the routine returns
    #[arg(long)]
    pub blocking: bool,
    /// Arguments: true/false, integers, numbers, anything else is text
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

impl From<AddActionArgs> for Action {
    fn from(val: AddActionArgs) -> Self {
        let arguments = val
            .arguments
            .iter()
            .map(|token| ActionArg::parse_lossy(token))
            .collect();
        Action::new(val.point, val.operation, arguments).with_blocking(val.blocking)
    }
}

#[derive(Subcommand)]
pub enum ActionCommands {
    /// Anchor an action to a waypoint
    #[command(alias = "a")]
    Add(AddActionArgs),
    /// Remove an action by its index in the run
    #[command(alias = "rm")]
    Remove(PointRefArgs),
}

/// Sample the smoothed path through a run
#[derive(Args)]
pub struct CurveArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// 0-based index of the run
    #[arg(default_value_t = 0)]
    pub run: usize,
    /// Curve tension (overrides the configuration)
    #[arg(long, allow_negative_numbers = true)]
    pub tension: Option<f64>,
    /// Sample steps per unit of segment length (overrides the configuration)
    #[arg(long)]
    pub density: Option<f64>,
    /// Treat the run as a closed loop
    #[arg(long)]
    pub closed: bool,
    /// Print the samples as a JSON array of [x, y] pairs
    #[arg(long)]
    pub json: bool,
}

impl CurveArgs {
    fn params(&self, base: CurveParams) -> CurveParams {
        CurveParams {
            tension: self.tension.unwrap_or(base.tension),
            density: self.density.unwrap_or(base.density),
            closed: self.closed || base.closed,
        }
    }
}

/// Options shared by generate and send
#[derive(Args)]
pub struct ScriptArgs {
    #[command(flatten)]
    pub target: PlanFileArgs,
    /// Hub to generate for. Defaults to the hub recorded in the plan
    #[arg(long)]
    pub hub: Option<Hub>,
    /// Template file. Defaults to the configured template
    #[arg(long)]
    pub template: Option<PathBuf>,
}

/// Generate a hub script
#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub script: ScriptArgs,
    /// Write the script here instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Generate a hub script and send it to a connected hub
#[derive(Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub script: ScriptArgs,
    /// Device node of the hub connection, e.g. /dev/ttyACM0
    #[arg(long)]
    pub device: PathBuf,
    /// Seconds to keep listening for replies after sending
    #[arg(long, default_value_t = 2.0)]
    pub listen: f64,
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Executes parsed commands and renders their results.
pub struct Cli {
    renderer: TerminalRenderer,
    config: SplannerConfig,
}

impl Cli {
    pub fn new(renderer: TerminalRenderer, config: SplannerConfig) -> Self {
        Self { renderer, config }
    }

    async fn open(&self, file: &Path, curve: CurveParams) -> Result<PlanSession> {
        SessionBuilder::new()
            .with_plan_file(file)
            .with_curve_params(curve)
            .build()
            .await
            .with_context(|| format!("Failed to open plan {}", file.display()))
    }

    /// Applies one command to the plan file and saves it on success.
    async fn edit(&self, file: &Path, command: PlanCommand, headline: String) -> Result<()> {
        let mut session = self.open(file, self.config.curve).await?;
        let outcome = session.apply(command).context("Command rejected")?;
        session
            .save()
            .await
            .with_context(|| format!("Failed to save plan {}", file.display()))?;
        self.renderer
            .render(&CommandResult::new(headline, outcome).to_string())
    }

    pub async fn create_plan(&self, args: NewPlanArgs) -> Result<()> {
        let file = args.file.clone();
        if !args.force && tokio::fs::try_exists(&file).await.unwrap_or(false) {
            bail!("{} already exists; pass --force to overwrite", file.display());
        }

        let session = SessionBuilder::new()
            .with_new_plan(args.into())
            .with_plan_file(&file)
            .build()
            .await
            .context("Failed to create plan")?;
        session
            .save()
            .await
            .with_context(|| format!("Failed to save plan {}", file.display()))?;

        let status = OperationStatus::success(format!("Created {}", file.display()));
        self.renderer
            .render(&format!("{status}\n{}", session.plan()))
    }

    pub async fn show_plan(&self, args: PlanFileArgs) -> Result<()> {
        let session = self.open(&args.file, self.config.curve).await?;
        self.renderer.render(&session.plan().to_string())
    }

    pub async fn handle_run_command(&self, command: RunCommands) -> Result<()> {
        match command {
            RunCommands::Add(args) => {
                let file = args.target.file.clone();
                let headline = format!("Added run '{}'", args.name);
                self.edit(&file, args.into(), headline).await
            }
            RunCommands::Rename(args) => {
                let file = args.target.file.clone();
                let headline = format!("Renamed run {} to '{}'", args.run, args.name);
                self.edit(&file, args.into(), headline).await
            }
            RunCommands::Remove(args) => {
                let file = args.target.file.clone();
                let headline = format!("Removed run {}", args.run);
                self.edit(&file, args.into(), headline).await
            }
            RunCommands::List(args) => {
                let session = self.open(&args.file, self.config.curve).await?;
                self.renderer
                    .render(&format!("## Runs\n\n{}", RunList(session.plan())))
            }
        }
    }

    pub async fn handle_point_command(&self, command: PointCommands) -> Result<()> {
        match command {
            PointCommands::Add(args) => {
                let file = args.target.file.clone();
                let place = PlacePoint::from(args);
                let point = place.point().context("Invalid point")?;
                let headline = format!("Added point {point} to run {}", place.run);
                let command = PlanCommand::AddPoint {
                    run: place.run,
                    point,
                };
                self.edit(&file, command, headline).await
            }
            PointCommands::Replace(args) => {
                let place = PlacePoint {
                    run: args.run,
                    x: args.x,
                    y: args.y,
                };
                let point = place.point().context("Invalid point")?;
                let headline = format!("Moved point {} of run {} to {point}", args.index, args.run);
                let command = PlanCommand::ReplacePoint {
                    run: args.run,
                    index: args.index,
                    point,
                };
                self.edit(&args.target.file, command, headline).await
            }
            PointCommands::Remove(args) => {
                let file = args.target.file.clone();
                let PointRef { run, index } = args.into();
                let headline = format!("Removed point {index} from run {run}");
                self.edit(&file, PlanCommand::RemovePoint { run, index }, headline)
                    .await
            }
        }
    }

    pub async fn handle_action_command(&self, command: ActionCommands) -> Result<()> {
        match command {
            ActionCommands::Add(args) => {
                let file = args.target.file.clone();
                let run = args.run;
                let action = Action::from(args);
                let headline = format!("Anchored {action} to point {} of run {run}", action.anchor);
                self.edit(&file, PlanCommand::AddAction { run, action }, headline)
                    .await
            }
            ActionCommands::Remove(args) => {
                let file = args.target.file.clone();
                let PointRef { run, index } = args.into();
                let headline = format!("Removed action {index} from run {run}");
                self.edit(&file, PlanCommand::RemoveAction { run, index }, headline)
                    .await
            }
        }
    }

    pub async fn sample_curve(&self, args: CurveArgs) -> Result<()> {
        let params = args.params(self.config.curve);
        let session = self.open(&args.target.file, params).await?;
        let samples = session.preview_run(args.run).context("Cannot sample run")?;

        if args.json {
            println!("{}", serde_json::to_string(&samples)?);
            return Ok(());
        }
        self.renderer.render(&format!(
            "## Run {} curve ({} samples, length {:.1})\n\n{}",
            args.run,
            samples.len(),
            polyline_length(&samples),
            CurvePoints(&samples)
        ))
    }

    fn template(&self, explicit: Option<PathBuf>) -> Result<FileTemplate> {
        match explicit {
            Some(path) => Ok(FileTemplate::new(path)),
            None => self.config.template_source().context(
                "No template given; pass --template or set [template] path in the configuration",
            ),
        }
    }

    /// Generates the script and records the hub in the plan file.
    async fn build_script(&self, args: ScriptArgs) -> Result<GeneratedScript> {
        let file = args.target.file;
        let template = self.template(args.template)?;
        let mut session = self.open(&file, self.config.curve).await?;

        let hub = match args.hub.or(session.plan().hub_type()) {
            Some(hub) => hub,
            None => bail!("The plan has no hub yet; pass --hub spike or --hub ev3"),
        };
        let previous = session.plan().hub_type();

        debug!("Using template {}", template.path().display());
        let script = session
            .generate(hub, &template)
            .await
            .context("Code generation failed")?;

        if previous != Some(hub) {
            session
                .save()
                .await
                .with_context(|| format!("Failed to save plan {}", file.display()))?;
        }
        Ok(script)
    }

    pub async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let script = self.build_script(args.script).await?;

        match args.output {
            Some(path) => {
                tokio::fs::write(&path, &script.text)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                let result = GenerateResult::new(&script).with_destination(path.display().to_string());
                self.renderer.render(&result.to_string())
            }
            None => {
                print!("{}", script.text);
                Ok(())
            }
        }
    }

    pub async fn send(&self, args: SendArgs) -> Result<()> {
        let script = self.build_script(args.script).await?;
        let idle = Duration::try_from_secs_f64(args.listen)
            .context("--listen must be a non-negative number of seconds")?;

        let device = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&args.device)
            .await
            .with_context(|| format!("Failed to open device {}", args.device.display()))?;
        let (reader, writer) = tokio::io::split(device);
        let mut channel = StreamChannel::new(reader, writer);
        channel.subscribe(Box::new(|message| println!("hub> {message}")));

        deliver_script(&mut channel, &script)
            .await
            .context("Failed to send script")?;
        info!("Sent script to {}", args.device.display());

        let replies = channel.pump_incoming(idle).await?;
        let result = GenerateResult::new(&script).with_destination(args.device.display().to_string());
        let status =
            OperationStatus::success(format!("Delivered; {replies} line(s) received from the hub"));
        self.renderer.render(&format!("{result}{status}"))
    }

    pub fn print_schema(&self) -> Result<()> {
        let schema = schemars::schema_for!(PlanDocument);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
