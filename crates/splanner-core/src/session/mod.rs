//! Editing session: the single owner of a plan.
//!
//! An editor surface (or the CLI) never mutates a [`Plan`] directly. It sends
//! [`PlanCommand`]s to a [`PlanSession`] and gets back either a
//! [`CommandOutcome`] holding a read-only snapshot of the updated plan or a
//! structured error.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Editor / CLI   │    │   PlanSession   │    │      Plan       │
//! │  (PlanCommand)  │───▶│ (apply on copy, │───▶│ (copy-on-write  │
//! │                 │◀───│  commit on ok)  │    │  runs)          │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!      snapshot / error
//! ```
//!
//! Commands run against a clone of the plan and are committed only when they
//! succeed, so a failed command never leaves partial changes behind. Cloning
//! is cheap because runs are shared until they are modified.
//!
//! ```rust
//! use splanner_core::{
//!     models::{MotorPort, Point},
//!     params::CreatePlan,
//!     session::{PlanCommand, SessionBuilder},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SessionBuilder::new()
//!     .with_new_plan(CreatePlan {
//!         name: "Mission".to_string(),
//!         left_motor_port: MotorPort::A,
//!         right_motor_port: MotorPort::B,
//!         wheel_diameter: 56.0,
//!         axle_track: 112.0,
//!         hub_type: None,
//!         first_run: None,
//!     })
//!     .build()
//!     .await?;
//!
//! session.apply(PlanCommand::CreateRun { name: "Warm-up".to_string() })?;
//! let outcome = session.apply(PlanCommand::AddPoint {
//!     run: 0,
//!     point: Point::new(10.0, 20.0)?,
//! })?;
//! assert_eq!(outcome.snapshot.run(0)?.points().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::debug;

pub mod builder;

#[cfg(test)]
mod tests;

pub use builder::SessionBuilder;

use crate::{
    codec,
    codegen::{self, GeneratedScript, TemplateSource},
    curve::{self, CurveParams, CurveSamples},
    error::{Result, SplanError},
    models::{Action, CapacityWarning, DriveBase, Hub, Plan, Point},
};

/// A mutation requested by the editor surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanCommand {
    /// Append a run and select it
    CreateRun { name: String },
    RenameRun { run: usize, name: String },
    RemoveRun { run: usize },
    /// Append a waypoint to a run
    AddPoint { run: usize, point: Point },
    /// Move a waypoint; its actions stay anchored to it
    ReplacePoint {
        run: usize,
        index: usize,
        point: Point,
    },
    /// Delete a waypoint and the actions anchored to it
    RemovePoint { run: usize, index: usize },
    AddAction { run: usize, action: Action },
    RemoveAction { run: usize, index: usize },
    /// Make a run the active one for previews
    SelectRun { run: usize },
    SetDriveBase { drive_base: DriveBase },
    SetHubType { hub: Option<Hub> },
}

/// Result of a successfully applied command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Read-only snapshot of the plan after the command
    pub snapshot: Plan,
    /// Set when a point insertion crossed the soft point limit
    pub warning: Option<CapacityWarning>,
    /// Actions deleted along with a removed point
    pub removed_actions: Vec<Action>,
    /// Run the session considers active after the command
    pub active_run: Option<usize>,
}

/// Owns one plan and applies commands to it.
#[derive(Debug, Clone)]
pub struct PlanSession {
    plan: Plan,
    active_run: Option<usize>,
    curve_params: CurveParams,
    path: Option<PathBuf>,
}

impl PlanSession {
    pub(crate) fn new(plan: Plan, curve_params: CurveParams, path: Option<PathBuf>) -> Self {
        let active_run = (plan.run_count() > 0).then_some(0);
        Self {
            plan,
            active_run,
            curve_params,
            path,
        }
    }

    /// Read-only view of the current plan.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Cheap copy of the current plan, e.g. for an undo stack.
    pub fn snapshot(&self) -> Plan {
        self.plan.clone()
    }

    pub fn active_run(&self) -> Option<usize> {
        self.active_run
    }

    pub fn curve_params(&self) -> &CurveParams {
        &self.curve_params
    }

    /// File the plan was loaded from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Applies a command atomically.
    ///
    /// # Errors
    ///
    /// Propagates the model error (`IndexOutOfRange`, `CapacityExceeded`,
    /// `Validation`); the plan is left unchanged.
    pub fn apply(&mut self, command: PlanCommand) -> Result<CommandOutcome> {
        let mut draft = self.plan.clone();
        let mut active_run = self.active_run;
        let mut warning = None;
        let mut removed_actions = Vec::new();

        debug!("Applying {command:?}");
        match command {
            PlanCommand::CreateRun { name } => {
                active_run = Some(draft.add_run(&name)?);
            }
            PlanCommand::RenameRun { run, name } => draft.rename_run(run, &name)?,
            PlanCommand::RemoveRun { run } => {
                draft.remove_run(run)?;
                active_run = match active_run {
                    Some(active) if active == run => run.checked_sub(1).or_else(|| {
                        (draft.run_count() > 0).then_some(0)
                    }),
                    Some(active) if active > run => Some(active - 1),
                    other => other,
                };
            }
            PlanCommand::AddPoint { run, point } => {
                warning = draft.add_point_to_run(run, point)?;
            }
            PlanCommand::ReplacePoint { run, index, point } => {
                draft.replace_point(run, index, point)?;
            }
            PlanCommand::RemovePoint { run, index } => {
                removed_actions = draft.remove_point(run, index)?;
            }
            PlanCommand::AddAction { run, action } => {
                draft.add_action(run, action)?;
            }
            PlanCommand::RemoveAction { run, index } => {
                draft.remove_action(run, index)?;
            }
            PlanCommand::SelectRun { run } => {
                draft.run(run)?;
                active_run = Some(run);
            }
            PlanCommand::SetDriveBase { drive_base } => draft.set_drive_base(drive_base),
            PlanCommand::SetHubType { hub } => draft.set_hub_type(hub),
        }

        self.plan = draft;
        self.active_run = active_run;
        Ok(CommandOutcome {
            snapshot: self.plan.clone(),
            warning,
            removed_actions,
            active_run,
        })
    }

    /// Lazy curve through the active run's waypoints, for drawing.
    pub fn preview_samples(&self) -> Option<CurveSamples<'_>> {
        let run = self.plan.run(self.active_run?).ok()?;
        Some(CurveSamples::new(run.points(), self.curve_params))
    }

    /// Curve through the active run's waypoints; empty without an active run.
    pub fn preview(&self) -> Vec<Point> {
        match self.active_run.and_then(|run| self.plan.run(run).ok()) {
            Some(run) => curve::interpolate(run.points(), &self.curve_params),
            None => Vec::new(),
        }
    }

    /// Curve through the waypoints of any run.
    pub fn preview_run(&self, run: usize) -> Result<Vec<Point>> {
        let run = self.plan.run(run)?;
        Ok(curve::interpolate(run.points(), &self.curve_params))
    }

    /// Generates a script and, once that succeeds, records the hub on the plan.
    pub async fn generate<S: TemplateSource>(
        &mut self,
        hub: Hub,
        source: &S,
    ) -> Result<GeneratedScript> {
        let script = codegen::generate_script(&self.plan, hub, source).await?;
        self.plan.set_hub_type(Some(hub));
        Ok(script)
    }

    /// Writes the plan to `path` and remembers it for [`PlanSession::save`].
    pub async fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        codec::write_plan_file(&path, &self.plan).await?;
        self.path = Some(path.as_ref().to_path_buf());
        Ok(())
    }

    /// Writes the plan back to the file it came from.
    pub async fn save(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or_else(|| SplanError::Configuration {
            message: "session has no file path; use save_as".to_string(),
        })?;
        codec::write_plan_file(path, &self.plan).await
    }
}
