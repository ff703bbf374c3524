//! Parameter structures for splanner operations
//!
//! These structures carry user input from any front end (the CLI today, an
//! editor surface tomorrow) into the core without framework-specific derives.
//! Interface layers define their own wrapper types (clap `Args`, for example)
//! and convert into these with `From`.
//!
//! ```ignore
//! // In the CLI crate
//! #[derive(Args)]
//! pub struct NewPlanArgs { /* clap attributes */ }
//!
//! impl From<NewPlanArgs> for CreatePlan { /* field mapping */ }
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{DriveBase, Hub, MotorPort, Plan, Point},
};

/// Parameters for creating a new plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreatePlan {
    /// Name of the plan
    pub name: String,
    /// Port of the left drive motor
    pub left_motor_port: MotorPort,
    /// Port of the right drive motor
    pub right_motor_port: MotorPort,
    /// Wheel diameter in millimeters
    pub wheel_diameter: f64,
    /// Axle track in millimeters
    pub axle_track: f64,
    /// Hub the plan targets, if already known
    pub hub_type: Option<Hub>,
    /// Name of a first run to create, if any
    pub first_run: Option<String>,
}

impl CreatePlan {
    /// Builds the plan, validating every input.
    pub fn build(&self) -> Result<Plan> {
        let drive_base = DriveBase::new(
            self.left_motor_port,
            self.right_motor_port,
            self.wheel_diameter,
            self.axle_track,
        )?;
        let mut plan = Plan::new(&self.name, drive_base)?;
        plan.set_hub_type(self.hub_type);
        if let Some(run) = &self.first_run {
            plan.add_run(run)?;
        }
        Ok(plan)
    }
}

/// Parameters addressing a waypoint by run and position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PointRef {
    /// 0-based run index
    pub run: usize,
    /// 0-based point index within the run
    pub index: usize,
}

/// Parameters for placing a waypoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PlacePoint {
    /// 0-based run index
    pub run: usize,
    pub x: f64,
    pub y: f64,
}

impl PlacePoint {
    /// The validated waypoint.
    pub fn point(&self) -> Result<Point> {
        Ok(Point::new(self.x, self.y)?)
    }
}
