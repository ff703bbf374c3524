//! Data models for path plans.
//!
//! A [`Plan`] owns a [`DriveBase`] and an ordered list of [`Run`]s. Each run
//! is an ordered list of [`Point`]s with [`Action`]s anchored to them by
//! index. Display implementations for these models live in
//! [`crate::display::models`].
//!
//! Every constructor validates its invariants and returns a
//! [`ValidationError`](crate::error::ValidationError) instead of building an
//! inconsistent value:
//!
//! ```rust
//! use splanner_core::models::{DriveBase, MotorPort, Plan, Point};
//!
//! let drive_base = DriveBase::new(MotorPort::A, MotorPort::B, 56.0, 112.0)?;
//! let mut plan = Plan::new("Mission 1", drive_base)?;
//! let run = plan.add_run("Warm-up")?;
//! plan.add_point_to_run(run, Point::new(10.0, 20.0)?)?;
//! assert_eq!(plan.run(run)?.points().len(), 1);
//!
//! assert!(DriveBase::new(MotorPort::C, MotorPort::C, 56.0, 112.0).is_err());
//! # Ok::<(), splanner_core::SplanError>(())
//! ```

pub mod action;
pub mod drive_base;
pub mod hub;
pub mod plan;
pub mod point;
pub mod run;


pub use action::{Action, ActionArg};
pub use drive_base::{DriveBase, DriveBaseFields};
pub use hub::{Hub, MotorPort};
pub use plan::Plan;
pub use point::Point;
pub use run::{CapacityWarning, Run, MAX_POINTS_PER_RUN, SOFT_POINT_LIMIT};
