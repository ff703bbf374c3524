//! Core library for the splanner robot path planner.
//!
//! This crate holds everything except the terminal surface: the plan model,
//! the spline curve engine, the `.pysplan` file codec, hub script generation
//! and delivery, and the editing session that ties them together.
//!
//! # Architecture
//!
//! - **Models** ([`models`]): plans, runs, waypoints and actions, with their
//!   invariants enforced at construction and mutation
//! - **Curve** ([`curve`]): Catmull-Rom sampling through a run's waypoints
//! - **Codec** ([`codec`]): the JSON document persisted in `.pysplan` files
//! - **Codegen** ([`codegen`]): template substitution and device delivery
//! - **Session** ([`session`]): command-driven editing with snapshots
//! - **Display** ([`display`]): markdown formatting for the CLI
//!
//! # Quick Start
//!
//! ```rust
//! use splanner_core::{
//!     codegen::InlineTemplate,
//!     models::{Hub, MotorPort, Point},
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
//!         first_run: Some("Warm-up".to_string()),
//!     })
//!     .build()
//!     .await?;
//!
//! session.apply(PlanCommand::AddPoint { run: 0, point: Point::new(0.0, 0.0)? })?;
//! session.apply(PlanCommand::AddPoint { run: 0, point: Point::new(300.0, 120.0)? })?;
//! println!("{}", session.plan());
//!
//! let template = InlineTemplate::new("plan = '''{INSERT_PATH_PLANNER_DATA}'''");
//! let script = session.generate(Hub::Spike, &template).await?;
//! assert!(script.text.starts_with("plan = '''{"));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod codegen;
pub mod config;
pub mod curve;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod session;

// Re-export commonly used types
pub use codec::{decode, encode, PlanDocument};
pub use codegen::{generate_script, GeneratedScript, TemplateSource, PLACEHOLDER};
pub use config::SplannerConfig;
pub use curve::{interpolate, CurveParams};
pub use display::{CommandResult, CurvePoints, GenerateResult, OperationStatus, RunList};
pub use error::{Result, SplanError, ValidationError, ValidationErrorKind};
pub use models::{Action, ActionArg, DriveBase, Hub, MotorPort, Plan, Point, Run};
pub use params::{CreatePlan, PlacePoint, PointRef};
pub use session::{CommandOutcome, PlanCommand, PlanSession, SessionBuilder};
