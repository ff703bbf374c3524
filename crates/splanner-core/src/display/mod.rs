//! Display formatting for plans and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly; collections and
//! operation outcomes get small wrapper types so the same data can be shown
//! differently depending on context.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Formatted     │
//! │  (Plan, Run)    │───▶│ Result Types    │───▶│    Output       │
//! │                 │    │                 │    │   (Terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! All formatters produce markdown, which the CLI renders richly or prints
//! verbatim.
//!
//! - [`collections`]: Collection wrappers (CurvePoints, RunList)
//! - [`results`]: Operation results (CommandResult, GenerateResult)
//! - [`status`]: Confirmation messages (OperationStatus)
//! - [`models`]: Display implementations for domain models
//!
//! ```rust
//! use splanner_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Saved mission.pysplan");
//! assert_eq!(status.to_string(), "Success: Saved mission.pysplan\n");
//! ```

pub mod collections;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{CurvePoints, RunList};
pub use results::{CommandResult, GenerateResult};
pub use status::OperationStatus;
