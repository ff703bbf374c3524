//! Result wrapper types for displaying operation outcomes.
//!
//! This module provides wrapper types that format the results of editing
//! commands and script generation with consistent messaging.

use std::fmt;

use crate::{codegen::GeneratedScript, session::CommandOutcome};

/// Wrapper type for displaying the result of an editing command.
///
/// Formats a headline, any capacity warning or cascaded action removals, and
/// then the updated plan.
///
/// # Examples
///
/// ```rust
/// use splanner_core::{
///     display::CommandResult,
///     models::MotorPort,
///     params::CreatePlan,
///     session::{PlanCommand, SessionBuilder},
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = SessionBuilder::new()
///     .with_new_plan(CreatePlan {
///         name: "Mission".to_string(),
///         left_motor_port: MotorPort::A,
///         right_motor_port: MotorPort::B,
///         wheel_diameter: 56.0,
///         axle_track: 112.0,
///         hub_type: None,
///         first_run: None,
///     })
///     .build()
///     .await?;
///
/// let outcome = session.apply(PlanCommand::CreateRun { name: "Warm-up".to_string() })?;
/// println!("{}", CommandResult::new("Created run 'Warm-up'", outcome));
/// # Ok(())
/// # }
/// ```
pub struct CommandResult {
    pub headline: String,
    pub outcome: CommandOutcome,
}

impl CommandResult {
    pub fn new(headline: impl Into<String>, outcome: CommandOutcome) -> Self {
        Self {
            headline: headline.into(),
            outcome,
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;

        if let Some(warning) = &self.outcome.warning {
            writeln!(f)?;
            writeln!(
                f,
                "> Warning: run has {} points; keep it under {} (hard limit {}).",
                warning.points, warning.soft_limit, warning.hard_limit
            )?;
        }

        if !self.outcome.removed_actions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Removed actions:")?;
            for action in &self.outcome.removed_actions {
                writeln!(f, "- {action}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.outcome.snapshot)
    }
}

/// Wrapper type summarizing a generated script without printing its body.
pub struct GenerateResult<'a> {
    pub script: &'a GeneratedScript,
    pub destination: Option<String>,
}

impl<'a> GenerateResult<'a> {
    pub fn new(script: &'a GeneratedScript) -> Self {
        Self {
            script,
            destination: None,
        }
    }

    /// Names where the script was written or sent.
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

impl fmt::Display for GenerateResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {} script ({} bytes)",
            self.script.hub,
            self.script.text.len()
        )?;
        match &self.destination {
            Some(destination) => writeln!(f, " → {destination}"),
            None => writeln!(f),
        }
    }
}
