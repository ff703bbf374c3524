//! Actions scheduled at waypoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One argument of an action call.
///
/// Arguments are opaque to the planner and forwarded verbatim into generated
/// code, but restricted to values that survive a JSON round trip. Integers
/// stay integers, so `90` is never re-emitted as `90.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum ActionArg {
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl ActionArg {
    /// Interprets a command-line token: booleans, then integers, then
    /// numbers, else text.
    pub fn parse_lossy(token: &str) -> Self {
        match token {
            "true" => ActionArg::Bool(true),
            "false" => ActionArg::Bool(false),
            _ => {
                if let Ok(n) = token.parse::<i64>() {
                    return ActionArg::Int(n);
                }
                match token.parse::<f64>() {
                    Ok(n) if n.is_finite() => ActionArg::Number(n),
                    _ => ActionArg::Text(token.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for ActionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionArg::Bool(b) => write!(f, "{b}"),
            ActionArg::Int(n) => write!(f, "{n}"),
            ActionArg::Number(n) => write!(f, "{n}"),
            ActionArg::Text(t) => write!(f, "{t:?}"),
        }
    }
}

impl From<f64> for ActionArg {
    fn from(value: f64) -> Self {
        ActionArg::Number(value)
    }
}

impl From<i64> for ActionArg {
    fn from(value: i64) -> Self {
        ActionArg::Int(value)
    }
}

impl From<bool> for ActionArg {
    fn from(value: bool) -> Self {
        ActionArg::Bool(value)
    }
}

impl From<&str> for ActionArg {
    fn from(value: &str) -> Self {
        ActionArg::Text(value.to_string())
    }
}

/// A robot-side routine to invoke when the run reaches a waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Index of the anchor waypoint in the owning run
    pub anchor: usize,
    /// Name of the routine on the robot
    pub operation_name: String,
    pub arguments: Vec<ActionArg>,
    /// Robot stops at the waypoint until the routine returns; otherwise the
    /// routine runs while the robot keeps driving
    pub blocking: bool,
}

impl Action {
    /// Creates a non-blocking action.
    pub fn new(anchor: usize, operation_name: impl Into<String>, arguments: Vec<ActionArg>) -> Self {
        Self {
            anchor,
            operation_name: operation_name.into(),
            arguments,
            blocking: false,
        }
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }
}
