//! Run model: one named waypoint path with its actions.

use log::warn;

use super::{Action, Point};
use crate::error::{Result, SplanError, ValidationError, ValidationErrorKind};

/// Point count from which insertions report a [`CapacityWarning`].
pub const SOFT_POINT_LIMIT: usize = 25;

/// Point count a run may never reach; the insertion that would reach it is
/// rejected.
pub const MAX_POINTS_PER_RUN: usize = 50;

/// Non-fatal notice that a run is getting crowded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityWarning {
    /// Number of points in the run after the insertion
    pub points: usize,
    pub soft_limit: usize,
    pub hard_limit: usize,
}

/// An ordered waypoint path plus the actions anchored to its points.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    name: String,
    points: Vec<Point>,
    actions: Vec<Action>,
}

/// Rejects empty and whitespace-only names. Accepted names are kept exactly
/// as given, surrounding whitespace included.
pub(crate) fn validate_name(name: &str, what: &str) -> std::result::Result<String, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyName,
            format!("{what} name must not be empty"),
        ));
    }
    Ok(name.to_string())
}

impl Run {
    /// Creates an empty run.
    pub fn new(name: &str) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(name, "run")?,
            points: Vec::new(),
            actions: Vec::new(),
        })
    }

    /// Builds a run from existing points and actions, enforcing the point
    /// ceiling and that every action anchors to one of `points`.
    pub fn with_parts(name: &str, points: Vec<Point>, actions: Vec<Action>) -> Result<Self> {
        let name = validate_name(name, "run")?;
        if points.len() >= MAX_POINTS_PER_RUN {
            return Err(SplanError::CapacityExceeded {
                run: name,
                limit: MAX_POINTS_PER_RUN,
            });
        }
        let mut run = Self {
            name,
            points,
            actions: Vec::with_capacity(actions.len()),
        };
        for action in actions {
            run.add_action(action)?;
        }
        Ok(run)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Waypoint the given action is anchored to.
    pub fn anchor_point(&self, action: &Action) -> Option<Point> {
        self.points.get(action.anchor).copied()
    }

    /// Index of the first waypoint equal to `point`.
    pub fn position_of(&self, point: &Point) -> Option<usize> {
        self.points.iter().position(|p| p == point)
    }

    pub(crate) fn rename(&mut self, name: &str) -> Result<()> {
        self.name = validate_name(name, "run")?;
        Ok(())
    }

    /// Appends a waypoint.
    ///
    /// Returns a warning once the run holds [`SOFT_POINT_LIMIT`] points and
    /// rejects the insertion that would bring it to [`MAX_POINTS_PER_RUN`].
    pub(crate) fn push_point(&mut self, point: Point) -> Result<Option<CapacityWarning>> {
        if self.points.len() + 1 >= MAX_POINTS_PER_RUN {
            return Err(SplanError::CapacityExceeded {
                run: self.name.clone(),
                limit: MAX_POINTS_PER_RUN,
            });
        }
        self.points.push(point);

        let points = self.points.len();
        if points >= SOFT_POINT_LIMIT {
            warn!("Run '{}' now holds {points} points", self.name);
            return Ok(Some(CapacityWarning {
                points,
                soft_limit: SOFT_POINT_LIMIT,
                hard_limit: MAX_POINTS_PER_RUN,
            }));
        }
        Ok(None)
    }

    pub(crate) fn replace_point(&mut self, index: usize, point: Point) -> Result<Point> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(SplanError::IndexOutOfRange {
                what: "point",
                index,
                len,
            })?;
        Ok(std::mem::replace(slot, point))
    }

    /// Removes a waypoint, dropping the actions anchored to it and shifting
    /// later anchors so they keep pointing at the same waypoints.
    pub(crate) fn remove_point(&mut self, index: usize) -> Result<Vec<Action>> {
        if index >= self.points.len() {
            return Err(SplanError::IndexOutOfRange {
                what: "point",
                index,
                len: self.points.len(),
            });
        }
        self.points.remove(index);

        let (dropped, kept): (Vec<Action>, Vec<Action>) =
            self.actions.drain(..).partition(|a| a.anchor == index);
        self.actions = kept
            .into_iter()
            .map(|mut a| {
                if a.anchor > index {
                    a.anchor -= 1;
                }
                a
            })
            .collect();

        if !dropped.is_empty() {
            warn!(
                "Removed {} action(s) anchored to point {index} of run '{}'",
                dropped.len(),
                self.name
            );
        }
        Ok(dropped)
    }

    pub(crate) fn add_action(&mut self, action: Action) -> Result<usize> {
        if action.anchor >= self.points.len() {
            return Err(SplanError::validation(ValidationErrorKind::DanglingAnchor).with_reason(
                format!(
                    "action '{}' anchored to point {} but run '{}' has {} points",
                    action.operation_name,
                    action.anchor,
                    self.name,
                    self.points.len()
                ),
            ));
        }
        self.actions.push(action);
        Ok(self.actions.len() - 1)
    }

    pub(crate) fn remove_action(&mut self, index: usize) -> Result<Action> {
        if index >= self.actions.len() {
            return Err(SplanError::IndexOutOfRange {
                what: "action",
                index,
                len: self.actions.len(),
            });
        }
        Ok(self.actions.remove(index))
    }
}
