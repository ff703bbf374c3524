//! Plan model definition and related functionality.

use std::sync::Arc;

use super::run::validate_name;
use super::{Action, CapacityWarning, DriveBase, Hub, Point, Run};
use crate::error::{Result, SplanError};

/// The top-level document: drive geometry plus named runs.
///
/// Runs are shared copy-on-write, so cloning a plan is a cheap snapshot and
/// a later mutation never shows through an earlier clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    name: String,
    hub_type: Option<Hub>,
    drive_base: DriveBase,
    runs: Vec<Arc<Run>>,
}

impl Plan {
    /// Creates an empty plan.
    pub fn new(name: &str, drive_base: DriveBase) -> Result<Self> {
        Ok(Self {
            name: validate_name(name, "plan")?,
            hub_type: None,
            drive_base,
            runs: Vec::new(),
        })
    }

    /// Assembles a plan from already-built runs, re-validating the name.
    pub fn from_parts(
        name: &str,
        hub_type: Option<Hub>,
        drive_base: DriveBase,
        runs: Vec<Run>,
    ) -> Result<Self> {
        Ok(Self {
            name: validate_name(name, "plan")?,
            hub_type,
            drive_base,
            runs: runs.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hub_type(&self) -> Option<Hub> {
        self.hub_type
    }

    pub fn drive_base(&self) -> &DriveBase {
        &self.drive_base
    }

    pub fn runs(&self) -> impl ExactSizeIterator<Item = &Run> {
        self.runs.iter().map(AsRef::as_ref)
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn run(&self, index: usize) -> Result<&Run> {
        self.runs
            .get(index)
            .map(AsRef::as_ref)
            .ok_or(SplanError::IndexOutOfRange {
                what: "run",
                index,
                len: self.runs.len(),
            })
    }

    /// Clones the run out of shared storage if a snapshot still refers to it.
    fn run_mut(&mut self, index: usize) -> Result<&mut Run> {
        let len = self.runs.len();
        self.runs
            .get_mut(index)
            .map(Arc::make_mut)
            .ok_or(SplanError::IndexOutOfRange {
                what: "run",
                index,
                len,
            })
    }

    pub fn set_hub_type(&mut self, hub_type: Option<Hub>) {
        self.hub_type = hub_type;
    }

    pub fn set_drive_base(&mut self, drive_base: DriveBase) {
        self.drive_base = drive_base;
    }

    /// Appends an empty run and returns its index.
    pub fn add_run(&mut self, name: &str) -> Result<usize> {
        self.runs.push(Arc::new(Run::new(name)?));
        Ok(self.runs.len() - 1)
    }

    pub fn rename_run(&mut self, run: usize, name: &str) -> Result<()> {
        self.run_mut(run)?.rename(name)
    }

    pub fn remove_run(&mut self, run: usize) -> Result<Run> {
        if run >= self.runs.len() {
            return Err(SplanError::IndexOutOfRange {
                what: "run",
                index: run,
                len: self.runs.len(),
            });
        }
        let removed = self.runs.remove(run);
        Ok(Arc::try_unwrap(removed).unwrap_or_else(|shared| (*shared).clone()))
    }

    pub fn add_point_to_run(&mut self, run: usize, point: Point) -> Result<Option<CapacityWarning>> {
        self.run_mut(run)?.push_point(point)
    }

    /// Replaces a waypoint in place; anchored actions follow it.
    pub fn replace_point(&mut self, run: usize, index: usize, point: Point) -> Result<Point> {
        self.run_mut(run)?.replace_point(index, point)
    }

    /// Removes a waypoint and returns the actions that were anchored to it.
    pub fn remove_point(&mut self, run: usize, index: usize) -> Result<Vec<Action>> {
        self.run_mut(run)?.remove_point(index)
    }

    pub fn add_action(&mut self, run: usize, action: Action) -> Result<usize> {
        self.run_mut(run)?.add_action(action)
    }

    pub fn remove_action(&mut self, run: usize, index: usize) -> Result<Action> {
        self.run_mut(run)?.remove_action(index)
    }

    /// Total waypoints across all runs.
    pub fn total_points(&self) -> usize {
        self.runs.iter().map(|r| r.points().len()).sum()
    }
}
