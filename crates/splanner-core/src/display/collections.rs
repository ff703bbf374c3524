//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::models::{Plan, Point};

/// Newtype wrapper for displaying sampled curve points as a markdown table.
///
/// # Examples
///
/// ```rust
/// use splanner_core::{display::CurvePoints, models::Point};
///
/// let samples = vec![Point::new(0.0, 0.0).unwrap(), Point::new(5.0, 0.0).unwrap()];
/// let output = CurvePoints(&samples).to_string();
/// assert!(output.contains("| 1 | 5 | 0 |"));
/// ```
pub struct CurvePoints<'a>(pub &'a [Point]);

impl CurvePoints<'_> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CurvePoints<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No curve samples.");
        }

        writeln!(f, "| # | x | y |")?;
        writeln!(f, "|---|---|---|")?;
        for (index, point) in self.0.iter().enumerate() {
            writeln!(f, "| {index} | {} | {} |", point.x(), point.y())?;
        }
        Ok(())
    }
}

/// Newtype wrapper listing the runs of a plan, one line each.
pub struct RunList<'a>(pub &'a Plan);

impl fmt::Display for RunList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.run_count() == 0 {
            return writeln!(f, "No runs found.");
        }

        for (index, run) in self.0.runs().enumerate() {
            writeln!(
                f,
                "- **{index}**: {} ({} points, {} actions)",
                run.name(),
                run.points().len(),
                run.actions().len()
            )?;
        }
        Ok(())
    }
}
