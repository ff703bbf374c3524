//! Display implementations for domain models.
//!
//! All output is markdown so the CLI can render it richly or print it
//! verbatim.

use std::fmt;

use crate::models::{Action, DriveBase, Hub, MotorPort, Plan, Point, Run};

impl fmt::Display for MotorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl fmt::Display for DriveBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left motor {}, right motor {}, wheel {} mm, axle track {} mm",
            self.left_motor_port(),
            self.right_motor_port(),
            self.wheel_diameter(),
            self.axle_track()
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation_name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")?;
        if self.blocking {
            f.write_str(" [blocking]")?;
        }
        Ok(())
    }
}

impl Run {
    /// Writes the run as a markdown section with the given position.
    pub(crate) fn fmt_section(&self, position: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {position}. {} ({} points, {} actions)",
            self.name(),
            self.points().len(),
            self.actions().len()
        )?;
        writeln!(f)?;

        if self.points().is_empty() {
            writeln!(f, "No points in this run.")?;
            writeln!(f)?;
            return Ok(());
        }

        for (index, point) in self.points().iter().enumerate() {
            write!(f, "- {index}: {point}")?;
            let anchored: Vec<String> = self
                .actions()
                .iter()
                .filter(|a| a.anchor == index)
                .map(ToString::to_string)
                .collect();
            if !anchored.is_empty() {
                write!(f, " → {}", anchored.join(", "))?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_section(0, f)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name())?;
        writeln!(f)?;

        // Metadata section
        match self.hub_type() {
            Some(hub) => writeln!(f, "- Hub: {hub}")?,
            None => writeln!(f, "- Hub: not selected")?,
        }
        writeln!(f, "- Drive base: {}", self.drive_base())?;
        writeln!(f, "- Points: {}", self.total_points())?;

        if self.run_count() > 0 {
            writeln!(f, "\n## Runs")?;
            writeln!(f)?;
            for (position, run) in self.runs().enumerate() {
                run.fmt_section(position, f)?;
            }
        } else {
            writeln!(f, "\nNo runs in this plan.")?;
        }

        Ok(())
    }
}
