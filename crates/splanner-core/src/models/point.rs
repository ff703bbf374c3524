//! Planar waypoint coordinates.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrorKind};

/// A coordinate in the field-map image frame.
///
/// On the wire a point is the ordered pair `[x, y]`, never a keyed record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a point, rejecting NaN and infinite coordinates.
    pub fn new(x: f64, y: f64) -> Result<Self, ValidationError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ValidationError::new(
                ValidationErrorKind::NonFiniteCoordinate,
                format!("point ({x}, {y}) has a non-finite coordinate"),
            ));
        }
        Ok(Self { x, y })
    }

    /// Builds a point from values already known to be finite (curve samples).
    pub(crate) const fn raw(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl TryFrom<[f64; 2]> for Point {
    type Error = ValidationError;

    fn try_from([x, y]: [f64; 2]) -> Result<Self, Self::Error> {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::raw(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::raw(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::raw(self.x * rhs, self.y * rhs)
    }
}
