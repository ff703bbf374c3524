//! Curve interpolation through run waypoints.
//!
//! Implements an adaptive Catmull-Rom spline: each segment between two
//! waypoints is sampled with a step count proportional to its length, so the
//! emitted points are spaced roughly evenly no matter how far apart the
//! waypoints are.
//!
//! The engine is pure. The same waypoints and [`CurveParams`] always produce
//! bit-identical samples because every sample is evaluated with a fixed
//! operation order.
//!
//! ```rust
//! use splanner_core::{curve::{interpolate, CurveParams}, models::Point};
//!
//! let waypoints = [Point::new(0.0, 0.0)?, Point::new(10.0, 0.0)?];
//! let samples = interpolate(&waypoints, &CurveParams::default());
//! assert_eq!(samples.first(), waypoints.first());
//! assert_eq!(samples.last(), waypoints.last());
//! # Ok::<(), splanner_core::error::ValidationError>(())
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::Point;

/// Default tangent scale.
pub const DEFAULT_TENSION: f64 = 0.5;

/// Default samples per unit of segment length.
pub const DEFAULT_DENSITY: f64 = 0.035;

/// Lower bound on samples per segment (excluding the start sample).
pub const MIN_SEGMENT_STEPS: usize = 2;

/// Upper bound on samples per segment, reached only by waypoints absurdly
/// far apart or an extreme density.
pub const MAX_SEGMENT_STEPS: usize = 10_000;

/// Tuning knobs for the spline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Scale applied to the Catmull-Rom tangents
    pub tension: f64,
    /// Steps per unit of segment length
    pub density: f64,
    /// Wrap the virtual end points around instead of mirroring them
    pub closed: bool,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            tension: DEFAULT_TENSION,
            density: DEFAULT_DENSITY,
            closed: false,
        }
    }
}

/// Number of steps used for a segment of the given length.
pub fn segment_steps(length: f64, density: f64) -> usize {
    let steps = (length * density).floor();
    // NaN and negative products saturate to zero here, infinity to usize::MAX.
    (steps as usize).clamp(MIN_SEGMENT_STEPS, MAX_SEGMENT_STEPS)
}

/// Lazy sequence of curve samples through a run's waypoints.
///
/// Each segment yields `steps + 1` samples, so the last sample of a segment
/// and the first sample of the next one coincide. With fewer than two
/// waypoints the input is yielded unchanged.
#[derive(Debug, Clone)]
pub struct CurveSamples<'a> {
    points: &'a [Point],
    params: CurveParams,
    virtual_start: Point,
    virtual_end: Point,
    segment: usize,
    step: usize,
    steps: usize,
}

impl<'a> CurveSamples<'a> {
    pub fn new(points: &'a [Point], params: CurveParams) -> Self {
        let n = points.len();
        let (virtual_start, virtual_end) = match n {
            0 => (Point::raw(0.0, 0.0), Point::raw(0.0, 0.0)),
            1 => (points[0], points[0]),
            _ if params.closed => (points[n - 1], points[0]),
            _ => (
                points[0] * 2.0 - points[1],
                points[n - 1] * 2.0 - points[n - 2],
            ),
        };

        let mut samples = Self {
            points,
            params,
            virtual_start,
            virtual_end,
            segment: 0,
            step: 0,
            steps: 0,
        };
        if n >= 2 {
            samples.steps = samples.steps_for(0);
        }
        samples
    }

    /// Control point at `index` of the padded sequence
    /// `[virtual_start, points.., virtual_end]`.
    fn control(&self, index: usize) -> Point {
        if index == 0 {
            self.virtual_start
        } else if index > self.points.len() {
            self.virtual_end
        } else {
            self.points[index - 1]
        }
    }

    fn steps_for(&self, segment: usize) -> usize {
        let length = self.points[segment].distance(&self.points[segment + 1]);
        segment_steps(length, self.params.density)
    }

    fn evaluate(&self) -> Point {
        let i = self.segment;
        let before = self.control(i);
        let start = self.control(i + 1);
        let end = self.control(i + 2);
        let after = self.control(i + 3);
        let tension = self.params.tension;

        let t1x = (end.x() - before.x()) * tension;
        let t2x = (after.x() - start.x()) * tension;
        let t1y = (end.y() - before.y()) * tension;
        let t2y = (after.y() - start.y()) * tension;

        let s = self.step as f64 / self.steps as f64;
        let s2 = s * s;
        let s3 = s2 * s;
        let c1 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let c2 = -2.0 * s3 + 3.0 * s2;
        let c3 = s3 - 2.0 * s2 + s;
        let c4 = s3 - s2;

        let x = c1 * start.x() + c2 * end.x() + c3 * t1x + c4 * t2x;
        let y = c1 * start.y() + c2 * end.y() + c3 * t1y + c4 * t2y;
        Point::raw(x, y)
    }
}

impl Iterator for CurveSamples<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.points.len() < 2 {
            let point = self.points.get(self.step).copied();
            self.step += 1;
            return point;
        }
        if self.segment + 1 >= self.points.len() {
            return None;
        }

        let point = self.evaluate();
        if self.step == self.steps {
            self.segment += 1;
            self.step = 0;
            if self.segment + 1 < self.points.len() {
                self.steps = self.steps_for(self.segment);
            }
        } else {
            self.step += 1;
        }
        Some(point)
    }
}

impl std::iter::FusedIterator for CurveSamples<'_> {}

/// Samples the whole curve eagerly.
pub fn interpolate(points: &[Point], params: &CurveParams) -> Vec<Point> {
    let samples: Vec<Point> = CurveSamples::new(points, *params).collect();
    debug!(
        "Interpolated {} waypoints into {} samples",
        points.len(),
        samples.len()
    );
    samples
}

/// Length of the polyline through `points`.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
