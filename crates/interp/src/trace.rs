//! Trace interpolation along cumulative length
//!
//! Progress maps to a target distance `p × length`. The containing segment
//! is found in the precomputed cumulative table and the point is blended
//! linearly between the segment endpoints.
//!
//! The position driver asks for a point every tick with ever-growing
//! progress, so [`TraceInterpolator::at`] accepts the previous result and
//! scans forward from its segment instead of searching the whole table.

use drift_model::{CoordinateSystem, Point, Projector, Trace};

/// Where on the trace a progress value landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePosition {
    pub point: Point,
    /// Segment index: the point lies between `points[index]` and `points[index + 1]`
    pub index: usize,
    /// Progress this position was computed for
    pub progress: f64,
}

/// Interpolator over one (usually salted) trace
#[derive(Debug, Clone)]
pub struct TraceInterpolator {
    points: Vec<Point>,
    /// Distance from the first point to each point; same length as `points`
    cumulative: Vec<f64>,
    coordinate_system: CoordinateSystem,
}

impl TraceInterpolator {
    pub fn new(trace: &Trace, projector: &dyn Projector) -> Self {
        let mut cumulative = Vec::with_capacity(trace.points.len());
        let mut covered = 0.0;
        for (i, point) in trace.points.iter().enumerate() {
            if i > 0 {
                covered += projector.distance(&trace.points[i - 1], point);
            }
            cumulative.push(covered);
        }

        Self {
            points: trace.points.clone(),
            cumulative,
            coordinate_system: trace.coordinate_system,
        }
    }

    /// Total trace length
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point at `progress`, optionally resuming from `previous`
    ///
    /// Resuming only changes how the segment is found, never the result:
    /// the returned position is a pure function of the trace and `progress`.
    pub fn at(&self, progress: f64, previous: Option<&TracePosition>) -> TracePosition {
        let position = |point, index| TracePosition {
            point,
            index,
            progress,
        };

        match self.points.len() {
            0 => return position(Point::zero(self.coordinate_system), 0),
            1 => return position(self.points[0], 0),
            _ => {}
        }

        let last_segment = self.points.len() - 2;
        let total = self.length();

        // `!(p > 0)` also catches NaN
        if !(progress > 0.0) || total <= 0.0 {
            return position(self.points[0], 0);
        }
        if progress >= 1.0 {
            return position(self.points[last_segment + 1], last_segment);
        }

        let target = progress * total;
        let index = match previous {
            Some(prev)
                if prev.progress <= progress
                    && prev.index <= last_segment
                    && self.cumulative[prev.index] <= target =>
            {
                self.scan_forward(prev.index, target)
            }
            _ => self.search(target),
        };

        let start = self.cumulative[index];
        let span = self.cumulative[index + 1] - start;
        let fraction = if span > 0.0 { (target - start) / span } else { 0.0 };

        position(
            self.points[index].lerp(&self.points[index + 1], fraction),
            index,
        )
    }

    /// Last segment whose start is at or before `target`, scanning from `from`
    fn scan_forward(&self, from: usize, target: f64) -> usize {
        let last_segment = self.points.len() - 2;
        let mut index = from;
        while index < last_segment && self.cumulative[index + 1] <= target {
            index += 1;
        }
        index
    }

    /// Last segment whose start is at or before `target`, by binary search
    fn search(&self, target: f64) -> usize {
        let last_segment = self.points.len() - 2;
        self.cumulative
            .partition_point(|&covered| covered <= target)
            .saturating_sub(1)
            .min(last_segment)
    }
}

#[cfg(test)]
#[path = "trace_test.rs"]
mod trace_test;
