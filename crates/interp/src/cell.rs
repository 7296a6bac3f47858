//! Cell timeline pacing
//!
//! Cell moments are events, not continuous values, so they are replayed one
//! after another rather than blended. The hold after each moment is the
//! recorded gap to the next one, scaled so the whole timeline spans the
//! playback duration.
//!
//! Boundary policy: the cursor stops at the second-to-last moment. For a
//! timeline of N > 1 moments exactly N - 1 moments are yielded and the final
//! recorded moment never is. A single-moment timeline yields its moment once
//! with a hold covering the full duration.

use std::time::Duration;

use drift_model::{CellMoment, CellTimeline};

/// What the driver should do after publishing a moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Keep this moment for the whole playback, then stop
    Halt(Duration),
    /// Wait this long, then advance to the next moment
    For(Duration),
    /// Nothing follows
    Done,
}

/// One step of cell playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStep<'a> {
    pub index: usize,
    pub moment: &'a CellMoment,
    pub hold: Hold,
}

/// Iterator over the paced moments of a timeline
#[derive(Debug, Clone)]
pub struct CellCursor<'a> {
    timeline: &'a CellTimeline,
    /// Playback duration in seconds
    duration: f64,
    next: usize,
    finished: bool,
}

impl<'a> CellCursor<'a> {
    pub fn new(timeline: &'a CellTimeline, duration: f64) -> Self {
        Self {
            timeline,
            duration,
            next: 0,
            finished: false,
        }
    }

    /// Hold of `seconds`: zero for negative or NaN, saturating on overflow
    fn hold_for(seconds: f64) -> Duration {
        if seconds.is_nan() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

impl<'a> Iterator for CellCursor<'a> {
    type Item = CellStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let moments = &self.timeline.moments;
        if self.finished || self.next >= moments.len() {
            return None;
        }

        let index = self.next;
        let moment = &moments[index];

        if moments.len() == 1 {
            self.finished = true;
            return Some(CellStep {
                index,
                moment,
                hold: Hold::Halt(Self::hold_for(self.duration)),
            });
        }

        if index == moments.len() - 2 {
            self.finished = true;
            return Some(CellStep {
                index,
                moment,
                hold: Hold::Done,
            });
        }

        let timespan = f64::from(self.timeline.timespan());
        let gap = f64::from(moments[index + 1].elapsed - moment.elapsed);
        let pause = if timespan > 0.0 {
            gap / timespan * self.duration
        } else {
            0.0
        };

        self.next += 1;
        Some(CellStep {
            index,
            moment,
            hold: Hold::For(Self::hold_for(pause)),
        })
    }
}
