//! Drift interpolators
//!
//! Three pure algorithms that map a normalized progress value onto a sample:
//!
//! ```text
//!            progress ∈ [0, 1]
//!                   │
//!     ┌─────────────┼──────────────┐
//!     ▼             ▼              ▼
//! ┌─────────┐  ┌──────────┐  ┌────────────┐
//! │  Trace  │  │  Motion  │  │ CellCursor │
//! │ (dist.) │  │  (time)  │  │  (events)  │
//! └─────────┘  └──────────┘  └────────────┘
//!     │             │              │
//!   Point     MotionMoment    CellMoment + hold
//! ```
//!
//! - [`TraceInterpolator`] walks the cumulative polyline length, resuming
//!   from the previous segment when progress only moves forward.
//! - [`MotionInterpolator`] stretches the motion recording over the playback
//!   and blends each sensor channel between the bracketing moments.
//! - [`CellCursor`] replays a telephony timeline event by event, pacing the
//!   holds proportionally to the recorded gaps.
//!
//! None of these touch a clock; the session feeds them progress.

pub mod cell;
pub mod motion;
pub mod trace;

pub use cell::{CellCursor, CellStep, Hold};
pub use motion::{MotionInterpolator, MotionSample};
pub use trace::{TraceInterpolator, TracePosition};
