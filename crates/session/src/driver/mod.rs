//! Stream drivers
//!
//! One cooperative loop per stream. Every loop checks
//! `SessionContext::is_live` at its head and races each sleep against the
//! session's cancellation token, so a cancelled session never waits out a
//! tick.
//!
//! | Driver   | Active when                        | Cadence                  |
//! |----------|------------------------------------|--------------------------|
//! | `trace`  | always                             | `trace_tick`             |
//! | `steps`  | motion enabled, step sensors       | `step_stride / velocity` |
//! | `motion` | motion enabled, non-step sensors   | `motion_tick`            |
//! | `cell`   | cells enabled, at least one moment | recorded gaps, scaled    |
//!
//! A sink error ends the failing driver for the rest of the iteration.

pub(crate) mod cell;
pub(crate) mod motion;
pub(crate) mod steps;
pub(crate) mod trace;
