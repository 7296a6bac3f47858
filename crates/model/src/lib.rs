//! Drift data model
//!
//! Value types shared by every layer of the playback scheduler. Everything
//! here is immutable input: the controller sends an [`Emulation`], the
//! session derives [`EmulationInfo`] and [`Intermediate`] reports from it,
//! and the drivers read the trace, motion and cell timelines without ever
//! mutating them.
//!
//! # Wire format
//!
//! All types serialize as JSON with camelCase field names, matching what the
//! controller sends and expects:
//!
//! ```
//! use drift_model::Emulation;
//!
//! let json = r#"{
//!     "trace": {"points": [{"latitude": 0.0, "longitude": 0.0}, {"latitude": 0.0, "longitude": 1.0}]},
//!     "velocity": 1.0,
//!     "repeat": 1,
//!     "satelliteCount": 0
//! }"#;
//! let emulation: Emulation = serde_json::from_str(json).unwrap();
//! assert!(emulation.validate().is_ok());
//! ```

pub mod cell;
pub mod emulation;
pub mod error;
pub mod motion;
pub mod point;
pub mod projection;
pub mod toggle;
pub mod trace;

pub use cell::{CellInfo, CellLocation, CellMoment, CellTimeline, NeighboringCell, Radio};
pub use emulation::{Emulation, EmulationInfo, Intermediate};
pub use error::{ModelError, Result};
pub use motion::{Motion, MotionMoment, SensorType};
pub use point::{CoordinateSystem, Point};
pub use projection::{Haversine, Planar, Projector};
pub use toggle::Toggle;
pub use trace::Trace;
