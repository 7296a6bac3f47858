//! Externally visible playback state
//!
//! What the hooking layer reads while a session plays: whether hooking is
//! active, the current position and cell moment, and how many satellites to
//! fake. Each field has a single writer (the session or one driver).

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use drift_model::{CellMoment, CoordinateSystem, Point};
use parking_lot::RwLock;

/// Lifecycle of the most recent session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionStatus {
    Idle = 0,
    Running = 1,
    Stopped = 2,
}

impl SessionStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopped,
            _ => Self::Idle,
        }
    }
}

/// State shared between the session, its drivers and outside readers
#[derive(Debug)]
pub struct PlaybackState {
    hooking: AtomicBool,
    status: AtomicU8,
    satellites: AtomicU32,
    location: RwLock<Point>,
    cell: RwLock<Option<CellMoment>>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            hooking: AtomicBool::new(false),
            status: AtomicU8::new(SessionStatus::Idle as u8),
            satellites: AtomicU32::new(0),
            location: RwLock::new(Point::zero(CoordinateSystem::Wgs84)),
            cell: RwLock::new(None),
        }
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_hooking(&self) -> bool {
        self.hooking.load(Ordering::Acquire)
    }

    pub fn set_hooking(&self, hooking: bool) {
        self.hooking.store(hooking, Ordering::Release);
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub fn set_status(&self, status: SessionStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    pub fn satellites(&self) -> u32 {
        self.satellites.load(Ordering::Relaxed)
    }

    pub fn set_satellites(&self, count: u32) {
        self.satellites.store(count, Ordering::Relaxed);
    }

    /// Current position; the zero point before any playback
    pub fn location(&self) -> Point {
        *self.location.read()
    }

    pub fn set_location(&self, point: Point) {
        *self.location.write() = point;
    }

    pub fn cell(&self) -> Option<CellMoment> {
        self.cell.read().clone()
    }

    pub fn set_cell(&self, moment: CellMoment) {
        *self.cell.write() = Some(moment);
    }
}
