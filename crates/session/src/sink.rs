//! Sample sinks
//!
//! Drivers hand every computed sample to a [`SampleSink`]. Publishing is
//! synchronous and must not block beyond the current tick; a sink that needs
//! to do I/O queues the sample and returns.
//!
//! [`FanoutSink`] redirects each stream to whatever listeners are currently
//! registered, which is how a hooking layer swaps the platform's own
//! location/sensor/telephony listeners for playback ones.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use drift_model::{CellMoment, MotionMoment, Point};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::SinkError;

/// Consumer of the three playback streams
pub trait SampleSink: Send + Sync {
    fn publish_position(&self, point: &Point) -> Result<(), SinkError>;

    fn publish_motion(&self, moment: &MotionMoment) -> Result<(), SinkError>;

    fn publish_cell(&self, moment: &CellMoment) -> Result<(), SinkError>;
}

/// Counter for generating unique subscriber IDs
static SUBSCRIBER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

type Delivery<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Listeners of one stream, keyed by an opaque id
pub struct SubscriberRegistry<T> {
    subscribers: RwLock<Vec<(u64, Delivery<T>)>>,
}

impl<T> Default for SubscriberRegistry<T> {
    fn default() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }
}

impl<T> SubscriberRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, returning its id
    pub fn subscribe<F>(&self, deliver: F) -> u64
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SUBSCRIBER_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().push((id, Arc::new(deliver)));
        id
    }

    /// Remove a listener; returns false if the id was unknown
    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.write();
        let original_len = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != original_len
    }

    pub fn count(&self) -> usize {
        self.subscribers.read().len()
    }

    #[inline]
    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.read().is_empty()
    }

    /// Deliver `sample` to every current listener
    ///
    /// Listeners run outside the lock, so they may (un)subscribe.
    /// Returns the number of listeners reached.
    pub fn publish(&self, sample: &T) -> usize {
        let current: Vec<Delivery<T>> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, deliver)| Arc::clone(deliver))
            .collect();

        for deliver in &current {
            deliver(sample);
        }
        current.len()
    }
}

/// Sink that fans each stream out to its registered listeners
#[derive(Default)]
pub struct FanoutSink {
    positions: SubscriberRegistry<Point>,
    motion: SubscriberRegistry<MotionMoment>,
    cells: SubscriberRegistry<CellMoment>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &SubscriberRegistry<Point> {
        &self.positions
    }

    pub fn motion(&self) -> &SubscriberRegistry<MotionMoment> {
        &self.motion
    }

    pub fn cells(&self) -> &SubscriberRegistry<CellMoment> {
        &self.cells
    }
}

impl SampleSink for FanoutSink {
    fn publish_position(&self, point: &Point) -> Result<(), SinkError> {
        self.positions.publish(point);
        Ok(())
    }

    fn publish_motion(&self, moment: &MotionMoment) -> Result<(), SinkError> {
        self.motion.publish(moment);
        Ok(())
    }

    fn publish_cell(&self, moment: &CellMoment) -> Result<(), SinkError> {
        self.cells.publish(moment);
        Ok(())
    }
}

/// Sink that logs every sample at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SampleSink for LogSink {
    fn publish_position(&self, point: &Point) -> Result<(), SinkError> {
        debug!(
            latitude = point.latitude,
            longitude = point.longitude,
            system = ?point.coordinate_system,
            "position"
        );
        Ok(())
    }

    fn publish_motion(&self, moment: &MotionMoment) -> Result<(), SinkError> {
        debug!(
            elapsed = moment.elapsed,
            sensors = ?moment.data.keys().collect::<Vec<_>>(),
            "motion"
        );
        Ok(())
    }

    fn publish_cell(&self, moment: &CellMoment) -> Result<(), SinkError> {
        debug!(
            elapsed = moment.elapsed,
            cells = moment.cell.len(),
            neighboring = moment.neighboring.len(),
            located = moment.location.is_some(),
            "cell"
        );
        Ok(())
    }
}
