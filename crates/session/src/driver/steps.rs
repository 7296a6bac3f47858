use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use drift_model::{MotionMoment, SensorType};
use tracing::warn;

use crate::session::SessionContext;

/// Synthetic step generator
///
/// The counter lives in the session context, so it keeps counting across
/// repeat iterations.
pub(crate) async fn run(ctx: Arc<SessionContext>) {
    let Some(counter) = ctx.steps.as_ref() else {
        return;
    };
    let interval = Duration::try_from_secs_f64(ctx.settings.step_stride / ctx.emulation.velocity)
        .unwrap_or(Duration::MAX);

    while ctx.is_live() {
        let count = counter.fetch_add(1, Ordering::Relaxed);
        let moment = MotionMoment::new(ctx.clock.elapsed().as_secs_f32())
            .with(SensorType::STEP_COUNTER, vec![count as f32])
            .with(SensorType::STEP_DETECTOR, vec![1.0]);

        if let Err(e) = ctx.sink.publish_motion(&moment) {
            warn!(driver = "steps", error = %e, "stopping driver");
            break;
        }

        if ctx.clock.is_instant() || !ctx.pause(interval).await {
            break;
        }
    }
}
