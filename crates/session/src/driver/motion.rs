use std::sync::Arc;

use tracing::warn;

use crate::session::SessionContext;

/// Replays non-step sensors from the recording
pub(crate) async fn run(ctx: Arc<SessionContext>) {
    let Some(interp) = ctx.motion.as_ref() else {
        return;
    };
    let mut index = 0;

    while ctx.is_live() {
        let sample = interp.at(ctx.clock.progress(), index);
        index = sample.index;

        if let Err(e) = ctx.sink.publish_motion(&sample.moment) {
            warn!(driver = "motion", error = %e, "stopping driver");
            break;
        }

        if ctx.clock.is_instant() || !ctx.pause(ctx.settings.motion_tick).await {
            break;
        }
    }
}
