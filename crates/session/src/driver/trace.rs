use std::sync::Arc;

use drift_model::Intermediate;
use tracing::warn;

use crate::session::SessionContext;

/// Position driver: interpolate, store, publish, report
pub(crate) async fn run(ctx: Arc<SessionContext>) {
    while ctx.is_live() {
        let progress = ctx.clock.progress();

        let position = {
            let mut resume = ctx.trace_resume.lock();
            let position = ctx.trace.at(progress, resume.as_ref());
            *resume = Some(position);
            position
        };

        ctx.state.set_location(position.point);
        if let Err(e) = ctx.sink.publish_position(&position.point) {
            warn!(driver = "trace", error = %e, "stopping driver");
            break;
        }

        let report = Intermediate {
            progress: progress.min(1.0),
            location: position.point,
            elapsed: ctx.clock.elapsed().as_secs_f64(),
        };
        ctx.reporter.intermediate(&report).await;

        if ctx.clock.is_instant() || !ctx.pause(ctx.settings.trace_tick).await {
            break;
        }
    }
}
