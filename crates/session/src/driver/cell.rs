use std::sync::Arc;

use drift_interp::{CellCursor, Hold};
use tracing::warn;

use crate::session::SessionContext;

/// Steps through the cell timeline, holding each moment for its scaled gap
pub(crate) async fn run(ctx: Arc<SessionContext>) {
    let Some(timeline) = ctx.emulation.cells.active() else {
        return;
    };
    let mut cursor = CellCursor::new(timeline, ctx.clock.duration_secs());

    while ctx.is_live() {
        let Some(step) = cursor.next() else {
            break;
        };

        ctx.state.set_cell(step.moment.clone());
        if let Err(e) = ctx.sink.publish_cell(step.moment) {
            warn!(driver = "cell", index = step.index, error = %e, "stopping driver");
            break;
        }

        match step.hold {
            Hold::For(hold) => {
                if !ctx.pause(hold).await {
                    break;
                }
            }
            Hold::Halt(hold) => {
                ctx.pause(hold).await;
                break;
            }
            Hold::Done => break,
        }
    }
}
