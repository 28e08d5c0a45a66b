//! One item at a time on the calling thread.

use super::{notify, transfer_one, PassSummary, ProgressSender};
use crate::model::WorkItem;
use crate::transport::Transport;

/// Fetches `items` in order through one session.
pub fn run_serial_pass<T: Transport>(
    session: &mut T,
    items: &[WorkItem],
    progress: Option<&ProgressSender>,
) -> PassSummary {
    let mut summary = PassSummary::default();
    for item in items {
        let event = transfer_one(session, item);
        summary.record(&event);
        notify(progress, event);
    }
    summary
}
