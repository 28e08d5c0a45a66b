//! Download passes over a list of work items.
//!
//! A failed transfer is logged and counted but not returned as an error:
//! whatever is missing or wrong on disk is picked up by reconciliation.

mod pool;
mod serial;

pub use pool::run_concurrent_pass;
pub use serial::run_serial_pass;

use crate::model::WorkItem;
use crate::transport::Transport;

/// Progress events, one per finished item, for a UI task.
pub type ProgressSender = tokio::sync::mpsc::Sender<TransferEvent>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    Finished { label: String, bytes: u64 },
    Failed { label: String, error: String },
}

/// Counters of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub bytes: u64,
}

impl PassSummary {
    fn record(&mut self, event: &TransferEvent) {
        self.attempted += 1;
        match event {
            TransferEvent::Finished { bytes, .. } => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            TransferEvent::Failed { .. } => self.failed += 1,
        }
    }
}

/// Fetches one item through `session`.
fn transfer_one<T: Transport>(session: &mut T, item: &WorkItem) -> TransferEvent {
    let label = item.label();
    match session.fetch(item.url(), item.dest()) {
        Ok(bytes) => {
            tracing::debug!(item = %label, bytes, "downloaded");
            TransferEvent::Finished { label, bytes }
        }
        Err(e) => {
            tracing::warn!(item = %label, url = %item.url(), "download failed: {}", e);
            TransferEvent::Failed {
                label,
                error: e.to_string(),
            }
        }
    }
}

fn notify(progress: Option<&ProgressSender>, event: TransferEvent) {
    if let Some(tx) = progress {
        if tx.try_send(event).is_err() {
            tracing::trace!("progress channel full or closed; event dropped");
        }
    }
}
