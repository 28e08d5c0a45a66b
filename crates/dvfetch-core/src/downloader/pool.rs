//! Bounded worker pool: each thread owns one session and drains a shared queue.

use std::collections::VecDeque;
use std::sync::{mpsc, Mutex};

use super::{notify, transfer_one, PassSummary, ProgressSender, TransferEvent};
use crate::model::WorkItem;
use crate::transport::SessionFactory;

/// Fetches `items` with up to `workers` threads and returns once every
/// worker has exited. Items are taken in queue order but finish in any order.
pub fn run_concurrent_pass<F: SessionFactory>(
    factory: &F,
    items: Vec<WorkItem>,
    workers: usize,
    progress: Option<&ProgressSender>,
) -> PassSummary {
    let mut summary = PassSummary::default();
    let count = items.len();
    let num_workers = workers.max(1).min(count);
    if num_workers == 0 {
        return summary;
    }
    let work: Mutex<VecDeque<WorkItem>> = Mutex::new(items.into_iter().collect());
    let (tx, rx) = mpsc::channel::<TransferEvent>();

    std::thread::scope(|s| {
        for worker in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            s.spawn(move || {
                let mut session = match factory.create() {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::error!(worker, "could not open session: {:#}", e);
                        return;
                    }
                };
                loop {
                    let next = work.lock().unwrap_or_else(|p| p.into_inner()).pop_front();
                    let item = match next {
                        Some(item) => item,
                        None => break,
                    };
                    if tx.send(transfer_one(&mut session, &item)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for event in rx {
            summary.record(&event);
            notify(progress, event);
        }
    });

    // Left behind only if no worker could open a session.
    let stranded: Vec<WorkItem> = work
        .into_inner()
        .unwrap_or_else(|p| p.into_inner())
        .into_iter()
        .collect();
    for item in stranded {
        let event = TransferEvent::Failed {
            label: item.label(),
            error: "no session available".to_string(),
        };
        summary.record(&event);
        notify(progress, event);
    }
    tracing::info!(
        items = count,
        workers = num_workers,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "pass finished"
    );
    summary
}
