//! Mutation-driven re-scan loop

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::dom::MutationBatch;

use super::tracker::AttachmentTracker;

/// Reactive subscription tying structural changes to re-attachment
pub struct Rescanner;

impl Rescanner {
    /// Spawn the re-scan loop: every batch on the channel re-runs discovery
    /// and idempotent attachment
    ///
    /// A burst of batches is drained into one pass. Over-scanning is
    /// harmless because attachment is idempotent; what the drain must not
    /// do is miss a change window, and it cannot, since draining happens
    /// before the scan.
    pub fn spawn(
        tracker: Arc<AttachmentTracker>,
        mut changes: UnboundedReceiver<MutationBatch>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(first) = changes.recv().await {
                let mut records = first.records;
                while let Ok(more) = changes.try_recv() {
                    records += more.records;
                }
                tracing::debug!(records, "Re-scanning after structural change");
                tracker.attach_all();
            }
            tracing::debug!("Mutation channel closed, re-scan loop ending");
        })
    }
}
