use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

use crate::error::BackfillError;
use crate::replay_core::RunOutcome;

/// Owns the run outcome. Every received error replaces the previous one; the
/// task ends when all senders are dropped.
pub fn spawn_collector(mut errors: mpsc::UnboundedReceiver<BackfillError>) -> JoinHandle<RunOutcome> {
    tokio::spawn(async move {
        let mut outcome = RunOutcome::default();
        while let Some(err) = errors.recv().await {
            error!(kind = err.as_label(), error = %err, "backfill task failed");
            outcome.error = Some(err);
        }
        outcome
    })
}
