//! Wires lister, publisher pool and error collector together for one run.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::info;

use crate::collector::spawn_collector;
use crate::config::BackfillConfig;
use crate::error::BackfillError;
use crate::lister::Lister;
use crate::publisher::spawn_pool;
use crate::replay_core::{ObjectLister, RunOutcome, RunStats, TopicPublisher};

/// Record queue capacity, one listing page worth.
pub const QUEUE_CAPACITY: usize = 1000;

#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub stats: RunStats,
    /// Messages the pool delivered successfully.
    pub published: u64,
}

/// Lists `cfg.s3path` and publishes one notification per object to the
/// configured topic. A concurrency of 0 is not checked here; use
/// [`BackfillConfig::validate`] first.
pub async fn run(
    lister: Arc<dyn ObjectLister>,
    publisher: Arc<dyn TopicPublisher>,
    cfg: &BackfillConfig,
) -> RunSummary {
    let topic_arn = cfg.target.arn();
    info!(s3path = %cfg.s3path, topic = %topic_arn, concurrency = cfg.concurrency, limit = ?cfg.limit, "starting backfill");

    let (record_tx, record_rx) = mpsc::channel(QUEUE_CAPACITY);
    let (error_tx, error_rx) = mpsc::unbounded_channel::<BackfillError>();

    let workers = spawn_pool(cfg.concurrency, publisher, &topic_arn, record_rx, &error_tx);

    let lister = Lister::new(lister, cfg.s3path.clone(), cfg.limit);
    let listing = tokio::spawn(lister.run(record_tx, error_tx.clone()));

    let collector = spawn_collector(error_rx);

    let stats = match listing.await {
        Ok(stats) => stats,
        Err(e) => {
            let _ = error_tx.send(BackfillError::transport("lister task aborted", e));
            RunStats::default()
        }
    };

    let mut published = 0;
    for result in join_all(workers).await {
        match result {
            Ok(report) => published += report.published,
            Err(e) => {
                let _ = error_tx.send(BackfillError::transport("publisher task aborted", e));
            }
        }
    }

    // last sender: the collector finishes once the buffered errors are read
    drop(error_tx);
    let outcome = collector.await.unwrap_or_else(|e| RunOutcome {
        error: Some(BackfillError::transport("error collector aborted", e)),
    });

    info!(
        files = stats.files_listed,
        bytes = stats.bytes_listed,
        published,
        success = outcome.is_success(),
        "backfill finished"
    );

    RunSummary {
        outcome,
        stats,
        published,
    }
}
