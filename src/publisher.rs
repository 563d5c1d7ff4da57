//! Publisher pool.
//!
//! N workers share one record queue. Each worker is a two-state machine:
//! it publishes while `Active`, and after its first failure it moves to
//! `Draining`, where it keeps pulling records off the queue and dropping them
//! until the queue is closed and empty. Failures never cross workers.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{BackfillError, Result};
use crate::notification::{self, S3Event};
use crate::replay_core::{ObjectRecord, TopicPublisher};

pub type SharedRecords = Arc<Mutex<mpsc::Receiver<ObjectRecord>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Active,
    Draining,
}

impl WorkerState {
    /// Active -> Draining on the first failure. Draining is terminal.
    fn on_failure(self) -> Self {
        WorkerState::Draining
    }
}

/// What one worker did with the records it dequeued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub published: u64,
    pub failed: u64,
    pub discarded: u64,
}

impl WorkerReport {
    pub fn dequeued(&self) -> u64 {
        self.published + self.failed + self.discarded
    }
}

pub struct Worker {
    id: usize,
    client: Arc<dyn TopicPublisher>,
    topic_arn: Arc<str>,
    state: WorkerState,
    report: WorkerReport,
}

impl Worker {
    pub fn new(id: usize, client: Arc<dyn TopicPublisher>, topic_arn: Arc<str>) -> Self {
        Self {
            id,
            client,
            topic_arn,
            state: WorkerState::Active,
            report: WorkerReport::default(),
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Consumes records until the queue is closed and drained.
    pub async fn run(
        mut self,
        records: SharedRecords,
        errors: mpsc::UnboundedSender<BackfillError>,
    ) -> WorkerReport {
        while let Some(record) = next_record(&records).await {
            match self.state {
                WorkerState::Draining => self.report.discarded += 1,
                WorkerState::Active => match self.deliver(&record).await {
                    Ok(()) => self.report.published += 1,
                    Err(e) => {
                        warn!(
                            worker = self.id,
                            bucket = %record.bucket,
                            key = %record.key,
                            error = %e,
                            "publish failed, draining remaining records"
                        );
                        self.report.failed += 1;
                        self.state = self.state.on_failure();
                        let _ = errors.send(e);
                    }
                },
            }
        }

        debug!(
            worker = self.id,
            published = self.report.published,
            discarded = self.report.discarded,
            "publisher finished"
        );
        self.report
    }

    async fn deliver(&self, record: &ObjectRecord) -> Result<()> {
        debug!(bucket = %record.bucket, key = %record.key, "sending file to SNS");
        let message = notification::encode(&S3Event::from_record(record))?;
        self.client.publish(&self.topic_arn, message).await
    }
}

// The lock is held only while waiting for the next record; `None` means the
// sender side is gone and nothing is buffered.
async fn next_record(records: &SharedRecords) -> Option<ObjectRecord> {
    records.lock().await.recv().await
}

/// Spawns `concurrency` workers over the shared queue.
pub fn spawn_pool(
    concurrency: usize,
    client: Arc<dyn TopicPublisher>,
    topic_arn: &str,
    records: mpsc::Receiver<ObjectRecord>,
    errors: &mpsc::UnboundedSender<BackfillError>,
) -> Vec<JoinHandle<WorkerReport>> {
    let records: SharedRecords = Arc::new(Mutex::new(records));
    let topic_arn: Arc<str> = Arc::from(topic_arn);

    (0..concurrency)
        .map(|id| {
            let worker = Worker::new(id, Arc::clone(&client), Arc::clone(&topic_arn));
            tokio::spawn(worker.run(Arc::clone(&records), errors.clone()))
        })
        .collect()
}
