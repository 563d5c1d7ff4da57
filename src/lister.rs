use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::BackfillError;
use crate::location::StoreLocation;
use crate::replay_core::{ObjectLister, ObjectRecord, RunStats, PAGE_SIZE, PROGRESS_EVERY};

/// Walks `s3://bucket/prefix` page by page and feeds every non-empty object
/// into the record queue.
pub struct Lister {
    client: Arc<dyn ObjectLister>,
    s3path: String,
    limit: Option<u64>,
}

impl Lister {
    /// `limit` of `None` or `Some(0)` lists everything.
    pub fn new(client: Arc<dyn ObjectLister>, s3path: impl Into<String>, limit: Option<u64>) -> Self {
        Self {
            client,
            s3path: s3path.into(),
            limit: limit.filter(|l| *l > 0),
        }
    }

    /// Runs to completion and returns the final counters. The record sender is
    /// consumed, so the queue is closed on every exit path.
    pub async fn run(
        self,
        records: mpsc::Sender<ObjectRecord>,
        errors: mpsc::UnboundedSender<BackfillError>,
    ) -> RunStats {
        let mut stats = RunStats::default();

        let location = match StoreLocation::parse(&self.s3path) {
            Ok(location) => location,
            Err(e) => {
                let _ = errors.send(e);
                return stats;
            }
        };

        let mut continuation: Option<String> = None;
        'pages: loop {
            let page = match self
                .client
                .list_page(&location.bucket, &location.prefix, continuation.take(), PAGE_SIZE)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    let _ = errors.send(e);
                    break;
                }
            };

            for entry in page.entries {
                // only objects with content are replayed
                if entry.size_bytes == 0 {
                    continue;
                }

                stats.record(entry.size_bytes);
                if stats.files_listed % PROGRESS_EVERY == 0 {
                    info!(files = stats.files_listed, bytes = stats.bytes_listed, "listed {} files ...", stats.files_listed);
                }

                let record = ObjectRecord {
                    bucket: location.bucket.clone(),
                    key: entry.key,
                    size_bytes: entry.size_bytes,
                };
                if let Err(e) = records.send(record).await {
                    let _ = errors.send(BackfillError::transport(
                        "record queue closed before listing finished",
                        e,
                    ));
                    break 'pages;
                }

                if self.limit.is_some_and(|limit| stats.files_listed >= limit) {
                    debug!(limit = ?self.limit, "item limit reached");
                    break 'pages;
                }
            }

            match page.next_token {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBucket;
    use crate::replay_core::ListEntry;

    async fn drive(bucket: Arc<MockBucket>, s3path: &str, limit: Option<u64>) -> (RunStats, Vec<ObjectRecord>, Vec<BackfillError>) {
        let (tx, mut rx) = mpsc::channel(4);
        let (err_tx, mut err_rx) = mpsc::unbounded_channel();

        let lister = Lister::new(bucket, s3path, limit);
        let handle = tokio::spawn(lister.run(tx, err_tx));

        let mut records = Vec::new();
        while let Some(r) = rx.recv().await {
            records.push(r);
        }
        let stats = handle.await.unwrap();

        let mut errors = Vec::new();
        while let Some(e) = err_rx.recv().await {
            errors.push(e);
        }
        (stats, records, errors)
    }

    #[tokio::test]
    async fn skips_empty_objects_and_counts_bytes() {
        let bucket = Arc::new(MockBucket::with_objects("b", &[("a", 10), ("dir/", 0), ("c", 20)]));
        let (stats, records, errors) = drive(bucket, "s3://b", None).await;

        assert!(errors.is_empty());
        assert_eq!(stats, RunStats { files_listed: 2, bytes_listed: 30 });
        let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
        assert!(records.iter().all(|r| r.bucket == "b"));
    }

    #[tokio::test]
    async fn limit_stops_exactly_at_cap() {
        let bucket = Arc::new(MockBucket::with_objects("b", &[("a", 10), ("z", 0), ("c", 20), ("d", 5)]));
        let (stats, records, _) = drive(bucket, "s3://b/", Some(1)).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "a");
        assert_eq!(stats, RunStats { files_listed: 1, bytes_listed: 10 });
    }

    #[tokio::test]
    async fn zero_limit_means_unbounded() {
        let bucket = Arc::new(MockBucket::with_objects("b", &[("a", 1), ("b", 1), ("c", 1)]));
        let (stats, _, _) = drive(bucket, "s3://b", Some(0)).await;
        assert_eq!(stats.files_listed, 3);
    }

    #[tokio::test]
    async fn walks_every_page() {
        let entries = (0..2500)
            .map(|i| ListEntry { key: format!("k/{i:05}"), size_bytes: 2 })
            .collect();
        let bucket = Arc::new(MockBucket::new("b", entries));
        let (stats, records, errors) = drive(bucket.clone(), "s3://b/k/", None).await;

        assert!(errors.is_empty());
        assert_eq!(records.len(), 2500);
        assert_eq!(stats.bytes_listed, 5000);
        assert_eq!(bucket.pages_requested(), 3);
    }

    #[tokio::test]
    async fn limit_does_not_request_further_pages() {
        let entries = (0..2500)
            .map(|i| ListEntry { key: format!("k/{i:05}"), size_bytes: 1 })
            .collect();
        let bucket = Arc::new(MockBucket::new("b", entries));
        let (stats, _, _) = drive(bucket.clone(), "s3://b", Some(1000)).await;

        assert_eq!(stats.files_listed, 1000);
        assert_eq!(bucket.pages_requested(), 1);
    }

    #[tokio::test]
    async fn page_failure_aborts_listing() {
        let entries = (0..2500)
            .map(|i| ListEntry { key: format!("k/{i:05}"), size_bytes: 1 })
            .collect();
        let bucket = Arc::new(MockBucket::new("b", entries).failing_on_page(1));
        let (stats, records, errors) = drive(bucket.clone(), "s3://b", None).await;

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].as_label(), "transport");
        assert_eq!(records.len(), 1000);
        assert_eq!(stats.files_listed, 1000);
        assert_eq!(bucket.pages_requested(), 2);
    }

    #[tokio::test]
    async fn bad_location_never_lists() {
        let bucket = Arc::new(MockBucket::with_objects("b", &[("a", 1)]));
        let (stats, records, errors) = drive(bucket.clone(), "https://b/a", None).await;

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BackfillError::Configuration(_)));
        assert!(records.is_empty());
        assert_eq!(stats, RunStats::default());
        assert_eq!(bucket.pages_requested(), 0);
    }
}
