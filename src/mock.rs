//! In-memory stand-ins for S3 and SNS, used by `--mock` dry runs and tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{BackfillError, Result};
use crate::notification;
use crate::replay_core::{ListEntry, ListPage, ObjectLister, TopicPublisher};

/// A fixed bucket listing served in pages, continuation tokens are offsets.
pub struct MockBucket {
    bucket: String,
    entries: Vec<ListEntry>,
    fail_on_page: Option<usize>,
    pages_requested: AtomicUsize,
}

impl MockBucket {
    pub fn new(bucket: impl Into<String>, entries: Vec<ListEntry>) -> Self {
        Self {
            bucket: bucket.into(),
            entries,
            fail_on_page: None,
            pages_requested: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor from `(key, size)` pairs.
    pub fn with_objects(bucket: impl Into<String>, objects: &[(&str, u64)]) -> Self {
        let entries = objects
            .iter()
            .map(|(key, size)| ListEntry {
                key: key.to_string(),
                size_bytes: *size,
            })
            .collect();
        Self::new(bucket, entries)
    }

    /// Fails the fetch of the given page (0-based).
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn pages_requested(&self) -> usize {
        self.pages_requested.load(Ordering::SeqCst)
    }

    /// Demo listing for `--mock` runs.
    pub fn demo(bucket: &str) -> Self {
        let mut entries = Vec::new();
        for day in 1..=3 {
            for hour in 0..4 {
                entries.push(ListEntry {
                    key: format!("cloudtrail/2020/01/{day:02}/{hour:02}/events.json.gz"),
                    size_bytes: 1024 * (day * 10 + hour),
                });
            }
            entries.push(ListEntry {
                key: format!("cloudtrail/2020/01/{day:02}/"),
                size_bytes: 0,
            });
        }
        Self::new(bucket, entries)
    }
}

#[async_trait]
impl ObjectLister for MockBucket {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
        max_keys: i32,
    ) -> Result<ListPage> {
        let page = self.pages_requested.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_page == Some(page) {
            return Err(BackfillError::transport(
                format!("failed to list s3://{bucket}/{prefix}"),
                "InternalError: simulated listing failure",
            ));
        }
        if bucket != self.bucket {
            return Err(BackfillError::transport(
                format!("failed to list s3://{bucket}/{prefix}"),
                "NoSuchBucket",
            ));
        }

        let start = match continuation {
            Some(token) => token.parse::<usize>().map_err(|e| {
                BackfillError::transport(format!("bad continuation token {token}"), e)
            })?,
            None => 0,
        };
        let matching: Vec<&ListEntry> = self
            .entries
            .iter()
            .filter(|e| e.key.starts_with(prefix))
            .collect();
        let end = (start + max_keys.max(1) as usize).min(matching.len());
        let entries = matching[start.min(end)..end].iter().map(|e| (*e).clone()).collect();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ListPage { entries, next_token })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic_arn: String,
    pub message: String,
}

/// Records every publish call; fails for selected keys or for every call.
#[derive(Default)]
pub struct RecordingPublisher {
    fail_all: bool,
    fail_keys: HashSet<String>,
    calls: AtomicUsize,
    delivered: Mutex<Vec<PublishedMessage>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_always() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_on_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Number of publish attempts, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn delivered(&self) -> Vec<PublishedMessage> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    fn should_fail(&self, message: &str) -> bool {
        if self.fail_all {
            return true;
        }
        if self.fail_keys.is_empty() {
            return false;
        }
        notification::decode(message)
            .ok()
            .and_then(|event| event.key().map(|k| self.fail_keys.contains(k)))
            .unwrap_or(false)
    }
}

#[async_trait]
impl TopicPublisher for RecordingPublisher {
    async fn publish(&self, topic_arn: &str, message: String) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Let sibling workers interleave like they would around a network call.
        tokio::task::yield_now().await;

        if self.should_fail(&message) {
            return Err(BackfillError::transport(
                format!("failed to publish to {topic_arn}"),
                "AuthorizationError: simulated publish failure",
            ));
        }

        tracing::info!(topic = topic_arn, %message, "mock publish");
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push(PublishedMessage {
                topic_arn: topic_arn.to_string(),
                message,
            });
        }
        Ok(())
    }
}
