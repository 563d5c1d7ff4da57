use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BackfillError, Result};

/// Maximum number of keys requested per listing page.
pub const PAGE_SIZE: i32 = 1000;

/// Log a progress line every this many listed objects.
pub const PROGRESS_EVERY: u64 = 5000;

// One object that qualifies for replay (size > 0 at listing time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub bucket: String,
    pub key: String,
    pub size_bytes: u64,
}

// Counters owned by the lister while the run is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub files_listed: u64,
    pub bytes_listed: u64,
}

impl RunStats {
    pub(crate) fn record(&mut self, size_bytes: u64) {
        self.files_listed += 1;
        self.bytes_listed += size_bytes;
    }
}

/// Last failure observed across the pipeline, if any.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub error: Option<BackfillError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub key: String,
    pub size_bytes: u64,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub entries: Vec<ListEntry>,
    pub next_token: Option<String>,
}

// Paginated enumeration of a bucket. Implementations must be usable from
// several tasks at once.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
        max_keys: i32,
    ) -> Result<ListPage>;
}

// Single-shot delivery of one message to a topic. No retry.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, topic_arn: &str, message: String) -> Result<()>;
}
