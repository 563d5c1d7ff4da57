use crate::error::{BackfillError, Result};
use crate::target::TopicTarget;

pub const DEFAULT_CONCURRENCY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillConfig {
    /// `s3://bucket/prefix` to replay.
    pub s3path: String,
    /// Region of the bucket; the S3 client uses the session region when unset.
    pub s3_region: Option<String>,
    pub target: TopicTarget,
    pub concurrency: usize,
    /// Maximum number of objects to replay. `None` lists everything.
    pub limit: Option<u64>,
}

impl BackfillConfig {
    pub fn new(s3path: impl Into<String>, target: TopicTarget) -> Self {
        Self {
            s3path: s3path.into(),
            s3_region: None,
            target,
            concurrency: DEFAULT_CONCURRENCY,
            limit: None,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// 0 is treated as "no limit".
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn with_s3_region(mut self, region: impl Into<String>) -> Self {
        self.s3_region = Some(region.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(BackfillError::configuration("concurrency must be at least 1"));
        }
        if self.target.account.trim().is_empty() {
            return Err(BackfillError::configuration("missing AWS account id"));
        }
        if self.target.name.trim().is_empty() {
            return Err(BackfillError::configuration("missing topic name"));
        }
        if self.target.region.trim().is_empty() {
            return Err(BackfillError::configuration("missing topic region"));
        }
        Ok(())
    }
}
