use std::fmt;

use url::Url;

use crate::error::{BackfillError, Result};

const SCHEME: &str = "s3";

/// Bucket plus key prefix, parsed from `s3://bucket/prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub bucket: String,
    pub prefix: String,
}

impl StoreLocation {
    pub fn parse(s3path: &str) -> Result<Self> {
        let s3path = s3path.trim();
        let parsed = Url::parse(s3path)
            .map_err(|e| BackfillError::configuration(format!("bad s3 url: {e}: {s3path}")))?;

        if parsed.scheme() != SCHEME {
            return Err(BackfillError::configuration(format!(
                "not s3 protocol (expecting s3://): {s3path}"
            )));
        }

        let bucket = parsed.host_str().unwrap_or_default();
        if bucket.is_empty() {
            return Err(BackfillError::configuration(format!("missing bucket: {s3path}")));
        }

        // The prefix is taken verbatim: S3 keys are not percent-encoded.
        let rest = &s3path[SCHEME.len() + "://".len()..];
        let prefix = rest.split_once('/').map(|(_, p)| p).unwrap_or_default();

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}
