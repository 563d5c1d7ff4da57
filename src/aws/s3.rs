use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::error::{BackfillError, Result};
use crate::replay_core::{ListEntry, ListPage, ObjectLister};

/// `ListObjectsV2` backed listing.
pub struct S3Lister {
    client: s3::Client,
}

impl S3Lister {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self {
            client: s3::Client::new(conf),
        }
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
        max_keys: i32,
    ) -> Result<ListPage> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(max_keys)
            .set_continuation_token(continuation)
            .send()
            .await
            .map_err(|e| {
                BackfillError::transport(
                    format!("failed to list s3://{bucket}/{prefix}"),
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        let entries = resp
            .contents()
            .iter()
            .filter_map(|o| {
                let key = o.key()?;
                Some(ListEntry {
                    key: key.to_string(),
                    // negative sizes never happen in practice; treat as empty
                    size_bytes: u64::try_from(o.size().unwrap_or_default()).unwrap_or(0),
                })
            })
            .collect();

        // S3 only hands out a token when the listing is truncated
        let next_token = match resp.is_truncated() {
            Some(true) => resp.next_continuation_token().map(|t| t.to_string()),
            _ => None,
        };

        Ok(ListPage { entries, next_token })
    }
}
