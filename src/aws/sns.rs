use async_trait::async_trait;
use aws_sdk_sns as sns;
use aws_sdk_sns::error::DisplayErrorContext;

use crate::error::{BackfillError, Result};
use crate::replay_core::TopicPublisher;

pub struct SnsPublisher {
    client: sns::Client,
}

impl SnsPublisher {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self {
            client: sns::Client::new(conf),
        }
    }
}

#[async_trait]
impl TopicPublisher for SnsPublisher {
    async fn publish(&self, topic_arn: &str, message: String) -> Result<()> {
        self.client
            .publish()
            .topic_arn(topic_arn)
            .message(message.as_str())
            .send()
            .await
            .map_err(|e| {
                BackfillError::transport(
                    format!("failed to publish {message} to {topic_arn}"),
                    DisplayErrorContext(&e).to_string(),
                )
            })?;
        Ok(())
    }
}
