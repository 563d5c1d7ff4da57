use clap::builder::TypedValueParser;
use clap::Parser;

use crate::config::{BackfillConfig, DEFAULT_CONCURRENCY};
use crate::target::TopicTarget;

/// Replay objects already in S3 as ObjectCreated notifications on an SNS topic
#[derive(Parser, Debug, Clone)]
#[command(name = "s3sns")]
#[command(version)]
pub struct Args {
    /// Objects to replay, e.g. s3://mybucket/myprefix
    #[arg(long, env = "S3SNS_PATH")]
    pub s3_path: String,

    /// Region of the bucket (defaults to the session region)
    #[arg(long, env = "S3SNS_S3_REGION")]
    pub s3_region: Option<String>,

    /// AWS account id owning the topic
    #[arg(long, env = "S3SNS_ACCOUNT")]
    pub account: String,

    /// Topic name
    #[arg(long, env = "S3SNS_TOPIC")]
    pub topic: String,

    /// Region of the topic (defaults to the session region)
    #[arg(long, env = "S3SNS_TOPIC_REGION")]
    pub topic_region: Option<String>,

    /// Number of concurrent publishers
    #[arg(long, env = "S3SNS_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY,
          value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub concurrency: usize,

    /// Stop after this many objects (0 = no limit)
    #[arg(long, env = "S3SNS_LIMIT", default_value_t = 0)]
    pub limit: u64,

    /// Log level
    #[arg(long, env = "S3SNS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Dry run against an in-memory bucket, nothing is sent to AWS
    #[arg(long)]
    pub mock: bool,
}

impl Args {
    /// `session_region` fills in whichever region was not given explicitly.
    pub fn into_config(self, session_region: &str) -> BackfillConfig {
        let topic_region = self
            .topic_region
            .unwrap_or_else(|| session_region.to_string());
        let target = TopicTarget::new(topic_region, self.account, self.topic);

        let mut cfg = BackfillConfig::new(self.s3_path, target)
            .with_concurrency(self.concurrency)
            .with_limit(self.limit);
        if let Some(region) = self.s3_region {
            cfg = cfg.with_s3_region(region);
        }
        cfg
    }
}
