use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

use s3sns::aws::{self, s3::S3Lister, sns::SnsPublisher};
use s3sns::cli::Args;
use s3sns::location::StoreLocation;
use s3sns::mock::{MockBucket, RecordingPublisher};
use s3sns::{ObjectLister, TopicPublisher};

const MOCK_REGION: &str = "us-east-1";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mock = args.mock;
    let (cfg, lister, publisher) = if mock {
        let cfg = args.into_config(MOCK_REGION);
        let bucket = StoreLocation::parse(&cfg.s3path)
            .map(|l| l.bucket)
            .unwrap_or_default();
        info!(%bucket, "mock mode: nothing will be sent to AWS");
        let lister: Arc<dyn ObjectLister> = Arc::new(MockBucket::demo(&bucket));
        let publisher: Arc<dyn TopicPublisher> = Arc::new(RecordingPublisher::new());
        (cfg, lister, publisher)
    } else {
        let session = aws::load_config(None).await;
        let session_region = session
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| anyhow!("no AWS region configured for this session"))?;
        let cfg = args.into_config(&session_region);

        let s3_conf = aws::load_config(cfg.s3_region.as_deref()).await;
        let sns_conf = aws::load_config(Some(&cfg.target.region)).await;
        let lister: Arc<dyn ObjectLister> = Arc::new(S3Lister::new(&s3_conf));
        let publisher: Arc<dyn TopicPublisher> = Arc::new(SnsPublisher::new(&sns_conf));
        (cfg, lister, publisher)
    };
    cfg.validate()?;

    let summary = s3sns::run(lister, publisher, &cfg).await;
    println!(
        "listed {} files ({} bytes), published {}",
        summary.stats.files_listed, summary.stats.bytes_listed, summary.published
    );

    summary
        .outcome
        .into_result()
        .with_context(|| format!("backfill of {} to {} failed", cfg.s3path, cfg.target))
}

fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("s3sns={level}"))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
