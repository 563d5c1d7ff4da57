pub mod s3;
pub mod sns;

use aws_config::BehaviorVersion;
use aws_types::region::Region;

/// Loads the shared AWS config, optionally pinned to `region`.
pub async fn load_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
