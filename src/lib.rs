pub mod aws;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod lister;
pub mod location;
pub mod mock;
pub mod notification;
pub mod pipeline;
pub mod publisher;
pub mod replay_core;
pub mod target;

pub use config::BackfillConfig;
pub use error::BackfillError;
pub use pipeline::{run, RunSummary};
pub use replay_core::{ObjectLister, ObjectRecord, RunOutcome, RunStats, TopicPublisher};
pub use target::TopicTarget;
