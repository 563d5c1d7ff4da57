//! Error taxonomy for a backfill run.
//!
//! Every task in the pipeline reports failures as a [`BackfillError`] onto the
//! shared error channel; the collector keeps the last one it sees.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum BackfillError {
    /// Malformed location reference or missing settings. Raised before any
    /// listing or publishing happens.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A listing page fetch or a publish call failed.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    /// A notification envelope could not be encoded.
    #[error("{context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl BackfillError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn serialization<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Serialization {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Short stable label for log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            BackfillError::Configuration(_) => "configuration",
            BackfillError::Transport { .. } => "transport",
            BackfillError::Serialization { .. } => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, BackfillError>;
