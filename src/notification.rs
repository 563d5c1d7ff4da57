//! Wire codec for synthetic S3 notifications.
//!
//! Downstream consumers subscribe to the same topic as native S3 bucket
//! notifications, so each message is a single-record `ObjectCreated`-shaped
//! event: `{"Records":[{"s3":{"bucket":{"name":..},"object":{"key":..}}}]}`.

use serde::{Deserialize, Serialize};

use crate::error::{BackfillError, Result};
use crate::replay_core::ObjectRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
}

impl S3Event {
    /// Wraps one record. Size is not part of the envelope.
    pub fn from_record(record: &ObjectRecord) -> Self {
        Self {
            records: vec![S3EventRecord {
                s3: S3Entity {
                    bucket: S3Bucket {
                        name: record.bucket.clone(),
                    },
                    object: S3Object {
                        key: record.key.clone(),
                    },
                },
            }],
        }
    }

    pub fn bucket(&self) -> Option<&str> {
        self.records.first().map(|r| r.s3.bucket.name.as_str())
    }

    pub fn key(&self) -> Option<&str> {
        self.records.first().map(|r| r.s3.object.key.as_str())
    }
}

pub fn encode(event: &S3Event) -> Result<String> {
    serde_json::to_string(event).map_err(|e| {
        BackfillError::serialization(format!("failed to marshal notification {event:?}"), e)
    })
}

pub fn decode(payload: &str) -> Result<S3Event> {
    serde_json::from_str(payload)
        .map_err(|e| BackfillError::serialization("failed to parse notification", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(key: &str) -> ObjectRecord {
        ObjectRecord {
            bucket: "logs-bucket".into(),
            key: key.into(),
            size_bytes: 42,
        }
    }

    #[test]
    fn encodes_single_record_event() {
        let payload = encode(&S3Event::from_record(&record("cloudtrail/2020/01/a.json.gz"))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "Records": [
                    {"s3": {"bucket": {"name": "logs-bucket"}, "object": {"key": "cloudtrail/2020/01/a.json.gz"}}}
                ]
            })
        );
    }

    #[test]
    fn decode_reads_back_bucket_and_key() {
        let payload = encode(&S3Event::from_record(&record("a b/c+d"))).unwrap();
        let event = decode(&payload).unwrap();
        assert_eq!(event.bucket(), Some("logs-bucket"));
        assert_eq!(event.key(), Some("a b/c+d"));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode("{not json").unwrap_err();
        assert_eq!(err.as_label(), "serialization");
    }
}
