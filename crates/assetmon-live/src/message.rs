//! Inbound push messages.
//!
//! The channel carries `{"type": "telemetry_update", "timestamp": ...,
//! "data": [TelemetryRecord, ...]}`. A batch may hold readings for many
//! assets; a subscription only keeps the first decodable entry for its own
//! subject.

use assetmon_core::TelemetryRecord;
use serde::Deserialize;
use serde_json::Value;

/// Message type carrying telemetry batches.
pub const TELEMETRY_UPDATE: &str = "telemetry_update";

/// Envelope of a push message.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<Value>,
    pub data: Value,
}

/// What a message means for one subject.
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// A reading for the subject.
    Applied(TelemetryRecord),
    /// A telemetry batch with nothing for the subject.
    OtherSubject,
    /// Valid envelope of another type, or a non-array `data`.
    Ignored,
    /// Not JSON, missing `type`/`data`, or only undecodable entries for the subject.
    Malformed,
}

impl PushOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::OtherSubject => "other_subject",
            Self::Ignored => "ignored",
            Self::Malformed => "malformed",
        }
    }
}

/// Classify a text frame for `subject`.
pub fn classify(text: &str, subject: &str) -> PushOutcome {
    let envelope: PushEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(_) => return PushOutcome::Malformed,
    };
    if envelope.kind != TELEMETRY_UPDATE {
        return PushOutcome::Ignored;
    }
    let Value::Array(entries) = envelope.data else {
        return PushOutcome::Ignored;
    };

    let mut saw_subject = false;
    for entry in entries {
        if entry.get("asset_id").and_then(Value::as_str) != Some(subject) {
            continue;
        }
        saw_subject = true;
        if let Ok(record) = serde_json::from_value::<TelemetryRecord>(entry) {
            return PushOutcome::Applied(record);
        }
    }

    if saw_subject {
        PushOutcome::Malformed
    } else {
        PushOutcome::OtherSubject
    }
}
