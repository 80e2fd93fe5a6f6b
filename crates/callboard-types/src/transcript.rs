use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptRole {
    Agent,
    User,
}

impl TranscriptRole {
    pub fn label(&self) -> &'static str {
        match self {
            TranscriptRole::Agent => "Agent",
            TranscriptRole::User => "Driver",
        }
    }
}

/// One utterance; position in the surrounding list is the conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: TranscriptRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TranscriptEntry {
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Agent,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::User,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Stored transcript of a finished call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTranscript {
    pub id: String,
    pub call_id: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_json: Option<Vec<TranscriptEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CallTranscript {
    /// Structured entries, when the backend stored them.
    pub fn entries(&self) -> &[TranscriptEntry] {
        self.transcript_json.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_shape() {
        let entry: TranscriptEntry =
            serde_json::from_str(r#"{"role":"agent","content":"Hi Mike"}"#).unwrap();
        assert_eq!(entry, TranscriptEntry::agent("Hi Mike"));
        assert_eq!(
            serde_json::to_string(&TranscriptEntry::user("Driving")).unwrap(),
            r#"{"role":"user","content":"Driving"}"#
        );
    }

    #[test]
    fn test_entries_falls_back_to_empty() {
        let transcript = CallTranscript {
            id: "t1".to_string(),
            call_id: "c1".to_string(),
            transcript: "Agent: hi".to_string(),
            transcript_json: None,
            created_at: None,
            updated_at: None,
        };
        assert!(transcript.entries().is_empty());
    }
}
