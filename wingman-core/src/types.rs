use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Platform-assigned capture source identifier, opaque to us.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Screen,
    Window,
}

/// A screen or window handle carrying loopback audio. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSource {
    pub id: SourceId,
    pub name: String,
    pub kind: SourceKind,
}

impl CaptureSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: SourceId::new(id),
            name: name.into(),
            kind,
        }
    }
}

/// One timer-cadence pull from an open audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub bytes: Vec<u8>,
}

impl AudioChunk {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encoded audio assembled from chunks, tagged with the container media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Concatenates chunks in capture order.
    pub fn from_chunks(media_type: impl Into<String>, chunks: &[AudioChunk]) -> Self {
        let mut bytes = Vec::with_capacity(chunks.iter().map(AudioChunk::len).sum());
        for chunk in chunks {
            bytes.extend_from_slice(&chunk.bytes);
        }
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Upload filename matching the container, e.g. `audio.webm`.
    pub fn file_name(&self) -> String {
        let media = self.media_type.split(';').next().unwrap_or("");
        let extension = match media.trim() {
            "audio/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/mp4" => "mp4",
            "audio/mpeg" | "audio/mpga" => "mp3",
            "audio/wav" | "audio/x-wav" => "wav",
            _ => "webm",
        };
        format!("audio.{extension}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerRole {
    Interviewer,
    Candidate,
}

/// Where a transcript line came from. Display layers decide how to mark
/// synthetic or fallback content; the origin is data, not presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptOrigin {
    Remote,
    OnDevice,
    Synthetic,
    Suggestion,
    Notice,
}

/// One line of the session transcript. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub role: SpeakerRole,
    pub text: String,
    pub origin: TranscriptOrigin,
    pub ts_unix_ms: i64,
}

impl TranscriptEntry {
    pub fn new(role: SpeakerRole, text: impl Into<String>, origin: TranscriptOrigin) -> Self {
        Self {
            id: EntryId::new(),
            role,
            text: text.into(),
            origin,
            ts_unix_ms: now_unix_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionOrigin {
    Model,
    Fallback,
}

/// A drafted answer for the candidate. Ephemeral, display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionText {
    pub raw: String,
    pub display: String,
    pub origin: SuggestionOrigin,
}

pub fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
