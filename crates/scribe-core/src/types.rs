use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type alias for session identifiers
pub type SessionId = Uuid;

/// Type alias for transcript message identifiers
pub type MessageId = Uuid;

/// Type alias for chat message identifiers
pub type ChatMessageId = Uuid;

/// A recording session.
///
/// A session owns every transcript and chat message produced under it:
/// deleting the session deletes its messages too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique identifier. UUIDv7 for time-sortability.
    pub id: SessionId,

    /// Display title. 1–255 characters.
    pub title: String,

    /// Recording lifecycle state.
    pub status: SessionStatus,

    /// Identifier of the audio input device feeding this session.
    pub audio_source: String,

    /// When this session was created.
    pub created_at: DateTime<Utc>,

    /// Last time the session record was modified.
    pub updated_at: DateTime<Utc>,
}

/// Recording lifecycle states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Recording and accepting transcript messages.
    Active,

    /// Temporarily halted; may resume.
    Paused,

    /// Finished. Transcript is complete.
    Stopped,
}

impl SessionStatus {
    /// Canonical lowercase name, as stored and served.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Stopped => "stopped",
        }
    }

    /// Parse from the canonical lowercase name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "paused" => Some(SessionStatus::Paused),
            "stopped" => Some(SessionStatus::Stopped),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of transcribed text with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptMessage {
    /// Unique identifier. UUIDv7.
    pub id: MessageId,

    /// Owning session.
    pub session_id: SessionId,

    /// Transcribed text. Never empty.
    pub content: String,

    /// Recogniser confidence in [0.0, 1.0]. Informational only —
    /// nothing downstream branches on it.
    pub confidence: f32,

    /// When this text was transcribed.
    pub timestamp: DateTime<Utc>,

    /// Final results are stable; interim results may still be revised.
    /// Only final text feeds text-derived answers.
    pub is_final: bool,

    /// Speaker label, when diarisation produced one.
    pub speaker_id: Option<String>,

    /// When this record was stored.
    pub created_at: DateTime<Utc>,
}

/// Who produced a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of the question/answer dialogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Unique identifier. UUIDv7.
    pub id: ChatMessageId,

    /// Owning session.
    pub session_id: SessionId,

    /// Who produced this turn.
    pub role: ChatRole,

    /// The question or answer text.
    pub content: String,

    /// Ids of the transcript messages available as context for this turn,
    /// in the order they were supplied to the engine. A traceability
    /// record of what the assistant could see, not of what the reply
    /// actually used.
    pub context_ids: Vec<MessageId>,

    /// When this turn happened.
    pub timestamp: DateTime<Utc>,

    /// When this record was stored.
    pub created_at: DateTime<Utc>,
}

/// Audio device classes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    AudioInput,
    AudioOutput,
}

/// An audio device offered to the source selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioDevice {
    pub device_id: String,
    pub label: String,
    pub kind: DeviceKind,
    pub group_id: Option<String>,
}

/// Input for creating a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    pub audio_source: String,
}

impl NewSession {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.title.chars().count() > 255 {
            return Err("Title exceeds 255 characters".to_string());
        }
        if self.audio_source.is_empty() {
            return Err("Audio source cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Partial update for a session. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub status: Option<SessionStatus>,
    pub audio_source: Option<String>,
}

impl SessionPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            if title.is_empty() {
                return Err("Title cannot be empty".to_string());
            }
            if title.chars().count() > 255 {
                return Err("Title exceeds 255 characters".to_string());
            }
        }
        if let Some(source) = &self.audio_source {
            if source.is_empty() {
                return Err("Audio source cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Input for appending a transcript message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTranscriptMessage {
    pub session_id: SessionId,
    pub content: String,
    pub confidence: f32,
    pub is_final: bool,
    #[serde(default)]
    pub speaker_id: Option<String>,
    /// Transcription time. Defaults to now when absent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewTranscriptMessage {
    pub fn validate(&self) -> Result<(), String> {
        if self.content.is_empty() {
            return Err("Content cannot be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "Confidence {} out of range [0.0, 1.0]",
                self.confidence
            ));
        }
        Ok(())
    }
}

/// Input for recording a chat turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub session_id: SessionId,
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub context_ids: Vec<MessageId>,
}

impl NewChatMessage {
    pub fn validate(&self) -> Result<(), String> {
        if self.content.is_empty() {
            return Err("Content cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Session {
    /// Create a new active session.
    pub fn new(title: String, audio_source: String) -> Self {
        let now = Utc::now();
        Session {
            id: Uuid::now_v7(),
            title,
            status: SessionStatus::Active,
            audio_source,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch, bumping `updated_at`.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(source) = patch.audio_source {
            self.audio_source = source;
        }
        self.updated_at = Utc::now();
    }
}

impl TranscriptMessage {
    /// Create a transcript message from validated input.
    pub fn from_input(input: NewTranscriptMessage) -> Self {
        let now = Utc::now();
        TranscriptMessage {
            id: Uuid::now_v7(),
            session_id: input.session_id,
            content: input.content,
            confidence: input.confidence.clamp(0.0, 1.0),
            timestamp: input.timestamp.unwrap_or(now),
            is_final: input.is_final,
            speaker_id: input.speaker_id,
            created_at: now,
        }
    }
}

impl ChatMessage {
    /// Create a chat turn.
    pub fn new(
        session_id: SessionId,
        role: ChatRole,
        content: String,
        context_ids: Vec<MessageId>,
    ) -> Self {
        let now = Utc::now();
        ChatMessage {
            id: Uuid::now_v7(),
            session_id,
            role,
            content,
            context_ids,
            timestamp: now,
            created_at: now,
        }
    }
}
