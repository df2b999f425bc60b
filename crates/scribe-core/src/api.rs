use crate::context::{select_context, ContextQuery, DEFAULT_WINDOW_MINUTES};
use crate::engine;
use crate::error::{Result, ScribeError};
use crate::storage::{ChatFilter, MessageFilter, RedbStorage, Storage, StorageStats};
use crate::types::{
    ChatMessage, ChatRole, NewChatMessage, NewSession, NewTranscriptMessage, Session, SessionId,
    SessionPatch, TranscriptMessage,
};
use std::path::Path;
use std::sync::Arc;

/// Config for embedded library mode.
#[derive(Debug, Clone)]
pub struct ScribeOptions {
    /// Trailing context window used by `ask` when the caller names no
    /// explicit message ids.
    pub context_window_minutes: i64,
}

impl Default for ScribeOptions {
    fn default() -> Self {
        Self {
            context_window_minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}

/// A persisted question/answer pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatExchange {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

/// High-level, embedded API. No server required.
///
/// # Example
/// ```rust,no_run
/// use scribe_core::{Scribe, ScribeOptions, NewSession, NewTranscriptMessage};
///
/// let scribe = Scribe::open("./scribe.redb", ScribeOptions::default()).unwrap();
/// let session = scribe
///     .create_session(NewSession {
///         title: "Weekly sync".into(),
///         audio_source: "default".into(),
///     })
///     .unwrap();
/// scribe
///     .append_message(NewTranscriptMessage {
///         session_id: session.id,
///         content: "We agreed to ship the beta on Friday.".into(),
///         confidence: 0.92,
///         is_final: true,
///         speaker_id: None,
///         timestamp: None,
///     })
///     .unwrap();
/// let exchange = scribe.ask(session.id, "Please summarize", None).unwrap();
/// println!("{}", exchange.assistant.content);
/// ```
pub struct Scribe {
    storage: Arc<RedbStorage>,
    options: ScribeOptions,
}

impl Scribe {
    /// Open (or create) a scribe database at the given path.
    pub fn open(path: impl AsRef<Path>, options: ScribeOptions) -> Result<Self> {
        let storage = Arc::new(RedbStorage::open(path.as_ref())?);
        Ok(Self { storage, options })
    }

    /// Shared handle to the underlying storage.
    pub fn storage(&self) -> Arc<RedbStorage> {
        self.storage.clone()
    }

    // --- Sessions ---

    /// Create a new active session.
    pub fn create_session(&self, input: NewSession) -> Result<Session> {
        input.validate().map_err(ScribeError::InvalidInput)?;
        let session = Session::new(input.title, input.audio_source);
        self.storage.put_session(&session)?;
        Ok(session)
    }

    /// Get a session by id.
    pub fn get_session(&self, id: SessionId) -> Result<Option<Session>> {
        self.storage.get_session(id)
    }

    /// All sessions, newest first.
    pub fn list_sessions(&self) -> Result<Vec<Session>> {
        self.storage.list_sessions()
    }

    /// Apply a partial update to a session.
    pub fn update_session(&self, id: SessionId, patch: SessionPatch) -> Result<Session> {
        patch.validate().map_err(ScribeError::InvalidInput)?;
        let mut session = self
            .storage
            .get_session(id)?
            .ok_or(ScribeError::SessionNotFound(id))?;
        session.apply(patch);
        self.storage.put_session(&session)?;
        Ok(session)
    }

    /// Delete a session and everything it owns.
    pub fn delete_session(&self, id: SessionId) -> Result<()> {
        self.storage.delete_session(id)
    }

    // --- Transcript messages ---

    /// Append a transcript message to an existing session.
    pub fn append_message(&self, input: NewTranscriptMessage) -> Result<TranscriptMessage> {
        input.validate().map_err(ScribeError::InvalidInput)?;
        self.require_session(input.session_id)?;
        let message = TranscriptMessage::from_input(input);
        self.storage.put_message(&message)?;
        Ok(message)
    }

    /// List transcript messages, newest first.
    pub fn messages(&self, filter: MessageFilter) -> Result<Vec<TranscriptMessage>> {
        self.storage.list_messages(filter)
    }

    /// Final messages from the trailing window, newest first.
    pub fn recent_context(
        &self,
        session_id: SessionId,
        minutes: i64,
    ) -> Result<Vec<TranscriptMessage>> {
        select_context(
            self.storage.as_ref(),
            session_id,
            &ContextQuery::Recent { minutes },
        )
    }

    // --- Chat ---

    /// Record a chat turn without invoking the engine (imports, clients
    /// replaying history).
    pub fn record_chat_message(&self, input: NewChatMessage) -> Result<ChatMessage> {
        input.validate().map_err(ScribeError::InvalidInput)?;
        self.require_session(input.session_id)?;
        let message =
            ChatMessage::new(input.session_id, input.role, input.content, input.context_ids);
        self.storage.put_chat_message(&message)?;
        Ok(message)
    }

    /// Chat history, newest first.
    pub fn chat_history(&self, filter: ChatFilter) -> Result<Vec<ChatMessage>> {
        self.storage.list_chat_messages(filter)
    }

    /// Answer a previously recorded user turn against the supplied context
    /// and persist the assistant reply.
    ///
    /// Fails with `InvalidInput` if `user_message` is not a user turn; the
    /// assistant turn's `context_ids` records every supplied message id.
    pub fn process_chat_request(
        &self,
        user_message: &ChatMessage,
        context: &[TranscriptMessage],
    ) -> Result<ChatMessage> {
        if user_message.role != ChatRole::User {
            return Err(ScribeError::InvalidInput(
                "input must represent a user turn".to_string(),
            ));
        }

        let reply = engine::answer(&user_message.content, context)?;
        let assistant = ChatMessage::new(
            user_message.session_id,
            ChatRole::Assistant,
            reply.content,
            reply.context_ids,
        );
        self.storage.put_chat_message(&assistant)?;
        Ok(assistant)
    }

    /// Ask a question: persist the user turn, resolve context, invoke the
    /// engine, persist the assistant turn. One user turn triggers exactly
    /// one engine call and one assistant turn.
    ///
    /// With no query the trailing window from [`ScribeOptions`] is used.
    /// A rejected question (empty after trimming) creates no chat turns.
    pub fn ask(
        &self,
        session_id: SessionId,
        question: &str,
        query: Option<ContextQuery>,
    ) -> Result<ChatExchange> {
        if question.trim().is_empty() {
            return Err(ScribeError::InvalidInput(
                "question cannot be empty".to_string(),
            ));
        }
        self.require_session(session_id)?;

        // The user turn records the explicitly requested ids; the
        // assistant turn records the context actually resolved.
        let explicit_ids = match &query {
            Some(ContextQuery::Explicit { ids }) => ids.clone(),
            _ => Vec::new(),
        };
        let user = self.record_chat_message(NewChatMessage {
            session_id,
            role: ChatRole::User,
            content: question.to_string(),
            context_ids: explicit_ids,
        })?;

        let query = query.unwrap_or(ContextQuery::Recent {
            minutes: self.options.context_window_minutes,
        });
        let context = select_context(self.storage.as_ref(), session_id, &query)?;
        let assistant = self.process_chat_request(&user, &context)?;

        Ok(ChatExchange { user, assistant })
    }

    // --- Maintenance ---

    /// Storage statistics.
    pub fn stats(&self) -> Result<StorageStats> {
        self.storage.stats()
    }

    /// Copy the database file to `dest`.
    pub fn snapshot(&self, dest: impl AsRef<Path>) -> Result<()> {
        self.storage.snapshot(dest.as_ref())
    }

    fn require_session(&self, id: SessionId) -> Result<Session> {
        self.storage
            .get_session(id)?
            .ok_or(ScribeError::SessionNotFound(id))
    }
}
