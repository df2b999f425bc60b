use super::{AppResult, AppState, JsonResponse};
use crate::devices;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use scribe_core::{
    AudioDevice, ChatFilter, ChatMessage, ChatRole, ContextQuery, MessageFilter, NewChatMessage,
    NewSession, NewTranscriptMessage, ScribeError, Session, SessionId, SessionPatch,
    TranscriptMessage, DEFAULT_WINDOW_MINUTES,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/:id",
            get(get_session).patch(patch_session).delete(delete_session),
        )
        .route(
            "/sessions/:id/messages",
            get(list_messages).post(create_message),
        )
        .route("/sessions/:id/messages/recent", get(recent_messages))
        .route("/sessions/:id/chat", get(chat_history).post(ask))
        .route("/sessions/:id/chat/messages", post(create_chat_message))
        .route("/devices", get(list_devices))
        .with_state(state)
}

#[derive(Serialize)]
struct StatsData {
    session_count: u64,
    message_count: u64,
    final_message_count: u64,
    interim_message_count: u64,
    chat_count: u64,
    sessions_by_status: HashMap<String, u64>,
    db_size_bytes: u64,
}

impl StatsData {
    fn from_stats(stats: scribe_core::StorageStats) -> Self {
        let sessions_by_status = stats
            .sessions_by_status
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect();
        Self {
            session_count: stats.session_count,
            message_count: stats.message_count,
            final_message_count: stats.final_message_count,
            interim_message_count: stats.interim_message_count,
            chat_count: stats.chat_count,
            sessions_by_status,
            db_size_bytes: stats.db_size_bytes,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    version: String,
    uptime_seconds: u64,
    stats: StatsData,
}

async fn health(State(state): State<AppState>) -> AppResult<Json<JsonResponse<HealthResponse>>> {
    let stats = state.scribe.stats()?;
    Ok(Json(JsonResponse::ok(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        stats: StatsData::from_stats(stats),
    })))
}

async fn stats(State(state): State<AppState>) -> AppResult<Json<JsonResponse<StatsData>>> {
    let stats = state.scribe.stats()?;
    Ok(Json(JsonResponse::ok(StatsData::from_stats(stats))))
}

// === Sessions ===

async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<NewSession>,
) -> AppResult<Json<JsonResponse<Session>>> {
    let session = state.scribe.create_session(input)?;
    Ok(Json(JsonResponse::ok(session)))
}

async fn list_sessions(
    State(state): State<AppState>,
) -> AppResult<Json<JsonResponse<Vec<Session>>>> {
    Ok(Json(JsonResponse::ok(state.scribe.list_sessions()?)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<Json<JsonResponse<Session>>> {
    let session = state
        .scribe
        .get_session(id)?
        .ok_or(ScribeError::SessionNotFound(id))?;
    Ok(Json(JsonResponse::ok(session)))
}

async fn patch_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(patch): Json<SessionPatch>,
) -> AppResult<Json<JsonResponse<Session>>> {
    let session = state.scribe.update_session(id, patch)?;
    Ok(Json(JsonResponse::ok(session)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> AppResult<Json<JsonResponse<()>>> {
    state.scribe.delete_session(id)?;
    Ok(Json(JsonResponse::ok(())))
}

// === Transcript messages ===

#[derive(Deserialize)]
struct CreateMessageRequest {
    content: String,
    confidence: f32,
    is_final: bool,
    #[serde(default)]
    speaker_id: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

async fn create_message(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<CreateMessageRequest>,
) -> AppResult<Json<JsonResponse<TranscriptMessage>>> {
    let message = state.scribe.append_message(NewTranscriptMessage {
        session_id: id,
        content: req.content,
        confidence: req.confidence,
        is_final: req.is_final,
        speaker_id: req.speaker_id,
        timestamp: req.timestamp,
    })?;
    Ok(Json(JsonResponse::ok(message)))
}

#[derive(Deserialize)]
struct ListMessagesQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    is_final: Option<bool>,
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Query(query): Query<ListMessagesQuery>,
) -> AppResult<Json<JsonResponse<Vec<TranscriptMessage>>>> {
    let mut filter = MessageFilter::new(id);
    if let Some(limit) = query.limit {
        filter = filter.with_limit(limit);
    }
    if let Some(offset) = query.offset {
        filter = filter.with_offset(offset);
    }
    if let Some(is_final) = query.is_final {
        filter = filter.with_is_final(is_final);
    }
    Ok(Json(JsonResponse::ok(state.scribe.messages(filter)?)))
}

#[derive(Deserialize)]
struct RecentMessagesQuery {
    minutes: Option<i64>,
}

async fn recent_messages(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Query(query): Query<RecentMessagesQuery>,
) -> AppResult<Json<JsonResponse<Vec<TranscriptMessage>>>> {
    let minutes = query.minutes.unwrap_or(DEFAULT_WINDOW_MINUTES);
    Ok(Json(JsonResponse::ok(
        state.scribe.recent_context(id, minutes)?,
    )))
}

// === Chat ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    /// Explicit context message ids. When present they override the
    /// trailing-window selection.
    #[serde(default)]
    context_ids: Option<Vec<Uuid>>,
    /// Trailing-window override, in minutes.
    #[serde(default)]
    minutes: Option<i64>,
}

#[derive(Serialize)]
struct AskResponse {
    user: ChatMessage,
    assistant: ChatMessage,
}

async fn ask(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<AskRequest>,
) -> AppResult<Json<JsonResponse<AskResponse>>> {
    let query = match (req.context_ids, req.minutes) {
        (Some(ids), _) => Some(ContextQuery::Explicit { ids }),
        (None, Some(minutes)) => Some(ContextQuery::Recent { minutes }),
        (None, None) => None,
    };
    let exchange = state.scribe.ask(id, &req.question, query)?;
    Ok(Json(JsonResponse::ok(AskResponse {
        user: exchange.user,
        assistant: exchange.assistant,
    })))
}

#[derive(Deserialize)]
struct ListChatQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn chat_history(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Query(query): Query<ListChatQuery>,
) -> AppResult<Json<JsonResponse<Vec<ChatMessage>>>> {
    let mut filter = ChatFilter::new(id);
    if let Some(limit) = query.limit {
        filter = filter.with_limit(limit);
    }
    if let Some(offset) = query.offset {
        filter = filter.with_offset(offset);
    }
    Ok(Json(JsonResponse::ok(state.scribe.chat_history(filter)?)))
}

#[derive(Deserialize)]
struct CreateChatMessageRequest {
    role: ChatRole,
    content: String,
    #[serde(default)]
    context_ids: Vec<Uuid>,
}

async fn create_chat_message(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<CreateChatMessageRequest>,
) -> AppResult<Json<JsonResponse<ChatMessage>>> {
    let message = state.scribe.record_chat_message(NewChatMessage {
        session_id: id,
        role: req.role,
        content: req.content,
        context_ids: req.context_ids,
    })?;
    Ok(Json(JsonResponse::ok(message)))
}

// === Devices ===

async fn list_devices() -> Json<JsonResponse<Vec<AudioDevice>>> {
    Json(JsonResponse::ok(devices::list()))
}
