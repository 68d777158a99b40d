// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Relink API.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use relink_core::taxonomy::{self, EmotionCategory, NeedOption};
use relink_core::types::{Conversation, EmotionCheckIn, HealthStatus, MainCategory};
use relink_core::RelinkError;
use relink_storage::{DaySummary, weekly_days};
use relink_wizard::{Turn, TurnReply};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::server::AppState;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Response body for POST /api/chat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(flatten)]
    pub reply: TurnReply,
    /// Id of the conversation saved when the wizard reached its result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// POST /api/chat
///
/// Answers one wizard turn. A turn that produces the final message also
/// saves the conversation.
pub async fn post_chat(
    State(state): State<AppState>,
    ApiJson(turn): ApiJson<Turn>,
) -> Result<Json<ChatResponse>, ApiError> {
    let wizard = state.wizard.as_ref().ok_or_else(ApiError::missing_api_key)?;
    let reply = wizard.handle(&turn).await?;

    let conversation_id = match &reply.nvc_data {
        Some(nvc) => {
            let now = now_ms();
            let conversation =
                Conversation::completed(now.to_string(), now, &turn.messages, &reply.content, nvc);
            match state.storage.save_conversation(&conversation).await {
                Ok(()) => {
                    info!(id = %conversation.id, "conversation saved");
                    Some(conversation.id)
                }
                Err(e) => {
                    warn!(error = %e, "failed to save finished conversation");
                    None
                }
            }
        }
        None => None,
    };

    Ok(Json(ChatResponse {
        reply,
        conversation_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub limit: Option<usize>,
}

/// GET /api/conversations
pub async fn get_conversations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ConversationQuery>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    let conversations = match query.limit {
        Some(limit) => state.storage.recent_conversations(limit).await?,
        None => state.storage.conversations().await?,
    };
    Ok(Json(conversations))
}

/// GET /api/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, ApiError> {
    state
        .storage
        .conversation(&id)
        .await?
        .map(Json)
        .ok_or_else(|| RelinkError::NotFound(format!("conversation {id}")).into())
}

/// POST /api/conversations
///
/// Saves a conversation, replacing one with the same id.
pub async fn post_conversation(
    State(state): State<AppState>,
    ApiJson(conversation): ApiJson<Conversation>,
) -> Result<(StatusCode, Json<Conversation>), ApiError> {
    if conversation.id.trim().is_empty() {
        return Err(RelinkError::InvalidInput("대화 id가 필요해요.".into()).into());
    }
    state.storage.save_conversation(&conversation).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

#[derive(Debug, Deserialize)]
pub struct CheckInQuery {
    /// `week` limits the list to the last seven days.
    pub range: Option<String>,
}

/// GET /api/checkins
pub async fn get_check_ins(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CheckInQuery>,
) -> Result<Json<Vec<EmotionCheckIn>>, ApiError> {
    let check_ins = match query.range.as_deref() {
        Some("week") => state.storage.weekly_check_ins(now_ms()).await?,
        Some(other) => {
            return Err(RelinkError::InvalidInput(format!("알 수 없는 기간이에요: {other}")).into());
        }
        None => state.storage.check_ins().await?,
    };
    Ok(Json(check_ins))
}

/// GET /api/checkins/weekly
pub async fn get_weekly_check_ins(
    State(state): State<AppState>,
) -> Result<Json<Vec<DaySummary>>, ApiError> {
    let check_ins = state.storage.check_ins().await?;
    Ok(Json(weekly_days(&check_ins, &chrono::Local::now())))
}

/// Request body for POST /api/checkins.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub main_category: MainCategory,
    pub sub_category: String,
    pub emotion: String,
    #[serde(default)]
    pub situation: Option<String>,
}

/// POST /api/checkins
pub async fn post_check_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckInRequest>,
) -> Result<(StatusCode, Json<EmotionCheckIn>), ApiError> {
    if taxonomy::subcategory(body.main_category, &body.sub_category).is_none() {
        return Err(RelinkError::InvalidInput(format!(
            "알 수 없는 감정 분류예요: {}",
            body.sub_category
        ))
        .into());
    }
    if body.emotion.trim().is_empty() {
        return Err(RelinkError::InvalidInput("감정을 선택해주세요.".into()).into());
    }

    let check_in = EmotionCheckIn::new(
        now_ms(),
        body.main_category,
        body.sub_category,
        body.emotion.trim(),
        body.situation,
    );
    state.storage.save_check_in(&check_in).await?;
    info!(id = %check_in.id, "check-in saved");
    Ok((StatusCode::CREATED, Json(check_in)))
}

/// Response body for GET /api/emotions.
#[derive(Debug, Serialize)]
pub struct EmotionsResponse {
    pub categories: &'static [EmotionCategory],
    pub needs: &'static [NeedOption],
}

/// GET /api/emotions
pub async fn get_emotions() -> Json<EmotionsResponse> {
    Json(EmotionsResponse {
        categories: taxonomy::EMOTION_CATEGORIES,
        needs: taxonomy::NEED_OPTIONS,
    })
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Whether an API key was configured at startup.
    pub provider_configured: bool,
    pub storage: String,
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
        Ok(HealthStatus::Unhealthy(reason)) => format!("unhealthy: {reason}"),
        Err(e) => format!("unhealthy: {e}"),
    };
    let status = if storage == "healthy" { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        provider_configured: state.wizard.is_some(),
        storage,
    })
}
