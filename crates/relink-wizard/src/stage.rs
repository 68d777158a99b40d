// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The wizard turn handler.
//!
//! Every turn carries the full transcript and the client's current stage.
//! The handler decides the reply, the next stage, and which options to offer.
//! No state is kept between turns.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use relink_config::model::WizardConfig;
use relink_core::traits::ProviderAdapter;
use relink_core::types::{ChatMessage, CompletionRequest, ConversationData, NvcData, Role, Stage};
use relink_core::{ProviderErrorKind, RelinkError};

use crate::assemble::{self, Assembler};
use crate::extract;
use crate::grammar;
use crate::prompts;
use crate::specificity::is_specific_enough;
use crate::suggest::Suggester;

const FEELING_QUESTION: &str = "힘드셨겠어요.\n그때 어떤 기분이 드셨나요?";
const NEED_CLOSING: &str =
    "\n\n다음에 이런 상황이 온다면 나의 마음과 나에게 중요한 것을 상대에게 얘기해주세요.\n함께 정리해볼까요?";
const RESULT_HEADER: &str = "📝 이렇게 바뀌었어요";
const CONTINUE_OPTIONS: &[&str] = &["좋아요", "괜찮아요"];
const ADVANTAGES: &[&str] = &[
    "상대방을 비난하지 않아요",
    "내 감정과 욕구를 명확히 전달해요",
    "구체적인 부탁으로 변화를 이끌어요",
];

/// Observation inputs after which the wizard moves on regardless.
const MAX_OBSERVATION_TURNS: usize = 3;

fn default_stage() -> Stage {
    Stage::Observation
}

/// One client turn: the transcript so far and the stage the client is in.
#[derive(Debug, Clone, Deserialize)]
pub struct Turn {
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_stage")]
    pub stage: Stage,
}

/// The wizard's answer to a turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    pub content: String,
    pub next_stage: Stage,
    pub options: Vec<String>,
    pub multi_select: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nvc_data: Option<NvcData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advantages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_data: Option<ConversationData>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_continue_button: bool,
}

impl TurnReply {
    fn new(content: impl Into<String>, next_stage: Stage) -> Self {
        Self {
            content: content.into(),
            next_stage,
            options: Vec::new(),
            multi_select: next_stage.is_multi_select(),
            nvc_data: None,
            before_message: None,
            advantages: None,
            conversation_data: None,
            show_continue_button: false,
        }
    }

    fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }
}

fn user_texts(messages: &[ChatMessage]) -> Vec<&str> {
    messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect()
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Drives the five-stage NVC conversation.
pub struct Wizard {
    provider: Arc<dyn ProviderAdapter>,
    suggester: Suggester,
    assembler: Assembler,
    pacing: Duration,
    temperature: f32,
}

impl Wizard {
    pub fn new(provider: Arc<dyn ProviderAdapter>, config: &WizardConfig) -> Self {
        Self {
            suggester: Suggester::new(
                provider.clone(),
                config.max_emotion_options,
                config.max_need_options,
            ),
            assembler: Assembler::new(provider.clone()),
            provider,
            pacing: Duration::from_millis(config.response_delay_ms),
            temperature: 0.7,
        }
    }

    /// Overrides the pause before templated replies.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Sampling temperature for every model call.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self.suggester = self.suggester.with_temperature(temperature);
        self.assembler = self.assembler.with_temperature(temperature);
        self
    }

    /// Answers one turn.
    #[instrument(skip_all, fields(stage = %turn.stage, messages = turn.messages.len()))]
    pub async fn handle(&self, turn: &Turn) -> Result<TurnReply, RelinkError> {
        if turn.messages.is_empty() {
            return Err(RelinkError::InvalidInput("메시지가 필요해요.".into()));
        }

        let reply = match turn.stage {
            Stage::Observation => self.observation(&turn.messages).await?,
            Stage::Feeling => self.feeling(&turn.messages).await?,
            Stage::Need => self.need(&turn.messages).await,
            Stage::Empathy => self.empathy(&turn.messages).await,
            Stage::Result => self.reply(&turn.messages, Stage::Result, None).await?,
        };
        info!(next_stage = %reply.next_stage, options = reply.options.len(), "turn handled");
        Ok(reply)
    }

    async fn pause(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }

    /// A free-form model reply at `stage`; the reply offers no options.
    async fn reply(
        &self,
        messages: &[ChatMessage],
        stage: Stage,
        instruction: Option<&str>,
    ) -> Result<TurnReply, RelinkError> {
        let request = CompletionRequest {
            model: None,
            system: Some(prompts::stage_system(stage, instruction)),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: prompts::CHAT_MAX_TOKENS,
        };
        let response = self.provider.complete(request).await?;
        let content = response.content.trim();
        if content.is_empty() {
            return Err(RelinkError::provider(
                ProviderErrorKind::EmptyResponse,
                "model returned no text",
            ));
        }
        Ok(TurnReply::new(content, stage))
    }

    async fn ask_feeling(&self, situation: &str) -> TurnReply {
        let emotions = self.suggester.emotions_for(situation).await;
        self.pause().await;
        TurnReply::new(FEELING_QUESTION, Stage::Observation.next()).with_options(emotions)
    }

    async fn observation(&self, messages: &[ChatMessage]) -> Result<TurnReply, RelinkError> {
        let texts = user_texts(messages);
        let Some(last) = texts.last().copied() else {
            return self.reply(messages, Stage::Observation, None).await;
        };
        let all = texts.join(" ");

        if texts.len() >= MAX_OBSERVATION_TURNS {
            debug!("observation limit reached, moving to feeling");
            return Ok(self.ask_feeling(&all).await);
        }

        if is_specific_enough(last) {
            let situation = if texts.len() == 1 { last } else { all.as_str() };
            return Ok(self.ask_feeling(situation).await);
        }

        debug!(inputs = texts.len(), "situation still vague");
        let instruction = if texts.len() == 1 {
            prompts::vague_first(last)
        } else {
            prompts::VAGUE_SECOND.to_string()
        };
        self.reply(messages, Stage::Observation, Some(&instruction)).await
    }

    async fn feeling(&self, messages: &[ChatMessage]) -> Result<TurnReply, RelinkError> {
        let texts = user_texts(messages);
        let last = texts.last().copied().unwrap_or_default();
        let mut emotions = extract::parse_selection(last);
        if emotions.is_empty() && !last.trim().is_empty() {
            emotions.push(last.trim().to_string());
        }

        let needs = self.suggester.needs_for(&texts.join(" "), &emotions).await;
        let instruction = prompts::feeling_acknowledgement(
            &emotions.join(", "),
            &grammar::join_emotions_past(&emotions),
        );
        let reply = self.reply(messages, Stage::Feeling, Some(&instruction)).await?;
        Ok(TurnReply::new(reply.content, Stage::Feeling.next()).with_options(needs))
    }

    async fn need(&self, messages: &[ChatMessage]) -> TurnReply {
        let last = user_texts(messages).last().copied().unwrap_or_default();
        let mut needs = extract::parse_selection(last);
        if needs.is_empty() {
            needs.push(grammar::DEFAULT_NEED.to_string());
        }

        let mut data = extract::conversation_data(messages);
        data.selected_needs = needs.clone();

        self.pause().await;
        let content = format!("{}{NEED_CLOSING}", grammar::empathy_message(&needs));
        let mut reply = TurnReply::new(content, Stage::Need.next()).with_options(owned(CONTINUE_OPTIONS));
        reply.show_continue_button = true;
        reply.conversation_data = Some(data);
        reply
    }

    async fn empathy(&self, messages: &[ChatMessage]) -> TurnReply {
        let mut data = extract::conversation_data(messages);
        data.selected_needs = extract::need_selection(messages);
        if data.selected_needs.is_empty() {
            data.selected_needs.push(grammar::DEFAULT_NEED.to_string());
        }
        if data.specific_situation.trim().is_empty()
            && let Some(situation) = extract::fallback_situation(messages)
        {
            data.specific_situation = situation;
        }

        let before = assemble::before_message(&data);
        let nvc = self.assembler.assemble(&data).await;
        self.pause().await;

        let mut reply = TurnReply::new(RESULT_HEADER, Stage::Empathy.next());
        reply.nvc_data = Some(nvc);
        reply.before_message = Some(before);
        reply.advantages = Some(owned(ADVANTAGES));
        reply.conversation_data = Some(data);
        reply
    }
}
