// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composition of the final NVC message.
//!
//! The request and the message are drafted by the model and cleaned up
//! locally. When the model fails, both are built from grammar templates so
//! the user always gets a complete result.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use relink_core::traits::ProviderAdapter;
use relink_core::types::{CompletionRequest, ConversationData, NvcData};

use crate::grammar;
use crate::prompts;
use crate::repair;

const NO_SITUATION: &str = "상황 정보 없음";
const NO_SITUATION_MESSAGE: &str = "상황 정보가 부족합니다. 다시 시작해주세요.";

static INDIRECT_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+에게\s*").expect("valid regex"));

/// Strips what the model adds around a request and normalizes its ending.
pub fn clean_request(draft: &str) -> String {
    let mut text = draft
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”'))
        .replace("할 수 있을까요?", "")
        .replace("수 있을까요?", "");

    if text.contains('때')
        && let Some((_, last)) = text.rsplit_once(',')
    {
        text = last.to_string();
    }
    let mut text = text.trim().to_string();
    if let Some(rest) = text.strip_prefix("상대방이") {
        text = rest.trim_start().to_string();
    }
    let mut text = INDIRECT_OBJECT.replace_all(&text, "").into_owned();
    if text.contains("카드") {
        text = text.replace("똑바로", "다시");
    }
    grammar::request_form(&text)
}

/// Keyword-driven request used when the model gives nothing usable.
pub fn fallback_request(needs: &[String], situation: &str) -> String {
    const CARD_AGAIN: &str = "평소 목소리로 카드를 다시 찍어달라고 얘기해줄";
    let loud = situation.contains("소리") || situation.contains("지르");

    let request = if loud && (situation.contains("카드") || situation.contains("찍")) {
        CARD_AGAIN
    } else if loud {
        "평소 목소리로 말해달라고 얘기해줄"
    } else if situation.contains("카드") && situation.contains("찍") {
        CARD_AGAIN
    } else if situation.contains('말') || situation.contains("듣지") {
        "내 말을 끝까지 들어줄"
    } else if needs.iter().any(|n| n.contains("안전") || n.contains("편안")) {
        "내 주변 환경이 안전하고 편안했으면 좋겠을"
    } else {
        "내 마음을 이해해줄"
    };
    request.to_string()
}

/// The blaming message a user might have said before the exercise.
pub fn before_message(data: &ConversationData) -> String {
    let situation = data.specific_situation.as_str();
    if situation.contains('못') || situation.contains("실수") {
        "왜 이렇게 못하니? 제대로 좀 해봐!".to_string()
    } else if situation.contains('늦') || situation.contains("약속") {
        "왜 또 늦었어? 약속을 지켜야지!".to_string()
    } else if situation.contains("무시") || situation.contains("반말") {
        "왜 나를 무시하는 거야? 예의 좀 지켜!".to_string()
    } else if situation.contains('말') || situation.contains("듣지") {
        "내 말 좀 들어봐! 왜 자꾸 끼어들어?".to_string()
    } else {
        format!(
            "\"{situation}... 정말 {}!\"",
            grammar::join_emotions_casual(&data.selected_emotions)
        )
    }
}

/// Template message: situation and emotions, need, then request.
pub fn compose(data: &ConversationData, polite_request: &str) -> String {
    format!(
        "{}, {}.\n{}.\n다음부터는 {polite_request}",
        grammar::situation_clause(&data.specific_situation),
        grammar::join_emotions_past(&data.selected_emotions),
        grammar::need_sentence(&data.selected_needs),
    )
}

fn emotions_display(emotions: &[String]) -> String {
    if emotions.is_empty() {
        "힘들었어요".to_string()
    } else {
        emotions.join(", ")
    }
}

/// Drafts requests and messages through the provider.
pub struct Assembler {
    provider: Arc<dyn ProviderAdapter>,
    temperature: f32,
}

impl Assembler {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            provider,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn draft(&self, system: &str, user: String, max_tokens: u32) -> Option<String> {
        let mut request = CompletionRequest::single_turn(system, user, max_tokens);
        request.temperature = self.temperature;
        match self.provider.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => Some(response.content),
            Ok(_) => {
                debug!("model returned an empty draft");
                None
            }
            Err(e) => {
                warn!(error = %e, "draft request failed, using template");
                None
            }
        }
    }

    /// A concrete request in the `~줄` form.
    pub async fn generate_request(&self, needs: &[String], situation: &str) -> String {
        let drafted = self
            .draft(
                prompts::REQUEST_SYSTEM,
                prompts::request_user(situation, &needs.join(", ")),
                prompts::REQUEST_MAX_TOKENS,
            )
            .await
            .map(|d| clean_request(&d))
            .filter(|r| !r.is_empty());

        drafted.unwrap_or_else(|| fallback_request(needs, situation))
    }

    /// Builds the four parts and the full message for a finished run.
    pub async fn assemble(&self, data: &ConversationData) -> NvcData {
        let emotions = emotions_display(&data.selected_emotions);
        let needs = grammar::needs_display(&data.selected_needs);

        if data.specific_situation.trim().is_empty() {
            let request = fallback_request(&data.selected_needs, "");
            return NvcData {
                observation: NO_SITUATION.to_string(),
                emotions,
                needs,
                request: grammar::polite_request(&request),
                full_message: NO_SITUATION_MESSAGE.to_string(),
            };
        }

        let situation = data.specific_situation.as_str();
        let request = self.generate_request(&data.selected_needs, situation).await;
        let polite = grammar::polite_request(&request);

        let full_message = match self
            .draft(
                prompts::MESSAGE_SYSTEM,
                prompts::message_user(
                    situation,
                    &data.selected_emotions.join(", "),
                    &data.selected_needs.join(", "),
                    &request,
                ),
                prompts::MESSAGE_MAX_TOKENS,
            )
            .await
        {
            Some(draft) => repair::repair(&draft, situation),
            None => compose(data, &polite),
        };

        NvcData {
            observation: situation.to_string(),
            emotions,
            needs,
            request: polite,
            full_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::ProviderErrorKind;
    use relink_test_utils::MockProvider;

    fn data(situation: &str, emotions: &[&str], needs: &[&str]) -> ConversationData {
        ConversationData {
            specific_situation: situation.to_string(),
            selected_emotions: emotions.iter().map(|s| s.to_string()).collect(),
            selected_needs: needs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn clean_request_strips_wrapping() {
        assert_eq!(clean_request("\"약속 시간을 지켜줄\""), "약속 시간을 지켜줄");
        assert_eq!(
            clean_request("아저씨에게 평소 목소리로 카드를 똑바로 찍어달라고 얘기해줄"),
            "평소 목소리로 카드를 다시 찍어달라고 얘기해줄"
        );
        assert_eq!(clean_request("카드를 찍어달라고 할"), "카드를 찍어달라고 해줄");
        assert_eq!(clean_request("상대방이 끝까지 들어줄래요?"), "끝까지 들어줄");
        assert_eq!(
            clean_request("회의할 때, 먼저 내 말을 끝까지 들어줄"),
            "먼저 내 말을 끝까지 들어줄"
        );
    }

    #[test]
    fn fallback_request_by_keyword() {
        assert_eq!(
            fallback_request(&[], "기사님이 카드 찍으라고 소리를 질렀어요"),
            "평소 목소리로 카드를 다시 찍어달라고 얘기해줄"
        );
        assert_eq!(
            fallback_request(&[], "버스에서 찍으라고 소리를 질렀어요"),
            "평소 목소리로 카드를 다시 찍어달라고 얘기해줄"
        );
        assert_eq!(
            fallback_request(&[], "교통카드를 안 찍었다고 붙잡았어요"),
            "평소 목소리로 카드를 다시 찍어달라고 얘기해줄"
        );
        assert_eq!(fallback_request(&[], "옆자리에서 소리를 질렀어요"), "평소 목소리로 말해달라고 얘기해줄");
        assert_eq!(fallback_request(&[], "회의 중에 제 말을 끊었어요"), "내 말을 끝까지 들어줄");
        assert_eq!(
            fallback_request(&["안전하고 싶었어요".into()], "밤길이 어두웠어요"),
            "내 주변 환경이 안전하고 편안했으면 좋겠을"
        );
        assert_eq!(fallback_request(&[], "동생이 방에 들어왔어요"), "내 마음을 이해해줄");
    }

    #[test]
    fn before_message_by_keyword() {
        assert_eq!(
            before_message(&data("친구가 약속 시간에 30분 늦었어요", &[], &[])),
            "왜 또 늦었어? 약속을 지켜야지!"
        );
        assert_eq!(
            before_message(&data("후임이 보고서를 실수했어요", &[], &[])),
            "왜 이렇게 못하니? 제대로 좀 해봐!"
        );
        assert_eq!(
            before_message(&data("동생이 방에 들어왔어요", &["짜증남", "서운함"], &[])),
            "\"동생이 방에 들어왔어요... 정말 짜증나고 서운했어!\""
        );
    }

    #[test]
    fn compose_template() {
        let d = data("친구가 약속 시간에 30분 늦었어요", &["서운함", "답답함"], &["존중받고 싶었어요"]);
        assert_eq!(
            compose(&d, "미리 연락해주세요"),
            "친구가 약속 시간에 30분 늦었을 때, 서운하고 답답했어요.\n\
             저는 존중받고 싶어요.\n\
             다음부터는 미리 연락해주세요"
        );
    }

    #[tokio::test]
    async fn assemble_uses_model_drafts() {
        let provider = Arc::new(MockProvider::new());
        provider.push_response("미리 연락해줄래요?").await;
        provider
            .push_response("친구가 늦었을 때, 서운하하고 답답했어요.\n존중받고 싶어요, 배려받고 싶어요.\n다음부터는 미리 연락해줄래요?")
            .await;
        let assembler = Assembler::new(provider.clone());

        let nvc = assembler
            .assemble(&data(
                "친구가 약속 시간에 30분 늦었어요",
                &["서운함", "답답함"],
                &["존중받고 싶었어요", "배려받고 싶었어요"],
            ))
            .await;

        assert_eq!(nvc.request, "미리 연락해주세요");
        assert_eq!(nvc.emotions, "서운함, 답답함");
        assert_eq!(nvc.needs, "존중받고 싶고 배려받고 싶어요");
        assert_eq!(
            nvc.full_message,
            "친구가 늦었을 때, 서운하고 답답했어요.\n존중받고 싶고 배려받고 싶어요.\n다음부터는 미리 연락해주세요"
        );

        let requests = provider.requests().await;
        assert_eq!(requests[0].max_tokens, prompts::REQUEST_MAX_TOKENS);
        assert_eq!(requests[1].max_tokens, prompts::MESSAGE_MAX_TOKENS);
        assert!(requests[1].messages[0].content.contains("부탁: 미리 연락해줄"));
    }

    #[tokio::test]
    async fn assemble_falls_back_to_templates() {
        let provider = Arc::new(MockProvider::new());
        provider.push_failure(ProviderErrorKind::RateLimited).await;
        provider.push_response("   ").await;
        let assembler = Assembler::new(provider);

        let nvc = assembler
            .assemble(&data("회의 중에 팀장님이 제 말을 끊었어요", &["답답함"], &[]))
            .await;

        assert_eq!(nvc.request, "내 말을 끝까지 들어주세요");
        assert_eq!(
            nvc.full_message,
            "회의 중에 팀장님이 제 말을 끊었을 때, 답답했어요.\n저는 존중받고 싶어요.\n다음부터는 내 말을 끝까지 들어주세요"
        );
    }

    #[tokio::test]
    async fn empty_situation_skips_the_model() {
        let provider = Arc::new(MockProvider::new());
        let assembler = Assembler::new(provider.clone());
        let nvc = assembler.assemble(&data("  ", &[], &[])).await;

        assert_eq!(nvc.observation, NO_SITUATION);
        assert_eq!(nvc.full_message, NO_SITUATION_MESSAGE);
        assert_eq!(nvc.emotions, "힘들었어요");
        assert_eq!(nvc.request, "내 마음을 이해해주세요");
        assert!(provider.requests().await.is_empty());
    }
}
