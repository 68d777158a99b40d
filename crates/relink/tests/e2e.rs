// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for a complete wizard run over HTTP.
//!
//! Each test builds an isolated TestHarness (temp SQLite, scripted provider)
//! and plays the client: it keeps the transcript, appends every reply, and
//! sends the stage the server asked for next.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use relink_gateway::{AppState, router};
use relink_test_utils::TestHarness;
use relink_wizard::Wizard;

const GREETING: &str = "오늘 힘든 하루를 보냈군요.\n누구와 어떤 일이 있었나요?";

/// A client holding the transcript and the current stage.
struct Client {
    state: AppState,
    messages: Vec<Value>,
    stage: String,
}

impl Client {
    fn new(harness: &TestHarness) -> Self {
        let wizard = Wizard::new(harness.provider(), &harness.config.wizard);
        Self {
            state: AppState::new(Some(Arc::new(wizard)), harness.storage.clone()),
            messages: vec![json!({"role": "ai", "content": GREETING})],
            stage: "observation".to_string(),
        }
    }

    async fn say(&mut self, text: &str) -> Value {
        self.messages.push(json!({"role": "user", "content": text}));
        let body = json!({"messages": self.messages, "stage": self.stage});

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router(self.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let reply: Value = serde_json::from_slice(&bytes).unwrap();

        self.messages.push(json!({"role": "ai", "content": reply["content"]}));
        self.stage = reply["nextStage"].as_str().unwrap().to_string();
        reply
    }
}

#[tokio::test]
async fn full_wizard_run_is_saved_once() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            // observation: emotion options
            r#"["서운함", "답답함", "화남"]"#.to_string(),
            // feeling: need options, then the acknowledgement
            r#"["존중받고 싶었어요", "배려받고 싶었어요"]"#.to_string(),
            "서운하고 답답하셨군요. 그때 나에게 중요했던 건 무엇이었을까요?".to_string(),
            // empathy: request draft, then the full message draft
            "약속 시간을 지켜줄".to_string(),
            "친구가 약속 시간에 30분이나 늦게 와서 기다렸을 때, 서운하고 답답했어요.\n\
             저는 존중받고 싶어요.\n\
             다음부터는 약속 시간을 지켜주세요"
                .to_string(),
        ])
        .build()
        .await
        .unwrap();
    let mut client = Client::new(&harness);

    let reply = client.say("친구가 약속 시간에 30분이나 늦게 와서 기다렸어요").await;
    assert_eq!(client.stage, "feeling");
    assert_eq!(reply["options"][0], "서운함");

    let reply = client.say(r#"["서운함","답답함"]"#).await;
    assert_eq!(client.stage, "need");
    assert_eq!(reply["options"], json!(["존중받고 싶었어요", "배려받고 싶었어요"]));

    let reply = client.say("존중받고 싶었어요").await;
    assert_eq!(client.stage, "empathy");
    assert_eq!(reply["showContinueButton"], true);
    assert_eq!(reply["conversationData"]["selectedEmotions"], json!(["서운함", "답답함"]));

    let reply = client.say("좋아요").await;
    assert_eq!(client.stage, "result");
    assert_eq!(reply["nvcData"]["request"], "약속 시간을 지켜주세요");
    assert_eq!(reply["nvcData"]["needs"], "존중받고 싶었어요");
    assert!(
        reply["nvcData"]["fullMessage"]
            .as_str()
            .unwrap()
            .contains("서운하고 답답했어요")
    );
    assert_eq!(reply["beforeMessage"], "왜 또 늦었어? 약속을 지켜야지!");

    assert_eq!(harness.mock_provider.remaining().await, 0);

    let saved = harness.storage.conversations().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, reply["conversationId"].as_str().unwrap());
    assert_eq!(saved[0].conversion_text, reply["nvcData"]["fullMessage"].as_str().unwrap());
    // Client transcript plus the result header and the composed message.
    assert_eq!(saved[0].messages.len(), client.messages.len() - 1 + 2);
}

#[tokio::test]
async fn vague_start_is_clarified_before_feelings() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "어떤 일이 있었는지 조금 더 자세히 말해줄 수 있을까요?".to_string(),
            r#"["답답함"]"#.to_string(),
        ])
        .build()
        .await
        .unwrap();
    let mut client = Client::new(&harness);

    let reply = client.say("오늘 너무 힘들었어요").await;
    assert_eq!(client.stage, "observation");
    assert_eq!(reply["options"], json!([]));

    client.say("회의 시간에 팀장님이 제 말을 중간에 끊고 다른 얘기를 했어요").await;
    assert_eq!(client.stage, "feeling");
    assert!(harness.storage.conversations().await.unwrap().is_empty());
}
