// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-generated emotion and need options with fixed fallbacks.
//!
//! Suggestions never fail: a provider error, an unparsable answer, or an
//! empty list all yield the fixed option list.

use std::sync::Arc;

use relink_core::traits::ProviderAdapter;
use relink_core::types::CompletionRequest;
use tracing::{debug, warn};

use crate::prompts;

/// Emotion vocabulary offered to the model, also used to tell an emotion
/// pick apart from prose and to keep emotions out of need lists.
pub const EMOTION_WORDS: &[&str] = &[
    "화남",
    "서운함",
    "속상함",
    "불안함",
    "외로움",
    "무시당함",
    "답답함",
    "억울함",
    "짜증남",
    "실망스러움",
    "피곤함",
    "자존심상함",
    "분함",
    "배신감",
    "혼란스러움",
    "무서움",
    "부끄러움",
    "두려움",
    "당황함",
    "난처함",
];

pub const FALLBACK_EMOTIONS: &[&str] = &[
    "화남",
    "서운함",
    "속상함",
    "불안함",
    "외로움",
    "답답함",
    "억울함",
    "실망스러움",
];

pub const FALLBACK_NEEDS: &[&str] = &[
    "존중받고 싶었어요",
    "이해받고 싶었어요",
    "배려받고 싶었어요",
    "소통하고 싶었어요",
    "안정감을 느끼고 싶었어요",
    "인정받고 싶었어요",
];

/// Parses a list answer: a JSON array, else the text with brackets and
/// quotes stripped and split on commas.
pub fn parse_list(answer: &str) -> Vec<String> {
    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(answer.trim()) {
        return items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect();
    }
    answer
        .replace(['[', ']', '"'], "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

fn owned(items: &[&str], cap: usize) -> Vec<String> {
    items.iter().take(cap).map(|s| s.to_string()).collect()
}

/// Asks the provider for option lists.
pub struct Suggester {
    provider: Arc<dyn ProviderAdapter>,
    temperature: f32,
    max_emotions: usize,
    max_needs: usize,
}

impl Suggester {
    pub fn new(provider: Arc<dyn ProviderAdapter>, max_emotions: usize, max_needs: usize) -> Self {
        Self {
            provider,
            temperature: 0.7,
            max_emotions,
            max_needs,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn ask(&self, system: &str, user: String) -> Option<String> {
        let mut request = CompletionRequest::single_turn(system, user, prompts::SUGGESTION_MAX_TOKENS);
        request.temperature = self.temperature;
        match self.provider.complete(request).await {
            Ok(response) => Some(response.content),
            Err(e) => {
                warn!(error = %e, "suggestion request failed, using fallback options");
                None
            }
        }
    }

    /// Emotions someone in `situation` might feel, at most `max_emotions`.
    pub async fn emotions_for(&self, situation: &str) -> Vec<String> {
        let answer = self
            .ask(prompts::EMOTIONS_SYSTEM, prompts::emotions_user(situation))
            .await;

        let mut emotions = answer.map(|a| dedup_preserving_order(parse_list(&a))).unwrap_or_default();
        emotions.truncate(self.max_emotions);
        if emotions.is_empty() {
            debug!("no emotions suggested, using fallback list");
            return owned(FALLBACK_EMOTIONS, self.max_emotions);
        }
        emotions
    }

    /// Unmet needs for `situation` given the picked emotions, at most
    /// `max_needs`. Items naming an emotion are dropped.
    pub async fn needs_for(&self, situation: &str, emotions: &[String]) -> Vec<String> {
        let answer = self
            .ask(prompts::NEEDS_SYSTEM, prompts::needs_user(situation, &emotions.join(",")))
            .await;

        let mut needs: Vec<String> = answer
            .map(|a| parse_list(&a))
            .unwrap_or_default()
            .into_iter()
            .filter(|need| !EMOTION_WORDS.iter().any(|e| need.contains(e)))
            .collect();
        needs.truncate(self.max_needs);
        if needs.is_empty() {
            debug!("no needs suggested, using fallback list");
            return owned(FALLBACK_NEEDS, self.max_needs);
        }
        needs
    }
}
