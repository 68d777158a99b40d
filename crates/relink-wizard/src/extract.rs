// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recovers the situation and the selections from a wizard transcript.
//!
//! The client sends the whole transcript on every turn. Option picks arrive
//! as user messages holding either a JSON array or a comma-joined list.

use relink_core::types::{ChatMessage, ConversationData, Role};

use crate::suggest::EMOTION_WORDS;

/// Acknowledgements that carry no situation detail.
const TRIVIAL_REPLIES: &[&str] = &["네", "예", "맞아요", "맞아", "응", "어", "그래"];

/// A situation shorter than this is padded with the other observation inputs.
const SHORT_SITUATION_CHARS: usize = 10;

/// Comma lists at least this long are treated as prose, not a selection.
const MAX_SELECTION_CHARS: usize = 100;

fn user_texts(messages: &[ChatMessage]) -> Vec<&str> {
    messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect()
}

fn json_array(text: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Parses an option pick: a JSON array, else a comma list, else the text itself.
pub fn parse_selection(text: &str) -> Vec<String> {
    if let Some(items) = json_array(text) {
        return items;
    }
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a message looks like an option pick rather than prose.
pub fn is_selection(text: &str) -> bool {
    json_array(text).is_some() || (text.contains(',') && text.chars().count() < MAX_SELECTION_CHARS)
}

/// Whether a message is the feeling-stage pick.
fn is_emotion_selection(text: &str) -> bool {
    if json_array(text).is_some() {
        return true;
    }
    let trimmed = text.trim();
    if EMOTION_WORDS.contains(&trimmed) {
        return true;
    }
    text.contains(',')
        && text
            .split(',')
            .any(|part| EMOTION_WORDS.iter().any(|word| part.contains(word)))
}

fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() > 3 && !TRIVIAL_REPLIES.contains(&trimmed)
}

/// Index of the feeling-stage pick among the user messages.
fn emotion_selection_index(texts: &[&str]) -> Option<usize> {
    // A JSON pick always wins over the comma heuristic.
    texts
        .iter()
        .position(|t| json_array(t).is_some())
        .or_else(|| texts.iter().position(|t| is_emotion_selection(t)))
}

/// Picks the most concrete observation input.
///
/// The longest input wins, except that a second input at least as long as
/// the first is preferred since it usually answers a clarifying question.
/// Very short results are replaced by all inputs joined.
fn pick_situation(observations: &[&str]) -> String {
    let mut situation = observations
        .iter()
        .copied()
        .reduce(|longest, current| {
            if current.chars().count() > longest.chars().count() {
                current
            } else {
                longest
            }
        })
        .unwrap_or_default()
        .to_string();

    if let [first, second, ..] = observations
        && second.chars().count() >= first.chars().count()
    {
        situation = second.to_string();
    }

    if situation.chars().count() < SHORT_SITUATION_CHARS {
        let joined = observations.join(" ");
        if joined.chars().count() > situation.chars().count() {
            situation = joined;
        }
    }
    situation
}

/// Extracts the situation and the emotion pick from the transcript.
///
/// `selected_needs` is left empty; the stage handlers fill it.
pub fn conversation_data(messages: &[ChatMessage]) -> ConversationData {
    let texts = user_texts(messages);
    let boundary = emotion_selection_index(&texts);

    let observations: Vec<&str> = texts[..boundary.unwrap_or(texts.len())]
        .iter()
        .copied()
        .filter(|t| is_meaningful(t))
        .collect();

    ConversationData {
        specific_situation: pick_situation(&observations),
        selected_emotions: boundary.map(|i| parse_selection(texts[i])).unwrap_or_default(),
        selected_needs: Vec::new(),
    }
}

/// Finds the need pick: the user message right after the emotion pick, or
/// the last user message when there is none.
pub fn need_selection(messages: &[ChatMessage]) -> Vec<String> {
    let texts = user_texts(messages);
    let after_emotions = emotion_selection_index(&texts)
        .or_else(|| texts.iter().position(|t| is_selection(t)))
        .filter(|&i| i + 1 < texts.len())
        .map(|i| texts[i + 1]);

    match after_emotions.or_else(|| texts.last().copied()) {
        Some(text) => parse_selection(text),
        None => Vec::new(),
    }
}

/// Last meaningful non-selection user message, used when no situation
/// could be extracted.
pub fn fallback_situation(messages: &[ChatMessage]) -> Option<String> {
    user_texts(messages)
        .into_iter()
        .rev()
        .find(|t| json_array(t).is_none() && is_meaningful(t))
        .map(str::to_string)
}
