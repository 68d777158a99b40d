// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relink history` and `relink checkins` command implementations.
//!
//! Both read the local database directly, so they work while the server is
//! stopped.

use std::io::IsTerminal;

use chrono::{Local, TimeZone};
use colored::Colorize;
use relink_config::model::RelinkConfig;
use relink_core::taxonomy;
use relink_core::types::{Conversation, EmotionCheckIn};
use relink_core::{RelinkError, StorageAdapter};
use relink_storage::{DaySummary, SqliteStorage, weekly_days};

async fn open_storage(config: &RelinkConfig) -> Result<SqliteStorage, RelinkError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(storage)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), RelinkError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| RelinkError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Formats a millisecond timestamp in local time.
fn format_date(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Runs the `relink history` command.
pub async fn run_history(
    config: &RelinkConfig,
    limit: Option<usize>,
    json: bool,
) -> Result<(), RelinkError> {
    let storage = open_storage(config).await?;
    let conversations = match limit {
        Some(limit) => storage.recent_conversations(limit).await?,
        None => storage.conversations().await?,
    };

    if json {
        return print_json(&conversations);
    }
    let use_color = std::io::stdout().is_terminal();
    print!("{}", render_history(&conversations, use_color));
    Ok(())
}

/// Runs the `relink checkins` command.
pub async fn run_checkins(config: &RelinkConfig, week: bool, json: bool) -> Result<(), RelinkError> {
    let storage = open_storage(config).await?;
    let use_color = std::io::stdout().is_terminal();

    if week {
        let all = storage.check_ins().await?;
        let days = weekly_days(&all, &Local::now());
        if json {
            return print_json(&days);
        }
        print!("{}", render_week(&days, use_color));
        return Ok(());
    }

    let check_ins = storage.check_ins().await?;
    if json {
        return print_json(&check_ins);
    }
    print!("{}", render_check_ins(&check_ins, use_color));
    Ok(())
}

fn render_history(conversations: &[Conversation], use_color: bool) -> String {
    if conversations.is_empty() {
        return "No conversations yet. Finish a wizard run to see it here.\n".to_string();
    }

    let mut out = String::new();
    for c in conversations {
        let header = format!("{}  #{}", format_date(c.date), c.id);
        if use_color {
            out.push_str(&format!("{}\n", header.bold()));
        } else {
            out.push_str(&format!("{header}\n"));
        }
        out.push_str(&format!("  상황: {}\n", c.situation));
        for line in c.conversion_text.lines() {
            out.push_str(&format!("  > {line}\n"));
        }
        out.push('\n');
    }
    out
}

fn check_in_label(c: &EmotionCheckIn) -> String {
    let emoji = taxonomy::subcategory(c.main_category, &c.sub_category)
        .and_then(|sub| sub.emotions.iter().find(|e| e.label == c.emotion))
        .map(|e| e.emoji)
        .unwrap_or("•");
    format!("{emoji} {}", c.emotion)
}

fn render_check_ins(check_ins: &[EmotionCheckIn], use_color: bool) -> String {
    if check_ins.is_empty() {
        return "No check-ins yet.\n".to_string();
    }

    let mut out = String::new();
    for c in check_ins {
        let date = format_date(c.date);
        let date = if use_color { date.dimmed().to_string() } else { date };
        out.push_str(&format!("{date}  {}", check_in_label(c)));
        if let Some(situation) = &c.situation {
            out.push_str(&format!("  ({situation})"));
        }
        out.push('\n');
    }
    out
}

fn render_week(days: &[DaySummary], use_color: bool) -> String {
    let mut out = String::new();
    for day in days {
        let head = format!("{} {:>2}일", day.label, day.day);
        let head = if use_color && day.count > 0 {
            head.green().to_string()
        } else {
            head
        };
        let emotions: Vec<String> = day.check_ins.iter().map(check_in_label).collect();
        out.push_str(&format!("{head}  {}  {}\n", day.count, emotions.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::types::{MainCategory, NvcData};

    #[test]
    fn empty_history_has_hint() {
        assert!(render_history(&[], false).starts_with("No conversations yet"));
        assert_eq!(render_check_ins(&[], false), "No check-ins yet.\n");
    }

    #[test]
    fn history_lists_conversion_lines() {
        let nvc = NvcData {
            observation: "친구가 늦었을 때".into(),
            full_message: "친구가 늦었을 때, 서운했어요.\n저는 존중받고 싶어요.".into(),
            ..NvcData::default()
        };
        let c = Conversation::completed("7".into(), 0, &[], "", &nvc);
        let text = render_history(&[c], false);
        assert!(text.contains("#7"));
        assert!(text.contains("  상황: 친구가 늦었을 때\n"));
        assert!(text.contains("  > 저는 존중받고 싶어요.\n"));
    }

    #[test]
    fn check_in_label_uses_taxonomy_emoji() {
        let sub = taxonomy::subcategory(MainCategory::Pleasant, "joy").unwrap();
        let emotion = sub.emotions[0];
        let c = EmotionCheckIn::new(0, MainCategory::Pleasant, "joy", emotion.label, None);
        assert_eq!(check_in_label(&c), format!("{} {}", emotion.emoji, emotion.label));

        let free = EmotionCheckIn::new(0, MainCategory::Pleasant, "joy", "뿌듯함2", None);
        assert_eq!(check_in_label(&free), "• 뿌듯함2");
    }

    #[test]
    fn week_rows_show_counts() {
        let now = Local::now();
        let c = EmotionCheckIn::new(now.timestamp_millis(), MainCategory::Uncomfortable, "anger", "화남", None);
        let days = weekly_days(&[c], &now);
        let text = render_week(&days, false);
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().last().unwrap().contains("  1  "));
    }
}
