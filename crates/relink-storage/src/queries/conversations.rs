// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history operations.

use relink_core::RelinkError;

use crate::database::Database;
use crate::models::{CONVERSATIONS_KEY, Conversation};
use crate::queries::documents::{read_list, update_list};

/// Saves a conversation. An existing entry with the same id is replaced in
/// place; otherwise the conversation is inserted at the front.
pub async fn save_conversation(db: &Database, conversation: &Conversation) -> Result<(), RelinkError> {
    let conversation = conversation.clone();
    update_list(db, CONVERSATIONS_KEY, move |items: &mut Vec<Conversation>| {
        match items.iter_mut().find(|c| c.id == conversation.id) {
            Some(existing) => *existing = conversation,
            None => items.insert(0, conversation),
        }
    })
    .await
}

/// All conversations sorted by date, newest first.
pub async fn list_conversations(db: &Database) -> Result<Vec<Conversation>, RelinkError> {
    let mut items: Vec<Conversation> = read_list(db, CONVERSATIONS_KEY).await?;
    items.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(items)
}

/// A conversation by id.
pub async fn get_conversation(db: &Database, id: &str) -> Result<Option<Conversation>, RelinkError> {
    let items: Vec<Conversation> = read_list(db, CONVERSATIONS_KEY).await?;
    Ok(items.into_iter().find(|c| c.id == id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::types::NvcData;

    fn conversation(id: &str, date: i64, text: &str) -> Conversation {
        let nvc = NvcData {
            full_message: text.to_string(),
            ..NvcData::default()
        };
        Conversation::completed(id.to_string(), date, &[], "", &nvc)
    }

    #[tokio::test]
    async fn new_conversations_go_to_front_and_list_sorts_by_date() {
        let db = Database::open_in_memory().await.unwrap();
        save_conversation(&db, &conversation("a", 200, "first")).await.unwrap();
        save_conversation(&db, &conversation("b", 100, "second")).await.unwrap();
        save_conversation(&db, &conversation("c", 300, "third")).await.unwrap();

        let ids: Vec<String> = list_conversations(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn saving_same_id_replaces() {
        let db = Database::open_in_memory().await.unwrap();
        save_conversation(&db, &conversation("a", 1, "old")).await.unwrap();
        save_conversation(&db, &conversation("b", 2, "other")).await.unwrap();
        save_conversation(&db, &conversation("a", 1, "new")).await.unwrap();

        let all = list_conversations(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        let a = get_conversation(&db, "a").await.unwrap().unwrap();
        assert_eq!(a.conversion_text, "new");
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get_conversation(&db, "missing").await.unwrap().is_none());
    }
}
