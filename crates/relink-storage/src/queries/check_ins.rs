// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion check-in journal operations.

use relink_core::RelinkError;

use crate::database::Database;
use crate::models::{CHECK_INS_KEY, EmotionCheckIn};
use crate::queries::documents::{read_list, update_list};

/// Appends a check-in.
pub async fn save_check_in(db: &Database, check_in: &EmotionCheckIn) -> Result<(), RelinkError> {
    let check_in = check_in.clone();
    update_list(db, CHECK_INS_KEY, move |items: &mut Vec<EmotionCheckIn>| {
        items.push(check_in)
    })
    .await
}

/// All check-ins, newest first.
pub async fn list_check_ins(db: &Database) -> Result<Vec<EmotionCheckIn>, RelinkError> {
    let mut items: Vec<EmotionCheckIn> = read_list(db, CHECK_INS_KEY).await?;
    items.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::types::MainCategory;

    #[tokio::test]
    async fn check_ins_list_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        for (date, emotion) in [(10, "화남"), (30, "기쁨"), (20, "슬픔")] {
            let main = if emotion == "기쁨" {
                MainCategory::Pleasant
            } else {
                MainCategory::Uncomfortable
            };
            let sub = match emotion {
                "기쁨" => "joy",
                "슬픔" => "sadness",
                _ => "anger",
            };
            save_check_in(&db, &EmotionCheckIn::new(date, main, sub, emotion, None))
                .await
                .unwrap();
        }

        let emotions: Vec<String> = list_check_ins(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.emotion)
            .collect();
        assert_eq!(emotions, vec!["기쁨", "슬픔", "화남"]);
    }
}
