// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed emotion taxonomy used by check-ins, and the need option list.

use serde::Serialize;

use crate::types::MainCategory;

/// A single selectable emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionOption {
    pub label: &'static str,
    pub emoji: &'static str,
}

/// A group of related emotions inside a main category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub preview: &'static str,
    pub emotions: &'static [EmotionOption],
}

/// A main category and its subcategories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionCategory {
    pub id: MainCategory,
    pub label: &'static str,
    pub emoji: &'static str,
    pub subcategories: &'static [SubCategory],
}

/// A predefined need shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NeedOption {
    pub id: &'static str,
    pub label: &'static str,
}

const fn e(label: &'static str, emoji: &'static str) -> EmotionOption {
    EmotionOption { label, emoji }
}

static UNCOMFORTABLE: &[SubCategory] = &[
    SubCategory {
        id: "anger",
        label: "분노/좌절",
        emoji: "😤",
        preview: "화남, 답답함, 짜증",
        emotions: &[
            e("화남", "😠"),
            e("답답함", "😤"),
            e("짜증", "😡"),
            e("성남", "🤬"),
            e("분노", "😠"),
            e("좌절감", "😮‍💨"),
        ],
    },
    SubCategory {
        id: "sadness",
        label: "슬픔/상실",
        emoji: "😔",
        preview: "슬픔, 외로움, 상실감",
        emotions: &[
            e("슬픔", "😔"),
            e("서글픔", "😥"),
            e("울적함", "😔"),
            e("외로움", "😞"),
            e("상실감", "😞"),
        ],
    },
    SubCategory {
        id: "anxiety",
        label: "불안/두려움",
        emoji: "😟",
        preview: "불안함, 걱정, 초조함",
        emotions: &[
            e("불안함", "😟"),
            e("걱정", "😟"),
            e("초조함", "😵‍💫"),
            e("긴장됨", "😰"),
            e("무서움", "😨"),
        ],
    },
    SubCategory {
        id: "dissatisfaction",
        label: "불만/거리감",
        emoji: "🙁",
        preview: "서운함, 실망, 억울함",
        emotions: &[
            e("서운함", "🙁"),
            e("실망", "😞"),
            e("질투", "😒"),
            e("소외감", "😶"),
            e("억울함", "😶"),
        ],
    },
    SubCategory {
        id: "fatigue",
        label: "피로/부담",
        emoji: "😫",
        preview: "피곤함, 지침, 무기력함",
        emotions: &[
            e("피곤함", "😫"),
            e("지침", "😫"),
            e("부담감", "😮‍💨"),
            e("무기력함", "🫠"),
        ],
    },
];

static PLEASANT: &[SubCategory] = &[
    SubCategory {
        id: "joy",
        label: "기쁨/만족",
        emoji: "😄",
        preview: "기쁨, 만족, 신남",
        emotions: &[
            e("기쁨", "😄"),
            e("만족", "😊"),
            e("흥분", "🤗"),
            e("신남", "🥳"),
            e("행복함", "😊"),
            e("홀가분함", "😌"),
        ],
    },
    SubCategory {
        id: "peace",
        label: "평온/안정",
        emoji: "😌",
        preview: "평온함, 안정감, 편안함",
        emotions: &[
            e("평온함", "😌"),
            e("안정감", "🙂"),
            e("안심", "😮‍💨"),
            e("편안함", "😌"),
            e("고요함", "🙂"),
        ],
    },
    SubCategory {
        id: "gratitude",
        label: "감사/친밀함",
        emoji: "🥰",
        preview: "감사함, 친밀감, 사랑",
        emotions: &[
            e("감사함", "🥰"),
            e("고마움", "🥰"),
            e("친밀감", "🤗"),
            e("사랑", "❤️"),
            e("존경", "🫶"),
            e("신뢰", "🤝"),
        ],
    },
    SubCategory {
        id: "vitality",
        label: "활력/자신감",
        emoji: "🤩",
        preview: "활력, 자신감, 설렘",
        emotions: &[
            e("활력", "💪"),
            e("자신감", "😎"),
            e("설렘", "🥰"),
            e("흥미로움", "🤩"),
            e("충족감", "😌"),
        ],
    },
];

/// Both main categories, uncomfortable first.
pub static EMOTION_CATEGORIES: &[EmotionCategory] = &[
    EmotionCategory {
        id: MainCategory::Uncomfortable,
        label: "불편한 감정",
        emoji: "😔",
        subcategories: UNCOMFORTABLE,
    },
    EmotionCategory {
        id: MainCategory::Pleasant,
        label: "기분 좋은 감정",
        emoji: "😊",
        subcategories: PLEASANT,
    },
];

/// Need options offered by the conversion flow.
pub static NEED_OPTIONS: &[NeedOption] = &[
    NeedOption { id: "respect", label: "존중받고 싶었어요" },
    NeedOption { id: "listening", label: "내 말도 들어주길 바랐어요" },
    NeedOption { id: "understanding", label: "이해받고 싶었어요" },
    NeedOption { id: "consideration", label: "내 생각도 중요하게 다뤄지길 바랐어요" },
    NeedOption { id: "connection", label: "연결되고 싶었어요" },
    NeedOption { id: "recognition", label: "인정받고 싶었어요" },
    NeedOption { id: "safety", label: "안전하고 싶었어요" },
    NeedOption { id: "autonomy", label: "내 선택을 존중받고 싶었어요" },
    NeedOption { id: "custom", label: "다른 이유 (직접 입력)" },
];

/// Returns the main category entry.
pub fn category(main: MainCategory) -> &'static EmotionCategory {
    match main {
        MainCategory::Uncomfortable => &EMOTION_CATEGORIES[0],
        MainCategory::Pleasant => &EMOTION_CATEGORIES[1],
    }
}

/// Looks up a subcategory by id within a main category.
pub fn subcategory(main: MainCategory, id: &str) -> Option<&'static SubCategory> {
    category(main).subcategories.iter().find(|s| s.id == id)
}

/// Looks up a predefined need by id.
pub fn need_option(id: &str) -> Option<&'static NeedOption> {
    NEED_OPTIONS.iter().find(|n| n.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_match_position() {
        assert_eq!(category(MainCategory::Uncomfortable).id, MainCategory::Uncomfortable);
        assert_eq!(category(MainCategory::Pleasant).id, MainCategory::Pleasant);
    }

    #[test]
    fn subcategory_lookup_is_scoped_to_main_category() {
        assert!(subcategory(MainCategory::Uncomfortable, "anger").is_some());
        assert!(subcategory(MainCategory::Pleasant, "anger").is_none());
        assert_eq!(
            subcategory(MainCategory::Pleasant, "peace").map(|s| s.label),
            Some("평온/안정")
        );
    }

    #[test]
    fn subcategory_counts() {
        assert_eq!(category(MainCategory::Uncomfortable).subcategories.len(), 5);
        assert_eq!(category(MainCategory::Pleasant).subcategories.len(), 4);
    }

    #[test]
    fn need_options_end_with_custom() {
        assert_eq!(NEED_OPTIONS.len(), 9);
        assert_eq!(NEED_OPTIONS.last().map(|n| n.id), Some("custom"));
        assert_eq!(need_option("safety").map(|n| n.label), Some("안전하고 싶었어요"));
        assert!(need_option("nope").is_none());
    }

    #[test]
    fn taxonomy_serializes_main_category_lowercase() {
        let json = serde_json::to_value(EMOTION_CATEGORIES).unwrap();
        assert_eq!(json[0]["id"], "uncomfortable");
        assert_eq!(json[1]["subcategories"][0]["emotions"][0]["label"], "기쁨");
    }
}
