// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic check for whether a situation description is concrete enough
//! to move on from the observation stage.

use std::sync::LazyLock;

use regex::Regex;

/// Texts shorter than this are never specific.
const MIN_CHARS: usize = 15;
/// A concrete marker only counts from this length on.
const MIN_SPECIFIC_CHARS: usize = 20;

/// Vague complaints that name a mood but no event.
static VAGUE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^오늘.*힘들",
        r"^너무.*힘들",
        r"^정말.*힘들",
        r"힘들어요$",
        r"^힘든.*하루",
        r"^피곤",
        r"^지쳐",
        r"^우울",
        r"^화나",
        r"맨날 그래",
        r"또 그래",
        r"언제.*나아",
        r"대체 왜",
        r"^그냥",
        r"^별로",
        r"^뭔가",
        r"^그렇게",
        r"^그런",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("vague pattern must compile"))
    .collect()
});

/// Markers of an observable event: quotes, counts, actions, causes, objects.
static CONCRETE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"".*""#,
        r"\d+번",
        r"\d+시간",
        r"\d+분",
        r"(말했|했|그랬|소리|지르|늦|무시|끼어들|자르|듣지|들어주지)",
        r"(때문|해서|하면서|하고)",
        r"(보고서|문서|자료|메시지|전화|회의|약속|약속시간)",
        r"(라고|라며|라고 했|라고 말)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("concrete pattern must compile"))
    .collect()
});

/// Returns true when `text` describes a concrete situation.
///
/// Lengths are counted in characters.
pub fn is_specific_enough(text: &str) -> bool {
    let chars = text.chars().count();
    if chars < MIN_CHARS {
        return false;
    }
    if VAGUE_PATTERNS.iter().any(|p| p.is_match(text)) {
        return false;
    }
    let concrete = CONCRETE_PATTERNS.iter().any(|p| p.is_match(text));
    concrete && chars >= MIN_SPECIFIC_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_vague() {
        assert!(!is_specific_enough("친구가 늦었어요"));
    }

    #[test]
    fn vague_openers_are_rejected() {
        assert!(!is_specific_enough("오늘 회사에서 진짜 너무너무 힘들었던 하루였어요"));
        assert!(!is_specific_enough("그냥 친구가 약속에 늦어서 기분이 좀 그랬어요"));
        assert!(!is_specific_enough("팀장님은 맨날 그래 정말 이해가 안 되는 사람이야"));
    }

    #[test]
    fn concrete_event_is_accepted() {
        assert!(is_specific_enough("친구가 약속 시간에 30분이나 늦게 와서 기다렸어요"));
        assert!(is_specific_enough(
            "버스 기사 아저씨가 \"카드 똑바로 찍어\"라며 소리를 질렀어요"
        ));
    }

    #[test]
    fn concrete_marker_needs_twenty_chars() {
        // 19 characters with a marker.
        let text = "동생이 내 말을 또 무시했다고요!!";
        assert!(text.chars().count() < MIN_SPECIFIC_CHARS);
        assert!(!is_specific_enough(text));
    }

    #[test]
    fn long_text_without_markers_is_vague() {
        assert!(!is_specific_enough("요즘 회사 분위기가 영 좋지 않아서 마음이 무거워요"));
    }

    proptest! {
        #[test]
        fn anything_under_fifteen_chars_is_vague(s in "\\PC{0,14}") {
            prop_assert!(!is_specific_enough(&s));
        }
    }
}
