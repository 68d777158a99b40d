// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Korean templating for the pieces of an NVC message.
//!
//! Emotion nouns are conjugated through an explicit table plus suffix rules,
//! needs are parsed into clauses before they are joined, and particles are
//! picked from the preceding syllable instead of being hard-coded.

use crate::hangul::{
    self, FINAL_BIEUP, FINAL_MIEUM, FINAL_NONE, FINAL_SSANGSIOT, MEDIAL_A, MEDIAL_EO, MEDIAL_EU,
    MEDIAL_O, Particle, Syllable,
};

/// Need used when the user picked none.
pub const DEFAULT_NEED: &str = "존중받고 싶었어요";

const SAFETY_SENTENCE: &str = "제 주변 환경이 안전했으면 좋겠어요";
const COMFORT_SENTENCE: &str = "제 주변 환경이 편안했으면 좋겠어요";
const OPINION_SENTENCE: &str = "제 의견이 존중받고 이해받고 싶어요";

/// Initial consonant index of ㅇ.
const INITIAL_IEUNG: u32 = 11;

/// Forms of an emotion word used when chaining it into a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionForms {
    /// Form that links to the next emotion, e.g. `서운하고`.
    pub connective: String,
    /// Polite past form that ends the sentence, e.g. `서운했어요`.
    pub past: String,
}

impl EmotionForms {
    fn new(connective: impl Into<String>, past: impl Into<String>) -> Self {
        Self {
            connective: connective.into(),
            past: past.into(),
        }
    }
}

/// Words the suffix rules would get wrong.
const EMOTION_TABLE: &[(&str, &str, &str)] = &[
    ("화", "화나고", "화났어요"),
    ("짜증", "짜증나고", "짜증났어요"),
    ("힘듦", "힘들고", "힘들었어요"),
    ("힘든", "힘들고", "힘들었어요"),
    ("힘들", "힘들고", "힘들었어요"),
    ("지침", "지치고", "지쳤어요"),
    ("설렘", "설레고", "설렜어요"),
    ("실망", "실망스럽고", "실망스러웠어요"),
    ("부담", "부담스럽고", "부담스러웠어요"),
    ("만족", "만족스럽고", "만족스러웠어요"),
    ("존경", "존경스럽고", "존경스러웠어요"),
    ("걱정", "걱정되고", "걱정됐어요"),
    ("안심", "안심되고", "안심됐어요"),
    ("흥분", "흥분되고", "흥분됐어요"),
    ("질투", "질투가 나고", "질투가 났어요"),
    ("사랑", "사랑을 느끼고", "사랑을 느꼈어요"),
    ("신뢰", "신뢰가 가고", "신뢰가 갔어요"),
    ("활력", "활력이 넘치고", "활력이 넘쳤어요"),
];

/// Conjugates an emotion noun such as `서운함` or `외로움`.
pub fn conjugate_emotion(emotion: &str) -> EmotionForms {
    let word = emotion.trim().trim_end_matches(['.', '!']);

    if let Some((_, connective, past)) = EMOTION_TABLE.iter().find(|(noun, _, _)| *noun == word) {
        return EmotionForms::new(*connective, *past);
    }

    // Already a polite past sentence: "화가 났어요".
    if let Some(stem) = word.strip_suffix("어요")
        && hangul::last_final(stem) == Some(FINAL_SSANGSIOT)
    {
        return EmotionForms::new(format!("{stem}고"), word);
    }

    if let Some(head) = word.strip_suffix('함') {
        return EmotionForms::new(format!("{head}하고"), format!("{head}했어요"));
    }
    if let Some(head) = word.strip_suffix('남') {
        return EmotionForms::new(format!("{head}나고"), format!("{head}났어요"));
    }
    if let Some(head) = word.strip_suffix('됨') {
        return EmotionForms::new(format!("{head}되고"), format!("{head}됐어요"));
    }
    if word.ends_with('감') {
        let subject = hangul::attach(word, Particle::Subject);
        return EmotionForms::new(format!("{subject} 들고"), format!("{subject} 들었어요"));
    }
    if let Some(forms) = bieup_irregular(word).or_else(|| eu_dropping(word)).or_else(|| eum_nominal(word)) {
        return forms;
    }

    EmotionForms::new(format!("{word}하고"), format!("{word}했어요"))
}

/// `외로움` -> `외롭고` / `외로웠어요`.
fn bieup_irregular(word: &str) -> Option<EmotionForms> {
    let head = word.strip_suffix('움')?;
    let prev = head.chars().last()?;
    if hangul::decompose(prev)?.final_ != FINAL_NONE {
        return None;
    }
    let with_bieup = hangul::with_final(prev, FINAL_BIEUP)?;
    let base = &head[..head.len() - prev.len_utf8()];
    Some(EmotionForms::new(
        format!("{base}{with_bieup}고"),
        format!("{head}웠어요"),
    ))
}

/// `슬픔` -> `슬프고` / `슬펐어요`, `기쁨` -> `기쁘고` / `기뻤어요`.
fn eu_dropping(word: &str) -> Option<EmotionForms> {
    let last = word.chars().last()?;
    let syllable = hangul::decompose(last)?;
    if syllable.final_ != FINAL_MIEUM
        || syllable.medial != MEDIAL_EU
        || syllable.initial == INITIAL_IEUNG
    {
        return None;
    }
    let head = &word[..word.len() - last.len_utf8()];
    let open = Syllable { final_: FINAL_NONE, ..syllable }.compose()?;
    let past = Syllable {
        medial: harmonizing_vowel(head),
        final_: FINAL_SSANGSIOT,
        ..syllable
    }
    .compose()?;
    Some(EmotionForms::new(
        format!("{head}{open}고"),
        format!("{head}{past}어요"),
    ))
}

/// `귀찮음` -> `귀찮고` / `귀찮았어요`.
fn eum_nominal(word: &str) -> Option<EmotionForms> {
    let stem = word.strip_suffix('음')?;
    if !hangul::ends_with_final(stem) {
        return None;
    }
    let ending = if harmonizing_vowel(stem) == MEDIAL_A { "았어요" } else { "었어요" };
    Some(EmotionForms::new(format!("{stem}고"), format!("{stem}{ending}")))
}

/// Bright stems (ㅏ, ㅗ) take 아, everything else 어.
fn harmonizing_vowel(stem: &str) -> u32 {
    match stem.chars().last().and_then(hangul::decompose) {
        Some(s) if s.medial == MEDIAL_A || s.medial == MEDIAL_O => MEDIAL_A,
        _ => MEDIAL_EO,
    }
}

fn join_emotions(emotions: &[String], casual: bool) -> String {
    let forms: Vec<EmotionForms> = emotions
        .iter()
        .filter(|e| !e.trim().is_empty())
        .map(|e| conjugate_emotion(e))
        .collect();
    let Some((last, rest)) = forms.split_last() else {
        return if casual { "힘들었어".into() } else { "힘들었어요".into() };
    };

    let mut parts: Vec<&str> = rest.iter().map(|f| f.connective.as_str()).collect();
    let past = last.past.as_str();
    let ending = if casual { past.strip_suffix('요').unwrap_or(past) } else { past };
    parts.push(ending);
    parts.join(" ")
}

/// Joins emotions into one polite past predicate:
/// `서운하고 당황하고 실망스러웠어요`.
pub fn join_emotions_past(emotions: &[String]) -> String {
    join_emotions(emotions, false)
}

/// Same as [`join_emotions_past`] in the plain speech level: `서운하고 답답했어`.
pub fn join_emotions_casual(emotions: &[String]) -> String {
    join_emotions(emotions, true)
}

// --- Needs ---

/// A need split at its fixed ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NeedClause<'a> {
    /// `존중받고 싶었어요`, stem `존중받`.
    Want(&'a str),
    /// `내 말도 들어주길 바랐어요`, stem `내 말도 들어주`.
    Hope(&'a str),
    /// Free text typed by the user.
    Plain(&'a str),
}

const WANT_ENDINGS: &[&str] = &["고 싶었어요", "고 싶어요", "고 싶었다", "고 싶다"];
const HOPE_ENDINGS: &[&str] = &["길 바랐어요", "길 바랬어요", "길 바라요", "길 바래요", "기를 바랐어요"];

fn parse_need(need: &str) -> NeedClause<'_> {
    let need = need.trim().trim_end_matches('.');
    if let Some(stem) = WANT_ENDINGS.iter().find_map(|e| need.strip_suffix(e)) {
        return NeedClause::Want(stem);
    }
    if let Some(stem) = HOPE_ENDINGS.iter().find_map(|e| need.strip_suffix(e)) {
        return NeedClause::Hope(stem);
    }
    NeedClause::Plain(need)
}

/// Descriptive stems take the adjective modifier (`안전한 것`, not `안전하는 것`).
const DESCRIPTIVE_STEMS: &[&str] = &["안전하", "편안하", "평온하", "행복하", "건강하", "자유롭", "여유롭"];

fn modifier(stem: &str) -> String {
    if DESCRIPTIVE_STEMS.iter().any(|d| stem.ends_with(d)) {
        if let Some(head) = stem.strip_suffix('하') {
            return format!("{head}한");
        }
        if let Some(head) = stem.strip_suffix('롭') {
            return format!("{head}로운");
        }
    }
    format!("{stem}는")
}

/// Turns a need into a noun phrase: `존중받고 싶었어요` -> `존중받는 것`.
pub fn need_noun_phrase(need: &str) -> String {
    match parse_need(need) {
        NeedClause::Want(stem) | NeedClause::Hope(stem) => format!("{} 것", modifier(stem)),
        NeedClause::Plain(text) => text.to_string(),
    }
}

/// The acknowledgement shown after the need stage:
/// `존중받는 것과 이해받는 것이 중요하셨군요.`
pub fn empathy_message(needs: &[String]) -> String {
    let phrases: Vec<String> = needs.iter().map(|n| need_noun_phrase(n)).collect();

    let subject = match phrases.as_slice() {
        [] => hangul::attach(&need_noun_phrase(DEFAULT_NEED), Particle::Subject),
        [only] => hangul::attach(only, Particle::Subject),
        [first, second] => format!(
            "{} {}",
            hangul::attach(first, Particle::And),
            hangul::attach(second, Particle::Subject)
        ),
        [rest @ .., last] => format!(
            "{}, 그리고 {}",
            rest.join(", "),
            hangul::attach(last, Particle::Subject)
        ),
    };
    format!("{subject} 중요하셨군요.")
}

/// Joins needs for display: `존중받고 싶고 배려받고 싶어요`.
pub fn needs_display(needs: &[String]) -> String {
    match needs {
        [] => DEFAULT_NEED.to_string(),
        [only] => only.trim().to_string(),
        _ => {
            let last = needs.len() - 1;
            needs
                .iter()
                .enumerate()
                .map(|(i, need)| match (parse_need(need), i == last) {
                    (NeedClause::Want(stem), false) => format!("{stem}고 싶고"),
                    (NeedClause::Want(stem), true) => format!("{stem}고 싶어요"),
                    (NeedClause::Hope(stem), false) => format!("{stem}길 바라고"),
                    (NeedClause::Hope(stem), true) => format!("{stem}길 바라요"),
                    (NeedClause::Plain(text), _) => text.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

/// Subjects the model or the user may already have written.
const SUBJECTS: &[&str] = &["내가 ", "제가 ", "나는 ", "저는 "];

/// Strips a leading first-person subject and lifts plain first-person
/// pronouns to the polite register.
fn first_person(text: &str) -> (bool, String) {
    let (had_subject, body) = match SUBJECTS.iter().find_map(|s| text.strip_prefix(s)) {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let body = body
        .split(' ')
        .map(|word| match word {
            "내" => "제",
            "나를" => "저를",
            "나에게" => "저에게",
            "나의" => "저의",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ");
    (had_subject, body)
}

/// The need line of the composed message, spoken in the first person:
/// `저는 존중받고 배려받고 싶어요`.
///
/// Outside of pairs, a need touching one of the canned topics is replaced by
/// its fixed sentence. A pair is always composed.
pub fn need_sentence(needs: &[String]) -> String {
    let joined = if needs.len() == 2 { String::new() } else { needs.concat() };
    if joined.contains("안전") {
        return SAFETY_SENTENCE.into();
    }
    if joined.contains("편안") {
        return COMFORT_SENTENCE.into();
    }
    if joined.contains("의견") {
        return OPINION_SENTENCE.into();
    }

    let default = [DEFAULT_NEED.to_string()];
    let needs = if needs.is_empty() { &default[..] } else { needs };
    let clauses: Vec<NeedClause<'_>> = needs.iter().map(|n| parse_need(n)).collect();

    let mut subject = "저는";
    let mut bodies = Vec::with_capacity(clauses.len());
    for (i, clause) in clauses.iter().enumerate() {
        let text = match clause {
            NeedClause::Want(s) | NeedClause::Hope(s) | NeedClause::Plain(s) => *s,
        };
        let (had_subject, body) = first_person(text);
        if i == 0 && had_subject {
            subject = "제가";
        }
        bodies.push(body);
    }

    if clauses.iter().all(|c| matches!(c, NeedClause::Want(_))) {
        return format!("{subject} {}고 싶어요", bodies.join("고 "));
    }

    let last = clauses.len() - 1;
    let sentence = clauses
        .iter()
        .zip(&bodies)
        .enumerate()
        .map(|(i, (clause, body))| match (clause, i == last) {
            (NeedClause::Want(_), false) => format!("{body}고 싶고"),
            (NeedClause::Want(_), true) => format!("{body}고 싶어요"),
            (NeedClause::Hope(_), false) => format!("{body}길 바라고"),
            (NeedClause::Hope(_), true) => format!("{body}길 바라요"),
            (NeedClause::Plain(_), false) => format!("{body},"),
            (NeedClause::Plain(_), true) => body.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    if matches!(clauses[0], NeedClause::Plain(_)) {
        sentence
    } else {
        format!("{subject} {sentence}")
    }
}

// --- Situation ---

/// Turns a situation into a time clause: `친구가 30분 늦었어요` ->
/// `친구가 30분 늦었을 때`.
///
/// Text that is not a past-tense sentence becomes `{text} 상황에서`.
pub fn situation_clause(situation: &str) -> String {
    let text = situation
        .trim()
        .trim_end_matches(['.', '!', '?', '~', '…', ' ']);
    if text.is_empty() || text.ends_with('때') || text.ends_with("때에") {
        return text.to_string();
    }

    for suffix in ["어요", "어", "다", "음"] {
        if let Some(stem) = text.strip_suffix(suffix)
            && hangul::last_final(stem) == Some(FINAL_SSANGSIOT)
        {
            return format!("{stem}을 때");
        }
    }
    if let Some(stem) = text.strip_suffix("해요") {
        return format!("{stem}할 때");
    }
    if text.ends_with('서') {
        return text.to_string();
    }
    format!("{text} 상황에서")
}

// --- Requests ---

/// Normalizes a request to the `~줄` form that reads as `~해줄래?` and
/// `~해주세요` after templating: `약속 시간을 지켜달라고 얘기해줄`.
pub fn request_form(request: &str) -> String {
    let text = request.trim().trim_end_matches(['.', '!', ' ']);
    if text.is_empty() || text.ends_with('줄') || text.ends_with("겠을") {
        return text.to_string();
    }

    const TO_JUL: &[(&str, &str)] = &[
        ("줄래요?", "줄"),
        ("줄래?", "줄"),
        ("줄래요", "줄"),
        ("줄래", "줄"),
        ("주세요", "줄"),
        ("줘요", "줄"),
        ("줘", "줄"),
        ("할", "해줄"),
    ];
    if let Some(converted) = TO_JUL
        .iter()
        .find_map(|(suffix, repl)| text.strip_suffix(suffix).map(|stem| format!("{stem}{repl}")))
    {
        return converted;
    }

    // An infinitive such as 지켜 or 말해 takes 줄 directly.
    let open_infinitive = text
        .chars()
        .last()
        .and_then(hangul::decompose)
        .is_some_and(|s| s.final_ == FINAL_NONE && matches!(s.medial, 0 | 1 | 4 | 6 | 9 | 14));
    if open_infinitive {
        format!("{text}줄")
    } else {
        format!("{text}해줄")
    }
}

/// Converts a request to the polite imperative used in the final message:
/// `내 말을 끝까지 들어줄` -> `내 말을 끝까지 들어주세요`.
pub fn polite_request(request: &str) -> String {
    let form = request_form(request);
    if let Some(stem) = form.strip_suffix("겠을") {
        return format!("{stem}겠어요");
    }
    match form.strip_suffix('줄') {
        Some(stem) => format!("{stem}주세요"),
        None => form,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn conjugation_table_and_suffix_rules() {
        let cases = [
            ("화남", "화나고", "화났어요"),
            ("서운함", "서운하고", "서운했어요"),
            ("분함", "분하고", "분했어요"),
            ("억울함", "억울하고", "억울했어요"),
            ("당황함", "당황하고", "당황했어요"),
            ("외로움", "외롭고", "외로웠어요"),
            ("실망스러움", "실망스럽고", "실망스러웠어요"),
            ("무서움", "무섭고", "무서웠어요"),
            ("배신감", "배신감이 들고", "배신감이 들었어요"),
            ("긴장됨", "긴장되고", "긴장됐어요"),
            ("지침", "지치고", "지쳤어요"),
            ("슬픔", "슬프고", "슬펐어요"),
            ("기쁨", "기쁘고", "기뻤어요"),
            ("아픔", "아프고", "아팠어요"),
            ("귀찮음", "귀찮고", "귀찮았어요"),
            ("짜증", "짜증나고", "짜증났어요"),
            ("힘듦", "힘들고", "힘들었어요"),
            ("분노", "분노하고", "분노했어요"),
            ("화가 났어요", "화가 났고", "화가 났어요"),
        ];
        for (noun, connective, past) in cases {
            let forms = conjugate_emotion(noun);
            assert_eq!(forms.connective, connective, "connective of {noun}");
            assert_eq!(forms.past, past, "past of {noun}");
        }
    }

    #[test]
    fn joins_emotions() {
        assert_eq!(
            join_emotions_past(&strings(&["서운함", "당황함", "실망스러움"])),
            "서운하고 당황하고 실망스러웠어요"
        );
        assert_eq!(join_emotions_past(&strings(&["분함"])), "분했어요");
        assert_eq!(join_emotions_past(&[]), "힘들었어요");
        assert_eq!(
            join_emotions_casual(&strings(&["서운함", "답답함"])),
            "서운하고 답답했어"
        );
    }

    #[test]
    fn never_doubles_ha() {
        for noun in ["분함", "억울함", "답답함", "불안함", "피곤함", "난처함", "당황함"] {
            let forms = conjugate_emotion(noun);
            assert!(!forms.past.contains("하했"), "{noun}: {}", forms.past);
            assert!(!forms.connective.contains("하하"), "{noun}: {}", forms.connective);
        }
    }

    #[test]
    fn need_phrases_and_empathy() {
        assert_eq!(need_noun_phrase("존중받고 싶었어요"), "존중받는 것");
        assert_eq!(need_noun_phrase("내 말도 들어주길 바랐어요"), "내 말도 들어주는 것");
        assert_eq!(need_noun_phrase("안전하고 싶었어요"), "안전한 것");
        assert_eq!(need_noun_phrase("마음의 여유"), "마음의 여유");

        assert_eq!(
            empathy_message(&strings(&["존중받고 싶었어요"])),
            "존중받는 것이 중요하셨군요."
        );
        assert_eq!(
            empathy_message(&strings(&["존중받고 싶었어요", "이해받고 싶었어요"])),
            "존중받는 것과 이해받는 것이 중요하셨군요."
        );
        assert_eq!(
            empathy_message(&strings(&["존중받고 싶었어요", "이해받고 싶었어요", "마음의 여유"])),
            "존중받는 것, 이해받는 것, 그리고 마음의 여유가 중요하셨군요."
        );
        assert_eq!(empathy_message(&[]), "존중받는 것이 중요하셨군요.");
    }

    #[test]
    fn needs_display_joins_with_connectives() {
        assert_eq!(
            needs_display(&strings(&["존중받고 싶었어요", "배려받고 싶었어요"])),
            "존중받고 싶고 배려받고 싶어요"
        );
        assert_eq!(
            needs_display(&strings(&["내 말도 들어주길 바랐어요", "인정받고 싶었어요"])),
            "내 말도 들어주길 바라고 인정받고 싶어요"
        );
        assert_eq!(needs_display(&strings(&["이해받고 싶었어요"])), "이해받고 싶었어요");
        assert_eq!(needs_display(&[]), DEFAULT_NEED);
    }

    #[test]
    fn need_sentences() {
        assert_eq!(
            need_sentence(&strings(&["존중받고 싶었어요", "배려받고 싶었어요"])),
            "저는 존중받고 배려받고 싶어요"
        );
        assert_eq!(
            need_sentence(&strings(&["안전하고 싶었어요", "이해받고 싶었어요"])),
            "저는 안전하고 이해받고 싶어요"
        );
        assert_eq!(need_sentence(&strings(&["안전하고 싶었어요"])), SAFETY_SENTENCE);
        assert_eq!(
            need_sentence(&strings(&["이해받고 싶었어요", "쉬고 싶었어요", "편안하고 싶었어요"])),
            COMFORT_SENTENCE
        );
        assert_eq!(
            need_sentence(&strings(&["내 의견을 존중받고 싶었어요"])),
            OPINION_SENTENCE
        );
        assert_eq!(
            need_sentence(&strings(&["내가 후임으로부터 책임감 있는 태도를 받고 싶었어요"])),
            "제가 후임으로부터 책임감 있는 태도를 받고 싶어요"
        );
        assert_eq!(
            need_sentence(&strings(&["이해받고 싶었어요", "내 말도 들어주길 바랐어요"])),
            "저는 이해받고 싶고 제 말도 들어주길 바라요"
        );
        assert_eq!(need_sentence(&[]), "저는 존중받고 싶어요");
    }

    #[test]
    fn situation_clauses() {
        assert_eq!(
            situation_clause("기사 아저씨가 카드 똑바로 찍으라며 소리를 질렀어요."),
            "기사 아저씨가 카드 똑바로 찍으라며 소리를 질렀을 때"
        );
        assert_eq!(situation_clause("친구가 30분 늦었어"), "친구가 30분 늦었을 때");
        assert_eq!(situation_clause("회의 중에 말을 잘랐다"), "회의 중에 말을 잘랐을 때");
        assert_eq!(situation_clause("동생이 매일 내 말을 무시해요"), "동생이 매일 내 말을 무시할 때");
        assert_eq!(situation_clause("약속에 늦었을 때"), "약속에 늦었을 때");
        assert_eq!(situation_clause("팀장님의 반복된 지적"), "팀장님의 반복된 지적 상황에서");
        assert_eq!(situation_clause("   "), "");
    }

    #[test]
    fn request_forms() {
        assert_eq!(request_form("내 말을 끝까지 들어줄"), "내 말을 끝까지 들어줄");
        assert_eq!(request_form("늦으면 미리 연락해줄래?"), "늦으면 미리 연락해줄");
        assert_eq!(request_form("약속 시간을 지켜주세요."), "약속 시간을 지켜줄");
        assert_eq!(request_form("카드를 다시 찍어달라고 할"), "카드를 다시 찍어달라고 해줄");
        assert_eq!(request_form("약속을 지켜"), "약속을 지켜줄");
        assert_eq!(request_form("미리 연락"), "미리 연락해줄");

        assert_eq!(polite_request("내 말을 끝까지 들어줄"), "내 말을 끝까지 들어주세요");
        assert_eq!(
            polite_request("평소 목소리로 말해달라고 얘기해줄"),
            "평소 목소리로 말해달라고 얘기해주세요"
        );
        assert_eq!(
            polite_request("내 주변 환경이 안전하고 편안했으면 좋겠을"),
            "내 주변 환경이 안전하고 편안했으면 좋겠어요"
        );
    }
}
