// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hangul syllable arithmetic and particle selection.
//!
//! Precomposed syllables live in `U+AC00..=U+D7A3` and are laid out as
//! `base + (initial * 21 + medial) * 28 + final`.

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

pub const FINAL_NONE: u32 = 0;
pub const FINAL_RIEUL: u32 = 8;
pub const FINAL_MIEUM: u32 = 16;
pub const FINAL_BIEUP: u32 = 17;
pub const FINAL_SSANGSIOT: u32 = 20;

pub const MEDIAL_A: u32 = 0;
pub const MEDIAL_EO: u32 = 4;
pub const MEDIAL_O: u32 = 8;
pub const MEDIAL_EU: u32 = 18;

/// A precomposed syllable split into jamo indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syllable {
    pub initial: u32,
    pub medial: u32,
    pub final_: u32,
}

impl Syllable {
    pub fn compose(self) -> Option<char> {
        if self.medial >= MEDIAL_COUNT || self.final_ >= FINAL_COUNT {
            return None;
        }
        let code = SYLLABLE_BASE + (self.initial * MEDIAL_COUNT + self.medial) * FINAL_COUNT + self.final_;
        if code > SYLLABLE_LAST {
            return None;
        }
        char::from_u32(code)
    }
}

pub fn decompose(c: char) -> Option<Syllable> {
    let code = c as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
        return None;
    }
    let offset = code - SYLLABLE_BASE;
    Some(Syllable {
        initial: offset / (MEDIAL_COUNT * FINAL_COUNT),
        medial: (offset / FINAL_COUNT) % MEDIAL_COUNT,
        final_: offset % FINAL_COUNT,
    })
}

/// Returns `c` with its final consonant replaced by `final_`.
pub fn with_final(c: char, final_: u32) -> Option<char> {
    let s = decompose(c)?;
    Syllable { final_, ..s }.compose()
}

/// Final consonant index of the last character, when it is a Hangul syllable.
pub fn last_final(word: &str) -> Option<u32> {
    word.chars().last().and_then(decompose).map(|s| s.final_)
}

/// Whether the word ends in a syllable with a final consonant (batchim).
///
/// Non-Hangul endings count as open so particles default to the vowel form.
pub fn ends_with_final(word: &str) -> bool {
    matches!(last_final(word), Some(f) if f != FINAL_NONE)
}

/// Case particles whose form depends on the preceding syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Particle {
    /// 이 / 가
    Subject,
    /// 은 / 는
    Topic,
    /// 을 / 를
    Object,
    /// 과 / 와
    And,
    /// 으로 / 로
    Direction,
}

impl Particle {
    /// Picks the particle form that follows `word`.
    pub fn after(self, word: &str) -> &'static str {
        let final_ = last_final(word).unwrap_or(FINAL_NONE);
        let (closed, open) = match self {
            Particle::Subject => ("이", "가"),
            Particle::Topic => ("은", "는"),
            Particle::Object => ("을", "를"),
            Particle::And => ("과", "와"),
            // ㄹ takes the bare form: 서울로, 집으로.
            Particle::Direction if final_ == FINAL_RIEUL => return "로",
            Particle::Direction => ("으로", "로"),
        };
        if final_ == FINAL_NONE { open } else { closed }
    }
}

/// Appends the correct particle form to `word`.
pub fn attach(word: &str, particle: Particle) -> String {
    format!("{word}{}", particle.after(word))
}
