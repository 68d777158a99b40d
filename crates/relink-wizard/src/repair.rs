// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clean-up pass over model-written NVC messages.
//!
//! The model regularly doubles the 하 of an emotion, puts the other person
//! in the subject of a need, or forgets the situation line. Each rule below
//! fixes one such defect and is applied until the text stops changing.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::grammar;
use crate::hangul::Particle;

/// Upper bound on passes per rule.
const MAX_PASSES: usize = 4;

const FIRST_PERSON: &[&str] = &["내", "제", "나", "저"];

/// Which part of the message a rule rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Whole,
    /// Lines holding the request: `다음부터는 ...`.
    RequestLine,
    /// Lines holding the need: `... 싶어요`, `... 바랐어요`.
    NeedLine,
}

impl Scope {
    fn covers(self, line: &str) -> bool {
        match self {
            Scope::Whole => true,
            Scope::RequestLine => line.contains("다음부터는") || line.contains("다음에는"),
            Scope::NeedLine => line.contains('싶') || line.contains("바랐어요"),
        }
    }
}

struct Context {
    situation_clause: String,
}

enum Kind {
    Template(Regex, &'static str),
    Captures(Regex, fn(&Captures) -> String),
    Func(fn(&str, &Context) -> String),
}

struct Rule {
    name: &'static str,
    scope: Scope,
    kind: Kind,
}

impl Rule {
    fn rewrite(&self, text: &str, ctx: &Context) -> String {
        match &self.kind {
            Kind::Template(re, replacement) => re.replace_all(text, *replacement).into_owned(),
            Kind::Captures(re, f) => re.replace_all(text, |caps: &Captures| f(caps)).into_owned(),
            Kind::Func(f) => f(text, ctx),
        }
    }

    fn apply_once(&self, text: &str, ctx: &Context) -> String {
        if self.scope == Scope::Whole {
            return self.rewrite(text, ctx);
        }
        text.split('\n')
            .map(|line| {
                if self.scope.covers(line) {
                    self.rewrite(line, ctx)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn apply(&self, text: String, ctx: &Context) -> String {
        let mut current = text;
        for _ in 0..MAX_PASSES {
            let next = self.apply_once(&current, ctx);
            if next == current {
                break;
            }
            tracing::trace!(rule = self.name, "message rewritten");
            current = next;
        }
        current
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("repair pattern must compile")
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule {
            name: "missing-situation",
            scope: Scope::Whole,
            kind: Kind::Func(ensure_situation),
        },
        Rule {
            name: "double-ha",
            scope: Scope::Whole,
            kind: Kind::Template(
                re("(분|억울|답답|서운|속상|불안|피곤|난처|무서|부끄러|두려|힘들|당황)하(했어요|하고|했을)"),
                "$1$2",
            ),
        },
        Rule {
            name: "himdeul-connective",
            scope: Scope::Whole,
            kind: Kind::Template(re("힘[든들]하고"), "힘들고"),
        },
        Rule {
            name: "himdeul-past",
            scope: Scope::Whole,
            kind: Kind::Template(re("힘[든들]했어요"), "힘들었어요"),
        },
        Rule {
            name: "team-subject",
            scope: Scope::NeedLine,
            kind: Kind::Template(
                re("팀원들이 ([가-힣]+)하길 바랐어요"),
                "내가 팀원들과 ${1}하고 싶었어요",
            ),
        },
        Rule {
            name: "other-subject",
            scope: Scope::NeedLine,
            kind: Kind::Captures(re("([가-힣]+)[이가] ([가-힣]+)하길 바랐어요"), first_person_need),
        },
        Rule {
            name: "repeated-subject",
            scope: Scope::Whole,
            kind: Kind::Template(re("(내가|제가|저는)\\s+(?:내가|제가|저는)\\s"), "$1 "),
        },
        Rule {
            name: "comma-joined-wants",
            scope: Scope::NeedLine,
            kind: Kind::Template(re("([^,.\\n]+)싶어요, ([^,.\\n]+싶어요)"), "${1}싶고 ${2}"),
        },
        Rule {
            name: "past-connective",
            scope: Scope::NeedLine,
            kind: Kind::Template(re("싶었고"), "싶고"),
        },
        Rule {
            name: "question-request",
            scope: Scope::RequestLine,
            kind: Kind::Template(re("([가-힣])줄래(?:요)?\\??"), "${1}주세요"),
        },
        Rule {
            name: "bare-request",
            scope: Scope::RequestLine,
            kind: Kind::Template(re("([가-힣])줄([\\s.,]|$)"), "${1}주세요$2"),
        },
        Rule {
            name: "duplicate-need",
            scope: Scope::NeedLine,
            kind: Kind::Func(dedup_need_clauses),
        },
    ]
});

fn is_emotion_line(line: &str) -> bool {
    ["했어요", "웠어요", "났어요", "었어요"].iter().any(|s| line.contains(s))
}

/// Puts the situation in front when the first line has no time clause.
fn ensure_situation(text: &str, ctx: &Context) -> String {
    let clause = &ctx.situation_clause;
    let Some(first) = text.split('\n').next() else {
        return text.to_string();
    };
    if clause.is_empty() || first.trim().is_empty() {
        return text.to_string();
    }
    if first.contains('때')
        || first.contains("에서")
        || first.contains("했을")
        || first.contains(clause.as_str())
    {
        return text.to_string();
    }
    if is_emotion_line(first) {
        let rest = &text[first.len()..];
        return format!("{clause}, {}{rest}", first.trim_start());
    }
    format!("{clause}.\n{text}")
}

/// `후임이 협력하길 바랐어요` -> `내가 후임으로부터 협력받고 싶었어요`.
fn first_person_need(caps: &Captures) -> String {
    let who = &caps[1];
    if FIRST_PERSON.contains(&who) {
        return caps[0].to_string();
    }
    let action = &caps[2];
    format!(
        "내가 {who}{}부터 {action}받고 싶었어요",
        Particle::Direction.after(who)
    )
}

/// Drops need clauses that repeat an earlier clause's first two words.
fn dedup_need_clauses(line: &str, _ctx: &Context) -> String {
    let body = line.trim_end_matches('.');
    let had_period = body.len() != line.len();

    let mut seen: Vec<String> = Vec::new();
    let mut kept: Vec<&str> = Vec::new();
    for clause in body.split(", ") {
        let key = clause.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        kept.push(clause);
    }

    let mut joined = kept.join(", ");
    if let Some(stem) = joined.strip_suffix("싶고") {
        joined = format!("{stem}싶어요");
    }
    if had_period {
        joined.push('.');
    }
    joined
}

/// Applies every rule in order to a drafted message.
pub fn repair(draft: &str, situation: &str) -> String {
    let ctx = Context {
        situation_clause: grammar::situation_clause(situation),
    };
    let text = draft.trim().replace("\r\n", "\n");
    RULES.iter().fold(text, |text, rule| rule.apply(text, &ctx))
}
