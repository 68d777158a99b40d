// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guided NVC conversation for Relink.
//!
//! The [`Wizard`] walks a user through observation, feeling, need, and
//! request, then composes a non-blaming message:
//! - Situation specificity is judged locally
//! - Emotion and need options come from the model with fixed fallbacks
//! - Korean endings are produced by grammar tables, not by the model
//! - Model-written messages are cleaned up by ordered repair rules

pub mod assemble;
pub mod extract;
pub mod grammar;
pub mod hangul;
pub mod notice;
pub mod prompts;
pub mod repair;
pub mod specificity;
pub mod stage;
pub mod suggest;

pub use notice::{Notice, notice_for};
pub use stage::{Turn, TurnReply, Wizard};
