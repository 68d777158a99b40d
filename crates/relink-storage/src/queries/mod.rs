// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the stored collections.

pub mod check_ins;
pub mod conversations;
pub mod documents;
