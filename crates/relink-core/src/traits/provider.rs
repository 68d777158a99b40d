// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for hosted text-completion models.

use async_trait::async_trait;

use crate::error::RelinkError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for text-completion providers.
///
/// Implementations classify failures into a
/// [`ProviderErrorKind`](crate::error::ProviderErrorKind) so callers can
/// show a specific notice to the user.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, RelinkError>;
}
