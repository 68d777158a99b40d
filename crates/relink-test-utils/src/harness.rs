// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a mock provider, a temp SQLite database, and a
//! configuration with pacing disabled. Crates that build a wizard or a
//! router on top take the parts they need from it.

use std::sync::Arc;

use relink_config::model::{RelinkConfig, StorageConfig, WizardConfig};
use relink_core::{ProviderAdapter, RelinkError, StorageAdapter};
use relink_storage::SqliteStorage;

use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    response_delay_ms: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            response_delay_ms: 0,
        }
    }

    /// Set mock provider answers.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Restore a pause before templated replies.
    pub fn with_response_delay_ms(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    /// Build the test harness, creating the temp database.
    pub async fn build(self) -> Result<TestHarness, RelinkError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| RelinkError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let storage = SqliteStorage::new(storage_config.clone());
        storage.initialize().await?;

        let config = RelinkConfig {
            storage: storage_config,
            wizard: WizardConfig {
                response_delay_ms: self.response_delay_ms,
                ..WizardConfig::default()
            },
            ..RelinkConfig::default()
        };

        Ok(TestHarness {
            mock_provider: Arc::new(MockProvider::with_responses(self.responses)),
            storage: Arc::new(storage),
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock provider and temp storage.
pub struct TestHarness {
    /// The mock completion provider.
    pub mock_provider: Arc<MockProvider>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Configuration with pacing disabled and storage pointing at the temp DB.
    pub config: RelinkConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The mock provider as a trait object.
    pub fn provider(&self) -> Arc<dyn ProviderAdapter> {
        self.mock_provider.clone()
    }

    /// Add an answer to the mock provider's queue.
    pub async fn add_provider_response(&self, text: impl Into<String>) {
        self.mock_provider.push_response(text).await;
    }
}
