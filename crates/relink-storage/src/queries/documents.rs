// SPDX-FileCopyrightText: 2026 Relink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed JSON documents holding list-shaped collections.
//!
//! A collection is read whole, modified in memory, and written back inside a
//! single call on the writer thread, so concurrent saves cannot interleave.

use relink_core::RelinkError;
use rusqlite::{OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::database::{Database, map_tr_err};

fn load<T: DeserializeOwned>(
    conn: &rusqlite::Connection,
    key: &str,
) -> Result<Vec<T>, rusqlite::Error> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM documents WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!(key, error = %e, "stored document is not readable, treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Reads the list stored under `key`. Missing or unreadable documents are empty.
pub async fn read_list<T>(db: &Database, key: &'static str) -> Result<Vec<T>, RelinkError>
where
    T: DeserializeOwned + Send + 'static,
{
    db.connection()
        .call(move |conn| load(conn, key))
        .await
        .map_err(map_tr_err)
}

/// Applies `update` to the list stored under `key` and writes it back.
pub async fn update_list<T, F>(db: &Database, key: &'static str, update: F) -> Result<(), RelinkError>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce(&mut Vec<T>) + Send + 'static,
{
    let updated_at = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut items = load::<T>(&tx, key)?;
            update(&mut items);
            let value = serde_json::to_string(&items)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            tx.execute(
                "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, updated_at],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}
