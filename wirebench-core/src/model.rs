// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Todo record and filler payload generation.

use serde::{Deserialize, Serialize};

use crate::proto;
use crate::types::PayloadKb;

/// A single todo record as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub done: bool,
    /// Unix timestamp (seconds) at creation.
    pub created_at: i64,
    /// Filler string used to inflate response size; omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub payload: String,
}

impl From<Todo> for proto::Todo {
    fn from(item: Todo) -> Self {
        Self {
            id: item.id,
            title: item.title,
            done: item.done,
            created_at: item.created_at,
            payload: item.payload,
        }
    }
}

/// Build a filler payload of `kb * 1024` bytes; zero gives an empty string.
///
/// Returns `None` when the size does not fit in `usize`.
pub fn filler_payload(kb: PayloadKb) -> Option<String> {
    kb.bytes().map(|len| "a".repeat(len))
}
