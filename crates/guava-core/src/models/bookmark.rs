//! Server-side bookmark entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids;

/// A saved association between the user and a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    /// Service id this bookmark points at. Local state is reconciled on this.
    #[serde(deserialize_with = "ids::string_or_number")]
    pub service: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    /// Memo text exactly as stored. An empty memo is absent.
    pub fn memo_text(&self) -> Option<&str> {
        self.memo.as_deref().filter(|memo| !memo.is_empty())
    }
}
