//! User subscription entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(deserialize_with = "ids::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "ids::string_or_number")]
    pub service: String,
    #[serde(default, deserialize_with = "ids::optional_string_or_number")]
    pub plan: Option<String>,
    #[serde(default, alias = "started_at")]
    pub created_at: Option<DateTime<Utc>>,
}
