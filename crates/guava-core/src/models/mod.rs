//! Data models for Guava

mod bookmark;
mod catalog;
mod preferences;
mod subscription;

pub use bookmark::Bookmark;
pub use catalog::{BillingCycle, Card, Plan, Service, Telecom};
pub use preferences::{NotificationSettings, Preferences};
pub use subscription::Subscription;

use serde::Serialize;

/// Where a result came from: the backend or the local fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Server,
    Local,
}

impl std::fmt::Display for Source {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server => formatter.write_str("server"),
            Self::Local => formatter.write_str("local"),
        }
    }
}

/// Serde helpers for identifiers that the backend may send as numbers or strings.
pub(crate) mod ids {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_string<E: serde::de::Error>(value: Value) -> Result<String, E> {
        match value {
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(E::custom(format!(
                "expected a string or number, found {other}"
            ))),
        }
    }

    pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        value_to_string(Value::deserialize(deserializer)?)
    }

    pub fn optional_string_or_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value_to_string(value).map(Some),
        }
    }

    pub fn list_of_string_or_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Option::<Vec<Value>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(value_to_string::<D::Error>)
            .collect()
    }
}
