//! Client-local preference blob

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

/// Notification settings, favorites, telecom/card selection and per-service notes.
///
/// Field names are camelCase on disk so the blob matches the web client's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub notifications: NotificationSettings,
    #[serde(deserialize_with = "ids::list_of_string_or_number")]
    pub favorites: Vec<String>,
    #[serde(deserialize_with = "ids::optional_string_or_number")]
    pub telecom_id: Option<String>,
    #[serde(deserialize_with = "ids::list_of_string_or_number")]
    pub card_ids: Vec<String>,
    /// Notes keyed by service id.
    pub notes: BTreeMap<String, String>,
}

impl Preferences {
    pub fn is_favorite(&self, service_id: &str) -> bool {
        self.favorites.iter().any(|id| id == service_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"favorites": [5, "7"]}"#).unwrap();
        assert_eq!(prefs.favorites, vec!["5".to_string(), "7".to_string()]);
        assert_eq!(prefs.notifications, NotificationSettings::default());
        assert!(prefs.notes.is_empty());
    }

    #[test]
    fn serializes_camel_case_keys() {
        let prefs = Preferences {
            telecom_id: Some("2".to_string()),
            card_ids: vec!["9".to_string()],
            ..Preferences::default()
        };
        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(value["telecomId"], "2");
        assert_eq!(value["cardIds"][0], "9");
    }
}
