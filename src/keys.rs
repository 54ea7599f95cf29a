use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::buffer_json::Bytes;
use crate::error::StoreError;

/// Closed set of key-record categories defined by the protocol layer.
///
/// The category classifies a key-ratchet artifact and, together with a
/// caller-chosen identifier, addresses one stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCategory {
    #[serde(rename = "pre-key")]
    PreKey,
    #[serde(rename = "session")]
    Session,
    #[serde(rename = "sender-key")]
    SenderKey,
    #[serde(rename = "sender-key-memory")]
    SenderKeyMemory,
    #[serde(rename = "app-state-sync-key")]
    AppStateSyncKey,
    #[serde(rename = "app-state-sync-version")]
    AppStateSyncVersion,
}

impl KeyCategory {
    pub const ALL: [KeyCategory; 6] = [
        KeyCategory::PreKey,
        KeyCategory::Session,
        KeyCategory::SenderKey,
        KeyCategory::SenderKeyMemory,
        KeyCategory::AppStateSyncKey,
        KeyCategory::AppStateSyncVersion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCategory::PreKey => "pre-key",
            KeyCategory::Session => "session",
            KeyCategory::SenderKey => "sender-key",
            KeyCategory::SenderKeyMemory => "sender-key-memory",
            KeyCategory::AppStateSyncKey => "app-state-sync-key",
            KeyCategory::AppStateSyncVersion => "app-state-sync-version",
        }
    }
}

impl std::fmt::Display for KeyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeyCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Key category parsing error.
#[derive(Debug, thiserror::Error)]
#[error("unknown key category `{0}`")]
pub struct UnknownCategory(pub String);

/// One stored key record, decoded according to its category.
///
/// Every category stores a buffer-safe JSON value; `app-state-sync-key` is the
/// exception in that its stored value encodes a nested sync key message which
/// is parsed into [`AppStateSyncKeyData`] before being handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyRecord {
    AppStateSyncKey(AppStateSyncKeyData),
    Json(Json),
}

impl KeyRecord {
    /// Decode a value read from storage for the given category.
    pub(crate) fn from_stored(
        category: KeyCategory,
        id: &str,
        value: Json,
    ) -> Result<Self, StoreError> {
        match category {
            KeyCategory::AppStateSyncKey => serde_json::from_value(value)
                .map(KeyRecord::AppStateSyncKey)
                .map_err(|source| StoreError::SyncKeyDecode {
                    id: id.to_owned(),
                    source,
                }),
            _ => Ok(KeyRecord::Json(value)),
        }
    }

    pub fn as_app_state_sync_key(&self) -> Option<&AppStateSyncKeyData> {
        match self {
            KeyRecord::AppStateSyncKey(data) => Some(data),
            KeyRecord::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Json> {
        match self {
            KeyRecord::Json(value) => Some(value),
            KeyRecord::AppStateSyncKey(_) => None,
        }
    }
}

/// The nested sync key message stored under the `app-state-sync-key` category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateSyncKeyData {
    #[serde(default)]
    pub key_data: Bytes,
    #[serde(default)]
    pub fingerprint: AppStateSyncKeyFingerprint,
    #[serde(default)]
    pub timestamp: i64,
}

/// Fingerprint identifying which device state a sync key belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateSyncKeyFingerprint {
    #[serde(default)]
    pub raw_id: i32,
    #[serde(default)]
    pub current_index: u32,
    #[serde(default)]
    pub device_indexes: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_strings_round_trip() {
        for category in KeyCategory::ALL {
            let parsed: KeyCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("device".parse::<KeyCategory>().is_err());
    }

    #[test]
    fn category_serde_uses_the_wire_names() {
        let value = serde_json::to_value(KeyCategory::AppStateSyncKey).unwrap();
        assert_eq!(value, json!("app-state-sync-key"));
    }

    #[test]
    fn sync_key_category_decodes_the_nested_message() {
        let stored = json!({
            "keyData": { "type": "Buffer", "data": "c2VjcmV0" },
            "fingerprint": { "rawId": 1, "currentIndex": 2, "deviceIndexes": [0, 3] },
            "timestamp": 1700000000
        });
        let record = KeyRecord::from_stored(KeyCategory::AppStateSyncKey, "k1", stored).unwrap();
        let data = record.as_app_state_sync_key().unwrap();
        assert_eq!(&*data.key_data, b"secret");
        assert_eq!(data.fingerprint.device_indexes, vec![0, 3]);
    }

    #[test]
    fn other_categories_pass_the_raw_value_through() {
        let stored = json!({ "anything": ["goes", 1] });
        let record = KeyRecord::from_stored(KeyCategory::Session, "s1", stored.clone()).unwrap();
        assert_eq!(record.as_json(), Some(&stored));
    }

    #[test]
    fn malformed_sync_key_fails_decode() {
        let stored = json!({ "keyData": "not a buffer" });
        let result = KeyRecord::from_stored(KeyCategory::AppStateSyncKey, "k1", stored);
        assert!(matches!(
            result,
            Err(StoreError::SyncKeyDecode { ref id, .. }) if id == "k1"
        ));
    }
}
