use serde::Deserialize;

use crate::store::key_namer::SEPARATOR;

/// Externally supplied parameters: where the backing engine lives and which
/// client namespace to bind. Nothing else about the store is configurable.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub backing: Backing,
    pub client_id: ClientId,
}

/// Connection target of the backing key-value engine. Connecting is the
/// composition root's job; this crate only carries the address.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Backing {
    pub host: String,
    pub port: u16,
}

/// A client identifier that is safe to use as a key namespace: non-empty and
/// free of the storage-key separator, so keys of two clients can never
/// collide on a shared backing store.
#[derive(Deserialize, Debug, Clone, Hash, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidClientId> {
        Self::try_from(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = InvalidClientId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        if id.is_empty() {
            return Err(InvalidClientId::Empty);
        }
        if id.contains(SEPARATOR) {
            return Err(InvalidClientId::ContainsSeparator(id));
        }
        Ok(Self(id))
    }
}

impl std::str::FromStr for ClientId {
    type Err = InvalidClientId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client identifier validation error.
#[derive(Debug, thiserror::Error)]
pub enum InvalidClientId {
    /// The identifier was empty.
    #[error("client identifier must not be empty")]
    Empty,

    /// The identifier contained the storage-key separator.
    #[error("client identifier `{0}` must not contain `{sep}`", sep = SEPARATOR)]
    ContainsSeparator(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_empty_client_id() {
        assert!(matches!(ClientId::new(""), Err(InvalidClientId::Empty)));
    }

    #[test]
    fn rejects_separator_in_client_id() {
        assert!(matches!(
            ClientId::new("session-7"),
            Err(InvalidClientId::ContainsSeparator(_))
        ));
    }

    #[test]
    fn config_deserializes() {
        let config: Config = serde_json::from_value(json!({
            "backing": { "host": "cache.internal", "port": 6379 },
            "client_id": "primary"
        }))
        .unwrap();
        assert_eq!(config.backing.port, 6379);
        assert_eq!(config.client_id.as_str(), "primary");
    }

    #[test]
    fn invalid_client_id_fails_deserialization() {
        let result: Result<ClientId, _> = serde_json::from_value(json!("a-b"));
        assert!(result.is_err());
    }
}
