/// Credential/session store error.
///
/// Every store operation surfaces failures directly to its caller: no retries,
/// no suppression, no default-value substitution. Absence of a record on a
/// successful read is `None`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing engine failed to serve a get, set or delete.
    #[error("backing store {op} failed for key `{key}`: {source}")]
    Backing {
        op: &'static str,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Stored bytes for a record did not parse as a buffer-safe JSON value.
    #[error("failed to decode stored record `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode record `{name}`: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored `app-state-sync-key` payload did not parse as the nested
    /// sync key message.
    #[error("failed to decode app state sync key `{id}`: {source}")]
    SyncKeyDecode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
