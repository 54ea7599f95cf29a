use std::fmt;

use crate::config::ClientId;
use crate::keys::KeyCategory;

/// Separator joining the client namespace, record category and identifier
/// into one flat storage key.
pub const SEPARATOR: char = '-';

/// Name of one durable record within a client's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordName<'a> {
    /// The singleton credentials record.
    Creds,
    /// One key-ratchet artifact, addressed by category and identifier.
    Key { category: KeyCategory, id: &'a str },
}

impl fmt::Display for RecordName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordName::Creds => f.write_str("creds"),
            RecordName::Key { category, id } => write!(f, "{category}{SEPARATOR}{id}"),
        }
    }
}

/// Map a (client identifier, record name) pair to the flat key used against
/// the backing store. Pure and deterministic; namespacing via this function is
/// the sole isolation mechanism between clients sharing one backing store.
///
/// [`ClientId`] rejects the separator, so two clients can never collide. A
/// caller-chosen key identifier may still contain the separator; such
/// identifiers remain unambiguous only as long as the caller keeps them
/// distinct per category, which the protocol layer's identifier scheme does.
pub fn storage_key(client_id: &ClientId, record: &RecordName<'_>) -> String {
    format!("{client_id}{SEPARATOR}{record}")
}
