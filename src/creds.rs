use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::buffer_json::Bytes;

/// A public/private key pair.
///
/// Key material is opaque to the store: the ratchet layer owns the curve math,
/// this crate only persists the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public: Bytes,
    pub private: Bytes,
}

/// A pre-key signed by the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedKeyPair {
    pub key_pair: KeyPair,
    pub signature: Bytes,
    pub key_id: u32,
}

/// Per-account behavior toggles carried inside the credentials record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub unarchive_chats: bool,
}

/// The singleton credentials record: one client's long-term identity and
/// session material.
///
/// The store owns persistence of this record but never interprets it; the
/// protocol layer mutates it through [`AuthStore::update_creds`] and persists
/// it with [`AuthStore::save_creds`].
///
/// [`AuthStore::update_creds`]: crate::store::AuthStore::update_creds
/// [`AuthStore::save_creds`]: crate::store::AuthStore::save_creds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCreds {
    pub noise_key: KeyPair,
    pub pairing_ephemeral_key_pair: KeyPair,
    pub signed_identity_key: KeyPair,
    pub signed_pre_key: SignedKeyPair,
    pub registration_id: u32,
    pub adv_secret_key: Bytes,
    pub next_pre_key_id: u32,
    pub first_unuploaded_pre_key_id: u32,
    pub account_sync_counter: u32,
    pub account_settings: AccountSettings,
    #[serde(default)]
    pub processed_history_messages: Vec<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_app_state_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_account_sync_timestamp: Option<i64>,
}

impl AuthCreds {
    /// Synthesize a fresh credentials record from OS randomness.
    ///
    /// This is what a store constructed without an explicit initializer uses
    /// when no record is persisted yet.
    pub fn init() -> Self {
        Self::generate(&mut rand::rngs::OsRng)
    }

    /// Synthesize a fresh credentials record, drawing all key material from
    /// `rng`. A seeded generator yields a fully deterministic record.
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        let signed_pre_key = SignedKeyPair {
            key_pair: key_pair(rng),
            signature: random_bytes(rng, 64),
            key_id: 1,
        };
        Self {
            noise_key: key_pair(rng),
            pairing_ephemeral_key_pair: key_pair(rng),
            signed_identity_key: key_pair(rng),
            signed_pre_key,
            // Registration ids are 14-bit on the wire.
            registration_id: u32::from(rng.gen::<u16>() & 0x3fff),
            adv_secret_key: random_bytes(rng, 32),
            next_pre_key_id: 1,
            first_unuploaded_pre_key_id: 1,
            account_sync_counter: 0,
            account_settings: AccountSettings::default(),
            processed_history_messages: Vec::new(),
            my_app_state_key_id: None,
            last_account_sync_timestamp: None,
        }
    }
}

fn key_pair<R: RngCore>(rng: &mut R) -> KeyPair {
    KeyPair {
        public: random_bytes(rng, 32),
        private: random_bytes(rng, 32),
    }
}

fn random_bytes<R: RngCore>(rng: &mut R, len: usize) -> Bytes {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    Bytes(bytes)
}
