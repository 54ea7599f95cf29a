//! Pluggable persistence for the authentication/session state of a stateful
//! messaging protocol client.
//!
//! The protocol layer needs two kinds of records kept durable: a singleton
//! credentials record per client, and a set of key-ratchet artifacts
//! addressed by a (category, identifier) pair. This crate provides the
//! [`AuthStore`] façade over an abstract [`BackingStore`] key-value engine,
//! namespacing every record by client identifier so that several independent
//! protocol sessions can share one engine without collision.
//!
//! [`AuthStore`]: crate::store::AuthStore
//! [`BackingStore`]: crate::store::backing::BackingStore
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use auth_state_store::config::ClientId;
//! use auth_state_store::keys::KeyCategory;
//! use auth_state_store::store::AuthStore;
//!
//! // A shared backing-store handle, e.g. a remote cache client.
//! let backing = Arc::new(backing_engine);
//!
//! // Bind a store to one client's namespace. The credentials record is
//! // loaded if present, freshly synthesized otherwise.
//! let store = AuthStore::new(backing, ClientId::new("primary")?).await?;
//!
//! // Batched key-record access during normal operation.
//! let sessions = store.get_keys(KeyCategory::Session, &["1", "2"]).await?;
//! store.set_keys(&updates).await?;
//!
//! // Persist the credentials record after the protocol layer mutated it.
//! store.update_creds(|creds| creds.account_sync_counter += 1).await;
//! store.save_creds().await?;
//! ```
//!
//! # Concurrency
//!
//! Batch operations fan their per-record lookups and writes out concurrently
//! and join before returning: the batch completes only once every individual
//! operation has, and any single failure fails the whole call. Distinct
//! records occupy distinct keys, so no locking is needed between them. The
//! store imposes no ordering between separate calls issued concurrently by
//! the caller.
//!
//! # Values
//!
//! Stored values are JSON with binary buffers carried losslessly via the
//! tagged encoding in [`buffer_json`]; buffers embedded anywhere in a value
//! survive the round trip byte-for-byte. The `app-state-sync-key` category is
//! special-cased on read: its stored payload is decoded into the typed
//! [`AppStateSyncKeyData`] message rather than handed back as a raw mapping.
//!
//! [`AppStateSyncKeyData`]: crate::keys::AppStateSyncKeyData

pub mod buffer_json;
pub mod config;
pub mod creds;
pub mod error;
pub mod keys;
pub mod store;
