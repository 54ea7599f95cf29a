use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value as Json;
use tokio::sync::Mutex;
use tracing::trace;

use crate::config::ClientId;
use crate::creds::AuthCreds;
use crate::error::StoreError;
use crate::keys::{KeyCategory, KeyRecord};

use backing::BackingStore;
use key_namer::{storage_key, RecordName};

pub mod backing;
pub mod key_namer;

/// The credential/session store: durable home of one client's credentials
/// record and key-ratchet artifacts, layered over an abstract backing store.
///
/// A store is bound to a single client identifier for its whole lifetime.
/// Several stores with distinct identifiers can share one backing-store
/// handle; the key namespace keeps their records fully isolated.
#[derive(Debug)]
pub struct AuthStore {
    backing: Arc<dyn BackingStore + Send + Sync>,
    client_id: ClientId,
    creds: Mutex<AuthCreds>,
}

impl AuthStore {
    /// Bind a store to one client's namespace.
    ///
    /// Performs at most one read: the persisted credentials record is loaded
    /// if present, otherwise a fresh one is synthesized from OS randomness
    /// and held in memory. A fresh record is not persisted until
    /// [`save_creds`](Self::save_creds) is called.
    pub async fn new(
        backing: Arc<dyn BackingStore + Send + Sync>,
        client_id: ClientId,
    ) -> Result<Self, StoreError> {
        Self::with_initializer(backing, client_id, AuthCreds::init).await
    }

    /// Like [`new`](Self::new), but synthesizing fresh credentials with
    /// `init` when no record is persisted yet.
    pub async fn with_initializer(
        backing: Arc<dyn BackingStore + Send + Sync>,
        client_id: ClientId,
        init: impl FnOnce() -> AuthCreds,
    ) -> Result<Self, StoreError> {
        let record = RecordName::Creds;
        let creds = match read_record(backing.as_ref(), &client_id, &record).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|source| StoreError::Decode {
                    name: record.to_string(),
                    source,
                })?
            }
            None => init(),
        };
        Ok(Self {
            backing,
            client_id,
            creds: Mutex::new(creds),
        })
    }

    /// The client identifier this store is bound to.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// A copy of the in-memory credentials record.
    pub async fn creds(&self) -> AuthCreds {
        self.creds.lock().await.clone()
    }

    /// Mutate the in-memory credentials record.
    ///
    /// Changes become durable only once [`save_creds`](Self::save_creds) is
    /// called.
    pub async fn update_creds<R>(&self, f: impl FnOnce(&mut AuthCreds) -> R) -> R {
        f(&mut *self.creds.lock().await)
    }

    /// Persist the in-memory credentials record.
    ///
    /// Idempotent: repeated calls with an unchanged record rewrite the same
    /// bytes.
    pub async fn save_creds(&self) -> Result<(), StoreError> {
        let creds = self.creds.lock().await.clone();
        self.write_record(&creds, &RecordName::Creds).await
    }

    /// Fetch a batch of key records of one category.
    ///
    /// All lookups run concurrently and the batch completes only when every
    /// one of them has; any single failure fails the whole call. The result
    /// holds one entry per requested identifier — an identifier with no
    /// stored record maps to `None` rather than being omitted, so absence is
    /// distinguishable from "not requested".
    ///
    /// Values of the `app-state-sync-key` category are decoded into their
    /// typed nested message; a record of any other category is returned as
    /// its raw (buffer-safe) JSON value.
    pub async fn get_keys(
        &self,
        category: KeyCategory,
        ids: &[&str],
    ) -> Result<HashMap<String, Option<KeyRecord>>, StoreError> {
        let lookups = ids.iter().map(|&id| async move {
            let record = RecordName::Key { category, id };
            let decoded = self
                .read_record(&record)
                .await?
                .map(|value| KeyRecord::from_stored(category, id, value))
                .transpose()?;
            Ok::<_, StoreError>((id.to_owned(), decoded))
        });
        Ok(try_join_all(lookups).await?.into_iter().collect())
    }

    /// Write and delete a batch of key records across categories.
    ///
    /// Every (category, identifier) entry becomes one independent task: a
    /// `Some` value is written, a `None` deletes the record. Tasks run
    /// concurrently and the call completes only when all of them have; any
    /// single failure fails the whole call. There is no rollback — tasks
    /// that completed before another failed stay applied, so callers needing
    /// atomicity across several records must coordinate it themselves.
    pub async fn set_keys(
        &self,
        data: &HashMap<KeyCategory, HashMap<String, Option<Json>>>,
    ) -> Result<(), StoreError> {
        let mut tasks = Vec::with_capacity(data.values().map(HashMap::len).sum());
        for (&category, entries) in data {
            for (id, value) in entries {
                tasks.push(async move {
                    let record = RecordName::Key { category, id };
                    match value {
                        Some(value) => self.write_record(value, &record).await,
                        None => self.delete_record(&record).await,
                    }
                });
            }
        }
        try_join_all(tasks).await?;

        Ok(())
    }

    async fn read_record(&self, record: &RecordName<'_>) -> Result<Option<Json>, StoreError> {
        read_record(self.backing.as_ref(), &self.client_id, record).await
    }

    async fn write_record<T: Serialize>(
        &self,
        value: &T,
        record: &RecordName<'_>,
    ) -> Result<(), StoreError> {
        let key = storage_key(&self.client_id, record);
        let bytes = serde_json::to_vec(value).map_err(|source| StoreError::Encode {
            name: record.to_string(),
            source,
        })?;
        trace!(%key, len = bytes.len(), "writing record");
        self.backing
            .set(&key, bytes)
            .await
            .map_err(|source| StoreError::Backing {
                op: "set",
                key,
                source,
            })
    }

    async fn delete_record(&self, record: &RecordName<'_>) -> Result<(), StoreError> {
        let key = storage_key(&self.client_id, record);
        trace!(%key, "deleting record");
        self.backing
            .delete(&key)
            .await
            .map_err(|source| StoreError::Backing {
                op: "delete",
                key,
                source,
            })
    }
}

async fn read_record(
    backing: &(dyn BackingStore + Send + Sync),
    client_id: &ClientId,
    record: &RecordName<'_>,
) -> Result<Option<Json>, StoreError> {
    let key = storage_key(client_id, record);
    let Some(bytes) = backing
        .get(&key)
        .await
        .map_err(|source| StoreError::Backing {
            op: "get",
            key: key.clone(),
            source,
        })?
    else {
        trace!(%key, "record absent");
        return Ok(None);
    };
    trace!(%key, len = bytes.len(), "read record");
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            name: record.to_string(),
            source,
        })
}
