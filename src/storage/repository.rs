//! Whole-collection persistence.
//!
//! A [`Repository`] owns no cached state: [`try_load`](Repository::try_load)
//! always reads the full record and [`save`](Repository::save) always
//! replaces it. [`load`](Repository::load) is the never-failing read used
//! when a store is opened or refreshed for display.
//! There is no locking; overlapping sessions resolve as last-writer-wins.

use super::KeyValueStore;
use crate::core::model::Persisted;
use crate::errors::Result;
use std::marker::PhantomData;
use tracing::{debug, instrument, warn};

/// Loads and saves a whole sequence of `E` under `E::KEY`.
#[derive(Debug, Clone)]
pub struct Repository<S, E> {
    store: S,
    _entity: PhantomData<fn() -> E>,
}

impl<S: KeyValueStore, E: Persisted> Repository<S, E> {
    /// Wraps `store`; nothing is read until the first load.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Reads the collection, surfacing storage read errors.
    ///
    /// A missing record, or a payload that is not a JSON array of `E`, yields
    /// an empty collection; a corrupt payload is logged and discarded.
    ///
    /// # Errors
    /// Returns the storage error if the record could not be read. Callers
    /// about to write must not treat that as an empty collection.
    #[instrument(skip(self), fields(key = E::KEY))]
    pub async fn try_load(&self) -> Result<Vec<E>> {
        let Some(raw) = self.store.get(E::KEY).await? else {
            debug!("No stored record, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<E>>(&raw) {
            Ok(entities) => {
                debug!("Loaded {} entries", entities.len());
                Ok(entities)
            }
            Err(e) => {
                warn!("Discarding corrupt stored record: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Reads the collection for display. Never fails.
    ///
    /// Like [`try_load`](Self::try_load), except a read error is logged and
    /// also yields an empty collection.
    pub async fn load(&self) -> Vec<E> {
        self.try_load().await.unwrap_or_else(|e| {
            warn!(key = E::KEY, "Failed to read stored record: {}", e);
            Vec::new()
        })
    }

    /// Serializes the whole collection and overwrites the stored record.
    ///
    /// # Errors
    /// Returns an error if serialization or the storage write fails.
    #[instrument(skip(self, entities), fields(key = E::KEY, count = entities.len()))]
    pub async fn save(&self, entities: &[E]) -> Result<()> {
        let raw = serde_json::to_string(entities)?;
        self.store.set(E::KEY, &raw).await
    }
}
