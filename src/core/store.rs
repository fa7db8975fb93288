//! Stores - the in-memory collection mirrored to storage.
//!
//! A store owns the latest known collection for one storage shape plus its
//! [`Repository`]. Mutating operations follow load, mutate, save: they re-read
//! the stored record first, apply the change in memory, then
//! [`commit`](ListStore::commit). Validation happens before anything is
//! touched. A failed read aborts the mutation before anything is written, so a
//! storage hiccup can never be saved over the real record as an empty
//! collection. If the final write fails the in-memory state keeps the change
//! and the error is returned, so the caller can tell the user it was not saved.

use super::aggregate;
use super::id::{ListId, ProductId};
use super::merge::{self, EditEntry};
use super::model::{Item, ShoppingList};
use super::numeric::{parse_price, parse_quantity};
use crate::errors::{Error, Result};
use crate::storage::{KeyValueStore, Repository};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

/// Maximum number of lists that may exist at the same time.
pub const MAX_LISTS: usize = 5;

/// Multi-list variant: shopping lists under `"lists"`, replace-policy merges.
#[derive(Debug)]
pub struct ListStore<S> {
    repository: Repository<S, ShoppingList>,
    lists: Vec<ShoppingList>,
}

impl<S: KeyValueStore> ListStore<S> {
    /// Opens the store and loads whatever is persisted.
    pub async fn open(store: S) -> Self {
        let repository = Repository::new(store);
        let lists = repository.load().await;
        Self { repository, lists }
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// A storage read error leaves an empty collection, see [`Repository::load`].
    pub async fn reload(&mut self) {
        self.lists = self.repository.load().await;
    }

    // Re-read before a mutation; on a read error the in-memory lists stay as they were.
    async fn refresh(&mut self) -> Result<()> {
        self.lists = self.repository.try_load().await?;
        Ok(())
    }

    /// Writes the in-memory collection back, replacing the stored record.
    pub async fn commit(&self) -> Result<()> {
        self.repository
            .save(&self.lists)
            .await
            .inspect_err(|e| warn!("Failed to persist lists: {}", e))
    }

    /// Lists in creation order.
    #[must_use]
    pub fn lists(&self) -> &[ShoppingList] {
        &self.lists
    }

    /// Looks a list up by id.
    #[must_use]
    pub fn get(&self, id: &ListId) -> Option<&ShoppingList> {
        self.lists.iter().find(|list| &list.id == id)
    }

    /// Total of one list, `None` if the list does not exist.
    #[must_use]
    pub fn total(&self, id: &ListId) -> Option<Decimal> {
        self.get(id).map(|list| aggregate::total(&list.products))
    }

    /// Creates an empty list and returns its id for the edit session.
    ///
    /// # Errors
    /// - [`Error::EmptyListName`] if `name` is blank after trimming
    /// - a storage error if the stored lists cannot be read (nothing is written)
    /// - [`Error::ListCapReached`] if [`MAX_LISTS`] lists already exist
    /// - a storage error if the write fails (the list stays in memory)
    #[instrument(skip(self))]
    pub async fn create_list(&mut self, name: &str) -> Result<ListId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyListName);
        }
        self.refresh().await?;
        if self.lists.len() >= MAX_LISTS {
            return Err(Error::ListCapReached { cap: MAX_LISTS });
        }

        let list = ShoppingList::new(name);
        let id = list.id.clone();
        self.lists.push(list);
        self.commit().await?;
        info!("Created list '{}' ({})", name, id);
        Ok(id)
    }

    /// Deletes a list. Unknown ids are a no-op and nothing is written.
    ///
    /// # Errors
    /// Returns a storage error if the read or the write fails.
    #[instrument(skip(self))]
    pub async fn delete_list(&mut self, id: &ListId) -> Result<()> {
        self.refresh().await?;
        let before = self.lists.len();
        self.lists.retain(|list| &list.id != id);
        if self.lists.len() == before {
            info!("List {} not found, nothing to delete", id);
            return Ok(());
        }

        self.commit().await?;
        info!("Deleted list {}", id);
        Ok(())
    }

    /// Replaces the products of a list with the valid entries of `batch`.
    ///
    /// # Errors
    /// - [`Error::NoValidEntries`] if no entry has a positive quantity and price
    /// - [`Error::ListNotFound`] if the list does not exist
    /// - a storage error if the read or the write fails
    #[instrument(skip(self, batch), fields(batch = batch.len()))]
    pub async fn save_products(&mut self, id: &ListId, batch: &[EditEntry]) -> Result<()> {
        let entries = merge::validate_batch(batch)?;
        self.refresh().await?;
        let list = self
            .lists
            .iter_mut()
            .find(|list| &list.id == id)
            .ok_or_else(|| Error::ListNotFound { id: id.to_string() })?;

        list.products = merge::merge_replace(&list.products, entries);
        info!("List {} now has {} products", id, list.products.len());
        self.commit().await
    }
}

/// Flat single-list variant: items under `"items"`, additive-policy merges.
#[derive(Debug)]
pub struct ItemStore<S> {
    repository: Repository<S, Item>,
    items: Vec<Item>,
}

impl<S: KeyValueStore> ItemStore<S> {
    /// Opens the store and loads whatever is persisted.
    pub async fn open(store: S) -> Self {
        let repository = Repository::new(store);
        let items = repository.load().await;
        Self { repository, items }
    }

    /// Replaces the in-memory items with the persisted ones.
    ///
    /// A storage read error leaves an empty collection, see [`Repository::load`].
    pub async fn reload(&mut self) {
        self.items = self.repository.load().await;
    }

    async fn refresh(&mut self) -> Result<()> {
        self.items = self.repository.try_load().await?;
        Ok(())
    }

    /// Writes the in-memory items back, replacing the stored record.
    pub async fn commit(&self) -> Result<()> {
        self.repository
            .save(&self.items)
            .await
            .inspect_err(|e| warn!("Failed to persist items: {}", e))
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Sum of every item's subtotal.
    #[must_use]
    pub fn total(&self) -> Decimal {
        aggregate::total(&self.items)
    }

    /// Merges the valid entries of `batch` into the persisted items.
    ///
    /// # Errors
    /// - [`Error::NoValidEntries`] if no entry has a positive quantity and price
    /// - a storage error if the read or the write fails
    #[instrument(skip(self, batch), fields(batch = batch.len()))]
    pub async fn add_batch(&mut self, batch: &[EditEntry]) -> Result<()> {
        let entries = merge::validate_batch(batch)?;
        self.refresh().await?;
        let existing = std::mem::take(&mut self.items);
        self.items = merge::merge_additive(existing, entries);
        info!("Item collection now has {} entries", self.items.len());
        self.commit().await
    }

    /// Sets one item's quantity and price from raw field text.
    ///
    /// # Errors
    /// - [`Error::InvalidPrice`] if the price text is not a number or is negative
    /// - [`Error::ItemNotFound`] if no item has `id`
    /// - a storage error if the read or the write fails
    #[instrument(skip(self))]
    pub async fn update_item(
        &mut self,
        id: &ProductId,
        quantity_text: &str,
        price_text: &str,
    ) -> Result<()> {
        let price = parse_price(price_text)?;
        if price < Decimal::ZERO {
            return Err(Error::InvalidPrice {
                input: price_text.to_string(),
            });
        }
        let quantity = parse_quantity(quantity_text);
        self.refresh().await?;
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })?;

        item.quantity = Some(quantity);
        item.price = price;
        self.commit().await
    }

    /// Removes one item. Unknown ids are a no-op and nothing is written.
    ///
    /// # Errors
    /// Returns a storage error if the read or the write fails.
    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, id: &ProductId) -> Result<()> {
        self.refresh().await?;
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() == before {
            return Ok(());
        }
        self.commit().await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_utils::{FailingStore, FlakyReadStore, init_test_tracing, setup_test_store};

    #[tokio::test]
    async fn test_create_list_persists_empty_list() -> Result<()> {
        init_test_tracing();
        let kv = setup_test_store().await?;
        let mut store = ListStore::open(kv.clone()).await;

        let id = store.create_list("  Groceries  ").await?;
        let reopened = ListStore::open(kv).await;
        let list = reopened.get(&id).unwrap();
        assert_eq!(list.name, "Groceries");
        assert!(list.products.is_empty());
        assert_eq!(reopened.lists(), store.lists());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_list_rejects_blank_name() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ListStore::open(kv.clone()).await;

        let result = store.create_list("   ").await;
        assert!(matches!(result, Err(Error::EmptyListName)));
        assert!(kv.get("lists").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sixth_list_is_rejected() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ListStore::open(kv.clone()).await;
        for n in 0..MAX_LISTS {
            store.create_list(&format!("List {n}")).await?;
        }
        let persisted = kv.get("lists").await?;

        let result = store.create_list("One too many").await;
        assert!(matches!(result, Err(Error::ListCapReached { cap: 5 })));
        assert_eq!(kv.get("lists").await?, persisted);
        assert_eq!(store.lists().len(), MAX_LISTS);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_list_leaves_record_untouched() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ListStore::open(kv.clone()).await;
        let id = store.create_list("Weekly").await?;
        store
            .save_products(&id, &[EditEntry::new("Rice", 2, "5,50")])
            .await?;
        let persisted = kv.get("lists").await?;

        store.delete_list(&ListId::from("missing")).await?;
        assert_eq!(kv.get("lists").await?, persisted);

        let reserialized = serde_json::to_string(store.lists())?;
        assert_eq!(Some(reserialized), persisted);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_list_removes_it() -> Result<()> {
        let kv = setup_test_store().await?;
        let mut store = ListStore::open(kv.clone()).await;
        let keep = store.create_list("Keep").await?;
        let doomed = store.create_list("Drop").await?;

        store.delete_list(&doomed).await?;
        let reopened = ListStore::open(kv).await;
        assert_eq!(reopened.lists().len(), 1);
        assert!(reopened.get(&keep).is_some());
        assert!(reopened.get(&doomed).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_products_replaces_and_totals() -> Result<()> {
        let kv = setup_test_store().await?;
        let mut store = ListStore::open(kv.clone()).await;
        let id = store.create_list("Weekly").await?;

        store
            .save_products(
                &id,
                &[
                    EditEntry::new("Rice", 2, "5,00"),
                    EditEntry::new("Milk", 3, "4.25"),
                ],
            )
            .await?;
        assert_eq!(store.total(&id), Some(Decimal::new(2275, 2)));

        store
            .save_products(&id, &[EditEntry::new("Milk", 1, "4.25")])
            .await?;
        let reopened = ListStore::open(kv).await;
        let list = reopened.get(&id).unwrap();
        assert_eq!(list.products.len(), 1);
        assert_eq!(list.products[0].name, "Milk");
        assert_eq!(reopened.total(&id), Some(Decimal::new(425, 2)));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_products_twice_is_idempotent() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ListStore::open(kv.clone()).await;
        let id = store.create_list("Weekly").await?;
        let batch = [
            EditEntry::new("Rice", 2, "5,00"),
            EditEntry::new("Beans", 0, ""),
        ];

        store.save_products(&id, &batch).await?;
        let once = kv.get("lists").await?;
        store.save_products(&id, &batch).await?;
        assert_eq!(kv.get("lists").await?, once);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_products_rejects_invalid_batch_without_writing() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ListStore::open(kv.clone()).await;
        let id = store.create_list("Weekly").await?;
        let persisted = kv.get("lists").await?;

        let result = store
            .save_products(&id, &[EditEntry::new("Rice", 0, "5")])
            .await;
        assert!(matches!(result, Err(Error::NoValidEntries)));
        assert_eq!(kv.get("lists").await?, persisted);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_products_unknown_list() {
        let mut store = ListStore::open(MemoryStore::new()).await;
        let result = store
            .save_products(&ListId::from("nope"), &[EditEntry::new("Rice", 1, "5")])
            .await;
        assert!(matches!(result, Err(Error::ListNotFound { id }) if id == "nope"));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_in_memory_change() {
        init_test_tracing();
        let mut store = ListStore::open(FailingStore).await;

        let result = store.create_list("Weekly").await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(store.lists().len(), 1);
        assert_eq!(store.lists()[0].name, "Weekly");
    }

    #[tokio::test]
    async fn test_read_failure_never_overwrites_stored_lists() -> Result<()> {
        init_test_tracing();
        let kv = FlakyReadStore::new();
        let mut store = ListStore::open(kv.clone()).await;
        let mut ids = Vec::new();
        for n in 0..4 {
            ids.push(store.create_list(&format!("List {n}")).await?);
        }
        let persisted = kv.get("lists").await?;

        kv.fail_reads(true);
        let result = store.create_list("New").await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(matches!(store.delete_list(&ids[0]).await, Err(Error::Database(_))));
        let result = store
            .save_products(&ids[1], &[EditEntry::new("Rice", 1, "5")])
            .await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(store.lists().len(), 4);

        kv.fail_reads(false);
        assert_eq!(kv.get("lists").await?, persisted);
        let reopened = ListStore::open(kv).await;
        assert_eq!(reopened.lists().len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_failure_blocks_cap_bypass() -> Result<()> {
        let kv = FlakyReadStore::new();
        let mut store = ListStore::open(kv.clone()).await;
        for n in 0..MAX_LISTS {
            store.create_list(&format!("List {n}")).await?;
        }

        kv.fail_reads(true);
        store.reload().await;
        assert!(store.lists().is_empty());
        assert!(store.create_list("Sixth").await.is_err());

        kv.fail_reads(false);
        let result = store.create_list("Sixth").await;
        assert!(matches!(result, Err(Error::ListCapReached { cap: 5 })));
        assert_eq!(ListStore::open(kv).await.lists().len(), MAX_LISTS);
        Ok(())
    }

    #[tokio::test]
    async fn test_item_mutations_abort_on_read_failure() -> Result<()> {
        let kv = FlakyReadStore::new();
        let mut store = ItemStore::open(kv.clone()).await;
        store
            .add_batch(&[EditEntry::new("Rice", 2, "5"), EditEntry::new("Milk", 1, "4")])
            .await?;
        let rice = store.items()[0].id.clone();
        let persisted = kv.get("items").await?;

        kv.fail_reads(true);
        let result = store.add_batch(&[EditEntry::new("Beans", 1, "7")]).await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(store.update_item(&rice, "9", "1").await.is_err());
        assert!(store.remove_item(&rice).await.is_err());

        kv.fail_reads(false);
        assert_eq!(kv.get("items").await?, persisted);
        assert_eq!(ItemStore::open(kv).await.total(), Decimal::new(14, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_batch_accumulates_quantities() -> Result<()> {
        let kv = setup_test_store().await?;
        let mut store = ItemStore::open(kv.clone()).await;

        store.add_batch(&[EditEntry::new("Rice", 2, "5,0")]).await?;
        store
            .add_batch(&[
                EditEntry::new("Rice", 3, "6,0"),
                EditEntry::new("Beans", 0, "9"),
            ])
            .await?;

        let reopened = ItemStore::open(kv).await;
        assert_eq!(reopened.items().len(), 1);
        let rice = &reopened.items()[0];
        assert_eq!(rice.quantity, Some(5));
        assert_eq!(rice.price, Decimal::new(6, 0));
        assert_eq!(reopened.total(), Decimal::new(30, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_batch_all_zero_quantities_is_rejected() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ItemStore::open(kv.clone()).await;

        let result = store
            .add_batch(&[EditEntry::new("Rice", 0, "5"), EditEntry::new("Milk", 0, "4")])
            .await;
        assert!(matches!(result, Err(Error::NoValidEntries)));
        assert!(kv.get("items").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_batch_recovers_from_corrupt_record() -> Result<()> {
        let kv = MemoryStore::new();
        kv.set("items", "{{not json").await?;
        let mut store = ItemStore::open(kv.clone()).await;
        assert!(store.items().is_empty());

        store.add_batch(&[EditEntry::new("Milk", 1, "4")]).await?;
        assert_eq!(ItemStore::open(kv).await.items().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_remove_item() -> Result<()> {
        let kv = MemoryStore::new();
        let mut store = ItemStore::open(kv.clone()).await;
        store
            .add_batch(&[EditEntry::new("Rice", 2, "5"), EditEntry::new("Milk", 1, "4")])
            .await?;
        let rice = store.items()[0].id.clone();
        let milk = store.items()[1].id.clone();

        store.update_item(&rice, "4", "5,25").await?;
        assert_eq!(store.items()[0].quantity, Some(4));
        assert_eq!(store.items()[0].price, Decimal::new(525, 2));

        let result = store.update_item(&milk, "1", "cheap").await;
        assert!(matches!(result, Err(Error::InvalidPrice { .. })));

        store.remove_item(&milk).await?;
        store.remove_item(&ProductId::from("missing")).await?;
        let reopened = ItemStore::open(kv).await;
        assert_eq!(reopened.items().len(), 1);
        assert_eq!(reopened.total(), Decimal::new(21, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_item() {
        let mut store = ItemStore::open(MemoryStore::new()).await;
        let result = store.update_item(&ProductId::from("x"), "1", "1").await;
        assert!(matches!(result, Err(Error::ItemNotFound { .. })));
    }
}
