//! Store traits implemented by every record collection.

use async_trait::async_trait;

use crate::result::AppResult;

/// Keyed record collection.
///
/// Each operation is independently atomic; nothing spans collections.
/// `New` is the insert payload, the identifier is assigned by the store.
#[async_trait]
pub trait Repository<Entity, Id, New>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Id: Send + Sync + Copy + 'static,
    New: Send + Sync + 'static,
{
    /// Insert a record and return its newly assigned identifier.
    async fn add(&self, data: &New) -> AppResult<Id>;

    /// Find a record by identifier.
    async fn get(&self, id: Id) -> AppResult<Option<Entity>>;

    /// List every record. The persisted order is not meaningful.
    async fn list(&self) -> AppResult<Vec<Entity>>;

    /// Replace the full record with the same identifier.
    ///
    /// Returns `false` without error when the identifier is absent.
    async fn update(&self, entity: &Entity) -> AppResult<bool>;

    /// Remove one record without touching its children.
    ///
    /// Returns `true` if a record was removed.
    async fn delete(&self, id: Id) -> AppResult<bool>;

    /// Count records in the collection.
    async fn count(&self) -> AppResult<u64>;
}

/// Collection with a secondary index on its parent key.
#[async_trait]
pub trait ChildRepository<Entity, Id, ParentId>: Send + Sync + 'static
where
    Entity: Send + Sync + 'static,
    Id: Send + Sync + Copy + 'static,
    ParentId: Send + Sync + Copy + 'static,
{
    /// List the records whose parent key equals `parent_id`.
    async fn list_by_parent(&self, parent_id: ParentId) -> AppResult<Vec<Entity>>;

    /// Count the records whose parent key equals `parent_id`.
    async fn count_by_parent(&self, parent_id: ParentId) -> AppResult<u64>;

    /// Identifiers of records whose parent no longer resolves.
    async fn find_orphans(&self) -> AppResult<Vec<Id>>;
}
