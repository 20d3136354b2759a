//! Collaborator traits consumed by the menu resource service
//!
//! Implementations provide storage for menus, authorities and operations.
//! The service is agnostic to the underlying backend.

use crate::core::authority::ResourceType;
use crate::core::error::UpmsResult;
use crate::core::menu::{InsertMenu, MenuPatch, MenuResource, MenuWithOperations};
use crate::core::operation::NewOperation;
use crate::core::query::{MenuFilter, MenuOrder, PageParams};
use async_trait::async_trait;

/// Storage for menu rows
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// All menus matching `filter`, ordered by `order`
    async fn select_by_filter(
        &self,
        filter: &MenuFilter,
        order: &[MenuOrder],
    ) -> UpmsResult<Vec<MenuResource>>;

    /// One page of the menus matching `filter`, plus the total match count
    async fn select_page(
        &self,
        filter: &MenuFilter,
        order: &[MenuOrder],
        page: &PageParams,
    ) -> UpmsResult<(Vec<MenuResource>, usize)>;

    /// Get a menu by id
    async fn select_by_primary_key(&self, menu_id: i64) -> UpmsResult<Option<MenuResource>>;

    /// Number of menus whose code is exactly `menu_code`
    async fn select_count_by_code(&self, menu_code: &str) -> UpmsResult<usize>;

    /// Insert a row and return the id assigned by storage
    ///
    /// Must reject a duplicate `menu_code` with
    /// [`StorageError::UniqueViolation`](crate::core::error::StorageError::UniqueViolation)
    /// on [`MENU_CODE_CONSTRAINT`](crate::core::error::MENU_CODE_CONSTRAINT).
    async fn insert_selective(&self, menu: InsertMenu) -> UpmsResult<i64>;

    /// Write the `Some` fields of `patch`; returns the number of rows touched
    async fn update_by_primary_key_selective(&self, patch: &MenuPatch) -> UpmsResult<u64>;

    /// Delete a menu by id; returns the number of rows removed
    async fn delete_by_primary_key(&self, menu_id: i64) -> UpmsResult<u64>;

    /// Every menu joined with its operation records
    async fn select_with_action_list(&self) -> UpmsResult<Vec<MenuWithOperations>>;
}

/// Keeps the authority table in step with the resources it protects
#[async_trait]
pub trait AuthoritySynchronizer: Send + Sync {
    /// Create the authority for a resource, or refresh it if present
    async fn save_or_update_authority(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> UpmsResult<()>;

    /// Whether the resource's authority is granted to any subject
    async fn is_granted(&self, resource_id: i64, resource_type: ResourceType) -> UpmsResult<bool>;

    /// Remove the authority of a resource (no-op when absent)
    async fn remove_authority(&self, resource_id: i64, resource_type: ResourceType)
    -> UpmsResult<()>;
}

/// Creates operation records
#[async_trait]
pub trait OperationService: Send + Sync {
    /// Store an operation and return its id
    async fn add_operation(&self, operation: NewOperation) -> UpmsResult<i64>;
}

/// An open unit of work
#[async_trait]
pub trait Transaction: Send {
    async fn commit(self: Box<Self>) -> UpmsResult<()>;

    async fn rollback(self: Box<Self>) -> UpmsResult<()>;
}

/// Hands out transactions spanning all collaborators of one backend
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> UpmsResult<Box<dyn Transaction>>;
}
