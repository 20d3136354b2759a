//! In-memory storage backend for testing and development
//!
//! A single [`InMemoryStore`] plays every collaborator role of the menu
//! service: menu repository, authority synchronizer, operation service and
//! transaction manager. State sits behind an `RwLock`; transactions are
//! serialized by an async mutex and roll back by restoring a snapshot.

use crate::core::authority::{Authority, AuthorityGrant, ResourceType};
use crate::core::error::{
    MENU_CODE_CONSTRAINT, OPERATION_CODE_CONSTRAINT, StorageError, UpmsResult,
};
use crate::core::menu::{InsertMenu, MenuPatch, MenuResource, MenuWithOperations, ResourceStatus};
use crate::core::operation::{MenuOperation, NewOperation};
use crate::core::query::{MenuFilter, MenuOrder, PageParams};
use crate::core::service::{
    AuthoritySynchronizer, MenuRepository, OperationService, Transaction, TransactionManager,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, OwnedMutexGuard};

const BACKEND: &str = "in-memory";

#[derive(Debug, Clone, Default)]
struct StoreState {
    menus: BTreeMap<i64, MenuResource>,
    operations: BTreeMap<i64, MenuOperation>,
    authorities: BTreeMap<i64, Authority>,
    grants: Vec<AuthorityGrant>,
    last_menu_id: i64,
    last_operation_id: i64,
    last_authority_id: i64,
}

impl StoreState {
    fn authority_for(&self, resource_id: i64, resource_type: ResourceType) -> Option<&Authority> {
        self.authorities
            .values()
            .find(|a| a.resource_id == resource_id && a.resource_type == resource_type)
    }

    fn resource_status(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> Option<ResourceStatus> {
        match resource_type {
            ResourceType::Menu => self.menus.get(&resource_id).map(|m| m.status),
            ResourceType::Operation => self.operations.get(&resource_id).map(|o| o.status),
            ResourceType::Api => None,
        }
    }

    fn code_taken(&self, menu_code: &str, except: Option<i64>) -> bool {
        self.menus
            .values()
            .any(|m| m.menu_code == menu_code && Some(m.menu_id) != except)
    }
}

/// In-memory store implementing every menu service collaborator
///
/// Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
    tx_lock: Arc<Mutex<()>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> UpmsResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(&self) -> UpmsResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            }
            .into()
        })
    }

    /// Grant the authority of a resource to a subject
    ///
    /// Waits for any open transaction so a rollback cannot erase the grant.
    /// Fails when the resource has no authority yet.
    pub async fn grant(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
        subject: impl Into<String>,
    ) -> UpmsResult<()> {
        let _tx = self.tx_lock.lock().await;
        let mut state = self.write()?;
        let authority_id = state
            .authority_for(resource_id, resource_type)
            .map(|a| a.authority_id)
            .ok_or_else(|| StorageError::QueryError {
                backend: BACKEND.to_string(),
                message: format!("no authority for {} {}", resource_type, resource_id),
            })?;
        state.grants.push(AuthorityGrant {
            authority_id,
            subject: subject.into(),
        });
        Ok(())
    }

    /// Revoke every grant of a resource's authority
    pub async fn revoke_all(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> UpmsResult<()> {
        let _tx = self.tx_lock.lock().await;
        let mut state = self.write()?;
        if let Some(authority_id) = state
            .authority_for(resource_id, resource_type)
            .map(|a| a.authority_id)
        {
            state.grants.retain(|g| g.authority_id != authority_id);
        }
        Ok(())
    }

    /// Authority of a resource, if any
    pub fn authority(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> UpmsResult<Option<Authority>> {
        Ok(self.read()?.authority_for(resource_id, resource_type).cloned())
    }

    /// All authorities, ordered by id
    pub fn authorities(&self) -> UpmsResult<Vec<Authority>> {
        Ok(self.read()?.authorities.values().cloned().collect())
    }

    /// Operations attached to a menu, ordered by id
    pub fn operations_for(&self, menu_id: i64) -> UpmsResult<Vec<MenuOperation>> {
        Ok(self
            .read()?
            .operations
            .values()
            .filter(|o| o.menu_id == menu_id)
            .cloned()
            .collect())
    }

    fn filtered(&self, filter: &MenuFilter, order: &[MenuOrder]) -> UpmsResult<Vec<MenuResource>> {
        let state = self.read()?;
        let mut menus: Vec<MenuResource> = state
            .menus
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        menus.sort_by(|a, b| MenuOrder::compare(order, a, b));
        Ok(menus)
    }
}

#[async_trait]
impl MenuRepository for InMemoryStore {
    async fn select_by_filter(
        &self,
        filter: &MenuFilter,
        order: &[MenuOrder],
    ) -> UpmsResult<Vec<MenuResource>> {
        self.filtered(filter, order)
    }

    async fn select_page(
        &self,
        filter: &MenuFilter,
        order: &[MenuOrder],
        page: &PageParams,
    ) -> UpmsResult<(Vec<MenuResource>, usize)> {
        let menus = self.filtered(filter, order)?;
        let total = menus.len();
        Ok((page.window(&menus), total))
    }

    async fn select_by_primary_key(&self, menu_id: i64) -> UpmsResult<Option<MenuResource>> {
        Ok(self.read()?.menus.get(&menu_id).cloned())
    }

    async fn select_count_by_code(&self, menu_code: &str) -> UpmsResult<usize> {
        Ok(self
            .read()?
            .menus
            .values()
            .filter(|m| m.menu_code == menu_code)
            .count())
    }

    async fn insert_selective(&self, menu: InsertMenu) -> UpmsResult<i64> {
        let mut state = self.write()?;

        if state.code_taken(&menu.menu_code, None) {
            return Err(StorageError::UniqueViolation {
                constraint: MENU_CODE_CONSTRAINT.to_string(),
                value: menu.menu_code,
            }
            .into());
        }

        state.last_menu_id += 1;
        let menu_id = state.last_menu_id;
        state.menus.insert(menu_id, menu.into_resource(menu_id));

        Ok(menu_id)
    }

    async fn update_by_primary_key_selective(&self, patch: &MenuPatch) -> UpmsResult<u64> {
        let mut state = self.write()?;

        if let Some(code) = patch
            .menu_code
            .as_ref()
            .filter(|code| state.code_taken(code, Some(patch.menu_id)))
        {
            return Err(StorageError::UniqueViolation {
                constraint: MENU_CODE_CONSTRAINT.to_string(),
                value: code.clone(),
            }
            .into());
        }

        match state.menus.get_mut(&patch.menu_id) {
            Some(menu) => {
                menu.apply(patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_primary_key(&self, menu_id: i64) -> UpmsResult<u64> {
        let mut state = self.write()?;
        Ok(state.menus.remove(&menu_id).map_or(0, |_| 1))
    }

    async fn select_with_action_list(&self) -> UpmsResult<Vec<MenuWithOperations>> {
        let state = self.read()?;
        let mut menus: Vec<MenuResource> = state.menus.values().cloned().collect();
        menus.sort_by(|a, b| MenuOrder::compare(MenuOrder::DEFAULT, a, b));

        Ok(menus
            .into_iter()
            .map(|menu| {
                let operations = state
                    .operations
                    .values()
                    .filter(|o| o.menu_id == menu.menu_id)
                    .cloned()
                    .collect();
                MenuWithOperations { menu, operations }
            })
            .collect())
    }
}

#[async_trait]
impl AuthoritySynchronizer for InMemoryStore {
    async fn save_or_update_authority(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> UpmsResult<()> {
        let mut state = self.write()?;

        // nothing to protect when the resource itself is gone
        let Some(status) = state.resource_status(resource_id, resource_type) else {
            tracing::debug!(
                resource_id,
                resource_type = %resource_type,
                "Skipping authority sync for missing resource"
            );
            return Ok(());
        };

        let now = Utc::now();
        let existing = state
            .authority_for(resource_id, resource_type)
            .map(|a| a.authority_id);

        match existing {
            Some(authority_id) => {
                if let Some(authority) = state.authorities.get_mut(&authority_id) {
                    authority.status = status;
                    authority.update_time = now;
                }
            }
            None => {
                state.last_authority_id += 1;
                let authority_id = state.last_authority_id;
                state.authorities.insert(
                    authority_id,
                    Authority {
                        authority_id,
                        authority: resource_type.authority_for(resource_id),
                        resource_id,
                        resource_type,
                        status,
                        create_time: now,
                        update_time: now,
                    },
                );
            }
        }

        Ok(())
    }

    async fn is_granted(&self, resource_id: i64, resource_type: ResourceType) -> UpmsResult<bool> {
        let state = self.read()?;
        Ok(state
            .authority_for(resource_id, resource_type)
            .is_some_and(|a| state.grants.iter().any(|g| g.authority_id == a.authority_id)))
    }

    async fn remove_authority(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> UpmsResult<()> {
        let mut state = self.write()?;
        if let Some(authority_id) = state
            .authority_for(resource_id, resource_type)
            .map(|a| a.authority_id)
        {
            state.authorities.remove(&authority_id);
            state.grants.retain(|g| g.authority_id != authority_id);
        }
        Ok(())
    }
}

#[async_trait]
impl OperationService for InMemoryStore {
    async fn add_operation(&self, operation: NewOperation) -> UpmsResult<i64> {
        let mut state = self.write()?;

        if state
            .operations
            .values()
            .any(|o| o.operation_code == operation.operation_code)
        {
            return Err(StorageError::UniqueViolation {
                constraint: OPERATION_CODE_CONSTRAINT.to_string(),
                value: operation.operation_code,
            }
            .into());
        }

        state.last_operation_id += 1;
        let operation_id = state.last_operation_id;
        state.operations.insert(
            operation_id,
            MenuOperation::from_new(operation_id, operation, Utc::now()),
        );

        Ok(operation_id)
    }
}

/// Snapshot transaction over an [`InMemoryStore`]
///
/// Holds the store's transaction lock until committed or rolled back, so
/// transactions never interleave. Dropping it without either commits.
pub struct InMemoryTransaction {
    state: Arc<RwLock<StoreState>>,
    snapshot: StoreState,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> UpmsResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> UpmsResult<()> {
        let this = *self;
        let mut state = this.state.write().map_err(|e| StorageError::TransactionError {
            message: format!("Failed to restore snapshot: {}", e),
        })?;
        *state = this.snapshot;
        Ok(())
    }
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> UpmsResult<Box<dyn Transaction>> {
        let guard = self.tx_lock.clone().lock_owned().await;
        let snapshot = self.read()?.clone();

        Ok(Box::new(InMemoryTransaction {
            state: self.state.clone(),
            snapshot,
            _guard: guard,
        }))
    }
}
