//! Shared test harness for menu service testing
//!
//! Provides collaborator doubles that fail on demand, plus helpers to wire a
//! [`MenuResourceService`] over an [`InMemoryStore`].
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod menu_harness;
//! use menu_harness::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use upms::core::authority::ResourceType;
use upms::core::error::{StorageError, UpmsResult};
use upms::core::operation::NewOperation;
use upms::core::service::{AuthoritySynchronizer, OperationService};
use upms::menu::MenuResourceService;
use upms::storage::InMemoryStore;

/// Service and the store behind it
pub fn in_memory_service() -> (MenuResourceService, InMemoryStore) {
    let store = InMemoryStore::new();
    (MenuResourceService::from_store(store.clone()), store)
}

/// Operation service that rejects every call and counts attempts
#[derive(Default)]
pub struct FailingOperationService {
    pub attempts: AtomicUsize,
}

impl FailingOperationService {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OperationService for FailingOperationService {
    async fn add_operation(&self, operation: NewOperation) -> UpmsResult<i64> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::QueryError {
            backend: "test".to_string(),
            message: format!("cannot store {}", operation.operation_code),
        }
        .into())
    }
}

/// Operation service that fails only for codes ending with `suffix`
pub struct SelectiveOperationService {
    pub inner: InMemoryStore,
    pub failing_suffix: &'static str,
}

#[async_trait]
impl OperationService for SelectiveOperationService {
    async fn add_operation(&self, operation: NewOperation) -> UpmsResult<i64> {
        if operation.operation_code.ends_with(self.failing_suffix) {
            return Err(StorageError::QueryError {
                backend: "test".to_string(),
                message: "selective failure".to_string(),
            }
            .into());
        }
        self.inner.add_operation(operation).await
    }
}

/// Authority synchronizer whose save always fails, delegating the rest
pub struct BrokenAuthoritySync {
    pub inner: InMemoryStore,
}

#[async_trait]
impl AuthoritySynchronizer for BrokenAuthoritySync {
    async fn save_or_update_authority(
        &self,
        _resource_id: i64,
        _resource_type: ResourceType,
    ) -> UpmsResult<()> {
        Err(StorageError::QueryError {
            backend: "test".to_string(),
            message: "authority table unavailable".to_string(),
        }
        .into())
    }

    async fn is_granted(&self, resource_id: i64, resource_type: ResourceType) -> UpmsResult<bool> {
        self.inner.is_granted(resource_id, resource_type).await
    }

    async fn remove_authority(
        &self,
        resource_id: i64,
        resource_type: ResourceType,
    ) -> UpmsResult<()> {
        self.inner.remove_authority(resource_id, resource_type).await
    }
}

/// Service over `store` whose authority sync always fails
pub fn service_with_broken_authority(store: &InMemoryStore) -> MenuResourceService {
    let shared = Arc::new(store.clone());
    MenuResourceService::new(
        shared.clone(),
        Arc::new(BrokenAuthoritySync {
            inner: store.clone(),
        }),
        shared.clone(),
        shared,
    )
}
