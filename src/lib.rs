//! # upms
//!
//! Menu resource management for an admin permission system.
//!
//! ## Features
//!
//! - **Menu CRUD**: paginated and keyword-filtered listings, existence checks
//! - **Default Operations**: browse/create/edit/remove records created with each menu
//! - **Authority Sync**: every menu keeps a matching authority entry
//! - **Guarded Deletion**: persistent or granted menus cannot be removed
//! - **Transactional**: each mutation commits or rolls back as a whole
//! - **Pluggable Storage**: collaborators are traits; an in-memory backend ships
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use upms::prelude::*;
//!
//! let store = InMemoryStore::new();
//! let service = MenuResourceService::from_store(store.clone());
//!
//! let id = service.add_menu(NewMenu::new("sys", "System")).await?;
//! service.update_status(id, ResourceStatus::Disabled).await?;
//!
//! // Granted menus are protected from removal
//! store.grant(id, ResourceType::Menu, "role:admin").await?;
//! assert!(service.remove_menu(id).await.is_err());
//! ```

pub mod config;
pub mod core;
pub mod menu;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        authority::{Authority, AuthorityGrant, ResourceType},
        error::{MenuError, StorageError, UpmsError, UpmsResult},
        menu::{MenuPatch, MenuResource, MenuWithOperations, NewMenu, ResourceStatus},
        operation::{MenuOperation, NewOperation, OperationAction, OperationLabels},
        query::{PageList, PageParams},
    };

    // === Collaborator Traits ===
    pub use crate::core::service::{
        AuthoritySynchronizer, MenuRepository, OperationService, Transaction, TransactionManager,
    };

    // === Service ===
    pub use crate::menu::{AppState, MenuCreated, MenuResourceService};

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::UpmsConfig;

    // === Server ===
    pub use crate::server::{build_menu_routes, serve};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
