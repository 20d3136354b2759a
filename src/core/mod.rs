//! Core module containing the domain types and collaborator traits

pub mod authority;
pub mod error;
pub mod menu;
pub mod operation;
pub mod query;
pub mod service;
pub mod validation;

pub use authority::{Authority, AuthorityGrant, ResourceType};
pub use error::{MenuError, StorageError, UpmsError, UpmsResult};
pub use menu::{InsertMenu, MenuPatch, MenuResource, MenuWithOperations, NewMenu, ResourceStatus};
pub use operation::{
    MenuOperation, NewOperation, OperationAction, OperationLabels, OperationWarning,
};
pub use query::{MenuFilter, MenuOrder, PageList, PageParams, PaginationMeta};
pub use service::{
    AuthoritySynchronizer, MenuRepository, OperationService, Transaction, TransactionManager,
};
