//! Menu resource service
//!
//! Orchestrates the menu repository, the authority synchronizer and the
//! operation service. Every mutating call runs inside one transaction;
//! default-operation failures during creation are logged and reported as
//! warnings without rolling anything back.

use crate::core::authority::ResourceType;
use crate::core::error::{MenuError, UpmsResult};
use crate::core::menu::{
    InsertMenu, MenuPatch, MenuResource, MenuWithOperations, NewMenu, ROOT_PARENT_ID,
    ResourceStatus,
};
use crate::core::operation::{OperationLabels, OperationWarning, default_operations};
use crate::core::query::{DEFAULT_MAX_LIMIT, MenuFilter, MenuOrder, PageList, PageParams};
use crate::core::service::{
    AuthoritySynchronizer, MenuRepository, OperationService, TransactionManager,
};
use crate::core::validation::{validate_new_menu, validate_patch};
use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a menu creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuCreated {
    pub menu_id: i64,

    /// Default operations that could not be created
    pub warnings: Vec<OperationWarning>,
}

/// CRUD and validation logic for menu resources
#[derive(Clone)]
pub struct MenuResourceService {
    menus: Arc<dyn MenuRepository>,
    authorities: Arc<dyn AuthoritySynchronizer>,
    operations: Arc<dyn OperationService>,
    transactions: Arc<dyn TransactionManager>,
    labels: OperationLabels,
    max_limit: usize,
}

impl MenuResourceService {
    pub fn new(
        menus: Arc<dyn MenuRepository>,
        authorities: Arc<dyn AuthoritySynchronizer>,
        operations: Arc<dyn OperationService>,
        transactions: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            menus,
            authorities,
            operations,
            transactions,
            labels: OperationLabels::default(),
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }

    /// Build a service whose collaborators all come from one backend
    pub fn from_store<S>(store: S) -> Self
    where
        S: MenuRepository
            + AuthoritySynchronizer
            + OperationService
            + TransactionManager
            + 'static,
    {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    /// Labels used for the default operations
    pub fn with_labels(mut self, labels: OperationLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Upper bound on page size
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    /// Replace the operation service (e.g. with a remote one)
    pub fn with_operation_service(mut self, operations: Arc<dyn OperationService>) -> Self {
        self.operations = operations;
        self
    }

    async fn in_transaction<T, F, Fut>(&self, body: F) -> UpmsResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = UpmsResult<T>>,
    {
        let tx = self.transactions.begin().await?;

        match body().await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }

    /// One page of menus whose code or name contains `keyword`
    ///
    /// Ordered by `menu_id` then `priority`; `page_params.sort` is ignored.
    pub async fn find_list_page(
        &self,
        page_params: &PageParams,
        keyword: Option<&str>,
    ) -> UpmsResult<PageList<MenuResource>> {
        let params = page_params.normalized(self.max_limit);
        let filter = MenuFilter::keyword(keyword);

        let (list, total) = self
            .menus
            .select_page(&filter, MenuOrder::DEFAULT, &params)
            .await?;

        tracing::debug!(
            page = params.page,
            limit = params.limit,
            total,
            "Listed menu page"
        );
        Ok(PageList::paged(list, total, &params))
    }

    /// Every menu whose code or name contains `keyword`, unpaginated
    pub async fn find_all_list(&self, keyword: Option<&str>) -> UpmsResult<PageList<MenuResource>> {
        let filter = MenuFilter::keyword(keyword);
        let list = self
            .menus
            .select_by_filter(&filter, MenuOrder::DEFAULT)
            .await?;
        Ok(PageList::from_list(list))
    }

    /// Menus joined with their operations
    ///
    /// `keyword` is accepted for interface symmetry and not applied.
    pub async fn find_with_action_list(
        &self,
        keyword: Option<&str>,
    ) -> UpmsResult<PageList<MenuWithOperations>> {
        if keyword.is_some_and(|k| !k.is_empty()) {
            tracing::debug!(keyword, "Keyword is not applied to the joined menu list");
        }
        let list = self.menus.select_with_action_list().await?;
        Ok(PageList::from_list(list))
    }

    pub async fn get_menu(&self, menu_id: i64) -> UpmsResult<Option<MenuResource>> {
        self.menus.select_by_primary_key(menu_id).await
    }

    /// Whether a menu with exactly this code exists
    pub async fn is_exist(&self, menu_code: &str) -> UpmsResult<bool> {
        Ok(self.menus.select_count_by_code(menu_code).await? > 0)
    }

    /// Create a menu and return its id
    ///
    /// Default-operation failures are logged and dropped; use
    /// [`add_menu_with_report`](Self::add_menu_with_report) to see them.
    pub async fn add_menu(&self, menu: NewMenu) -> UpmsResult<i64> {
        Ok(self.add_menu_with_report(menu).await?.menu_id)
    }

    /// Create a menu, reporting default operations that failed
    pub async fn add_menu_with_report(&self, menu: NewMenu) -> UpmsResult<MenuCreated> {
        validate_new_menu(&menu)?;
        self.in_transaction(move || self.insert_menu(menu)).await
    }

    async fn insert_menu(&self, menu: NewMenu) -> UpmsResult<MenuCreated> {
        if self.is_exist(&menu.menu_code).await? {
            tracing::warn!(menu_code = %menu.menu_code, "Rejected duplicate menu code");
            return Err(MenuError::DuplicateKey {
                menu_code: menu.menu_code,
            }
            .into());
        }

        let row = InsertMenu::from_new(menu, Utc::now());
        let menu_code = row.menu_code.clone();
        let menu_name = row.menu_name.clone();

        let menu_id = self.menus.insert_selective(row).await?;
        self.authorities
            .save_or_update_authority(menu_id, ResourceType::Menu)
            .await?;

        let warnings = self
            .create_default_operations(menu_id, &menu_code, &menu_name)
            .await;

        tracing::info!(
            menu_id,
            menu_code = %menu_code,
            failed_operations = warnings.len(),
            "Menu created"
        );
        Ok(MenuCreated { menu_id, warnings })
    }

    /// Submit the four default operations; never fails
    async fn create_default_operations(
        &self,
        menu_id: i64,
        menu_code: &str,
        menu_name: &str,
    ) -> Vec<OperationWarning> {
        let mut warnings = Vec::new();

        for (action, operation) in default_operations(menu_id, menu_code, menu_name, &self.labels)
        {
            let operation_code = operation.operation_code.clone();
            if let Err(err) = self.operations.add_operation(operation).await {
                tracing::error!(
                    menu_id,
                    operation_code = %operation_code,
                    error = %err,
                    "Failed to create default menu operation"
                );
                warnings.push(OperationWarning {
                    action,
                    operation_code,
                    message: err.to_string(),
                });
            }
        }

        warnings
    }

    /// Update a menu, writing only the fields present on `patch`
    ///
    /// An unset `parent_id` or `priority` is written as `0`.
    pub async fn update_menu(&self, patch: MenuPatch) -> UpmsResult<()> {
        validate_patch(&patch)?;
        self.in_transaction(move || self.apply_update(patch)).await
    }

    async fn apply_update(&self, mut patch: MenuPatch) -> UpmsResult<()> {
        let menu_id = patch.menu_id;
        let saved = self
            .menus
            .select_by_primary_key(menu_id)
            .await?
            .ok_or(MenuError::NotFound { menu_id })?;

        // uniqueness is only rechecked when the code actually changes
        if let Some(code) = patch.menu_code.as_deref() {
            if code != saved.menu_code && self.is_exist(code).await? {
                tracing::warn!(menu_id, menu_code = %code, "Rejected duplicate menu code");
                return Err(MenuError::DuplicateKey {
                    menu_code: code.to_string(),
                }
                .into());
            }
        }

        patch.parent_id.get_or_insert(ROOT_PARENT_ID);
        patch.priority.get_or_insert(0);
        patch.update_time = Some(Utc::now());

        self.menus.update_by_primary_key_selective(&patch).await?;
        self.authorities
            .save_or_update_authority(menu_id, ResourceType::Menu)
            .await?;

        tracing::info!(menu_id, "Menu updated");
        Ok(())
    }

    /// Enable or disable a menu
    ///
    /// No existence check: an unknown id updates nothing.
    pub async fn update_status(&self, menu_id: i64, status: ResourceStatus) -> UpmsResult<()> {
        self.in_transaction(move || self.apply_status(menu_id, status))
            .await
    }

    async fn apply_status(&self, menu_id: i64, status: ResourceStatus) -> UpmsResult<()> {
        let patch = MenuPatch {
            status: Some(status),
            update_time: Some(Utc::now()),
            ..MenuPatch::new(menu_id)
        };

        let touched = self.menus.update_by_primary_key_selective(&patch).await?;
        self.authorities
            .save_or_update_authority(menu_id, ResourceType::Menu)
            .await?;

        tracing::info!(menu_id, status = %status, touched, "Menu status updated");
        Ok(())
    }

    /// Remove a menu and its authority
    ///
    /// Refused for persistent menus and for menus still granted to a
    /// subject. A missing menu is not an error.
    pub async fn remove_menu(&self, menu_id: i64) -> UpmsResult<()> {
        self.in_transaction(move || self.delete_menu(menu_id)).await
    }

    async fn delete_menu(&self, menu_id: i64) -> UpmsResult<()> {
        let menu = self.menus.select_by_primary_key(menu_id).await?;
        if menu.as_ref().is_some_and(|m| m.is_persist) {
            tracing::warn!(menu_id, "Refused to remove persistent menu");
            return Err(MenuError::ProtectedResource { menu_id }.into());
        }

        if self
            .authorities
            .is_granted(menu_id, ResourceType::Menu)
            .await?
        {
            tracing::warn!(menu_id, "Refused to remove granted menu");
            return Err(MenuError::ResourceInUse { menu_id }.into());
        }

        self.authorities
            .remove_authority(menu_id, ResourceType::Menu)
            .await?;
        let removed = self.menus.delete_by_primary_key(menu_id).await?;

        tracing::info!(menu_id, removed, "Menu removed");
        Ok(())
    }
}
