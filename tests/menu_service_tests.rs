//! Behavioural tests for `MenuResourceService` over the in-memory store

mod menu_harness;

use menu_harness::*;
use std::sync::Arc;
use upms::core::authority::ResourceType;
use upms::core::error::{MenuError, UpmsError};
use upms::core::menu::{MenuPatch, NewMenu, ResourceStatus};
use upms::core::operation::OperationAction;
use upms::core::query::PageParams;
use upms::core::service::AuthoritySynchronizer;

fn menu_error(err: UpmsError) -> MenuError {
    match err {
        UpmsError::Menu(e) => e,
        other => panic!("expected a menu error, got {other:?}"),
    }
}

// =============================================================================
// Creation
// =============================================================================

mod add_menu_tests {
    use super::*;

    #[tokio::test]
    async fn test_walkthrough() {
        let (service, _) = in_memory_service();

        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();
        assert_eq!(id, 1);
        let menu = service.get_menu(1).await.unwrap().unwrap();
        assert_eq!(menu.parent_id, 0);
        assert_eq!(menu.priority, 0);

        let err = service
            .add_menu(NewMenu::new("sys", "System again"))
            .await
            .unwrap_err();
        assert_eq!(
            menu_error(err),
            MenuError::DuplicateKey {
                menu_code: "sys".to_string()
            }
        );

        service
            .update_status(1, ResourceStatus::Disabled)
            .await
            .unwrap();
        let menu = service.get_menu(1).await.unwrap().unwrap();
        assert_eq!(menu.status, ResourceStatus::Disabled);

        service.remove_menu(1).await.unwrap();
        assert!(service.get_menu(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_performs_no_insert() {
        let (service, store) = in_memory_service();
        service.add_menu(NewMenu::new("sys", "System")).await.unwrap();

        let _ = service.add_menu(NewMenu::new("sys", "Other")).await;

        let all = service.find_all_list(None).await.unwrap();
        assert_eq!(all.total, 1);
        assert_eq!(all.list[0].menu_name, "System");
        assert_eq!(store.authorities().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_defaults_on_fresh_code() {
        let (service, _) = in_memory_service();

        let id = service.add_menu(NewMenu::new("user", "Users")).await.unwrap();
        assert!(id > 0);

        let menu = service.get_menu(id).await.unwrap().unwrap();
        assert_eq!(menu.parent_id, 0);
        assert_eq!(menu.priority, 0);
        assert_eq!(menu.status, ResourceStatus::Enabled);
        assert!(!menu.is_persist);
    }

    #[tokio::test]
    async fn test_created_menu_exists_and_has_authority() {
        let (service, store) = in_memory_service();

        let id = service.add_menu(NewMenu::new("user", "Users")).await.unwrap();

        assert!(service.is_exist("user").await.unwrap());
        let authority = store.authority(id, ResourceType::Menu).unwrap().unwrap();
        assert_eq!(authority.resource_id, id);
        assert_eq!(authority.resource_type, ResourceType::Menu);
    }

    #[tokio::test]
    async fn test_operation_failures_are_suppressed() {
        let (service, store) = in_memory_service();
        let failing = Arc::new(FailingOperationService::default());
        let service = service.with_operation_service(failing.clone());

        let created = service
            .add_menu_with_report(NewMenu::new("sys", "System"))
            .await
            .unwrap();

        assert_eq!(failing.attempts(), 4);
        assert_eq!(created.warnings.len(), 4);
        assert!(service.get_menu(created.menu_id).await.unwrap().is_some());
        assert!(
            store
                .authority(created.menu_id, ResourceType::Menu)
                .unwrap()
                .is_some()
        );

        // the plain entry point hides the warnings entirely
        let id = service.add_menu(NewMenu::new("log", "Logs")).await.unwrap();
        assert_eq!(id, created.menu_id + 1);
    }

    #[tokio::test]
    async fn test_one_failing_operation_does_not_block_the_others() {
        let (service, store) = in_memory_service();
        let service = service.with_operation_service(Arc::new(SelectiveOperationService {
            inner: store.clone(),
            failing_suffix: "Edit",
        }));

        let created = service
            .add_menu_with_report(NewMenu::new("sys", "System"))
            .await
            .unwrap();

        assert_eq!(created.warnings.len(), 1);
        assert_eq!(created.warnings[0].action, OperationAction::Edit);
        assert_eq!(created.warnings[0].operation_code, "sysEdit");
        assert_eq!(store.operations_for(created.menu_id).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_authority_failure_rolls_back_insert() {
        let store = upms::storage::InMemoryStore::new();
        let service = service_with_broken_authority(&store);

        let err = service
            .add_menu(NewMenu::new("sys", "System"))
            .await
            .unwrap_err();
        assert!(matches!(err, UpmsError::Storage(_)));

        let healthy = upms::menu::MenuResourceService::from_store(store.clone());
        assert!(!healthy.is_exist("sys").await.unwrap());
        assert!(store.operations_for(1).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reused_code_reports_operation_conflicts() {
        let (service, _) = in_memory_service();
        service.add_menu(NewMenu::new("sys", "System")).await.unwrap();

        // operations of a removed menu stay behind and keep their codes
        service.remove_menu(1).await.unwrap();
        let created = service
            .add_menu_with_report(NewMenu::new("sys", "System"))
            .await
            .unwrap();
        assert_eq!(created.menu_id, 2);
        assert_eq!(created.warnings.len(), 4);
    }
}

// =============================================================================
// Update
// =============================================================================

mod update_menu_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_missing_menu_fails() {
        let (service, store) = in_memory_service();

        let err = service
            .update_menu(MenuPatch::new(99).menu_name("Ghost"))
            .await
            .unwrap_err();
        assert_eq!(menu_error(err), MenuError::NotFound { menu_id: 99 });
        assert!(store.authorities().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_to_taken_code_fails() {
        let (service, _) = in_memory_service();
        service.add_menu(NewMenu::new("sys", "System")).await.unwrap();
        let id = service.add_menu(NewMenu::new("user", "Users")).await.unwrap();

        let err = service
            .update_menu(MenuPatch::new(id).menu_code("sys"))
            .await
            .unwrap_err();
        assert!(matches!(menu_error(err), MenuError::DuplicateKey { .. }));

        let menu = service.get_menu(id).await.unwrap().unwrap();
        assert_eq!(menu.menu_code, "user");
    }

    #[tokio::test]
    async fn test_update_to_own_code_skips_duplicate_check() {
        let (service, _) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();

        service
            .update_menu(MenuPatch::new(id).menu_code("sys").priority(5))
            .await
            .unwrap();

        let menu = service.get_menu(id).await.unwrap().unwrap();
        assert_eq!(menu.priority, 5);
    }

    #[tokio::test]
    async fn test_update_is_sparse() {
        let (service, _) = in_memory_service();
        let mut new = NewMenu::new("sys", "System");
        new.icon = Some("setting".to_string());
        let id = service.add_menu(new).await.unwrap();

        service
            .update_menu(MenuPatch::new(id).menu_name("Settings"))
            .await
            .unwrap();

        let menu = service.get_menu(id).await.unwrap().unwrap();
        assert_eq!(menu.menu_name, "Settings");
        assert_eq!(menu.menu_code, "sys");
        assert_eq!(menu.icon.as_deref(), Some("setting"));
        assert_eq!(menu.status, ResourceStatus::Enabled);
    }

    #[tokio::test]
    async fn test_update_refreshes_authority() {
        let (service, store) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();
        let before = store.authority(id, ResourceType::Menu).unwrap().unwrap();

        service
            .update_menu(MenuPatch::new(id).status(ResourceStatus::Disabled))
            .await
            .unwrap();

        let after = store.authority(id, ResourceType::Menu).unwrap().unwrap();
        assert_eq!(after.authority_id, before.authority_id);
        assert_eq!(after.status, ResourceStatus::Disabled);
        assert!(after.update_time >= before.update_time);
    }

    #[tokio::test]
    async fn test_update_status_toggles() {
        let (service, store) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();

        service
            .update_status(id, ResourceStatus::Disabled)
            .await
            .unwrap();
        service
            .update_status(id, ResourceStatus::Enabled)
            .await
            .unwrap();

        let menu = service.get_menu(id).await.unwrap().unwrap();
        assert_eq!(menu.status, ResourceStatus::Enabled);
        let authority = store.authority(id, ResourceType::Menu).unwrap().unwrap();
        assert_eq!(authority.status, ResourceStatus::Enabled);
    }

    #[tokio::test]
    async fn test_update_status_rolls_back_on_authority_failure() {
        let (service, store) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();

        let broken = service_with_broken_authority(&store);
        assert!(
            broken
                .update_status(id, ResourceStatus::Disabled)
                .await
                .is_err()
        );

        let menu = service.get_menu(id).await.unwrap().unwrap();
        assert_eq!(menu.status, ResourceStatus::Enabled);
    }
}

// =============================================================================
// Removal
// =============================================================================

mod remove_menu_tests {
    use super::*;

    #[tokio::test]
    async fn test_persistent_menu_is_protected() {
        let (service, store) = in_memory_service();
        let id = service
            .add_menu(NewMenu::new("sys", "System").persistent())
            .await
            .unwrap();

        let err = service.remove_menu(id).await.unwrap_err();
        assert_eq!(menu_error(err), MenuError::ProtectedResource { menu_id: id });

        assert!(service.get_menu(id).await.unwrap().is_some());
        assert!(store.authority(id, ResourceType::Menu).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_granted_menu_is_in_use() {
        let (service, store) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();
        store.grant(id, ResourceType::Menu, "role:admin").await.unwrap();

        let err = service.remove_menu(id).await.unwrap_err();
        assert_eq!(menu_error(err), MenuError::ResourceInUse { menu_id: id });

        assert!(service.get_menu(id).await.unwrap().is_some());
        assert!(store.is_granted(id, ResourceType::Menu).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_after_revoke() {
        let (service, store) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();
        store.grant(id, ResourceType::Menu, "role:admin").await.unwrap();
        store.revoke_all(id, ResourceType::Menu).await.unwrap();

        service.remove_menu(id).await.unwrap();

        assert!(service.get_menu(id).await.unwrap().is_none());
        assert!(store.authority(id, ResourceType::Menu).unwrap().is_none());
        assert!(!service.is_exist("sys").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_leaves_operations_in_place() {
        let (service, store) = in_memory_service();
        let id = service.add_menu(NewMenu::new("sys", "System")).await.unwrap();

        service.remove_menu(id).await.unwrap();

        assert_eq!(store.operations_for(id).unwrap().len(), 4);
    }
}

// =============================================================================
// Listings
// =============================================================================

mod listing_tests {
    use super::*;

    async fn seeded() -> upms::menu::MenuResourceService {
        let (service, _) = in_memory_service();
        for (code, name, priority) in [
            ("sys", "System", 3),
            ("sysLog", "Logs", 1),
            ("user", "Users", 2),
            ("role", "Roles", 0),
            ("audit", "sys audit", 0),
        ] {
            service
                .add_menu(NewMenu::new(code, name).with_priority(priority))
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_keyword_filters_code_or_name() {
        let service = seeded().await;

        let found = service.find_all_list(Some("sys")).await.unwrap();
        let codes: Vec<&str> = found.list.iter().map(|m| m.menu_code.as_str()).collect();
        assert_eq!(codes, vec!["sys", "sysLog", "audit"]);
        assert_eq!(found.total, 3);
    }

    #[tokio::test]
    async fn test_empty_keyword_lists_everything_by_id() {
        let service = seeded().await;

        let found = service.find_all_list(Some("")).await.unwrap();
        let ids: Vec<i64> = found.list.iter().map(|m| m.menu_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_page_window_ignores_caller_sort() {
        let service = seeded().await;
        let params = PageParams {
            page: 2,
            limit: 2,
            sort: Some("priority:desc".to_string()),
        };

        let page = service.find_list_page(&params, None).await.unwrap();
        let ids: Vec<i64> = page.list.iter().map(|m| m.menu_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(page.total, 5);

        let meta = page.pagination.unwrap();
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_prev);
        assert!(meta.has_next);
    }

    #[tokio::test]
    async fn test_page_limit_is_capped() {
        let service = seeded().await.with_max_limit(2);

        let page = service
            .find_list_page(&PageParams::new(1, 1000), None)
            .await
            .unwrap();
        assert_eq!(page.list.len(), 2);
        assert_eq!(page.pagination.unwrap().limit, 2);
    }

    #[tokio::test]
    async fn test_far_page_is_empty() {
        let service = seeded().await;

        let page = service
            .find_list_page(&PageParams::new(usize::MAX, 10), None)
            .await
            .unwrap();
        assert!(page.list.is_empty());
        assert_eq!(page.total, 5);

        let meta = page.pagination.unwrap();
        assert!(meta.has_prev);
        assert!(!meta.has_next);
    }

    #[tokio::test]
    async fn test_with_action_list_ignores_keyword() {
        let service = seeded().await;

        let joined = service
            .find_with_action_list(Some("nothing-matches-this"))
            .await
            .unwrap();
        assert_eq!(joined.total, 5);
        assert!(joined.list.iter().all(|m| m.operations.len() == 4));
    }

    #[tokio::test]
    async fn test_is_exist_is_exact() {
        let service = seeded().await;

        assert!(service.is_exist("sys").await.unwrap());
        assert!(!service.is_exist("sy").await.unwrap());
        assert!(!service.is_exist("SYS").await.unwrap());
    }
}
