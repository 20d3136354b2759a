//! Menu API example: seeds an in-memory store and serves the menu routes
//!
//! ```text
//! cargo run --example menu_api -- demos/menu_api/config.yaml
//! curl 'http://127.0.0.1:3000/menus?keyword=sys'
//! ```

use anyhow::Result;
use upms::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => UpmsConfig::from_yaml_file(&path)?,
        None => UpmsConfig::default(),
    };
    config.logging.init()?;

    let store = InMemoryStore::new();
    let service = MenuResourceService::from_store(store.clone())
        .with_labels(config.operations.labels.clone());

    // System menus are seeded as persistent so they cannot be removed
    let system = service
        .add_menu(NewMenu::new("system", "System").persistent())
        .await?;
    service
        .add_menu(NewMenu::new("menus", "Menus").with_parent(system).with_priority(1))
        .await?;
    let roles = service
        .add_menu(NewMenu::new("roles", "Roles").with_parent(system).with_priority(2))
        .await?;
    store.grant(roles, ResourceType::Menu, "role:admin").await?;

    tracing::info!("Seeded {} menus", service.find_all_list(None).await?.total);

    serve(&config, service).await
}
