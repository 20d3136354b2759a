//! Router builder utilities for menu routes

use crate::menu::handlers::{
    AppState, create_menu, delete_menu, get_menu, list_all_menus, list_menus,
    list_menus_with_actions, menu_exists, update_menu, update_menu_status,
};
use axum::{
    Router,
    routing::{get, put},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build menu routes
///
/// - GET /menus - Paginated listing (`page`, `limit`, `sort`, `keyword`)
/// - GET /menus/all - Unpaginated listing (`keyword`)
/// - GET /menus/actions - Menus with their operations
/// - GET /menus/exists - Check a menu code (`menu_code`)
/// - POST /menus - Create a menu
/// - GET /menus/{menu_id} - Get a menu
/// - PUT /menus/{menu_id} - Sparse update
/// - DELETE /menus/{menu_id} - Remove a menu
/// - PUT /menus/{menu_id}/status - Enable or disable a menu
pub fn build_menu_routes(state: AppState) -> Router {
    Router::new()
        .route("/menus", get(list_menus).post(create_menu))
        .route("/menus/all", get(list_all_menus))
        .route("/menus/actions", get(list_menus_with_actions))
        .route("/menus/exists", get(menu_exists))
        .route(
            "/menus/{menu_id}",
            get(get_menu).put(update_menu).delete(delete_menu),
        )
        .route("/menus/{menu_id}/status", put(update_menu_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
