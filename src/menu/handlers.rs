//! HTTP handlers for menu resources

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::core::error::{MenuError, UpmsError};
use crate::core::menu::{MenuPatch, MenuResource, MenuWithOperations, NewMenu, ResourceStatus};
use crate::core::query::{PageList, PageParams};
use crate::menu::service::MenuResourceService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MenuResourceService,

    /// Page size used when the request does not give one
    pub default_limit: usize,
}

impl AppState {
    pub fn new(service: MenuResourceService) -> Self {
        Self {
            service,
            default_limit: PageParams::default().limit,
        }
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }
}

/// Query string of the paginated listing
#[derive(Debug, Default, Deserialize)]
pub struct ListMenusQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<String>,
    pub keyword: Option<String>,
}

/// Query string carrying only a keyword
#[derive(Debug, Default, Deserialize)]
pub struct KeywordQuery {
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub menu_code: String,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub menu_code: String,
    pub exists: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ResourceStatus,
}

/// GET /menus
pub async fn list_menus(
    State(state): State<AppState>,
    Query(query): Query<ListMenusQuery>,
) -> Result<Json<PageList<MenuResource>>, UpmsError> {
    let params = PageParams {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(state.default_limit),
        sort: query.sort,
    };

    let page = state
        .service
        .find_list_page(&params, query.keyword.as_deref())
        .await?;
    Ok(Json(page))
}

/// GET /menus/all
pub async fn list_all_menus(
    State(state): State<AppState>,
    Query(query): Query<KeywordQuery>,
) -> Result<Json<PageList<MenuResource>>, UpmsError> {
    let list = state
        .service
        .find_all_list(query.keyword.as_deref())
        .await?;
    Ok(Json(list))
}

/// GET /menus/actions
pub async fn list_menus_with_actions(
    State(state): State<AppState>,
    Query(query): Query<KeywordQuery>,
) -> Result<Json<PageList<MenuWithOperations>>, UpmsError> {
    let list = state
        .service
        .find_with_action_list(query.keyword.as_deref())
        .await?;
    Ok(Json(list))
}

/// GET /menus/exists
pub async fn menu_exists(
    State(state): State<AppState>,
    Query(query): Query<ExistsQuery>,
) -> Result<Json<ExistsResponse>, UpmsError> {
    let exists = state.service.is_exist(&query.menu_code).await?;
    Ok(Json(ExistsResponse {
        menu_code: query.menu_code,
        exists,
    }))
}

/// GET /menus/{menu_id}
pub async fn get_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
) -> Result<Json<MenuResource>, UpmsError> {
    state
        .service
        .get_menu(menu_id)
        .await?
        .map(Json)
        .ok_or_else(|| MenuError::NotFound { menu_id }.into())
}

/// POST /menus
pub async fn create_menu(
    State(state): State<AppState>,
    Json(payload): Json<NewMenu>,
) -> Result<Response, UpmsError> {
    let created = state.service.add_menu_with_report(payload).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /menus/{menu_id}
///
/// The id in the path wins over any id in the body.
pub async fn update_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
    Json(mut payload): Json<MenuPatch>,
) -> Result<StatusCode, UpmsError> {
    payload.menu_id = menu_id;
    state.service.update_menu(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /menus/{menu_id}/status
pub async fn update_menu_status(
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<StatusCode, UpmsError> {
    state
        .service
        .update_status(menu_id, payload.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /menus/{menu_id}
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
) -> Result<StatusCode, UpmsError> {
    state.service.remove_menu(menu_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
