//! Menu resource types
//!
//! A menu resource is a navigable entry of the admin console. Storage assigns
//! `menu_id`; `menu_code` is the unique business key.

use crate::core::operation::MenuOperation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parent id used for root menus
pub const ROOT_PARENT_ID: i64 = 0;

/// Enabled/disabled flag shared by menus, operations and authorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Enabled,
    Disabled,
}

impl ResourceStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ResourceStatus::Enabled)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceStatus::Enabled => write!(f, "enabled"),
            ResourceStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// A stored menu resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuResource {
    pub menu_id: i64,
    pub menu_code: String,
    pub menu_name: String,

    /// `0` for root menus
    pub parent_id: i64,

    /// Ordering among siblings
    pub priority: i32,

    pub status: ResourceStatus,

    /// System-seeded menus are flagged persistent and cannot be removed
    pub is_persist: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_desc: Option<String>,

    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl MenuResource {
    /// Apply the fields present on `patch`, leaving the others untouched
    pub fn apply(&mut self, patch: &MenuPatch) {
        if let Some(code) = &patch.menu_code {
            self.menu_code = code.clone();
        }
        if let Some(name) = &patch.menu_name {
            self.menu_name = name.clone();
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(is_persist) = patch.is_persist {
            self.is_persist = is_persist;
        }
        if let Some(icon) = &patch.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(path) = &patch.path {
            self.path = Some(path.clone());
        }
        if let Some(target) = &patch.target {
            self.target = Some(target.clone());
        }
        if let Some(desc) = &patch.menu_desc {
            self.menu_desc = Some(desc.clone());
        }
        if let Some(update_time) = patch.update_time {
            self.update_time = update_time;
        }
    }
}

/// Caller input for creating a menu
///
/// Every optional field falls back to its creation default when absent:
/// root parent, priority `0`, enabled, not persistent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMenu {
    pub menu_code: String,
    pub menu_name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<ResourceStatus>,
    #[serde(default)]
    pub is_persist: Option<bool>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub menu_desc: Option<String>,
}

impl NewMenu {
    pub fn new(menu_code: impl Into<String>, menu_name: impl Into<String>) -> Self {
        Self {
            menu_code: menu_code.into(),
            menu_name: menu_name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn persistent(mut self) -> Self {
        self.is_persist = Some(true);
        self
    }
}

/// Fully normalized row handed to [`MenuRepository::insert_selective`]
///
/// [`MenuRepository::insert_selective`]: crate::core::service::MenuRepository::insert_selective
#[derive(Debug, Clone, PartialEq)]
pub struct InsertMenu {
    pub menu_code: String,
    pub menu_name: String,
    pub parent_id: i64,
    pub priority: i32,
    pub status: ResourceStatus,
    pub is_persist: bool,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub target: Option<String>,
    pub menu_desc: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl InsertMenu {
    /// Normalize caller input, stamping both timestamps with `now`
    pub fn from_new(menu: NewMenu, now: DateTime<Utc>) -> Self {
        Self {
            menu_code: menu.menu_code,
            menu_name: menu.menu_name,
            parent_id: menu.parent_id.unwrap_or(ROOT_PARENT_ID),
            priority: menu.priority.unwrap_or(0),
            status: menu.status.unwrap_or(ResourceStatus::Enabled),
            is_persist: menu.is_persist.unwrap_or(false),
            icon: menu.icon,
            path: menu.path,
            target: menu.target,
            menu_desc: menu.menu_desc,
            create_time: now,
            update_time: now,
        }
    }

    pub fn into_resource(self, menu_id: i64) -> MenuResource {
        MenuResource {
            menu_id,
            menu_code: self.menu_code,
            menu_name: self.menu_name,
            parent_id: self.parent_id,
            priority: self.priority,
            status: self.status,
            is_persist: self.is_persist,
            icon: self.icon,
            path: self.path,
            target: self.target,
            menu_desc: self.menu_desc,
            create_time: self.create_time,
            update_time: self.update_time,
        }
    }
}

/// Sparse update keyed by `menu_id`
///
/// `None` means "leave the stored value alone"; only `Some` fields are
/// written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuPatch {
    #[serde(default)]
    pub menu_id: i64,
    #[serde(default)]
    pub menu_code: Option<String>,
    #[serde(default)]
    pub menu_name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<ResourceStatus>,
    #[serde(default)]
    pub is_persist: Option<bool>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub menu_desc: Option<String>,

    /// Stamped by the service
    #[serde(skip)]
    pub update_time: Option<DateTime<Utc>>,
}

impl MenuPatch {
    pub fn new(menu_id: i64) -> Self {
        Self {
            menu_id,
            ..Default::default()
        }
    }

    pub fn menu_code(mut self, code: impl Into<String>) -> Self {
        self.menu_code = Some(code.into());
        self
    }

    pub fn menu_name(mut self, name: impl Into<String>) -> Self {
        self.menu_name = Some(name.into());
        self
    }

    pub fn parent_id(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: ResourceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Menu joined with its operation records
#[derive(Debug, Clone, Serialize)]
pub struct MenuWithOperations {
    #[serde(flatten)]
    pub menu: MenuResource,
    pub operations: Vec<MenuOperation>,
}
