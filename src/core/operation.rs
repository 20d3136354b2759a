//! Default operations derived from a menu
//!
//! Every new menu gets four operations (browse, create, edit, remove) so
//! that roles can be granted fine-grained actions on it.

use crate::core::menu::ResourceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the four default actions attached to a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationAction {
    Browse,
    Create,
    Edit,
    Remove,
}

impl OperationAction {
    /// Creation order of the default operations
    pub const ALL: [OperationAction; 4] = [
        OperationAction::Browse,
        OperationAction::Create,
        OperationAction::Edit,
        OperationAction::Remove,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            OperationAction::Browse => "Browse",
            OperationAction::Create => "Create",
            OperationAction::Edit => "Edit",
            OperationAction::Remove => "Remove",
        }
    }

    /// Operation code derived from the owning menu
    ///
    /// `Create` is prefixed with the menu name as well as the code; existing
    /// permission data depends on that shape.
    pub fn operation_code(&self, menu_code: &str, menu_name: &str) -> String {
        match self {
            OperationAction::Create => format!("{}{}{}", menu_name, menu_code, self.suffix()),
            _ => format!("{}{}", menu_code, self.suffix()),
        }
    }
}

/// Localized labels used as operation names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationLabels {
    pub browse: String,
    pub create: String,
    pub edit: String,
    pub remove: String,
}

impl Default for OperationLabels {
    fn default() -> Self {
        Self {
            browse: "浏览".to_string(),
            create: "创建".to_string(),
            edit: "编辑".to_string(),
            remove: "删除".to_string(),
        }
    }
}

impl OperationLabels {
    pub fn label(&self, action: OperationAction) -> &str {
        match action {
            OperationAction::Browse => &self.browse,
            OperationAction::Create => &self.create,
            OperationAction::Edit => &self.edit,
            OperationAction::Remove => &self.remove,
        }
    }
}

/// Operation record submitted to the [`OperationService`]
///
/// [`OperationService`]: crate::core::service::OperationService
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOperation {
    pub menu_id: i64,
    pub operation_code: String,
    pub operation_name: String,
    pub operation_desc: String,
    pub is_persist: bool,
    pub status: ResourceStatus,
}

impl NewOperation {
    /// Build the default operation of `action` for a menu
    pub fn default_for(
        action: OperationAction,
        menu_id: i64,
        menu_code: &str,
        menu_name: &str,
        labels: &OperationLabels,
    ) -> Self {
        let label = labels.label(action);
        // the create operation carries the bare label as its description
        let operation_desc = match action {
            OperationAction::Create => label.to_string(),
            _ => format!("{}{}", menu_name, label),
        };

        Self {
            menu_id,
            operation_code: action.operation_code(menu_code, menu_name),
            operation_name: label.to_string(),
            operation_desc,
            is_persist: true,
            status: ResourceStatus::Enabled,
        }
    }
}

/// Build all four default operations for a menu, in creation order
pub fn default_operations(
    menu_id: i64,
    menu_code: &str,
    menu_name: &str,
    labels: &OperationLabels,
) -> Vec<(OperationAction, NewOperation)> {
    OperationAction::ALL
        .iter()
        .map(|action| {
            (
                *action,
                NewOperation::default_for(*action, menu_id, menu_code, menu_name, labels),
            )
        })
        .collect()
}

/// A stored operation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOperation {
    pub operation_id: i64,
    pub menu_id: i64,
    pub operation_code: String,
    pub operation_name: String,
    pub operation_desc: String,
    pub is_persist: bool,
    pub status: ResourceStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl MenuOperation {
    pub fn from_new(operation_id: i64, op: NewOperation, now: DateTime<Utc>) -> Self {
        Self {
            operation_id,
            menu_id: op.menu_id,
            operation_code: op.operation_code,
            operation_name: op.operation_name,
            operation_desc: op.operation_desc,
            is_persist: op.is_persist,
            status: op.status,
            create_time: now,
            update_time: now,
        }
    }
}

/// A default operation that could not be created
///
/// Collected by the service instead of failing the menu creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationWarning {
    pub action: OperationAction,
    pub operation_code: String,
    pub message: String,
}
