//! Authority records linking resources to the permission system

use crate::core::menu::ResourceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource an authority protects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Menu,
    Operation,
    Api,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Menu => "menu",
            ResourceType::Operation => "operation",
            ResourceType::Api => "api",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ResourceType::Menu => "MENU_",
            ResourceType::Operation => "OPT_",
            ResourceType::Api => "API_",
        }
    }

    /// Authority string for a resource, e.g. `MENU_12`
    pub fn authority_for(&self, resource_id: i64) -> String {
        format!("{}{}", self.prefix(), resource_id)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access-control entry for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub authority_id: i64,
    pub authority: String,
    pub resource_id: i64,
    pub resource_type: ResourceType,

    /// Mirrors the status of the protected resource
    pub status: ResourceStatus,

    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

/// Grant of an authority to a subject (a role or a user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityGrant {
    pub authority_id: i64,

    /// Subject identifier, e.g. `role:admin`
    pub subject: String,
}
