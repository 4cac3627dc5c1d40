//! Shop customers and their account status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: CustomerStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Blocked,
}

/// Endpoint-named status changes for a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerAction {
    Activate,
    Deactivate,
    Block,
}

impl CustomerStatus {
    /// Actions the admin may take from this status.
    pub fn actions(self) -> &'static [CustomerAction] {
        match self {
            CustomerStatus::Active => &[CustomerAction::Deactivate, CustomerAction::Block],
            CustomerStatus::Inactive => &[CustomerAction::Activate, CustomerAction::Block],
            CustomerStatus::Blocked => &[CustomerAction::Activate],
        }
    }

    pub fn allows(self, action: CustomerAction) -> bool {
        self.actions().contains(&action)
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CustomerStatus::Active => "ACTIVE",
            CustomerStatus::Inactive => "INACTIVE",
            CustomerStatus::Blocked => "BLOCKED",
        })
    }
}

impl CustomerAction {
    /// Path segment under `/admin-shop/customers/{id}/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            CustomerAction::Activate => "activate",
            CustomerAction::Deactivate => "deactivate",
            CustomerAction::Block => "block",
        }
    }

    /// Status the account lands in after the action.
    pub fn resulting_status(self) -> CustomerStatus {
        match self {
            CustomerAction::Activate => CustomerStatus::Active,
            CustomerAction::Deactivate => CustomerStatus::Inactive,
            CustomerAction::Block => CustomerStatus::Blocked,
        }
    }
}
