//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an issue (a stock withdrawal to a department).
///
/// An issue is `Open` while line items are still being edited and becomes
/// `Completed` once submitted, at which point the backend durably decrements
/// product stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    Completed,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid issue status: {s}")),
        }
    }
}
