use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Table status (canonical three-state set)
///
/// The admin table form once used `reserved` and `maintenance`; those are
/// accepted on input and folded into `occupied` and `cleaning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableStatus {
    #[default]
    Available,
    #[serde(alias = "reserved")]
    Occupied,
    #[serde(alias = "maintenance")]
    Cleaning,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Cleaning => "cleaning",
        }
    }

    pub fn from_legacy(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "occupied" | "reserved" => Some(Self::Occupied),
            "cleaning" | "maintenance" => Some(Self::Cleaning),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "空席",
            Self::Occupied => "使用中",
            Self::Cleaning => "清掃中",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_legacy(s)
            .ok_or_else(|| AppError::validation(format!("Unknown table status: {}", s)))
    }
}
