//! Status presentation: label, icon, color and time estimate
//!
//! Pure lookups, one arm per status.

use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// Icon category shown next to a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    CheckCircle,
    ChefHat,
    Delivery,
    Utensils,
    Cancelled,
}

/// Badge color for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Yellow,
    Blue,
    Orange,
    Purple,
    Green,
    Red,
}

impl OrderStatus {
    /// 管理画面用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "受付中",
            Self::Confirmed => "確定",
            Self::Preparing => "調理中",
            Self::Ready => "提供準備完了",
            Self::Served => "提供済み",
            Self::Cancelled => "キャンセル",
        }
    }

    pub fn icon(&self) -> StatusIcon {
        match self {
            Self::Pending | Self::Confirmed => StatusIcon::CheckCircle,
            Self::Preparing => StatusIcon::ChefHat,
            Self::Ready => StatusIcon::Delivery,
            Self::Served => StatusIcon::Utensils,
            Self::Cancelled => StatusIcon::Cancelled,
        }
    }

    pub fn color(&self) -> StatusColor {
        match self {
            Self::Pending => StatusColor::Yellow,
            Self::Confirmed => StatusColor::Blue,
            Self::Preparing => StatusColor::Orange,
            Self::Ready => StatusColor::Purple,
            Self::Served => StatusColor::Green,
            Self::Cancelled => StatusColor::Red,
        }
    }

    /// Static wait-time hint shown to the customer
    ///
    /// Not derived from kitchen load. Empty for `Cancelled`.
    pub fn estimated_time_text(&self) -> &'static str {
        match self {
            Self::Pending => "ご注文を確認中です",
            Self::Confirmed => "5分以内に調理開始予定",
            Self::Preparing => "15-20分で完成予定",
            Self::Ready => "まもなくお席にお持ちします",
            Self::Served => "ごゆっくりお楽しみください",
            Self::Cancelled => "",
        }
    }
}
