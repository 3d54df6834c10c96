use serde::Serialize;

use super::{OrderStatus, StatusIcon};

/// One row of the customer-facing progress timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    pub status: OrderStatus,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: StatusIcon,
    /// Reached or passed
    pub completed: bool,
    /// The order is at this step right now
    pub current: bool,
}

fn step_text(status: OrderStatus) -> (&'static str, &'static str) {
    match status {
        OrderStatus::Pending => ("注文受付", "ご注文を受け付けました"),
        OrderStatus::Confirmed => ("注文確定", "ご注文を確認しました"),
        OrderStatus::Preparing => ("調理中", "シェフが調理を開始しました"),
        OrderStatus::Ready => ("提供準備完了", "お料理の準備ができました"),
        OrderStatus::Served => ("提供完了", "お料理をお楽しみください"),
        OrderStatus::Cancelled => ("キャンセル", "ご注文はキャンセルされました"),
    }
}

/// Build the five happy-path steps for `current`
///
/// A step is completed when `current` is at or past it. A cancelled order
/// has no completed or current step.
pub fn status_timeline(current: OrderStatus) -> Vec<TimelineStep> {
    let current_index = current.step_index();
    OrderStatus::HAPPY_PATH
        .iter()
        .enumerate()
        .map(|(i, &status)| {
            let (label, description) = step_text(status);
            TimelineStep {
                status,
                label,
                description,
                icon: status.icon(),
                completed: current_index.is_some_and(|c| c >= i),
                current: status == current,
            }
        })
        .collect()
}
