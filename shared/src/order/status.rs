use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Order status (canonical six-state set)
///
/// The legacy dashboard value `completed` is accepted on input and maps to
/// [`OrderStatus::Served`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    #[serde(alias = "completed")]
    Served,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Cancelled,
    ];

    /// Happy path in lifecycle order
    pub const HAPPY_PATH: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status string from either status vocabulary
    ///
    /// `completed` (five-state dashboard set) maps to `Served`.
    pub fn from_legacy(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "preparing" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "served" | "completed" => Some(Self::Served),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Served | Self::Cancelled)
    }

    /// Position on the happy path, `None` for `Cancelled`
    pub fn step_index(&self) -> Option<usize> {
        Self::HAPPY_PATH.iter().position(|s| s == self)
    }

    /// Next status on the happy path
    pub fn next(&self) -> Option<Self> {
        let idx = self.step_index()?;
        Self::HAPPY_PATH.get(idx + 1).copied()
    }

    /// Transition table
    ///
    /// Same-state is not a transition; callers treat it as a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next || self.is_terminal() {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        match (self.step_index(), next.step_index()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }

    /// Every status reachable in one move from this one
    pub fn allowed_transitions(&self) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| self.can_transition_to(*s))
            .collect()
    }

    /// Validate a move, returning the target status
    ///
    /// Re-applying the current status succeeds.
    pub fn transition_to(self, next: OrderStatus) -> AppResult<OrderStatus> {
        if self == next || self.can_transition_to(next) {
            return Ok(next);
        }
        Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot move order from {} to {}", self, next),
        )
        .with_detail("from", self.as_str())
        .with_detail("to", next.as_str()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_legacy(s)
            .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_moves_allowed() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Served));
        // staff often skip confirmation
        assert!(Pending.can_transition_to(Preparing));
    }

    #[test]
    fn test_backward_and_terminal_rejected() {
        assert!(!Served.can_transition_to(Pending));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Served.can_transition_to(Cancelled));
        assert!(Served.allowed_transitions().is_empty());
        assert!(Cancelled.allowed_transitions().is_empty());
    }

    #[test]
    fn test_cancel_from_non_terminal() {
        for s in [Pending, Confirmed, Preparing, Ready] {
            assert!(s.can_transition_to(Cancelled), "{s} should be cancellable");
        }
    }

    #[test]
    fn test_transition_to_errors() {
        let err = Served.transition_to(Pending).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(Preparing.transition_to(Ready).unwrap(), Ready);
        assert_eq!(Ready.transition_to(Ready).unwrap(), Ready);
    }

    #[test]
    fn test_allowed_transitions_from_pending() {
        assert_eq!(
            Pending.allowed_transitions(),
            vec![Confirmed, Preparing, Ready, Served, Cancelled]
        );
    }

    #[test]
    fn test_next() {
        assert_eq!(Pending.next(), Some(Confirmed));
        assert_eq!(Ready.next(), Some(Served));
        assert_eq!(Served.next(), None);
        assert_eq!(Cancelled.next(), None);
    }

    #[test]
    fn test_legacy_mapping() {
        assert_eq!(OrderStatus::from_legacy("completed"), Some(Served));
        assert_eq!(OrderStatus::from_legacy("Preparing"), Some(Preparing));
        assert_eq!(OrderStatus::from_legacy("done"), None);
        assert!("bogus".parse::<OrderStatus>().is_err());

        let s: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(s, Served);
        assert_eq!(serde_json::to_string(&Served).unwrap(), "\"served\"");
    }
}
