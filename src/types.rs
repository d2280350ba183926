use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Rate;

/// unique identifier for an issued receipt
pub type ReceiptId = Uuid;

/// ticket families sold at the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketType {
    /// fixed number of calendar days
    PeriodPass,
    /// bundle of hours valid for some weeks
    TimePass,
    /// reserved premium seat billed by the day
    NoblesseSeat,
}

impl TicketType {
    /// counter label used on receipts
    pub fn label(&self) -> &'static str {
        match self {
            TicketType::PeriodPass => "기간권",
            TicketType::TimePass => "시간권",
            TicketType::NoblesseSeat => "노블레스석",
        }
    }

    /// whether usage is measured in days (as opposed to hours)
    pub fn is_day_based(&self) -> bool {
        !matches!(self, TicketType::TimePass)
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// refund policy a branch operates under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefundPolicyMode {
    /// usage quantity times a unit rate
    FlatRate,
    /// step function of the share of entitlement consumed
    PercentTier,
}

impl RefundPolicyMode {
    pub fn label(&self) -> &'static str {
        match self {
            RefundPolicyMode::FlatRate => "일반",
            RefundPolicyMode::PercentTier => "% 규정",
        }
    }
}

/// early-cancellation surcharge levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PenaltyRate {
    #[default]
    None,
    TenPercent,
    TwentyPercent,
}

impl PenaltyRate {
    pub fn rate(&self) -> Rate {
        match self {
            PenaltyRate::None => Rate::ZERO,
            PenaltyRate::TenPercent => Rate::from_percentage(10),
            PenaltyRate::TwentyPercent => Rate::from_percentage(20),
        }
    }

    /// map a whole percentage onto a supported level
    pub fn from_percent(percent: u32) -> Option<Self> {
        match percent {
            0 => Some(PenaltyRate::None),
            10 => Some(PenaltyRate::TenPercent),
            20 => Some(PenaltyRate::TwentyPercent),
            _ => None,
        }
    }
}

/// non-fatal notes attached to an otherwise successful result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    /// refund requested more than the threshold days after purchase
    StaleRefundRequest { days_since_purchase: i64, threshold_days: i64 },
    /// usage went past the granted entitlement
    EntitlementExceeded { used: i64, granted: i64 },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::StaleRefundRequest { threshold_days, .. } => {
                format!("결제 후 {}일이 초과되어 환불이 제한될 수 있습니다.", threshold_days)
            }
            Advisory::EntitlementExceeded { used, granted } => {
                format!("부여된 이용량({})을 초과하여 사용했습니다. (사용 {})", granted, used)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_levels() {
        assert_eq!(PenaltyRate::from_percent(10), Some(PenaltyRate::TenPercent));
        assert_eq!(PenaltyRate::from_percent(15), None);
        assert_eq!(PenaltyRate::TwentyPercent.rate(), Rate::from_percentage(20));
        assert_eq!(PenaltyRate::default().rate(), Rate::ZERO);
    }

    #[test]
    fn test_ticket_labels() {
        assert_eq!(TicketType::NoblesseSeat.to_string(), "노블레스석");
        assert!(TicketType::PeriodPass.is_day_based());
        assert!(!TicketType::TimePass.is_day_based());
    }

    #[test]
    fn test_stale_advisory_message() {
        let advisory = Advisory::StaleRefundRequest {
            days_since_purchase: 41,
            threshold_days: 30,
        };
        assert_eq!(advisory.message(), "결제 후 30일이 초과되어 환불이 제한될 수 있습니다.");
    }
}
