pub mod engine;
pub mod flat_rate;
pub mod percent_tier;
pub mod ticket;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::inclusive_day_span;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::types::{Advisory, RefundPolicyMode, TicketType};

pub use engine::RefundPolicyEngine;
pub use flat_rate::FlatRatePolicy;
pub use percent_tier::{PercentTierPolicy, RefundTier, TierBoundary};
pub use ticket::{Ticket, TicketInput, TicketInputBuilder};

/// measured consumption of a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// inclusive days between purchase and refund request
    pub used_days: i64,
    /// days for day tickets, hours for the time pass
    pub quantity: i64,
    /// granted days or hours
    pub granted: i64,
    /// quantity / granted * 100, not clamped
    pub percent_used: Decimal,
}

impl Usage {
    pub fn measure(input: &TicketInput) -> Self {
        let used_days = inclusive_day_span(input.purchase_date(), input.refund_request_date());
        let quantity = match input.ticket() {
            Ticket::TimePass { hours_used, .. } => i64::from(*hours_used),
            _ => used_days,
        };
        let granted = i64::from(input.ticket().entitlement());
        let percent_used = Decimal::from(quantity) * Decimal::from(100) / Decimal::from(granted);

        Self {
            used_days,
            quantity,
            granted,
            percent_used,
        }
    }

    /// unit suffix for the quantity
    pub fn unit(ticket_type: TicketType) -> &'static str {
        if ticket_type.is_day_based() {
            "일"
        } else {
            "시간"
        }
    }
}

/// output of a deduction policy before the penalty surcharge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub usage_description: String,
    pub deduction_amount: Money,
    pub deduction_description: String,
    /// never negative
    pub gross_refund: Money,
}

/// trait for refund deduction policies
pub trait DeductionPolicy {
    fn mode(&self) -> RefundPolicyMode;

    fn deduct(&self, input: &TicketInput, usage: &Usage) -> Deduction;
}

/// refund calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResult {
    pub branch: String,
    pub phone: String,
    pub ticket_type: TicketType,
    pub ticket_label: String,
    pub policy: RefundPolicyMode,
    pub purchase_date: NaiveDate,
    pub refund_request_date: NaiveDate,
    pub valid_period: String,
    pub paid_amount: Money,
    pub usage: Usage,
    pub usage_description: String,
    pub deduction_amount: Money,
    pub deduction_description: String,
    pub gross_refund: Money,
    pub penalty_rate: Rate,
    pub penalty_amount: Money,
    pub final_refund_amount: Money,
    pub advisories: Vec<Advisory>,
}

impl RefundResult {
    pub fn has_advisories(&self) -> bool {
        !self.advisories.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// compute a refund under the default counter configuration
pub fn compute_refund(input: &TicketInput) -> RefundResult {
    RefundPolicyEngine::default().compute_refund(input)
}
