use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RefundTierConfig;
use crate::decimal::Rate;
use crate::errors::Result;
use crate::refund::{Deduction, DeductionPolicy, TicketInput, Usage};
use crate::types::RefundPolicyMode;

/// how a usage percentage equal to a tier bound is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TierBoundary {
    /// `percent < bound` stays in the tier, the bound itself moves up
    #[default]
    Exclusive,
    /// `percent <= bound` stays in the tier
    Inclusive,
}

impl TierBoundary {
    fn within(&self, percent: Decimal, upper: Decimal) -> bool {
        match self {
            TierBoundary::Exclusive => percent < upper,
            TierBoundary::Inclusive => percent <= upper,
        }
    }
}

/// one step of the refund table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundTier {
    /// upper usage bound in percent, `None` for the catch-all tier
    pub upper_percent: Option<Decimal>,
    /// share of the paid amount returned
    pub refund_share: Rate,
}

impl RefundTier {
    pub fn bounded(upper_percent: Decimal, refund_share: Rate) -> Self {
        Self {
            upper_percent: Some(upper_percent),
            refund_share,
        }
    }

    pub fn unbounded(refund_share: Rate) -> Self {
        Self {
            upper_percent: None,
            refund_share,
        }
    }
}

/// tier selected for a usage percentage
#[derive(Debug, Clone, PartialEq)]
pub struct TierMatch<'a> {
    pub index: usize,
    pub tier: &'a RefundTier,
    pub lower_percent: Option<Decimal>,
}

/// deducts a share of the paid amount by percentage of entitlement used
pub struct PercentTierPolicy {
    table: RefundTierConfig,
}

impl PercentTierPolicy {
    pub fn new(table: RefundTierConfig) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    /// policy over the built-in counter table
    pub(crate) fn with_default_table() -> Self {
        Self {
            table: RefundTierConfig::default(),
        }
    }

    pub fn boundary(&self) -> TierBoundary {
        self.table.boundary
    }

    /// locate the tier for a usage percentage
    ///
    /// The table is validated to end with an unbounded tier, so every
    /// non-negative percentage (including values above 100) matches.
    pub fn select(&self, percent_used: Decimal) -> TierMatch<'_> {
        let mut lower = None;
        for (index, tier) in self.table.tiers.iter().enumerate() {
            match tier.upper_percent {
                Some(upper) if !self.table.boundary.within(percent_used, upper) => {
                    lower = Some(upper);
                }
                _ => {
                    return TierMatch {
                        index,
                        tier,
                        lower_percent: lower,
                    }
                }
            }
        }

        // unreachable with a validated table, fall back to the last tier
        let index = self.table.tiers.len().saturating_sub(1);
        TierMatch {
            index,
            tier: &self.table.tiers[index],
            lower_percent: lower,
        }
    }

    /// range wording, e.g. `25% 이상 50% 미만 사용`
    fn range_label(&self, matched: &TierMatch<'_>) -> String {
        let (above, below, above_only) = match self.table.boundary {
            TierBoundary::Exclusive => ("이상", "미만", "이상"),
            TierBoundary::Inclusive => ("초과", "이하", "초과"),
        };
        match (matched.lower_percent, matched.tier.upper_percent) {
            (None, Some(upper)) => format!("{}% {} 사용", upper, below),
            (Some(lower), Some(upper)) => {
                format!("{}% {} {}% {} 사용", lower, above, upper, below)
            }
            (Some(lower), None) => format!("{}% {} 사용", lower, above_only),
            (None, None) => "전 구간".to_string(),
        }
    }
}

impl DeductionPolicy for PercentTierPolicy {
    fn mode(&self) -> RefundPolicyMode {
        RefundPolicyMode::PercentTier
    }

    fn deduct(&self, input: &TicketInput, usage: &Usage) -> Deduction {
        let matched = self.select(usage.percent_used);
        let paid = input.paid_amount();
        let gross_refund = paid.share(matched.tier.refund_share);
        let deduction_amount = paid - gross_refund;

        let outcome = if matched.tier.refund_share.as_decimal().is_zero() {
            "환불 불가".to_string()
        } else {
            format!("결제금액의 {} 환불", matched.tier.refund_share)
        };
        let unit = Usage::unit(input.ticket_type());

        Deduction {
            usage_description: format!(
                "{:.1}% 사용 (총 {}{} 중 {}{})",
                usage.percent_used, usage.granted, unit, usage.quantity, unit
            ),
            deduction_amount,
            deduction_description: format!("{} : {}", self.range_label(&matched), outcome),
            gross_refund,
        }
    }
}
