use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{AdvisoryConfig, CalculatorConfig};
use crate::dates::days_between;
use crate::decimal::Money;
use crate::errors::Result;
use crate::refund::{
    Deduction, DeductionPolicy, FlatRatePolicy, PercentTierPolicy, RefundResult, TicketInput,
    Usage,
};
use crate::types::{Advisory, RefundPolicyMode};

/// engine computing ticket refunds
pub struct RefundPolicyEngine {
    flat_rate: FlatRatePolicy,
    percent_tier: PercentTierPolicy,
    advisory: AdvisoryConfig,
}

impl RefundPolicyEngine {
    pub fn new(config: &CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            flat_rate: FlatRatePolicy::new(config.pricing.clone()),
            percent_tier: PercentTierPolicy::new(config.refund_tiers.clone())?,
            advisory: config.advisory.clone(),
        })
    }

    fn policy(&self, mode: RefundPolicyMode) -> &dyn DeductionPolicy {
        match mode {
            RefundPolicyMode::FlatRate => &self.flat_rate,
            RefundPolicyMode::PercentTier => &self.percent_tier,
        }
    }

    /// compute the refund for a validated request
    pub fn compute_refund(&self, input: &TicketInput) -> RefundResult {
        let usage = Usage::measure(input);
        let policy = self.policy(input.policy());
        let Deduction {
            usage_description,
            deduction_amount,
            deduction_description,
            gross_refund,
        } = policy.deduct(input, &usage);

        let penalty_rate = input.penalty().rate();
        let penalty_amount = input.paid_amount().share(penalty_rate);
        let final_refund_amount = (gross_refund - penalty_amount).max(Money::ZERO);

        let advisories = self.advisories(input, &usage);
        for advisory in &advisories {
            warn!(branch = input.branch(), ?advisory, "refund advisory raised");
        }

        debug!(
            branch = input.branch(),
            ticket = ?input.ticket_type(),
            policy = ?policy.mode(),
            paid = %input.paid_amount(),
            deduction = %deduction_amount,
            penalty = %penalty_amount,
            refund = %final_refund_amount,
            "refund computed"
        );

        RefundResult {
            branch: input.branch().to_string(),
            phone: input.phone().to_string(),
            ticket_type: input.ticket_type(),
            ticket_label: input.ticket().formatted_label(),
            policy: input.policy(),
            purchase_date: input.purchase_date(),
            refund_request_date: input.refund_request_date(),
            valid_period: input.valid_period(),
            paid_amount: input.paid_amount(),
            usage,
            usage_description,
            deduction_amount,
            deduction_description,
            gross_refund,
            penalty_rate,
            penalty_amount,
            final_refund_amount,
            advisories,
        }
    }

    fn advisories(&self, input: &TicketInput, usage: &Usage) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        let days_since_purchase = days_between(input.purchase_date(), input.refund_request_date());
        if days_since_purchase > self.advisory.stale_after_days {
            advisories.push(Advisory::StaleRefundRequest {
                days_since_purchase,
                threshold_days: self.advisory.stale_after_days,
            });
        }

        if usage.percent_used > Decimal::from(100) {
            advisories.push(Advisory::EntitlementExceeded {
                used: usage.quantity,
                granted: usage.granted,
            });
        }

        advisories
    }
}

impl Default for RefundPolicyEngine {
    fn default() -> Self {
        let config = CalculatorConfig::default();
        Self {
            flat_rate: FlatRatePolicy::new(config.pricing),
            percent_tier: PercentTierPolicy::with_default_table(),
            advisory: config.advisory,
        }
    }
}
