use crate::config::PricingConfig;
use crate::decimal::Money;
use crate::refund::{Deduction, DeductionPolicy, Ticket, TicketInput, Usage};
use crate::types::RefundPolicyMode;

/// deducts literal usage times a unit rate from the paid amount
pub struct FlatRatePolicy {
    pub pricing: PricingConfig,
}

impl FlatRatePolicy {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// unit rate and receipt note for the ticket
    fn unit_rate(&self, ticket: &Ticket) -> (Money, Option<&'static str>) {
        match ticket {
            Ticket::PeriodPass { .. } => (self.pricing.period_pass_daily_rate, None),
            Ticket::TimePass { .. } => (self.pricing.time_pass_hourly_rate, None),
            // input validation guarantees a rate under this policy
            Ticket::NoblesseSeat { per_day_rate, .. } => (
                per_day_rate.unwrap_or(Money::ZERO),
                Some("노블레스석 1일 요금"),
            ),
        }
    }
}

impl DeductionPolicy for FlatRatePolicy {
    fn mode(&self) -> RefundPolicyMode {
        RefundPolicyMode::FlatRate
    }

    fn deduct(&self, input: &TicketInput, usage: &Usage) -> Deduction {
        let unit = Usage::unit(input.ticket_type());
        let (rate, note) = self.unit_rate(input.ticket());
        let deduction_amount = rate.times(usage.quantity);
        let gross_refund = (input.paid_amount() - deduction_amount).max(Money::ZERO);

        let mut deduction_description = format!("{}{} × {}", usage.quantity, unit, rate);
        if let Some(note) = note {
            deduction_description.push_str(&format!(" ({})", note));
        }

        Deduction {
            usage_description: format!("{}{} 사용", usage.quantity, unit),
            deduction_amount,
            deduction_description,
            gross_refund,
        }
    }
}
