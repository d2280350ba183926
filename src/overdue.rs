use chrono::DateTime;
use chrono_tz::Tz;
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{CalculatorConfig, OverdueConfig};
use crate::dates::{elapsed_minutes, now_in};
use crate::decimal::Money;
use crate::errors::Result;

/// a checkout that was never recorded, measured against "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutInput {
    pub checkout_instant: DateTime<Tz>,
    pub reference_now: DateTime<Tz>,
}

impl CheckoutInput {
    /// explicit reference instant (back-dated recovery, tests)
    pub fn new(checkout_instant: DateTime<Tz>, reference_now: DateTime<Tz>) -> Self {
        Self {
            checkout_instant,
            reference_now,
        }
    }

    /// reference instant taken from the time provider, in the checkout's timezone
    pub fn at_now(checkout_instant: DateTime<Tz>, time_provider: &SafeTimeProvider) -> Self {
        let reference_now = now_in(checkout_instant.timezone(), time_provider);
        Self::new(checkout_instant, reference_now)
    }
}

/// overdue checkout calculation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueResult {
    pub checkout_instant: DateTime<Tz>,
    pub reference_now: DateTime<Tz>,
    pub elapsed_minutes: i64,
    pub hours: i64,
    pub minutes: i64,
    pub overcharge: Money,
    pub billing_unit_minutes: i64,
    pub fee_per_unit: Money,
}

impl OverdueResult {
    /// e.g. `1시간 47분`
    pub fn duration_label(&self) -> String {
        format!("{}시간 {}분", self.hours, self.minutes)
    }

    /// e.g. `30분당 1,000원`
    pub fn tariff_label(&self) -> String {
        format!("{}분당 {}", self.billing_unit_minutes, self.fee_per_unit)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// per-unit overcharge for unprocessed checkouts
pub struct OverdueFeeCalculator {
    config: OverdueConfig,
}

impl OverdueFeeCalculator {
    pub fn new(config: &CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.overdue.clone(),
        })
    }

    pub fn compute(&self, input: &CheckoutInput) -> Result<OverdueResult> {
        if input.checkout_instant > input.reference_now {
            warn!(
                checkout = %input.checkout_instant,
                now = %input.reference_now,
                "checkout instant is in the future"
            );
        }
        let elapsed = elapsed_minutes(input.checkout_instant, input.reference_now)?;

        let units = elapsed / self.config.billing_unit_minutes;
        let overcharge = self.config.fee_per_unit.times(units);

        debug!(elapsed_minutes = elapsed, overcharge = %overcharge, "overdue computed");

        Ok(OverdueResult {
            checkout_instant: input.checkout_instant,
            reference_now: input.reference_now,
            elapsed_minutes: elapsed,
            hours: elapsed / 60,
            minutes: elapsed % 60,
            overcharge,
            billing_unit_minutes: self.config.billing_unit_minutes,
            fee_per_unit: self.config.fee_per_unit,
        })
    }
}

impl Default for OverdueFeeCalculator {
    fn default() -> Self {
        Self {
            config: OverdueConfig::default(),
        }
    }
}

/// compute the overdue fee under the default tariff
pub fn compute_overdue(input: &CheckoutInput) -> Result<OverdueResult> {
    OverdueFeeCalculator::default().compute(input)
}
