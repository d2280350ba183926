use chrono_tz::Tz;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::refund::{RefundTier, TierBoundary};

/// calculator configuration shared by every counter tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// printed in the receipt title
    pub business_name: String,
    /// civil timezone for every "now" and checkout instant
    pub timezone: Tz,
    pub pricing: PricingConfig,
    pub refund_tiers: RefundTierConfig,
    pub overdue: OverdueConfig,
    pub advisory: AdvisoryConfig,
}

/// unit rates used by the flat-rate refund policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub period_pass_daily_rate: Money,
    pub time_pass_hourly_rate: Money,
}

/// per-branch replacements for the default rates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingOverrides {
    #[serde(default)]
    pub period_pass_daily_rate: Option<Money>,
    #[serde(default)]
    pub time_pass_hourly_rate: Option<Money>,
    #[serde(default)]
    pub noblesse_daily_rate: Option<Money>,
}

/// percentage-tier table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundTierConfig {
    pub boundary: TierBoundary,
    /// ordered by upper bound, last tier unbounded
    pub tiers: Vec<RefundTier>,
}

/// overdue checkout billing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverdueConfig {
    pub billing_unit_minutes: i64,
    pub fee_per_unit: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// refund requests older than this many days get flagged
    pub stale_after_days: i64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            business_name: "멘토즈 스터디카페".to_string(),
            timezone: chrono_tz::Asia::Seoul,
            pricing: PricingConfig::default(),
            refund_tiers: RefundTierConfig::default(),
            overdue: OverdueConfig::default(),
            advisory: AdvisoryConfig { stale_after_days: 30 },
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            period_pass_daily_rate: Money::from_won(11_000),
            time_pass_hourly_rate: Money::from_won(2_000),
        }
    }
}

impl Default for RefundTierConfig {
    fn default() -> Self {
        Self {
            boundary: TierBoundary::Exclusive,
            tiers: vec![
                RefundTier::bounded(dec!(25), Rate::from_percentage(50)),
                RefundTier::bounded(dec!(50), Rate::from_percentage(25)),
                RefundTier::unbounded(Rate::ZERO),
            ],
        }
    }
}

impl Default for OverdueConfig {
    fn default() -> Self {
        Self {
            billing_unit_minutes: 30,
            fee_per_unit: Money::from_won(1_000),
        }
    }
}

impl CalculatorConfig {
    /// parse and validate a json configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CalculatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// same configuration with the inclusive (`<=`) tier convention
    pub fn with_tier_boundary(mut self, boundary: TierBoundary) -> Self {
        self.refund_tiers.boundary = boundary;
        self
    }

    /// apply branch pricing overrides on top of the defaults
    pub fn with_overrides(mut self, overrides: &PricingOverrides) -> Self {
        if let Some(rate) = overrides.period_pass_daily_rate {
            self.pricing.period_pass_daily_rate = rate;
        }
        if let Some(rate) = overrides.time_pass_hourly_rate {
            self.pricing.time_pass_hourly_rate = rate;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.business_name.trim().is_empty() {
            return Err(invalid("business name must not be empty"));
        }
        for (field, amount) in [
            ("period_pass_daily_rate", self.pricing.period_pass_daily_rate),
            ("time_pass_hourly_rate", self.pricing.time_pass_hourly_rate),
            ("fee_per_unit", self.overdue.fee_per_unit),
        ] {
            if amount.checked_won(field).is_err() {
                return Err(invalid(&format!(
                    "{} must be whole won between 0 and {}, got {}",
                    field,
                    Money::MAX,
                    amount.as_decimal()
                )));
            }
        }
        if self.overdue.billing_unit_minutes <= 0 {
            return Err(invalid("overdue billing unit must be positive"));
        }
        if self.advisory.stale_after_days < 0 {
            return Err(invalid("advisory threshold must not be negative"));
        }
        self.refund_tiers.validate()
    }
}

impl RefundTierConfig {
    /// tiers must ascend and end with an unbounded catch-all
    pub fn validate(&self) -> Result<()> {
        let tiers = &self.tiers;
        let (last, bounded) = tiers
            .split_last()
            .ok_or_else(|| invalid("refund tier table is empty"))?;

        if last.upper_percent.is_some() {
            return Err(invalid("last refund tier must be unbounded"));
        }

        let mut previous = None;
        for tier in bounded {
            let upper = tier
                .upper_percent
                .ok_or_else(|| invalid("only the last refund tier may be unbounded"))?;
            if upper <= rust_decimal::Decimal::ZERO {
                return Err(invalid("tier bounds must be positive"));
            }
            if let Some(prev) = previous {
                if upper <= prev {
                    return Err(invalid("tier bounds must be strictly ascending"));
                }
            }
            previous = Some(upper);
        }

        for tier in tiers {
            if tier.refund_share < Rate::ZERO || tier.refund_share > Rate::ONE {
                return Err(invalid("refund share must be between 0% and 100%"));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> CalcError {
    CalcError::InvalidConfiguration {
        message: message.to_string(),
    }
}
