use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::errors::CalcError;

/// Money type for korean won amounts (no minor unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    /// one trillion won, the largest amount the counter accepts
    pub const MAX: Money = Money(Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0));

    /// create from whole won
    pub fn from_won(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.normalize()))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// drop any fractional won
    pub fn floor_won(&self) -> Self {
        Money(self.0.floor())
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_whole_won(&self) -> bool {
        self.0.fract().is_zero()
    }

    /// accept only non-negative whole won up to `Money::MAX`
    pub fn checked_won(self, field: &'static str) -> Result<Self, CalcError> {
        if self.is_negative() || !self.is_whole_won() || self > Money::MAX {
            return Err(CalcError::InvalidAmount {
                field,
                amount: self,
            });
        }
        Ok(self)
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// apply a rate and truncate to whole won (e.g., 10% of 200,000)
    pub fn share(&self, rate: Rate) -> Self {
        Money(self.0.saturating_mul(rate.as_decimal())).floor_won()
    }

    /// amount multiplied by a usage quantity (days, hours)
    pub fn times(&self, quantity: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// grouped won rendering, e.g. `110,000원`
    pub fn to_won_string(&self) -> String {
        format!("{}원", group_thousands(self.0.floor()))
    }
}

/// render the integer part of a decimal with comma grouping
fn group_thousands(value: Decimal) -> String {
    let raw = value.trunc().abs().to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value.is_sign_negative() && !value.trunc().is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_won_string())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

/// rate type for shares of a paid amount and penalty surcharges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from percentage (e.g., 25 for 25%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        (self.0 * Decimal::from(100)).normalize()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}
