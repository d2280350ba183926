use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::PricingOverrides;
use crate::dates::DATE_FORMAT;
use crate::decimal::Money;
use crate::errors::{CalcError, Result};
use crate::types::{PenaltyRate, RefundPolicyMode, TicketType};

/// ticket entitlement, one variant per ticket family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ticket {
    PeriodPass {
        total_days: u32,
    },
    TimePass {
        total_hours: u32,
        hours_used: u32,
        valid_weeks: u32,
    },
    NoblesseSeat {
        total_days: u32,
        /// required under the flat-rate policy
        per_day_rate: Option<Money>,
    },
}

impl Ticket {
    pub fn ticket_type(&self) -> TicketType {
        match self {
            Ticket::PeriodPass { .. } => TicketType::PeriodPass,
            Ticket::TimePass { .. } => TicketType::TimePass,
            Ticket::NoblesseSeat { .. } => TicketType::NoblesseSeat,
        }
    }

    /// granted days or hours
    pub fn entitlement(&self) -> u32 {
        match self {
            Ticket::PeriodPass { total_days } | Ticket::NoblesseSeat { total_days, .. } => {
                *total_days
            }
            Ticket::TimePass { total_hours, .. } => *total_hours,
        }
    }

    /// e.g. `기간권 (30일)` or `시간권 (50시간)`
    pub fn formatted_label(&self) -> String {
        match self {
            Ticket::TimePass { total_hours, .. } => {
                format!("{} ({}시간)", self.ticket_type().label(), total_hours)
            }
            _ => format!("{} ({}일)", self.ticket_type().label(), self.entitlement()),
        }
    }

    /// last day of validity
    pub fn valid_until(&self, purchase_date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Ticket::TimePass { valid_weeks, .. } => {
                purchase_date.checked_add_days(Days::new(u64::from(*valid_weeks) * 7))
            }
            _ => {
                let span = u64::from(self.entitlement()).saturating_sub(1);
                purchase_date.checked_add_days(Days::new(span))
            }
        }
    }
}

/// validated facts of one refund request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketInput {
    branch: String,
    phone: String,
    ticket: Ticket,
    policy: RefundPolicyMode,
    paid_amount: Money,
    purchase_date: NaiveDate,
    refund_request_date: NaiveDate,
    penalty: PenaltyRate,
}

impl TicketInput {
    pub fn builder() -> TicketInputBuilder {
        TicketInputBuilder::new()
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn ticket_type(&self) -> TicketType {
        self.ticket.ticket_type()
    }

    pub fn policy(&self) -> RefundPolicyMode {
        self.policy
    }

    pub fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    pub fn refund_request_date(&self) -> NaiveDate {
        self.refund_request_date
    }

    pub fn penalty(&self) -> PenaltyRate {
        self.penalty
    }

    /// `YYYY-MM-DD ~ YYYY-MM-DD`
    pub fn valid_period(&self) -> String {
        match self.ticket.valid_until(self.purchase_date) {
            Some(end) => format!(
                "{} ~ {}",
                self.purchase_date.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
            None => "정보 없음".to_string(),
        }
    }
}

/// builder performing construction-time validation
#[derive(Debug, Default)]
pub struct TicketInputBuilder {
    branch: Option<String>,
    phone: Option<String>,
    ticket: Option<Ticket>,
    policy: Option<RefundPolicyMode>,
    paid_amount: Option<Money>,
    purchase_date: Option<NaiveDate>,
    refund_request_date: Option<NaiveDate>,
    penalty: PenaltyRate,
    overrides: Option<PricingOverrides>,
}

impl TicketInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn ticket(mut self, ticket: Ticket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    pub fn period_pass(self, total_days: u32) -> Self {
        self.ticket(Ticket::PeriodPass { total_days })
    }

    pub fn time_pass(self, total_hours: u32, hours_used: u32, valid_weeks: u32) -> Self {
        self.ticket(Ticket::TimePass {
            total_hours,
            hours_used,
            valid_weeks,
        })
    }

    pub fn noblesse_seat(self, total_days: u32, per_day_rate: Option<Money>) -> Self {
        self.ticket(Ticket::NoblesseSeat {
            total_days,
            per_day_rate,
        })
    }

    pub fn policy(mut self, policy: RefundPolicyMode) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn paid_amount(mut self, amount: Money) -> Self {
        self.paid_amount = Some(amount);
        self
    }

    pub fn purchase_date(mut self, date: NaiveDate) -> Self {
        self.purchase_date = Some(date);
        self
    }

    pub fn refund_request_date(mut self, date: NaiveDate) -> Self {
        self.refund_request_date = Some(date);
        self
    }

    pub fn penalty(mut self, penalty: PenaltyRate) -> Self {
        self.penalty = penalty;
        self
    }

    /// branch pricing used to prefill a missing noblesse per-day rate
    pub fn pricing_overrides(mut self, overrides: &PricingOverrides) -> Self {
        self.overrides = Some(overrides.clone());
        self
    }

    pub fn build(self) -> Result<TicketInput> {
        let mut ticket = self.ticket.ok_or(CalcError::MissingField { field: "ticket_type" })?;
        let policy = self.policy.ok_or(CalcError::MissingField { field: "policy" })?;
        let paid_amount = self
            .paid_amount
            .ok_or(CalcError::MissingField { field: "paid_amount" })?
            .checked_won("paid_amount")?;
        let purchase_date = self
            .purchase_date
            .ok_or(CalcError::MissingField { field: "purchase_date" })?;
        let refund_request_date = self
            .refund_request_date
            .ok_or(CalcError::MissingField { field: "refund_request_date" })?;

        if refund_request_date < purchase_date {
            return Err(CalcError::validation(format!(
                "refund request date {} precedes purchase date {}",
                refund_request_date.format(DATE_FORMAT),
                purchase_date.format(DATE_FORMAT)
            )));
        }

        if let Ticket::NoblesseSeat { per_day_rate, .. } = &mut ticket {
            if per_day_rate.is_none() {
                *per_day_rate = self.overrides.as_ref().and_then(|o| o.noblesse_daily_rate);
            }
        }

        validate_ticket(&ticket, policy)?;

        if ticket.valid_until(purchase_date).is_none() {
            return Err(CalcError::validation("validity period exceeds the supported calendar"));
        }

        Ok(TicketInput {
            branch: self.branch.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            ticket,
            policy,
            paid_amount,
            purchase_date,
            refund_request_date,
            penalty: self.penalty,
        })
    }
}

fn validate_ticket(ticket: &Ticket, policy: RefundPolicyMode) -> Result<()> {
    match ticket {
        Ticket::PeriodPass { total_days } => require_positive("total_days", *total_days),
        Ticket::TimePass {
            total_hours,
            valid_weeks,
            ..
        } => {
            require_positive("total_hours", *total_hours)?;
            require_positive("valid_weeks", *valid_weeks)
        }
        Ticket::NoblesseSeat {
            total_days,
            per_day_rate,
        } => {
            require_positive("total_days", *total_days)?;
            match (policy, per_day_rate) {
                (RefundPolicyMode::FlatRate, None) => {
                    Err(CalcError::MissingField { field: "per_day_rate" })
                }
                (_, Some(rate)) => rate.checked_won("per_day_rate").map(|_| ()),
                (RefundPolicyMode::PercentTier, None) => Ok(()),
            }
        }
    }
}

fn require_positive(field: &'static str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(CalcError::validation(format!("{} must be at least 1", field)));
    }
    Ok(())
}
