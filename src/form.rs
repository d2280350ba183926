use chrono::DateTime;
use chrono_tz::Tz;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::branch::BranchProfile;
use crate::config::PricingOverrides;
use crate::dates::{local_instant, now_in, parse_compact_date, parse_compact_time};
use crate::decimal::Money;
use crate::errors::{CalcError, Result};
use crate::overdue::CheckoutInput;
use crate::refund::{Ticket, TicketInput};
use crate::types::{PenaltyRate, RefundPolicyMode, TicketType};

/// refund calculator form as submitted by the counter UI
///
/// Everything arrives as free text. Blank optional fields count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefundForm {
    pub branch: String,
    pub phone: String,
    /// `기간권` / `시간권` / `노블레스석` or the english variant name
    pub ticket_type: String,
    /// `일반` or `%`, blank falls back to the branch policy
    pub policy: String,
    pub purchase_date: String,
    pub refund_date: String,
    pub paid_amount: String,
    /// period pass and noblesse seat
    pub days_given: String,
    /// time pass
    pub total_hours: String,
    pub hours_used: String,
    pub valid_weeks: String,
    /// noblesse seat under the flat-rate policy
    pub per_day_rate: String,
    /// `0`, `10` or `20`, optionally with `%`
    pub penalty_percent: String,
}

impl RefundForm {
    pub fn into_input(self) -> Result<TicketInput> {
        self.coerce(&PricingOverrides::default(), None, "")
    }

    /// coerce with branch defaults for blank branch name, policy and noblesse rate
    pub fn into_input_with(self, branch: &BranchProfile) -> Result<TicketInput> {
        self.coerce(&branch.pricing, branch.refund_policy, &branch.name)
    }

    fn coerce(
        self,
        overrides: &PricingOverrides,
        fallback_policy: Option<RefundPolicyMode>,
        fallback_branch: &str,
    ) -> Result<TicketInput> {
        let ticket_type = parse_ticket_type(required("ticket_type", &self.ticket_type)?)?;
        let ticket = match ticket_type {
            TicketType::PeriodPass => Ticket::PeriodPass {
                total_days: parse_count("days_given", &self.days_given)?,
            },
            TicketType::TimePass => Ticket::TimePass {
                total_hours: parse_count("total_hours", &self.total_hours)?,
                hours_used: parse_count("hours_used", &self.hours_used)?,
                valid_weeks: parse_count("valid_weeks", &self.valid_weeks)?,
            },
            TicketType::NoblesseSeat => Ticket::NoblesseSeat {
                total_days: parse_count("days_given", &self.days_given)?,
                per_day_rate: optional(&self.per_day_rate)
                    .map(|raw| parse_amount("per_day_rate", raw))
                    .transpose()?,
            },
        };

        let penalty = match optional(&self.penalty_percent) {
            Some(raw) => parse_penalty(raw)?,
            None => PenaltyRate::None,
        };
        let policy = match optional(&self.policy) {
            Some(raw) => parse_policy(raw)?,
            None => fallback_policy.ok_or(CalcError::MissingField { field: "policy" })?,
        };

        TicketInput::builder()
            .branch(optional(&self.branch).unwrap_or(fallback_branch))
            .phone(self.phone.trim())
            .ticket(ticket)
            .policy(policy)
            .paid_amount(parse_amount(
                "paid_amount",
                required("paid_amount", &self.paid_amount)?,
            )?)
            .purchase_date(parse_compact_date(required(
                "purchase_date",
                &self.purchase_date,
            )?)?)
            .refund_request_date(parse_compact_date(required(
                "refund_request_date",
                &self.refund_date,
            )?)?)
            .penalty(penalty)
            .pricing_overrides(overrides)
            .build()
    }
}

/// overdue checkout recovery form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    /// `YYYYMMDD`
    pub date: String,
    /// `HHMM`
    pub time: String,
}

impl CheckoutForm {
    pub fn into_input(self, tz: Tz, reference_now: DateTime<Tz>) -> Result<CheckoutInput> {
        let date = parse_compact_date(required("date", &self.date)?)?;
        let time = parse_compact_time(required("time", &self.time)?)?;
        let checkout = local_instant(date, time, tz)?;
        Ok(CheckoutInput::new(checkout, reference_now))
    }

    /// reference instant taken from the time provider
    pub fn into_input_at_now(
        self,
        tz: Tz,
        time_provider: &SafeTimeProvider,
    ) -> Result<CheckoutInput> {
        self.into_input(tz, now_in(tz, time_provider))
    }
}

fn optional(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty()).then_some(raw)
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str> {
    optional(raw).ok_or(CalcError::MissingField { field })
}

/// `110,000원`, `110000`, `110 000 원`
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Money> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('원')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    Money::from_str_exact(&cleaned)
        .map_err(|_| {
            CalcError::validation(format!("{}: '{}' is not an amount", field, raw.trim()))
        })?
        .checked_won(field)
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32> {
    let raw = required(field, raw)?;
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<u32>().map_err(|_| {
        CalcError::validation(format!("{}: '{}' is not a whole number", field, raw))
    })
}

fn parse_ticket_type(raw: &str) -> Result<TicketType> {
    match raw {
        "기간권" | "PeriodPass" | "period_pass" => Ok(TicketType::PeriodPass),
        "시간권" | "TimePass" | "time_pass" => Ok(TicketType::TimePass),
        "노블레스석" | "NoblesseSeat" | "noblesse_seat" => Ok(TicketType::NoblesseSeat),
        other => Err(CalcError::validation(format!("unknown ticket type '{}'", other))),
    }
}

fn parse_policy(raw: &str) -> Result<RefundPolicyMode> {
    match raw {
        "일반" | "FlatRate" | "flat_rate" => Ok(RefundPolicyMode::FlatRate),
        "%" | "% 규정" | "PercentTier" | "percent_tier" => Ok(RefundPolicyMode::PercentTier),
        other => Err(CalcError::validation(format!("unknown refund policy '{}'", other))),
    }
}

fn parse_penalty(raw: &str) -> Result<PenaltyRate> {
    raw.trim_end_matches('%')
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(PenaltyRate::from_percent)
        .ok_or_else(|| {
            CalcError::validation(format!("penalty must be 0%, 10% or 20%, got '{}'", raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Asia::Seoul;
    use hourglass_rs::TimeSource;

    fn period_form() -> RefundForm {
        RefundForm {
            branch: " 강남점 ".to_string(),
            phone: "010-1234-5678".to_string(),
            ticket_type: "기간권".to_string(),
            policy: "일반".to_string(),
            purchase_date: "20250101".to_string(),
            refund_date: "20250105".to_string(),
            paid_amount: "110,000원".to_string(),
            days_given: "30".to_string(),
            ..RefundForm::default()
        }
    }

    fn branch() -> BranchProfile {
        BranchProfile {
            name: "강남점".to_string(),
            address: None,
            contact: None,
            master_key_locker: None,
            pricing: PricingOverrides {
                noblesse_daily_rate: Some(Money::from_won(15_000)),
                ..PricingOverrides::default()
            },
            refund_policy: Some(RefundPolicyMode::PercentTier),
        }
    }

    #[test]
    fn test_period_pass_form() {
        let input = period_form().into_input().unwrap();

        assert_eq!(input.branch(), "강남점");
        assert_eq!(input.ticket(), &Ticket::PeriodPass { total_days: 30 });
        assert_eq!(input.paid_amount(), Money::from_won(110_000));
        assert_eq!(input.purchase_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(input.penalty(), PenaltyRate::None);
    }

    #[test]
    fn test_time_pass_form_from_json() {
        let form: RefundForm = serde_json::from_str(
            r#"{
                "ticket_type": "시간권",
                "policy": "%",
                "purchase_date": "2025-01-01",
                "refund_date": "20250110",
                "paid_amount": "50000",
                "total_hours": "20",
                "hours_used": "4",
                "valid_weeks": "4",
                "penalty_percent": "10%"
            }"#,
        )
        .unwrap();
        let input = form.into_input().unwrap();

        assert_eq!(input.policy(), RefundPolicyMode::PercentTier);
        assert_eq!(input.penalty(), PenaltyRate::TenPercent);
        assert_eq!(
            input.ticket(),
            &Ticket::TimePass {
                total_hours: 20,
                hours_used: 4,
                valid_weeks: 4
            }
        );
    }

    #[test]
    fn test_missing_fields_for_selected_ticket() {
        let mut form = period_form();
        form.ticket_type = "시간권".to_string();
        assert!(matches!(
            form.into_input(),
            Err(CalcError::MissingField { field: "total_hours" })
        ));

        let mut form = period_form();
        form.paid_amount = "  ".to_string();
        assert!(matches!(
            form.into_input(),
            Err(CalcError::MissingField { field: "paid_amount" })
        ));
    }

    #[test]
    fn test_noblesse_rate_prefilled_from_branch() {
        let mut form = period_form();
        form.ticket_type = "노블레스석".to_string();

        assert!(matches!(
            form.clone().into_input(),
            Err(CalcError::MissingField { field: "per_day_rate" })
        ));

        let input = form.into_input_with(&branch()).unwrap();
        assert_eq!(
            input.ticket(),
            &Ticket::NoblesseSeat {
                total_days: 30,
                per_day_rate: Some(Money::from_won(15_000))
            }
        );
    }

    #[test]
    fn test_blank_policy_and_branch_from_branch_profile() {
        let mut form = period_form();
        form.policy = " ".to_string();
        form.branch = String::new();

        assert!(matches!(
            form.clone().into_input(),
            Err(CalcError::MissingField { field: "policy" })
        ));

        let input = form.into_input_with(&branch()).unwrap();
        assert_eq!(input.policy(), RefundPolicyMode::PercentTier);
        assert_eq!(input.branch(), "강남점");

        // an explicit policy on the form wins
        let input = period_form().into_input_with(&branch()).unwrap();
        assert_eq!(input.policy(), RefundPolicyMode::FlatRate);
    }

    #[test]
    fn test_out_of_range_amounts_never_reach_the_engine() {
        let mut form = period_form();
        form.ticket_type = "노블레스석".to_string();
        form.paid_amount = "100000".to_string();
        form.per_day_rate = "79228162514264337593543950335".to_string();
        assert!(matches!(
            form.into_input(),
            Err(CalcError::InvalidAmount { field: "per_day_rate", .. })
        ));

        let mut form = period_form();
        form.paid_amount = "1,000,000,000,001원".to_string();
        assert!(matches!(
            form.into_input(),
            Err(CalcError::InvalidAmount { field: "paid_amount", .. })
        ));
    }

    #[test]
    fn test_fractional_won_rejected() {
        let mut form = period_form();
        form.paid_amount = "100000.7".to_string();
        assert!(matches!(
            form.into_input(),
            Err(CalcError::InvalidAmount { field: "paid_amount", .. })
        ));

        let mut form = period_form();
        form.ticket_type = "노블레스석".to_string();
        form.per_day_rate = "15,000.5원".to_string();
        assert!(matches!(
            form.into_input(),
            Err(CalcError::InvalidAmount { field: "per_day_rate", .. })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        let mut form = period_form();
        form.paid_amount = "십만원".to_string();
        assert!(matches!(form.into_input(), Err(CalcError::Validation { .. })));

        let mut form = period_form();
        form.purchase_date = "2025/01/01".to_string();
        assert!(matches!(form.into_input(), Err(CalcError::InvalidDate { .. })));

        let mut form = period_form();
        form.penalty_percent = "15".to_string();
        assert!(matches!(form.into_input(), Err(CalcError::Validation { .. })));

        let mut form = period_form();
        form.ticket_type = "월정액".to_string();
        assert!(matches!(form.into_input(), Err(CalcError::Validation { .. })));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("x", "1,234,500원").unwrap(), Money::from_won(1_234_500));
        assert_eq!(parse_amount("x", " 3000 원 ").unwrap(), Money::from_won(3_000));
        assert!(matches!(
            parse_amount("x", "-500"),
            Err(CalcError::InvalidAmount { field: "x", .. })
        ));
    }

    #[test]
    fn test_checkout_form() {
        let form = CheckoutForm {
            date: "20250101".to_string(),
            time: "1000".to_string(),
        };
        let now = Seoul.with_ymd_and_hms(2025, 1, 1, 11, 47, 0).unwrap();
        let input = form.into_input(Seoul, now).unwrap();

        assert_eq!(
            input.checkout_instant,
            Seoul.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(input.reference_now, now);
    }

    #[test]
    fn test_checkout_form_with_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 1, 1, 2, 47, 0).unwrap(),
        ));
        let form = CheckoutForm {
            date: "20250101".to_string(),
            time: "10:00".to_string(),
        };
        let input = form.into_input_at_now(Seoul, &time).unwrap();
        assert_eq!(input.reference_now.format("%H:%M").to_string(), "11:47");
    }

    #[test]
    fn test_checkout_form_bad_time() {
        let form = CheckoutForm {
            date: "20250101".to_string(),
            time: "2561".to_string(),
        };
        let now = Seoul.with_ymd_and_hms(2025, 1, 1, 11, 47, 0).unwrap();
        assert!(matches!(
            form.into_input(Seoul, now),
            Err(CalcError::InvalidDate { .. })
        ));
    }
}
