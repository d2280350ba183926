use chrono::DateTime;
use chrono_tz::Tz;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CalculatorConfig;
use crate::dates::{now_in, DATE_FORMAT, MINUTE_FORMAT};
use crate::errors::{CalcError, Result};
use crate::receipt::{Receipt, HEAVY_RULE, LIGHT_RULE};
use crate::refund::RefundResult;
use crate::types::ReceiptId;

/// bank account the refund is paid out to, collected after calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutAccount {
    pub holder_name: String,
    pub bank_name: String,
    pub account_number: String,
}

impl PayoutAccount {
    pub fn new(
        holder_name: impl Into<String>,
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Result<Self> {
        let account = Self {
            holder_name: holder_name.into().trim().to_string(),
            bank_name: bank_name.into().trim().to_string(),
            account_number: account_number.into().trim().to_string(),
        };
        for (field, value) in [
            ("holder_name", &account.holder_name),
            ("bank_name", &account.bank_name),
            ("account_number", &account.account_number),
        ] {
            if value.is_empty() {
                return Err(CalcError::MissingField { field });
            }
        }
        Ok(account)
    }
}

/// customer-facing refund statement
pub struct RefundReceipt<'a> {
    id: ReceiptId,
    result: &'a RefundResult,
    business_name: String,
    issued_at: DateTime<Tz>,
    payout: Option<PayoutAccount>,
}

impl<'a> RefundReceipt<'a> {
    pub fn new(
        result: &'a RefundResult,
        config: &CalculatorConfig,
        issued_at: DateTime<Tz>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            result,
            business_name: config.business_name.clone(),
            issued_at,
            payout: None,
        }
    }

    /// issue with the wall-clock time in the configured timezone
    pub fn issue(
        result: &'a RefundResult,
        config: &CalculatorConfig,
        time_provider: &SafeTimeProvider,
    ) -> Self {
        Self::new(result, config, now_in(config.timezone, time_provider))
    }

    /// enriched variant carrying payout bank details
    pub fn with_payout(mut self, payout: PayoutAccount) -> Self {
        self.payout = Some(payout);
        self
    }

    pub fn payout(&self) -> Option<&PayoutAccount> {
        self.payout.as_ref()
    }

    pub fn issued_at(&self) -> DateTime<Tz> {
        self.issued_at
    }
}

impl Receipt for RefundReceipt<'_> {
    fn receipt_id(&self) -> ReceiptId {
        self.id
    }

    fn render(&self) -> String {
        let r = self.result;
        let mut lines = vec![
            format!("[{} 환불 내역서]", self.business_name),
            HEAVY_RULE.to_string(),
            format!(
                "■ 지점 : {}    ■ 연락처 : {}    ■ 발급일 : {}",
                r.branch,
                r.phone,
                self.issued_at.format(MINUTE_FORMAT)
            ),
            LIGHT_RULE.to_string(),
            "[구 매 정 보]".to_string(),
            format!("- 이용권 종류 : {}", r.ticket_label),
            format!("- 결 제 일 자 : {}", r.purchase_date.format(DATE_FORMAT)),
            format!("- 결제 금액 : {}", r.paid_amount),
            format!("- 유효 기간 : {}", r.valid_period),
            LIGHT_RULE.to_string(),
            "[환 불 내 역]".to_string(),
            format!("▣ 사용량 : {}", r.usage_description),
            format!("▣ 공제 금액 : -{} ({})", r.deduction_amount, r.deduction_description),
            format!("▣ 위약금 : -{} ({})", r.penalty_amount, r.penalty_rate),
            format!("▣ 환불 금액 : {}", r.final_refund_amount),
            format!("▶ 회원 정보 : {} (고객 전화번호 기준)", r.phone),
        ];

        if let Some(payout) = &self.payout {
            lines.extend([
                LIGHT_RULE.to_string(),
                "[환 불 계 좌]".to_string(),
                format!("- 예 금 주 : {}", payout.holder_name),
                format!("- 은 행 명 : {}", payout.bank_name),
                format!("- 계좌번호 : {}", payout.account_number),
            ]);
        }

        lines.extend([
            HEAVY_RULE.to_string(),
            "※ 유의사항".to_string(),
            "- 본 내역서는 발급일 기준으로 유효합니다.".to_string(),
            "- 환불 처리에는 최대 3~5영업일이 소요될 수 있습니다.".to_string(),
        ]);
        lines.extend(r.advisories.iter().map(|a| format!("- {}", a.message())));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::refund::{compute_refund, TicketInput};
    use crate::types::{PenaltyRate, RefundPolicyMode};
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Asia::Seoul;
    use hourglass_rs::TimeSource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period_pass_result() -> RefundResult {
        let input = TicketInput::builder()
            .branch("강남점")
            .phone("010-1234-5678")
            .period_pass(30)
            .policy(RefundPolicyMode::FlatRate)
            .paid_amount(Money::from_won(110_000))
            .purchase_date(date(2025, 1, 1))
            .refund_request_date(date(2025, 1, 5))
            .build()
            .unwrap();
        compute_refund(&input)
    }

    #[test]
    fn test_refund_statement_layout() {
        let result = period_pass_result();
        let issued = Seoul.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap();
        let receipt = RefundReceipt::new(&result, &CalculatorConfig::default(), issued);

        let expected = "\
[멘토즈 스터디카페 환불 내역서]
=============================================
■ 지점 : 강남점    ■ 연락처 : 010-1234-5678    ■ 발급일 : 2025-01-05 14:30
---------------------------------------------
[구 매 정 보]
- 이용권 종류 : 기간권 (30일)
- 결 제 일 자 : 2025-01-01
- 결제 금액 : 110,000원
- 유효 기간 : 2025-01-01 ~ 2025-01-30
---------------------------------------------
[환 불 내 역]
▣ 사용량 : 5일 사용
▣ 공제 금액 : -55,000원 (5일 × 11,000원)
▣ 위약금 : -0원 (0%)
▣ 환불 금액 : 55,000원
▶ 회원 정보 : 010-1234-5678 (고객 전화번호 기준)
=============================================
※ 유의사항
- 본 내역서는 발급일 기준으로 유효합니다.
- 환불 처리에는 최대 3~5영업일이 소요될 수 있습니다.";

        assert_eq!(receipt.render(), expected);
    }

    #[test]
    fn test_payout_section_before_closing_rule() {
        let result = period_pass_result();
        let issued = Seoul.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap();
        let payout = PayoutAccount::new("홍길동", "국민은행", "123-456-7890").unwrap();
        let text = RefundReceipt::new(&result, &CalculatorConfig::default(), issued)
            .with_payout(payout)
            .render();

        let payout_at = text.find("[환 불 계 좌]").unwrap();
        let closing_at = text.find("※ 유의사항").unwrap();
        assert!(payout_at < closing_at);
        assert!(text.contains("- 예 금 주 : 홍길동"));
        assert!(text.contains("- 은 행 명 : 국민은행"));
        assert!(text.contains("- 계좌번호 : 123-456-7890"));
    }

    #[test]
    fn test_payout_requires_all_fields() {
        assert!(matches!(
            PayoutAccount::new("홍길동", "  ", "123"),
            Err(CalcError::MissingField { field: "bank_name" })
        ));
    }

    #[test]
    fn test_penalty_and_advisory_lines() {
        let input = TicketInput::builder()
            .branch("분당점")
            .phone("010-0000-0000")
            .noblesse_seat(60, Some(Money::from_won(15_000)))
            .policy(RefundPolicyMode::FlatRate)
            .paid_amount(Money::from_won(900_000))
            .purchase_date(date(2025, 1, 1))
            .refund_request_date(date(2025, 2, 10))
            .penalty(PenaltyRate::TenPercent)
            .build()
            .unwrap();
        let result = compute_refund(&input);
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap(),
        ));
        let text = RefundReceipt::issue(&result, &CalculatorConfig::default(), &time).render();

        assert!(text.contains("■ 발급일 : 2025-02-10 09:00"));
        assert!(text.contains("- 이용권 종류 : 노블레스석 (60일)"));
        assert!(text.contains("▣ 위약금 : -90,000원 (10%)"));
        assert!(text.ends_with("- 결제 후 30일이 초과되어 환불이 제한될 수 있습니다."));
    }

    #[test]
    fn test_html_is_escaped_and_tagged() {
        let mut result = period_pass_result();
        result.branch = "<본점>".to_string();
        let issued = Seoul.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap();
        let receipt = RefundReceipt::new(&result, &CalculatorConfig::default(), issued);

        let html = receipt.to_html();
        assert!(html.starts_with("<pre class=\"receipt\""));
        assert!(html.contains(&receipt.receipt_id().to_string()));
        assert!(html.contains("&lt;본점&gt;"));
    }
}
