/// quick start - compute a refund and print the receipt
use chrono::NaiveDate;
use studycafe_desk_rs::{
    compute_refund, CalculatorConfig, Money, Receipt, RefundPolicyMode, RefundReceipt,
    SafeTimeProvider, TicketInput, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 30-day period pass, refunded on day 5
    let input = TicketInput::builder()
        .branch("강남점")
        .phone("010-1234-5678")
        .period_pass(30)
        .policy(RefundPolicyMode::FlatRate)
        .paid_amount(Money::from_won(110_000))
        .purchase_date(NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?)
        .refund_request_date(NaiveDate::from_ymd_opt(2025, 1, 5).ok_or("bad date")?)
        .build()?;

    let result = compute_refund(&input);

    let time = SafeTimeProvider::new(TimeSource::System);
    let receipt = RefundReceipt::issue(&result, &CalculatorConfig::default(), &time);
    println!("{}", receipt.render());

    Ok(())
}
