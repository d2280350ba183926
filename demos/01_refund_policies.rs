/// refund policies - flat rate vs percentage tiers, penalties, advisories
use chrono::NaiveDate;
use studycafe_desk_rs::{
    CalculatorConfig, Money, PenaltyRate, RefundPolicyEngine, RefundPolicyMode, TicketInput,
    TierBoundary,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== refund policies ===\n");

    let purchase = NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?;
    let refund = NaiveDate::from_ymd_opt(2025, 1, 10).ok_or("bad date")?;

    // 20-hour time pass, 4 hours used
    let time_pass = |policy| {
        TicketInput::builder()
            .branch("분당점")
            .phone("010-0000-0000")
            .time_pass(20, 4, 4)
            .policy(policy)
            .paid_amount(Money::from_won(50_000))
            .purchase_date(purchase)
            .refund_request_date(refund)
            .build()
    };

    let engine = RefundPolicyEngine::new(&CalculatorConfig::default())?;

    let flat = engine.compute_refund(&time_pass(RefundPolicyMode::FlatRate)?);
    println!("flat rate : {} ({})", flat.final_refund_amount, flat.deduction_description);

    let tiered = engine.compute_refund(&time_pass(RefundPolicyMode::PercentTier)?);
    println!("% tiers   : {} ({})", tiered.final_refund_amount, tiered.deduction_description);

    // exactly 25% used: exclusive vs inclusive boundary
    let quarter = TicketInput::builder()
        .time_pass(20, 5, 4)
        .policy(RefundPolicyMode::PercentTier)
        .paid_amount(Money::from_won(50_000))
        .purchase_date(purchase)
        .refund_request_date(refund)
        .build()?;
    for boundary in [TierBoundary::Exclusive, TierBoundary::Inclusive] {
        let config = CalculatorConfig::default().with_tier_boundary(boundary);
        let result = RefundPolicyEngine::new(&config)?.compute_refund(&quarter);
        println!("{:?} boundary at 25%: {}", boundary, result.final_refund_amount);
    }

    // late request with a 20% penalty
    let late = TicketInput::builder()
        .period_pass(60)
        .policy(RefundPolicyMode::FlatRate)
        .paid_amount(Money::from_won(500_000))
        .purchase_date(purchase)
        .refund_request_date(NaiveDate::from_ymd_opt(2025, 2, 15).ok_or("bad date")?)
        .penalty(PenaltyRate::TwentyPercent)
        .build()?;
    let result = engine.compute_refund(&late);
    println!("\nlate refund: {} (penalty {})", result.final_refund_amount, result.penalty_amount);
    for advisory in &result.advisories {
        println!("  advisory: {}", advisory.message());
    }

    println!("\n{}", result.to_json_pretty()?);

    Ok(())
}
