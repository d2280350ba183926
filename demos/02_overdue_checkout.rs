/// overdue checkout - recover a missed checkout with controlled time
use chrono::{Duration, TimeZone, Utc};
use studycafe_desk_rs::chrono_tz::Asia::Seoul;
use studycafe_desk_rs::{
    compute_overdue, CheckoutForm, CheckoutInput, OverdueReceipt, Receipt, SafeTimeProvider,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== overdue checkout ===\n");

    // 11:47 KST
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 1, 2, 47, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let form = CheckoutForm {
        date: "20250101".to_string(),
        time: "1000".to_string(),
    };
    let result = compute_overdue(&form.clone().into_input_at_now(Seoul, &time)?)?;
    println!("{}\n", OverdueReceipt::new(&result).render());

    // staff gets to it an hour later
    controller.advance(Duration::hours(1));
    let result = compute_overdue(&form.into_input_at_now(Seoul, &time)?)?;
    println!("{}", OverdueReceipt::new(&result).render());

    // a checkout in the future is rejected
    let future = Seoul.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
    if let Err(e) = compute_overdue(&CheckoutInput::at_now(future, &time)) {
        println!("\nfuture checkout rejected: {}", e);
    }

    Ok(())
}
