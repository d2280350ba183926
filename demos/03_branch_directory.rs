/// branch directory - branch pricing, locker notice, form intake
use studycafe_desk_rs::{
    BranchDirectory, CalculatorConfig, InMemoryBranchDirectory, LockerMasterKey, RefundForm,
    RefundPolicyEngine,
};

const BRANCHES: &str = r#"[
    {
        "name": "강남점",
        "address": "서울 강남구 테헤란로 1",
        "contact": "010-1111-2222",
        "master_key_locker": { "locker_number": "101", "password": "2580" },
        "pricing": { "period_pass_daily_rate": "9000", "noblesse_daily_rate": "15000" },
        "refund_policy": "FlatRate"
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== branch directory ===\n");

    let directory = InMemoryBranchDirectory::from_json(BRANCHES)?;
    let branch = directory.require("강남점")?;

    println!("{}\n", LockerMasterKey::for_branch(&branch)?.notice());

    // counter form as typed by staff, policy left to the branch default
    let form = RefundForm {
        branch: branch.name.clone(),
        phone: "010-1234-5678".to_string(),
        ticket_type: "노블레스석".to_string(),
        purchase_date: "20250101".to_string(),
        refund_date: "20250103".to_string(),
        paid_amount: "420,000원".to_string(),
        days_given: "28".to_string(),
        ..RefundForm::default()
    };
    let input = form.into_input_with(&branch)?;

    let config = CalculatorConfig::default().with_overrides(&branch.pricing);
    let result = RefundPolicyEngine::new(&config)?.compute_refund(&input);
    println!("{} → {}", result.deduction_description, result.final_refund_amount);

    Ok(())
}
