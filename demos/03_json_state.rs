/// saving, loading, and merging exported portfolio data
use p2p_portfolio_rs::{
    Frequency, JsonFileStore, Loan, LoanCategory, MergeStrategy, Money, Portfolio, PortfolioStore,
    SafeTimeProvider, ScheduleFields, ScheduleFlags, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let store = JsonFileStore::new(std::env::temp_dir().join("p2p_portfolio_demo.json"));

    // missing file loads as an empty portfolio
    let mut portfolio = store.load()?;
    if portfolio.is_empty() {
        portfolio.add_platform("Mintos")?;
        portfolio.add_loan(
            "Mintos",
            Loan::new(
                &time,
                "Consumer loan",
                Money::from_major(1_200),
                LoanCategory::Personal,
                "2024-01-01".parse()?,
                "2024-12-01".parse()?,
                ScheduleFlags {
                    repeat: true,
                    ..ScheduleFlags::default()
                },
                &ScheduleFields {
                    payment_amount: Some(Money::from_major(110)),
                    frequency: Some(Frequency::Monthly),
                    ..ScheduleFields::default()
                },
            )?,
        )?;
        store.save(&portfolio)?;
    }

    // import a portfolio exported elsewhere: flat records, JSON numbers
    let exported = r#"{
        "Bondora": {
            "loans": [{
                "id": 1716470000000,
                "description": "Bullet note",
                "amount": 500,
                "firstPaymentDate": "2024-01-01",
                "lastPaymentDate": "2024-06-01",
                "isBullet": true,
                "isRepeat": true,
                "paymentAmount": 5,
                "frequency": "monthly",
                "paymentCount": 6
            }]
        }
    }"#;
    let imported: Portfolio = serde_json::from_str(exported)?;
    portfolio.merge(imported, MergeStrategy::Combine);
    store.save(&portfolio)?;

    println!(
        "{} platforms, {} loans stored at {}",
        portfolio.platform_count(),
        portfolio.loan_count(),
        store.path().display()
    );
    println!("{}", serde_json::to_string_pretty(&portfolio)?);

    Ok(())
}
