/// portfolio roll-up with deterministic time-windowed projections
use p2p_portfolio_rs::{
    chrono::TimeZone, compute_platform_stats, compute_portfolio_stats_now, upcoming_payments,
    Frequency, Loan, LoanCategory, Money, Portfolio, SafeTimeProvider, ScheduleFields,
    ScheduleFlags, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // pin "now" so the windowed figures are reproducible
    let time = SafeTimeProvider::new(TimeSource::Test(
        p2p_portfolio_rs::chrono::Utc
            .with_ymd_and_hms(2024, 3, 15, 9, 0, 0)
            .unwrap(),
    ));

    let mut portfolio = Portfolio::new();
    portfolio.add_platform("Mintos")?;
    portfolio.add_platform("Bondora")?;

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

    portfolio.add_loan(
        "Bondora",
        Loan::new(
            &time,
            "Bullet note",
            Money::from_major(500),
            LoanCategory::Other,
            "2024-01-01".parse()?,
            "2024-04-02".parse()?,
            ScheduleFlags {
                bullet: true,
                repeat: true,
                ..ScheduleFlags::default()
            },
            &ScheduleFields {
                payment_amount: Some(Money::from_major(5)),
                frequency: Some(Frequency::Monthly),
                ..ScheduleFields::default()
            },
        )?,
    )?;

    for (name, platform) in portfolio.platforms() {
        let stats = compute_platform_stats(platform);
        println!(
            "{name}: invested {} | monthly {} | net annualised {}",
            stats.total_invested, stats.monthly_income, stats.net_annualised_return
        );
    }

    let stats = compute_portfolio_stats_now(&portfolio, &time);
    println!("earned this month: {}", stats.earned_this_month);
    println!("yield this year:   {}", stats.yield_this_year);
    println!("pending incomes:   {}", stats.pending_incomes);

    for due in upcoming_payments(&portfolio, time.now().date_naive(), 30) {
        println!(
            "due in {} days on {}: {} ({})",
            due.days_until_due, due.platform, due.description, due.amount
        );
    }

    Ok(())
}
