/// quick start - minimal example to get started
use p2p_portfolio_rs::{
    compute_portfolio_stats_now, Frequency, Loan, LoanCategory, Money, Portfolio,
    SafeTimeProvider, ScheduleFields, ScheduleFlags, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    // track one platform with one amortizing loan
    let mut portfolio = Portfolio::new();
    portfolio.add_platform("Mintos")?;

    let loan = Loan::new(
        &time,
        "Consumer loan, 12 monthly payments",
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
    )?;
    portfolio.add_loan("Mintos", loan)?;

    let stats = compute_portfolio_stats_now(&portfolio, &time);
    println!("invested:         {}", stats.total_invested);
    println!("monthly income:   {}", stats.monthly_income);
    println!("pending incomes:  {}", stats.pending_incomes);
    println!("average yield:    {}", stats.average_yield);

    Ok(())
}
