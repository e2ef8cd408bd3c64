/// the four repayment variants and their per-loan metrics
use p2p_portfolio_rs::{
    compute_loan_metrics, fixed_principal_final_payment, Frequency, Loan, LoanCategory, Money,
    SafeTimeProvider, ScheduleFields, ScheduleFlags, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let first = "2024-01-01".parse()?;
    let last = "2024-12-01".parse()?;

    // single: principal back in one payment, no interest tracked
    let single = Loan::new(
        &time,
        "Bridge note",
        Money::from_major(750),
        LoanCategory::Business,
        first,
        last,
        ScheduleFlags::default(),
        &ScheduleFields::default(),
    )?;

    // repeat: fixed installment amortizing principal and interest
    let repeat = Loan::new(
        &time,
        "Consumer loan",
        Money::from_major(1_200),
        LoanCategory::Personal,
        first,
        last,
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

    // bullet: interest-only installments, principal at term end
    let bullet = Loan::new(
        &time,
        "Real estate bullet",
        Money::from_major(500),
        LoanCategory::RealEstate,
        first,
        "2024-06-01".parse()?,
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
    )?;

    // fixed principal: equal principal slices, interest bundled last
    let fixed = Loan::new(
        &time,
        "Equipment loan",
        Money::from_major(1_000),
        LoanCategory::Business,
        first,
        "2024-10-01".parse()?,
        ScheduleFlags {
            fixed_principal: true,
            ..ScheduleFlags::default()
        },
        &ScheduleFields {
            principal_per_payment: Some(Money::from_major(100)),
            total_interest: Some(Money::from_major(50)),
            fixed_principal_frequency: Some(Frequency::Monthly),
            ..ScheduleFields::default()
        },
    )?;

    for loan in [&single, &repeat, &bullet, &fixed] {
        let m = compute_loan_metrics(loan);
        println!("{}", loan.description);
        println!("  total return:   {}", m.total_return);
        println!("  interest:       {}", m.total_interest_earned);
        println!("  monthly income: {}", m.monthly_income);
        println!("  annualized roi: {}", m.roi_annualized);
        if let Some(final_payment) = fixed_principal_final_payment(loan) {
            println!("  final payment:  {}", final_payment);
        }
    }

    Ok(())
}
