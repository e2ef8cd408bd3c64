use chrono::{Datelike, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::calendar;
use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::metrics::{self, compute_loan_metrics};
use crate::portfolio::{Platform, Portfolio};
use crate::schedule::Schedule;

/// aggregated figures for one platform
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlatformStats {
    pub total_invested: Money,
    pub monthly_income: Money,
    pub monthly_interest: Money,
    pub total_return: Money,
    pub profit: Money,
    pub total_interest_earned: Money,
    /// interest / invested / mean loan duration, as an annual rate
    pub net_annualised_return: Rate,
    pub loan_count: usize,
}

/// sum loan metrics across a platform
pub fn compute_platform_stats(platform: &Platform) -> PlatformStats {
    let mut stats = PlatformStats {
        loan_count: platform.loan_count(),
        ..PlatformStats::default()
    };
    let mut total_months = 0i64;

    for loan in &platform.loans {
        let m = compute_loan_metrics(loan);
        stats.total_invested += loan.amount;
        stats.monthly_income += m.monthly_income;
        stats.monthly_interest += m.monthly_interest;
        stats.total_return += m.total_return;
        stats.total_interest_earned += m.total_interest_earned;
        total_months += loan.duration_months();
    }

    stats.profit = stats.total_return - stats.total_invested;

    // average-of-averages duration: mean of per-loan month spans, not
    // investment-weighted
    if stats.loan_count > 0 {
        let avg_years = Decimal::from(total_months)
            / Decimal::from(stats.loan_count as u64)
            / Decimal::from(12);
        if stats.total_invested.is_positive() && avg_years > Decimal::ZERO {
            stats.net_annualised_return = Rate::from_decimal(
                stats.total_interest_earned.as_decimal()
                    / stats.total_invested.as_decimal()
                    / avg_years,
            );
        }
    }

    stats
}

/// portfolio-wide figures, including date-windowed projections as of `today`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortfolioStats {
    pub total_invested: Money,
    pub monthly_income: Money,
    pub monthly_interest: Money,
    pub total_return: Money,
    pub profit: Money,
    pub total_interest_earned: Money,
    /// monthly-equivalent income from loans currently paying out
    pub earned_this_month: Money,
    /// interest attributable to the current calendar year
    pub yield_this_year: Money,
    /// cash still to be received from loans that have not matured
    pub pending_incomes: Money,
    /// lifetime interest over invested principal
    pub average_yield: Rate,
    pub loan_count: usize,
    pub platform_count: usize,
}

/// roll up all platforms and compute the time-windowed figures
///
/// `today` is an explicit input so projections are deterministic; see
/// [`compute_portfolio_stats_now`] for the clock-driven variant.
pub fn compute_portfolio_stats(portfolio: &Portfolio, today: NaiveDate) -> PortfolioStats {
    let mut stats = PortfolioStats {
        platform_count: portfolio.platform_count(),
        ..PortfolioStats::default()
    };

    for (_, platform) in portfolio.platforms() {
        let p = compute_platform_stats(platform);
        stats.total_invested += p.total_invested;
        stats.monthly_income += p.monthly_income;
        stats.monthly_interest += p.monthly_interest;
        stats.total_return += p.total_return;
        stats.loan_count += p.loan_count;
    }
    stats.profit = stats.total_return - stats.total_invested;

    for loan in portfolio.loans() {
        let m = compute_loan_metrics(loan);
        stats.total_interest_earned += m.total_interest_earned;
        stats.earned_this_month += earned_this_month(loan, today);
        stats.yield_this_year += yield_this_year(loan, today.year());
        stats.pending_incomes += pending_income(loan, today);
    }

    if stats.total_invested.is_positive() {
        stats.average_yield = Rate::from_decimal(
            stats.total_interest_earned.as_decimal() / stats.total_invested.as_decimal(),
        );
    }

    stats
}

/// portfolio stats as of the injected clock's current date
pub fn compute_portfolio_stats_now(
    portfolio: &Portfolio,
    time: &SafeTimeProvider,
) -> PortfolioStats {
    compute_portfolio_stats(portfolio, time.now().date_naive())
}

/// a loan whose final payment falls inside the lookahead window
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPayment {
    pub platform: String,
    pub description: String,
    pub days_until_due: i64,
    /// recurring payment amount; zero for single and fixed-principal loans
    pub amount: Money,
}

/// loans maturing within `window_days` of `today`, soonest first
pub fn upcoming_payments(
    portfolio: &Portfolio,
    today: NaiveDate,
    window_days: i64,
) -> Vec<UpcomingPayment> {
    let mut due = Vec::new();

    for (name, platform) in portfolio.platforms() {
        for loan in &platform.loans {
            let days_until_due = (loan.last_payment_date - today).num_days();
            if (0..=window_days).contains(&days_until_due) {
                let amount = match &loan.schedule {
                    Schedule::BulletRepeat { payment_amount, .. }
                    | Schedule::Repeat { payment_amount, .. } => *payment_amount,
                    _ => Money::ZERO,
                };
                due.push(UpcomingPayment {
                    platform: name.to_string(),
                    description: loan.description.clone(),
                    days_until_due,
                    amount,
                });
            }
        }
    }

    due.sort_by_key(|p| p.days_until_due);
    due
}

/// monthly-equivalent amount a loan contributes in the current month
fn earned_this_month(loan: &Loan, today: NaiveDate) -> Money {
    if loan.first_payment_date > today {
        return Money::ZERO;
    }
    let last = loan.last_payment_date;

    match &loan.schedule {
        Schedule::Single => Money::ZERO,
        Schedule::FixedPrincipal {
            principal_per_payment,
            total_interest,
            frequency,
            ..
        } => {
            let monthly_principal = *principal_per_payment * frequency.monthly_multiplier();
            if last.month() == today.month() && last.year() == today.year() {
                // the final payment bundles the whole interest
                monthly_principal + *total_interest
            } else if last >= today {
                monthly_principal
            } else {
                Money::ZERO
            }
        }
        Schedule::BulletRepeat {
            payment_amount,
            frequency,
            ..
        }
        | Schedule::Repeat {
            payment_amount,
            frequency,
            ..
        } => {
            if last >= today {
                *payment_amount * frequency.monthly_multiplier()
            } else {
                Money::ZERO
            }
        }
    }
}

/// interest a loan contributes to the given calendar year
fn yield_this_year(loan: &Loan, year: i32) -> Money {
    let first = loan.first_payment_date;
    let last = loan.last_payment_date;

    match &loan.schedule {
        Schedule::Single => Money::ZERO,
        Schedule::FixedPrincipal { total_interest, .. } => {
            // no proration: the full interest counts only in the year the
            // final payment lands
            match year_overlap_months(first, last, year) {
                Some(_) if last.year() == year => *total_interest,
                _ => Money::ZERO,
            }
        }
        Schedule::BulletRepeat {
            payment_amount,
            frequency,
            ..
        } => match year_overlap_months(first, last, year) {
            Some(months) => {
                *payment_amount * frequency.monthly_multiplier() * Decimal::from(months)
            }
            None => Money::ZERO,
        },
        Schedule::Repeat {
            payment_amount,
            payment_count,
            ..
        } => match year_overlap_months(first, last, year) {
            Some(months) => {
                let interest_earned =
                    *payment_amount * Decimal::from(*payment_count) - loan.amount;
                let interest_per_month =
                    interest_earned / Decimal::from(calendar::month_span(first, last));
                interest_per_month * Decimal::from(months)
            }
            None => Money::ZERO,
        },
    }
}

/// future cash still owed by a loan whose last payment is after `today`
fn pending_income(loan: &Loan, today: NaiveDate) -> Money {
    if loan.last_payment_date <= today {
        return Money::ZERO;
    }

    match &loan.schedule {
        Schedule::Single => loan.amount,
        Schedule::FixedPrincipal { .. } => {
            // remaining principal plus the back-loaded interest
            metrics::fixed_principal_final_payment(loan).unwrap_or(Money::ZERO)
        }
        Schedule::BulletRepeat {
            payment_amount,
            frequency,
            ..
        } => {
            let payments_left =
                calendar::payment_count(today, loan.last_payment_date, *frequency);
            *payment_amount * Decimal::from(payments_left) + loan.amount
        }
        Schedule::Repeat {
            payment_amount,
            frequency,
            ..
        } => {
            let payments_left =
                calendar::payment_count(today, loan.last_payment_date, *frequency);
            *payment_amount * Decimal::from(payments_left)
        }
    }
}

/// whole-month overlap between a loan's payment window and a calendar year
fn year_overlap_months(first: NaiveDate, last: NaiveDate, year: i32) -> Option<i64> {
    if first.year() > year || last.year() < year {
        return None;
    }
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    let effective_start = first.max(year_start);
    let effective_end = last.min(year_end);
    if effective_start > effective_end {
        return None;
    }
    Some(calendar::month_span(effective_start, effective_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Frequency;
    use crate::loan::{LoanCategory, LoanId};
    use crate::schedule::{ScheduleFields, ScheduleFlags};
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repeat_loan(id: LoanId, amount: i64, payment: i64, first: NaiveDate, last: NaiveDate) -> Loan {
        Loan::with_id(
            id,
            "repeat",
            Money::from_major(amount),
            LoanCategory::Other,
            first,
            last,
            ScheduleFlags {
                repeat: true,
                ..ScheduleFlags::default()
            },
            &ScheduleFields {
                payment_amount: Some(Money::from_major(payment)),
                frequency: Some(Frequency::Monthly),
                ..ScheduleFields::default()
            },
        )
        .unwrap()
    }

    fn bullet_loan(id: LoanId, amount: i64, payment: i64, first: NaiveDate, last: NaiveDate) -> Loan {
        Loan::with_id(
            id,
            "bullet",
            Money::from_major(amount),
            LoanCategory::Other,
            first,
            last,
            ScheduleFlags {
                bullet: true,
                repeat: true,
                ..ScheduleFlags::default()
            },
            &ScheduleFields {
                payment_amount: Some(Money::from_major(payment)),
                frequency: Some(Frequency::Monthly),
                ..ScheduleFields::default()
            },
        )
        .unwrap()
    }

    fn fixed_principal_loan(
        id: LoanId,
        amount: i64,
        principal_per: i64,
        interest: i64,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Loan {
        Loan::with_id(
            id,
            "fixed principal",
            Money::from_major(amount),
            LoanCategory::Other,
            first,
            last,
            ScheduleFlags {
                fixed_principal: true,
                ..ScheduleFlags::default()
            },
            &ScheduleFields {
                principal_per_payment: Some(Money::from_major(principal_per)),
                total_interest: Some(Money::from_major(interest)),
                fixed_principal_frequency: Some(Frequency::Monthly),
                ..ScheduleFields::default()
            },
        )
        .unwrap()
    }

    fn single_loan(id: LoanId, amount: i64, first: NaiveDate, last: NaiveDate) -> Loan {
        Loan::with_id(
            id,
            "single",
            Money::from_major(amount),
            LoanCategory::Other,
            first,
            last,
            ScheduleFlags::default(),
            &ScheduleFields::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_platform_stats_sums_loans() {
        let platform = Platform {
            loans: vec![
                repeat_loan(1, 1_200, 110, date(2024, 1, 1), date(2024, 12, 1)),
                bullet_loan(2, 500, 5, date(2024, 1, 1), date(2024, 6, 1)),
            ],
        };
        let stats = compute_platform_stats(&platform);
        assert_eq!(stats.loan_count, 2);
        assert_eq!(stats.total_invested, Money::from_major(1_700));
        assert_eq!(stats.total_return, Money::from_major(1_850)); // 1320 + 530
        assert_eq!(stats.total_interest_earned, Money::from_major(150));
        assert_eq!(stats.profit, Money::from_major(150));
        assert_eq!(stats.monthly_income, Money::from_major(115));
        // avg duration (12 + 6) / 2 = 9 months = 0.75y
        // 150 / 1700 / 0.75 ~= 11.76%
        let nar = stats.net_annualised_return.as_percentage().round_dp(2);
        assert_eq!(nar, dec!(11.76));
    }

    #[test]
    fn test_empty_platform_has_zero_return() {
        let stats = compute_platform_stats(&Platform::default());
        assert_eq!(stats.net_annualised_return, Rate::ZERO);
        assert_eq!(stats.total_invested, Money::ZERO);
    }

    fn sample_portfolio() -> Portfolio {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mintos").unwrap();
        portfolio
            .add_loan(
                "Mintos",
                repeat_loan(1, 1_200, 110, date(2024, 1, 1), date(2024, 12, 1)),
            )
            .unwrap();
        portfolio.add_platform("Bondora").unwrap();
        portfolio
            .add_loan(
                "Bondora",
                bullet_loan(2, 500, 5, date(2024, 1, 1), date(2024, 6, 1)),
            )
            .unwrap();
        portfolio
    }

    #[test]
    fn test_portfolio_headline_totals() {
        let stats = compute_portfolio_stats(&sample_portfolio(), date(2024, 3, 15));
        assert_eq!(stats.platform_count, 2);
        assert_eq!(stats.loan_count, 2);
        assert_eq!(stats.total_invested, Money::from_major(1_700));
        assert_eq!(stats.total_return, Money::from_major(1_850));
        assert_eq!(stats.total_interest_earned, Money::from_major(150));
        // 150 / 1700
        assert_eq!(
            stats.average_yield.as_percentage().round_dp(2),
            dec!(8.82)
        );
    }

    #[test]
    fn test_earned_this_month_includes_active_loans() {
        // both loans active on 2024-03-15: 110 + 5
        let stats = compute_portfolio_stats(&sample_portfolio(), date(2024, 3, 15));
        assert_eq!(stats.earned_this_month, Money::from_major(115));
    }

    #[test]
    fn test_earned_this_month_excludes_not_yet_started() {
        let stats = compute_portfolio_stats(&sample_portfolio(), date(2023, 6, 1));
        assert_eq!(stats.earned_this_month, Money::ZERO);
    }

    #[test]
    fn test_earned_this_month_fixed_principal_final_month_bump() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Estateguru").unwrap();
        portfolio
            .add_loan(
                "Estateguru",
                fixed_principal_loan(1, 1_000, 100, 50, date(2024, 1, 1), date(2024, 10, 1)),
            )
            .unwrap();

        // mid-term month: principal portion only
        let mid = compute_portfolio_stats(&portfolio, date(2024, 5, 15));
        assert_eq!(mid.earned_this_month, Money::from_major(100));

        // final month: principal portion plus the whole interest
        let final_month = compute_portfolio_stats(&portfolio, date(2024, 10, 15));
        assert_eq!(final_month.earned_this_month, Money::from_major(150));
    }

    #[test]
    fn test_yield_this_year_prorates_repeat_loans() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mintos").unwrap();
        // 24-month loan spanning 2023-07 .. 2025-06, interest 240 total
        portfolio
            .add_loan(
                "Mintos",
                repeat_loan(1, 2_160, 100, date(2023, 7, 1), date(2025, 6, 1)),
            )
            .unwrap();

        let stats = compute_portfolio_stats(&portfolio, date(2024, 3, 1));
        // interest = 100*24 - 2160 = 240; 240/24 = 10 per month, 12 months in 2024
        assert_eq!(stats.yield_this_year, Money::from_major(120));
    }

    #[test]
    fn test_yield_this_year_prorates_bullet_loans() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mintos").unwrap();
        // bullet paying 5/month, Oct 2024 .. Mar 2025
        portfolio
            .add_loan(
                "Mintos",
                bullet_loan(1, 500, 5, date(2024, 10, 1), date(2025, 3, 1)),
            )
            .unwrap();

        // 3 overlapping months in 2024 (Oct, Nov, Dec)
        let stats = compute_portfolio_stats(&portfolio, date(2024, 11, 1));
        assert_eq!(stats.yield_this_year, Money::from_major(15));
    }

    #[test]
    fn test_yield_this_year_fixed_principal_counts_only_final_year() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Estateguru").unwrap();
        // spans 2024-06 .. 2025-05, interest 50, ends in 2025
        portfolio
            .add_loan(
                "Estateguru",
                fixed_principal_loan(1, 1_200, 100, 50, date(2024, 6, 1), date(2025, 5, 1)),
            )
            .unwrap();

        // 2024: overlapping but final payment lands in 2025 -> nothing
        let y2024 = compute_portfolio_stats(&portfolio, date(2024, 8, 1));
        assert_eq!(y2024.yield_this_year, Money::ZERO);

        // 2025: full interest, no proration
        let y2025 = compute_portfolio_stats(&portfolio, date(2025, 2, 1));
        assert_eq!(y2025.yield_this_year, Money::from_major(50));
    }

    #[test]
    fn test_pending_incomes_per_variant() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mixed").unwrap();
        let today = date(2024, 3, 15);

        // repeat: 9 payments left (apr..dec) -> payment_count(today, last) = 10
        portfolio
            .add_loan(
                "Mixed",
                repeat_loan(1, 1_200, 110, date(2024, 1, 1), date(2024, 12, 1)),
            )
            .unwrap();
        // bullet: payments left + principal
        portfolio
            .add_loan(
                "Mixed",
                bullet_loan(2, 500, 5, date(2024, 1, 1), date(2024, 6, 1)),
            )
            .unwrap();
        // single: full principal pending
        portfolio
            .add_loan("Mixed", single_loan(3, 300, date(2024, 1, 1), date(2024, 9, 1)))
            .unwrap();
        // fixed principal: remaining principal + interest
        portfolio
            .add_loan(
                "Mixed",
                fixed_principal_loan(4, 1_000, 100, 50, date(2024, 1, 1), date(2024, 10, 1)),
            )
            .unwrap();

        let stats = compute_portfolio_stats(&portfolio, today);
        // repeat: month_span(mar, dec) = 10 -> 1100
        // bullet: month_span(mar, jun) = 4 -> 20 + 500 = 520
        // single: 300
        // fixed principal: 1000 - 900 + 50 = 150
        assert_eq!(stats.pending_incomes, Money::from_major(1_100 + 520 + 300 + 150));
    }

    #[test]
    fn test_pending_incomes_excludes_matured_loans() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mintos").unwrap();
        portfolio
            .add_loan(
                "Mintos",
                repeat_loan(1, 1_200, 110, date(2023, 1, 1), date(2023, 12, 1)),
            )
            .unwrap();

        let stats = compute_portfolio_stats(&portfolio, date(2024, 3, 15));
        assert_eq!(stats.pending_incomes, Money::ZERO);
    }

    #[test]
    fn test_deleted_platform_no_longer_contributes() {
        let mut portfolio = sample_portfolio();
        let before = compute_portfolio_stats(&portfolio, date(2024, 3, 15));
        assert_eq!(before.total_invested, Money::from_major(1_700));

        portfolio.remove_platform("Mintos").unwrap();
        let after = compute_portfolio_stats(&portfolio, date(2024, 3, 15));
        assert_eq!(after.total_invested, Money::from_major(500));
        assert_eq!(after.loan_count, 1);
    }

    #[test]
    fn test_stats_with_injected_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            chrono::Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        ));
        let stats = compute_portfolio_stats_now(&sample_portfolio(), &time);
        assert_eq!(stats.earned_this_month, Money::from_major(115));
    }

    #[test]
    fn test_upcoming_payments_window_and_order() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mintos").unwrap();
        portfolio
            .add_loan(
                "Mintos",
                repeat_loan(1, 1_200, 110, date(2024, 1, 1), date(2024, 4, 10)),
            )
            .unwrap();
        portfolio
            .add_loan(
                "Mintos",
                bullet_loan(2, 500, 5, date(2024, 1, 1), date(2024, 4, 2)),
            )
            .unwrap();
        // outside the 30-day window
        portfolio
            .add_loan(
                "Mintos",
                repeat_loan(3, 600, 60, date(2024, 1, 1), date(2024, 12, 1)),
            )
            .unwrap();
        // already matured
        portfolio
            .add_loan(
                "Mintos",
                repeat_loan(4, 600, 60, date(2023, 1, 1), date(2023, 12, 1)),
            )
            .unwrap();

        let today = date(2024, 4, 1);
        let due = upcoming_payments(&portfolio, today, 30);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].days_until_due, 1);
        assert_eq!(due[0].amount, Money::from_major(5));
        assert_eq!(due[1].days_until_due, 9);
        assert_eq!(due[1].platform, "Mintos");
    }

    #[test]
    fn test_upcoming_payment_amount_zero_for_single_loans() {
        let mut portfolio = Portfolio::new();
        portfolio.add_platform("Mintos").unwrap();
        portfolio
            .add_loan("Mintos", single_loan(1, 300, date(2024, 1, 1), date(2024, 4, 5)))
            .unwrap();

        let due = upcoming_payments(&portfolio, date(2024, 4, 1), 30);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].amount, Money::ZERO);
    }
}
