use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::schedule::Schedule;

/// computed financial outputs for one loan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanMetrics {
    /// total cash returned over the life of the loan
    pub total_return: Money,
    /// total return minus invested principal
    pub profit: Money,
    /// interest component of the total return; negative for loss-making
    /// amortizing loans
    pub total_interest_earned: Money,
    /// monthly-equivalent incoming cash flow
    pub monthly_income: Money,
    /// monthly-equivalent interest portion of the income
    pub monthly_interest: Money,
    /// simple-interest annualized yield (interest / principal / years)
    pub roi_annualized: Rate,
}

/// compute metrics for a loan; pure, no clock involved
pub fn compute_loan_metrics(loan: &Loan) -> LoanMetrics {
    let amount = loan.amount;

    let (total_return, total_interest_earned, monthly_income, monthly_interest) =
        match &loan.schedule {
            Schedule::Single => (amount, Money::ZERO, Money::ZERO, Money::ZERO),
            Schedule::FixedPrincipal {
                principal_per_payment,
                total_interest,
                frequency,
                ..
            } => {
                let monthly_principal = *principal_per_payment * frequency.monthly_multiplier();
                // interest is back-loaded into the final payment, so the
                // recurring income carries no interest portion
                (
                    amount + *total_interest,
                    *total_interest,
                    monthly_principal,
                    Money::ZERO,
                )
            }
            Schedule::BulletRepeat {
                payment_amount,
                frequency,
                payment_count,
            } => {
                let interest_per_month = *payment_amount * frequency.monthly_multiplier();
                let total_interest = *payment_amount * Decimal::from(*payment_count);
                (
                    total_interest + amount,
                    total_interest,
                    interest_per_month,
                    interest_per_month,
                )
            }
            Schedule::Repeat {
                payment_amount,
                frequency,
                payment_count,
            } => {
                let multiplier = frequency.monthly_multiplier();
                let total_paid = *payment_amount * Decimal::from(*payment_count);
                let interest_earned = total_paid - amount;
                let monthly_interest =
                    (interest_earned / Decimal::from(*payment_count)) * multiplier;
                (
                    total_paid,
                    interest_earned,
                    *payment_amount * multiplier,
                    monthly_interest,
                )
            }
        };

    let roi_annualized = match loan.schedule {
        Schedule::Single => Rate::ZERO,
        _ => annualized_return(total_interest_earned, amount, loan.duration_months()),
    };

    LoanMetrics {
        total_return,
        profit: total_return - amount,
        total_interest_earned,
        monthly_income,
        monthly_interest,
        roi_annualized,
    }
}

/// the final payment of a fixed-principal loan: remaining principal plus
/// the whole interest; None for other variants
pub fn fixed_principal_final_payment(loan: &Loan) -> Option<Money> {
    match &loan.schedule {
        Schedule::FixedPrincipal {
            principal_per_payment,
            total_interest,
            payment_count,
            ..
        } => {
            let regular_principal =
                *principal_per_payment * Decimal::from(payment_count.saturating_sub(1));
            Some(loan.amount - regular_principal + *total_interest)
        }
        _ => None,
    }
}

/// simple-interest annualization; degrades to zero instead of failing on
/// zero principal or zero duration
pub(crate) fn annualized_return(interest: Money, principal: Money, duration_months: i64) -> Rate {
    let duration_years = Decimal::from(duration_months) / dec!(12);
    if !principal.is_positive() || duration_years <= Decimal::ZERO {
        return Rate::ZERO;
    }
    Rate::from_decimal(interest.as_decimal() / principal.as_decimal() / duration_years)
}
