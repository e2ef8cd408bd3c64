use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// recurrence frequency for scheduled payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// approximate factor converting a per-period amount to a monthly-equivalent rate
    ///
    /// Deliberately coarse (no leap-year or day-count precision); stored
    /// portfolios were computed against exactly these factors, so they must
    /// not change.
    pub fn monthly_multiplier(&self) -> Decimal {
        match self {
            Frequency::Daily => dec!(30),
            Frequency::Weekly => dec!(4.33),
            Frequency::Monthly => dec!(1),
            Frequency::Quarterly => dec!(0.33),
            Frequency::Yearly => dec!(0.083),
        }
    }
}

/// inclusive whole-month count between two dates, ignoring day-of-month
///
/// `month_span(2024-01-31, 2024-02-01) == 2`: this is a coarse month count,
/// not elapsed time. Always >= 1 when `first <= last`.
pub fn month_span(first: NaiveDate, last: NaiveDate) -> i64 {
    (last.year() as i64 - first.year() as i64) * 12
        + (last.month() as i64 - first.month() as i64)
        + 1
}

/// number of payments falling in `[first, last]` for the given frequency,
/// floored at 1
pub fn payment_count(first: NaiveDate, last: NaiveDate, frequency: Frequency) -> u32 {
    let diff_days = (last - first).num_days().abs();

    let count = match frequency {
        Frequency::Daily => diff_days + 1,
        Frequency::Weekly => diff_days / 7 + 1,
        Frequency::Monthly => month_span(first, last),
        Frequency::Quarterly => (month_span(first, last) - 1) / 3 + 1,
        Frequency::Yearly => last.year() as i64 - first.year() as i64 + 1,
    };

    count.max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const ALL_FREQUENCIES: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    #[test]
    fn test_same_day_is_one_payment_for_every_frequency() {
        let d = date(2024, 6, 15);
        for freq in ALL_FREQUENCIES {
            assert_eq!(payment_count(d, d, freq), 1, "{:?}", freq);
        }
    }

    #[test]
    fn test_month_span_ignores_day_of_month() {
        assert_eq!(month_span(date(2024, 1, 31), date(2024, 2, 1)), 2);
        assert_eq!(month_span(date(2024, 1, 1), date(2024, 12, 1)), 12);
        assert_eq!(month_span(date(2023, 11, 15), date(2024, 2, 15)), 4);
    }

    #[test]
    fn test_month_span_at_least_one_for_ordered_dates() {
        assert_eq!(month_span(date(2024, 3, 1), date(2024, 3, 31)), 1);
    }

    #[test]
    fn test_monthly_payment_count() {
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 12, 1), Frequency::Monthly),
            12
        );
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 10, 1), Frequency::Monthly),
            10
        );
    }

    #[test]
    fn test_daily_payment_count_is_inclusive() {
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 1, 10), Frequency::Daily),
            10
        );
    }

    #[test]
    fn test_weekly_payment_count_floors_partial_weeks() {
        // 13 days -> one full week plus change
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 1, 14), Frequency::Weekly),
            2
        );
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 1, 15), Frequency::Weekly),
            3
        );
    }

    #[test]
    fn test_quarterly_payment_count() {
        // zero-based month distance 11 -> 3 full quarters + first payment
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 12, 1), Frequency::Quarterly),
            4
        );
        assert_eq!(
            payment_count(date(2024, 1, 1), date(2024, 2, 1), Frequency::Quarterly),
            1
        );
    }

    #[test]
    fn test_yearly_payment_count() {
        assert_eq!(
            payment_count(date(2022, 6, 1), date(2024, 6, 1), Frequency::Yearly),
            3
        );
    }

    #[test]
    fn test_payment_count_floored_at_one() {
        // reversed dates still report a single payment
        assert_eq!(
            payment_count(date(2024, 12, 1), date(2024, 1, 1), Frequency::Monthly),
            1
        );
    }

    #[test]
    fn test_monthly_multiplier_table() {
        assert_eq!(Frequency::Daily.monthly_multiplier(), dec!(30));
        assert_eq!(Frequency::Weekly.monthly_multiplier(), dec!(4.33));
        assert_eq!(Frequency::Monthly.monthly_multiplier(), dec!(1));
        assert_eq!(Frequency::Quarterly.monthly_multiplier(), dec!(0.33));
        assert_eq!(Frequency::Yearly.monthly_multiplier(), dec!(0.083));
    }

    #[test]
    fn test_frequency_serde_lowercase() {
        let json = serde_json::to_string(&Frequency::Quarterly).unwrap();
        assert_eq!(json, "\"quarterly\"");
        let freq: Frequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(freq, Frequency::Weekly);
    }
}
