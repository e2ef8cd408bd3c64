use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, Frequency};
use crate::decimal::Money;
use crate::errors::{PortfolioError, Result};
use crate::schedule::{Schedule, ScheduleFields, ScheduleFlags};

/// unique loan identifier: millisecond timestamp at creation
pub type LoanId = i64;

/// loan purpose category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    Personal,
    Business,
    RealEstate,
    Auto,
    #[default]
    Other,
}

/// a single loan held on a lending platform
///
/// Persisted as a flat record (mode flags plus optional variant fields) for
/// compatibility with previously exported portfolios; deserialization runs
/// the schedule classifier so malformed records never enter the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoanRecord", into = "LoanRecord")]
pub struct Loan {
    pub id: LoanId,
    pub description: String,
    pub amount: Money,
    pub category: LoanCategory,
    pub first_payment_date: NaiveDate,
    pub last_payment_date: NaiveDate,
    pub schedule: Schedule,
}

impl Loan {
    /// create a loan, minting its id from the injected clock
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: &SafeTimeProvider,
        description: &str,
        amount: Money,
        category: LoanCategory,
        first_payment_date: NaiveDate,
        last_payment_date: NaiveDate,
        flags: ScheduleFlags,
        fields: &ScheduleFields,
    ) -> Result<Self> {
        Self::with_id(
            time.now().timestamp_millis(),
            description,
            amount,
            category,
            first_payment_date,
            last_payment_date,
            flags,
            fields,
        )
    }

    /// create a loan with an existing id (edits keep the original id)
    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        id: LoanId,
        description: &str,
        amount: Money,
        category: LoanCategory,
        first_payment_date: NaiveDate,
        last_payment_date: NaiveDate,
        flags: ScheduleFlags,
        fields: &ScheduleFields,
    ) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(PortfolioError::EmptyDescription);
        }
        if !amount.is_positive() {
            return Err(PortfolioError::InvalidAmount {
                field: "amount",
                value: amount,
            });
        }
        if first_payment_date > last_payment_date {
            return Err(PortfolioError::InvalidDateRange {
                first: first_payment_date,
                last: last_payment_date,
            });
        }

        let schedule = Schedule::classify(flags, fields, first_payment_date, last_payment_date)?;

        Ok(Self {
            id,
            description: description.to_string(),
            amount,
            category,
            first_payment_date,
            last_payment_date,
            schedule,
        })
    }

    /// inclusive whole-month duration of the loan
    pub fn duration_months(&self) -> i64 {
        calendar::month_span(self.first_payment_date, self.last_payment_date)
    }
}

/// flat persisted form of a loan, mirroring the exported JSON shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoanRecord {
    id: LoanId,
    description: String,
    amount: Money,
    #[serde(default)]
    category: LoanCategory,
    first_payment_date: NaiveDate,
    last_payment_date: NaiveDate,
    #[serde(default)]
    is_bullet: bool,
    #[serde(default)]
    is_fixed_principal: bool,
    #[serde(default)]
    is_repeat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    principal_per_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_interest: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_principal_frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_count: Option<u32>,
}

impl TryFrom<LoanRecord> for Loan {
    type Error = PortfolioError;

    fn try_from(record: LoanRecord) -> Result<Self> {
        let flags = ScheduleFlags {
            bullet: record.is_bullet,
            fixed_principal: record.is_fixed_principal,
            repeat: record.is_repeat,
        };
        let fields = ScheduleFields {
            payment_amount: record.payment_amount,
            frequency: record.frequency,
            principal_per_payment: record.principal_per_payment,
            total_interest: record.total_interest,
            fixed_principal_frequency: record.fixed_principal_frequency,
        };
        // payment_count in the record is derived data; the classifier
        // recomputes it from the date range
        Loan::with_id(
            record.id,
            &record.description,
            record.amount,
            record.category,
            record.first_payment_date,
            record.last_payment_date,
            flags,
            &fields,
        )
    }
}

impl From<Loan> for LoanRecord {
    fn from(loan: Loan) -> Self {
        let flags = loan.schedule.flags();
        let mut record = LoanRecord {
            id: loan.id,
            description: loan.description,
            amount: loan.amount,
            category: loan.category,
            first_payment_date: loan.first_payment_date,
            last_payment_date: loan.last_payment_date,
            is_bullet: flags.bullet,
            is_fixed_principal: flags.fixed_principal,
            is_repeat: flags.repeat,
            payment_amount: None,
            frequency: None,
            principal_per_payment: None,
            total_interest: None,
            fixed_principal_frequency: None,
            payment_count: None,
        };

        match loan.schedule {
            Schedule::Single => {}
            Schedule::FixedPrincipal {
                principal_per_payment,
                total_interest,
                frequency,
                payment_count,
            } => {
                record.principal_per_payment = Some(principal_per_payment);
                record.total_interest = Some(total_interest);
                record.fixed_principal_frequency = Some(frequency);
                record.payment_count = Some(payment_count);
            }
            Schedule::BulletRepeat {
                payment_amount,
                frequency,
                payment_count,
            }
            | Schedule::Repeat {
                payment_amount,
                frequency,
                payment_count,
            } => {
                record.payment_amount = Some(payment_amount);
                record.frequency = Some(frequency);
                record.payment_count = Some(payment_count);
            }
        }

        record
    }
}
