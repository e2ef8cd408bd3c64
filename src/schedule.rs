use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, Frequency};
use crate::decimal::Money;
use crate::errors::{PortfolioError, Result};

/// repayment schedule variant
///
/// Exactly one variant applies to a loan; each carries only the fields its
/// arithmetic needs, so invalid mode combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    /// principal returned in one payment at term end, no interest tracked
    Single,
    /// equal principal portions each period; all interest lands in the
    /// final payment together with the remaining principal
    FixedPrincipal {
        principal_per_payment: Money,
        total_interest: Money,
        frequency: Frequency,
        payment_count: u32,
    },
    /// interest-only recurring payments, principal repaid at term end
    BulletRepeat {
        payment_amount: Money,
        frequency: Frequency,
        payment_count: u32,
    },
    /// fixed recurring payment amortizing principal and interest together
    Repeat {
        payment_amount: Money,
        frequency: Frequency,
        payment_count: u32,
    },
}

/// raw mode flags as entered by the user (and as persisted in flat records)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleFlags {
    pub bullet: bool,
    pub fixed_principal: bool,
    pub repeat: bool,
}

/// variant-specific inputs accompanying the flags; only the fields the
/// selected variant requires are consulted
#[derive(Debug, Clone, Default)]
pub struct ScheduleFields {
    pub payment_amount: Option<Money>,
    pub frequency: Option<Frequency>,
    pub principal_per_payment: Option<Money>,
    pub total_interest: Option<Money>,
    pub fixed_principal_frequency: Option<Frequency>,
}

impl Schedule {
    /// select the repayment variant for a loan and validate its inputs
    ///
    /// Precedence: FixedPrincipal > BulletRepeat > Repeat > Single. A bullet
    /// flag without repeat degrades to Single, matching how stored records
    /// have always been interpreted. Payment counts are derived from the
    /// date range for every recurring variant.
    pub fn classify(
        flags: ScheduleFlags,
        fields: &ScheduleFields,
        first_payment_date: NaiveDate,
        last_payment_date: NaiveDate,
    ) -> Result<Schedule> {
        if flags.fixed_principal {
            let principal_per_payment = require_positive(
                fields.principal_per_payment,
                "principal_per_payment",
            )?;
            let total_interest = require_positive(fields.total_interest, "total_interest")?;
            let frequency = fields
                .fixed_principal_frequency
                .ok_or(PortfolioError::MissingField {
                    field: "fixed_principal_frequency",
                })?;
            let payment_count =
                calendar::payment_count(first_payment_date, last_payment_date, frequency);

            Ok(Schedule::FixedPrincipal {
                principal_per_payment,
                total_interest,
                frequency,
                payment_count,
            })
        } else if flags.repeat {
            let payment_amount = require_positive(fields.payment_amount, "payment_amount")?;
            let frequency = fields.frequency.ok_or(PortfolioError::MissingField {
                field: "frequency",
            })?;
            let payment_count =
                calendar::payment_count(first_payment_date, last_payment_date, frequency);

            if flags.bullet {
                Ok(Schedule::BulletRepeat {
                    payment_amount,
                    frequency,
                    payment_count,
                })
            } else {
                Ok(Schedule::Repeat {
                    payment_amount,
                    frequency,
                    payment_count,
                })
            }
        } else {
            Ok(Schedule::Single)
        }
    }

    /// mode flags for the flat persisted record
    pub fn flags(&self) -> ScheduleFlags {
        match self {
            Schedule::Single => ScheduleFlags::default(),
            Schedule::FixedPrincipal { .. } => ScheduleFlags {
                fixed_principal: true,
                ..ScheduleFlags::default()
            },
            Schedule::BulletRepeat { .. } => ScheduleFlags {
                bullet: true,
                repeat: true,
                ..ScheduleFlags::default()
            },
            Schedule::Repeat { .. } => ScheduleFlags {
                repeat: true,
                ..ScheduleFlags::default()
            },
        }
    }

    /// recurrence frequency, None for single-payment loans
    pub fn frequency(&self) -> Option<Frequency> {
        match self {
            Schedule::Single => None,
            Schedule::FixedPrincipal { frequency, .. }
            | Schedule::BulletRepeat { frequency, .. }
            | Schedule::Repeat { frequency, .. } => Some(*frequency),
        }
    }

    /// number of scheduled payments, None for single-payment loans
    pub fn payment_count(&self) -> Option<u32> {
        match self {
            Schedule::Single => None,
            Schedule::FixedPrincipal { payment_count, .. }
            | Schedule::BulletRepeat { payment_count, .. }
            | Schedule::Repeat { payment_count, .. } => Some(*payment_count),
        }
    }

    /// recurring per-period amount (interest payment for bullet loans,
    /// principal portion for fixed-principal loans)
    pub fn recurring_amount(&self) -> Option<Money> {
        match self {
            Schedule::Single => None,
            Schedule::FixedPrincipal {
                principal_per_payment,
                ..
            } => Some(*principal_per_payment),
            Schedule::BulletRepeat { payment_amount, .. }
            | Schedule::Repeat { payment_amount, .. } => Some(*payment_amount),
        }
    }
}

fn require_positive(value: Option<Money>, field: &'static str) -> Result<Money> {
    let value = value.ok_or(PortfolioError::MissingField { field })?;
    if !value.is_positive() {
        return Err(PortfolioError::InvalidAmount { field, value });
    }
    Ok(value)
}
