pub mod calendar;
pub mod decimal;
pub mod errors;
pub mod loan;
pub mod metrics;
pub mod portfolio;
pub mod schedule;
pub mod stats;
pub mod store;

// re-export key types
pub use calendar::{month_span, payment_count, Frequency};
pub use decimal::{Money, Rate};
pub use errors::{PortfolioError, Result};
pub use loan::{Loan, LoanCategory, LoanId};
pub use metrics::{compute_loan_metrics, fixed_principal_final_payment, LoanMetrics};
pub use portfolio::{MergeStrategy, Platform, Portfolio};
pub use schedule::{Schedule, ScheduleFields, ScheduleFlags};
pub use stats::{
    compute_platform_stats, compute_portfolio_stats, compute_portfolio_stats_now,
    upcoming_payments, PlatformStats, PortfolioStats, UpcomingPayment,
};
pub use store::{JsonFileStore, MemoryStore, PortfolioStore};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
