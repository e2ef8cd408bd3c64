use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{PortfolioError, Result};
use crate::loan::{Loan, LoanCategory, LoanId};

/// a lending venue owning an ordered list of loans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub loans: Vec<Loan>,
}

impl Platform {
    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    /// total invested principal across the platform's loans
    pub fn total_invested(&self) -> Money {
        self.loans.iter().map(|l| l.amount).sum()
    }
}

/// how imported data is combined with an existing portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// discard the existing portfolio and take the imported one wholesale
    Replace,
    /// append imported loans into matching platforms, insert new platforms
    Combine,
}

/// the full portfolio: platform name -> platform
///
/// Plain value type; the caller owns the live instance, loads it at startup
/// and saves it after each mutation. Serializes to the exported JSON shape
/// `{ "<platform>": { "loans": [...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    platforms: BTreeMap<String, Platform>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// create an empty platform under the given name
    pub fn add_platform(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PortfolioError::EmptyPlatformName);
        }
        if self.platforms.contains_key(name) {
            return Err(PortfolioError::PlatformExists {
                name: name.to_string(),
            });
        }
        debug!(platform = %name, "platform added");
        self.platforms.insert(name.to_string(), Platform::default());
        Ok(())
    }

    /// remove a platform and all loans it owns
    pub fn remove_platform(&mut self, name: &str) -> Result<Platform> {
        let removed = self
            .platforms
            .remove(name)
            .ok_or_else(|| PortfolioError::PlatformNotFound {
                name: name.to_string(),
            })?;
        debug!(platform = %name, loans = removed.loan_count(), "platform removed");
        Ok(removed)
    }

    pub fn platform(&self, name: &str) -> Option<&Platform> {
        self.platforms.get(name)
    }

    /// append a loan to a platform
    pub fn add_loan(&mut self, platform: &str, loan: Loan) -> Result<()> {
        let entry = self.platform_mut(platform)?;
        debug!(platform = %platform, loan = loan.id, "loan added");
        entry.loans.push(loan);
        Ok(())
    }

    /// replace an existing loan in place, matched by id
    pub fn update_loan(&mut self, platform: &str, loan: Loan) -> Result<()> {
        let entry = self.platform_mut(platform)?;
        let slot = entry
            .loans
            .iter_mut()
            .find(|l| l.id == loan.id)
            .ok_or(PortfolioError::LoanNotFound { id: loan.id })?;
        debug!(platform = %platform, loan = loan.id, "loan updated");
        *slot = loan;
        Ok(())
    }

    /// remove a loan by id
    pub fn remove_loan(&mut self, platform: &str, id: LoanId) -> Result<Loan> {
        let entry = self.platform_mut(platform)?;
        let index = entry
            .loans
            .iter()
            .position(|l| l.id == id)
            .ok_or(PortfolioError::LoanNotFound { id })?;
        debug!(platform = %platform, loan = id, "loan removed");
        Ok(entry.loans.remove(index))
    }

    /// fold another portfolio into this one (data import)
    pub fn merge(&mut self, other: Portfolio, strategy: MergeStrategy) {
        match strategy {
            MergeStrategy::Replace => {
                *self = other;
            }
            MergeStrategy::Combine => {
                for (name, platform) in other.platforms {
                    self.platforms
                        .entry(name)
                        .or_default()
                        .loans
                        .extend(platform.loans);
                }
            }
        }
    }

    /// invested principal grouped by loan category; every category is
    /// present, zero when unused
    pub fn category_breakdown(&self) -> BTreeMap<LoanCategory, Money> {
        let mut breakdown: BTreeMap<LoanCategory, Money> = [
            LoanCategory::Personal,
            LoanCategory::Business,
            LoanCategory::RealEstate,
            LoanCategory::Auto,
            LoanCategory::Other,
        ]
        .into_iter()
        .map(|c| (c, Money::ZERO))
        .collect();

        for loan in self.loans() {
            *breakdown.entry(loan.category).or_insert(Money::ZERO) += loan.amount;
        }
        breakdown
    }

    pub fn platform_names(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    pub fn platforms(&self) -> impl Iterator<Item = (&str, &Platform)> {
        self.platforms.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// all loans across all platforms
    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.platforms.values().flat_map(|p| p.loans.iter())
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    pub fn loan_count(&self) -> usize {
        self.platforms.values().map(Platform::loan_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    fn platform_mut(&mut self, name: &str) -> Result<&mut Platform> {
        self.platforms
            .get_mut(name)
            .ok_or_else(|| PortfolioError::PlatformNotFound {
                name: name.to_string(),
            })
    }
}
