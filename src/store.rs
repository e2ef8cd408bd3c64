use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::errors::Result;
use crate::portfolio::Portfolio;

/// durable home for the serialized portfolio
///
/// The engine never touches storage itself; the owning application loads at
/// startup and saves after each mutation.
pub trait PortfolioStore {
    fn load(&self) -> Result<Portfolio>;
    fn save(&self, portfolio: &Portfolio) -> Result<()>;
}

const TMP_SUFFIX: &str = "tmp";

/// single-file JSON store
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-save leaves the previous portfolio intact. A missing file loads as an
/// empty portfolio.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        let ext = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
            None => TMP_SUFFIX.to_string(),
        };
        tmp.set_extension(ext);
        tmp
    }
}

impl PortfolioStore for JsonFileStore {
    fn load(&self) -> Result<Portfolio> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no portfolio file, starting empty");
            return Ok(Portfolio::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let portfolio: Portfolio = serde_json::from_str(&data)?;
        debug!(
            path = %self.path.display(),
            platforms = portfolio.platform_count(),
            loans = portfolio.loan_count(),
            "portfolio loaded"
        );
        Ok(portfolio)
    }

    fn save(&self, portfolio: &Portfolio) -> Result<()> {
        let json = serde_json::to_string_pretty(portfolio)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.tmp_path();
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "portfolio saved");
        Ok(())
    }
}

/// in-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    portfolio: Mutex<Portfolio>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_portfolio(portfolio: Portfolio) -> Self {
        Self {
            portfolio: Mutex::new(portfolio),
        }
    }
}

impl PortfolioStore for MemoryStore {
    fn load(&self) -> Result<Portfolio> {
        let guard = self
            .portfolio
            .lock()
            .map_err(|_| crate::errors::PortfolioError::Storage {
                message: "memory store lock poisoned".to_string(),
            })?;
        Ok(guard.clone())
    }

    fn save(&self, portfolio: &Portfolio) -> Result<()> {
        let mut guard = self
            .portfolio
            .lock()
            .map_err(|_| crate::errors::PortfolioError::Storage {
                message: "memory store lock poisoned".to_string(),
            })?;
        *guard = portfolio.clone();
        Ok(())
    }
}
