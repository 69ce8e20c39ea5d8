//! Spreadsheet exports with eyewear purchases, eye exams and partner
//! companies.

use std::path::PathBuf;

use async_trait::async_trait;

use common::{AppError, AppResult};

use crate::config::SheetsConfig;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const SHEET_UNAVAILABLE: &str = "Podaci trenutno nisu dostupni.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Glasses,
    Reviews,
    Companies,
}

impl Sheet {
    pub fn name(&self) -> &'static str {
        match self {
            Sheet::Glasses => "glasses",
            Sheet::Reviews => "reviews",
            Sheet::Companies => "companies",
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Raw rows, the first one holding the headers.
    async fn rows(&self, sheet: Sheet) -> AppResult<Vec<Vec<String>>>;
}

/// Reads each sheet from a JSON array of string arrays.
pub struct JsonFileSheets {
    config: SheetsConfig,
}

impl JsonFileSheets {
    pub fn new(config: SheetsConfig) -> Self {
        Self { config }
    }

    fn path(&self, sheet: Sheet) -> Option<&PathBuf> {
        match sheet {
            Sheet::Glasses => self.config.glasses.as_ref(),
            Sheet::Reviews => self.config.reviews.as_ref(),
            Sheet::Companies => self.config.companies.as_ref(),
        }
    }
}

#[async_trait]
impl SheetSource for JsonFileSheets {
    async fn rows(&self, sheet: Sheet) -> AppResult<Vec<Vec<String>>> {
        let path = self.path(sheet).ok_or_else(|| {
            tracing::warn!(sheet = sheet.name(), "Sheet path not configured");
            AppError::service_unavailable(SHEET_UNAVAILABLE)
        })?;

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(sheet = sheet.name(), path = %path.display(), "Sheet read failed: {e}");
            AppError::service_unavailable(SHEET_UNAVAILABLE)
        })?;

        let cells: Vec<Vec<serde_json::Value>> = serde_json::from_str(&raw).map_err(|e| {
            AppError::internal(format!("Malformed {} sheet export: {e}", sheet.name()))
        })?;

        let rows: Vec<Vec<String>> = cells
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        tracing::debug!(sheet = sheet.name(), rows = rows.len(), "Sheet loaded");
        Ok(rows)
    }
}

/// Exports may carry numbers where the sheet showed text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
