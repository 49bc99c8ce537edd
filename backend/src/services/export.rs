//! Progress report export
//!
//! CSV with columns `date,weight,mood,intensity,notes`, one row per
//! check-in in log order.

use crate::error::ApiError;
use fit_ai_shared::ProgressEntry;
use serde::Serialize;

/// CSV export row for a progress check-in
#[derive(Debug, Clone, Serialize)]
pub struct ProgressCsvRow<'a> {
    pub date: String,
    pub weight: f64,
    pub mood: &'static str,
    pub intensity: &'static str,
    pub notes: &'a str,
}

impl<'a> From<&'a ProgressEntry> for ProgressCsvRow<'a> {
    fn from(entry: &'a ProgressEntry) -> Self {
        Self {
            date: entry.date().format("%Y-%m-%d").to_string(),
            weight: entry.weight(),
            mood: entry.mood().as_str(),
            intensity: entry.intensity().as_str(),
            notes: entry.notes().unwrap_or_default(),
        }
    }
}

/// Progress report export service
pub struct ExportService;

impl ExportService {
    /// Export the progress log as CSV
    pub fn export_progress_csv(entries: &[ProgressEntry]) -> Result<String, ApiError> {
        let rows: Vec<ProgressCsvRow<'_>> = entries.iter().map(ProgressCsvRow::from).collect();
        Self::to_csv(&rows)
    }

    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        if data.is_empty() {
            // serialize() writes headers lazily; an empty report still gets them
            wtr.write_record(["date", "weight", "mood", "intensity", "notes"])
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}
