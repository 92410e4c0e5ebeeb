//! Local assessment history.
//!
//! Capped at the 200 most recent records. Export as CSV or as pretty JSON of
//! the newest record.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use thiserror::Error;

use crate::db::{self, DatabaseError};
use crate::models::{HistoryRecord, PredictRequest, PredictionResult};

/// Maximum number of records kept.
pub const HISTORY_CAP: usize = 200;

pub const CSV_HEADER: [&str; 11] = [
    "ts",
    "Age",
    "Gender",
    "BMI",
    "Smoking",
    "GeneticRisk",
    "PhysicalActivity",
    "AlcoholIntake",
    "CancerHistory",
    "prediction",
    "probability_cancer",
];

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "History store opened");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Ok(Self {
            conn: db::open_memory_database()?,
        })
    }

    /// Append a record and drop anything beyond the cap.
    pub fn record(
        &self,
        payload: PredictRequest,
        response: PredictionResult,
    ) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord::new(payload, response);
        db::insert_history(&self.conn, &record)?;
        let pruned = db::prune_history(&self.conn, HISTORY_CAP)?;
        if pruned > 0 {
            tracing::debug!(pruned, "History pruned to cap");
        }
        Ok(record)
    }

    /// Most recent first.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(db::list_history(&self.conn, limit)?)
    }

    pub fn latest(&self) -> Result<Option<HistoryRecord>, HistoryError> {
        Ok(self.list(Some(1))?.into_iter().next())
    }

    /// Pretty JSON of the newest record, `None` when history is empty.
    pub fn latest_json(&self) -> Result<Option<String>, HistoryError> {
        match self.latest()? {
            Some(record) => Ok(Some(serde_json::to_string_pretty(&record)?)),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> Result<usize, HistoryError> {
        Ok(db::count_history(&self.conn)?)
    }

    pub fn is_empty(&self) -> Result<bool, HistoryError> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<usize, HistoryError> {
        let removed = db::clear_history(&self.conn)?;
        tracing::info!(removed, "History cleared");
        Ok(removed)
    }

    /// Whole history as CSV, most recent first.
    pub fn export_csv(&self) -> Result<String, HistoryError> {
        write_csv(&self.list(None)?)
    }
}

fn write_csv(records: &[HistoryRecord]) -> Result<String, HistoryError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        let p = &record.payload;
        writer.write_record([
            record.ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            p.age.to_string(),
            p.gender.code().to_string(),
            p.bmi.to_string(),
            u8::from(p.smoking).to_string(),
            p.genetic_risk.code().to_string(),
            p.physical_activity.to_string(),
            p.alcohol_intake.to_string(),
            u8::from(p.cancer_history).to_string(),
            u8::from(record.response.prediction).to_string(),
            record.response.probability_cancer.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| HistoryError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for a CSV export made at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("dss_history_{}.csv", now.format("%Y-%m-%d-%H-%M-%S"))
}
