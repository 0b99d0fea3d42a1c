use crate::domain::model::{ProbeOutcome, ReportOutcome};
use crate::domain::ports::Storage;
use crate::utils::error::{ProbeError, Result};
use serde::Serialize;

/// Pages larger than this are taken to be real filer detail pages rather
/// than the boilerplate "not found" page.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 10051;
pub const RESULTS_FILE: &str = "results.csv";

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Name")]
    name: Option<&'a str>,
    #[serde(rename = "Cert")]
    cert: Option<i64>,
    #[serde(rename = "Status Code")]
    status_code: Option<u16>,
    #[serde(rename = "Content Length")]
    content_length: Option<u64>,
}

impl<'a> From<&'a ProbeOutcome> for ReportRow<'a> {
    fn from(outcome: &'a ProbeOutcome) -> Self {
        Self {
            name: outcome.name.as_deref(),
            cert: outcome.identifier,
            status_code: outcome.status_code,
            content_length: outcome.content_length,
        }
    }
}

/// Outcomes whose content length strictly exceeds `threshold`.
pub fn filter_filers(outcomes: &[ProbeOutcome], threshold: u64) -> Vec<&ProbeOutcome> {
    outcomes
        .iter()
        .filter(|outcome| outcome.content_length.is_some_and(|len| len > threshold))
        .collect()
}

pub struct Reporter<'s, S: Storage> {
    storage: &'s S,
    threshold: u64,
}

impl<'s, S: Storage> Reporter<'s, S> {
    pub fn new(storage: &'s S, threshold: u64) -> Self {
        Self { storage, threshold }
    }

    pub async fn report(&self, outcomes: &[ProbeOutcome]) -> Result<ReportOutcome> {
        let filers = filter_filers(outcomes, self.threshold);
        tracing::info!(
            "{} of {} probes exceed {} bytes",
            filers.len(),
            outcomes.len(),
            self.threshold
        );

        if filers.is_empty() {
            return Ok(ReportOutcome::NoFilersFound);
        }

        self.write_rows(&filers).await.map(ReportOutcome::Written)
    }

    pub async fn write_rows(&self, rows: &[&ProbeOutcome]) -> Result<std::path::PathBuf> {
        if rows.is_empty() {
            return Err(ProbeError::OutputError {
                message: "Missing results".to_string(),
            });
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for outcome in rows {
            writer.serialize(ReportRow::from(*outcome))?;
        }
        let data = writer.into_inner().map_err(|e| ProbeError::OutputError {
            message: e.to_string(),
        })?;

        self.storage
            .write_file(RESULTS_FILE, &data)
            .await
            .map_err(|e| ProbeError::OutputError {
                message: e.to_string(),
            })?;

        let path = self.storage.full_path(RESULTS_FILE);
        tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}
