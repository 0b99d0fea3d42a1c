use crate::core::{Pipeline, ReportOutcome};
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a pipeline's extract, transform and load phases in order.
pub struct ProbeJob<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ProbeJob<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ReportOutcome> {
        let started = Instant::now();
        tracing::info!("Starting FDIC.gov probe");

        let records = self.pipeline.extract().await?;
        tracing::info!("Loaded {} institutions ({:?})", records.len(), started.elapsed());

        let results = self.pipeline.transform(records).await?;
        tracing::info!("Collected {} probe outcomes ({:?})", results.len(), started.elapsed());

        let outcome = self.pipeline.load(results).await?;
        match &outcome {
            ReportOutcome::Written(path) => {
                tracing::info!("Results written to {} ({:?})", path.display(), started.elapsed())
            }
            ReportOutcome::NoFilersFound => tracing::info!("No filers found"),
        }

        Ok(outcome)
    }
}
