use crate::core::collector::ResultCollector;
use crate::core::engine::ProbeEngine;
use crate::core::registry::{select_institutions, RegistryLoader};
use crate::core::report::Reporter;
use crate::core::{ConfigProvider, InstitutionRecord, Pipeline, ReportOutcome, Storage};
use crate::utils::error::Result;
use reqwest::Client;

/// Registry extract, concurrent probe, filter and report.
pub struct ProbePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: Client,
}

impl<S: Storage, C: ConfigProvider> ProbePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_client(storage, config, Client::new())
    }

    pub fn with_client(storage: S, config: C, client: Client) -> Self {
        Self {
            storage,
            config,
            client,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ProbePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<InstitutionRecord>> {
        tracing::debug!("Loading registry from {}", self.config.data_dir());
        let loader = RegistryLoader::new(
            &self.storage,
            self.client.clone(),
            self.config.archive_url(),
        );
        let records = loader.load().await?;
        let total = records.len();

        let selected = select_institutions(records, self.config.include_inactive());
        tracing::debug!(
            "Selected {} of {} institutions (include inactive: {})",
            selected.len(),
            total,
            self.config.include_inactive()
        );
        Ok(selected)
    }

    async fn transform(&self, data: Vec<InstitutionRecord>) -> Result<ResultCollector> {
        let engine = ProbeEngine::new(
            self.client.clone(),
            self.config.probe_endpoint(),
            self.config.concurrent_requests(),
        )
        .with_progress(self.config.show_progress());

        engine.run(&data, self.config.limit()).await
    }

    async fn load(&self, result: ResultCollector) -> Result<ReportOutcome> {
        Reporter::new(&self.storage, self.config.size_threshold())
            .report(result.as_slice())
            .await
    }
}
