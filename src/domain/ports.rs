use crate::core::collector::ResultCollector;
use crate::domain::model::{InstitutionRecord, ReportOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::SystemTime;

/// File access rooted at the data directory.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Last modification time, or `None` when the file does not exist.
    fn modified(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<SystemTime>>> + Send;
    fn full_path(&self, path: &str) -> PathBuf;
}

pub trait ConfigProvider: Send + Sync {
    fn probe_endpoint(&self) -> &str;
    fn archive_url(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn limit(&self) -> Option<usize>;
    fn include_inactive(&self) -> bool;
    fn size_threshold(&self) -> u64;
    fn show_progress(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<InstitutionRecord>>;
    async fn transform(&self, data: Vec<InstitutionRecord>) -> Result<ResultCollector>;
    async fn load(&self, result: ResultCollector) -> Result<ReportOutcome>;
}
