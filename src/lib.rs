pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::storage::LocalStorage;
pub use app::pipelines::probe_pipeline::ProbePipeline;
pub use config::Settings;
pub use crate::core::{engine::ProbeEngine, job::ProbeJob};
pub use domain::model::{InstitutionRecord, ProbeOutcome, ReportOutcome};
pub use utils::error::{ProbeError, Result};
