pub mod collector;
pub mod correlation;
pub mod engine;
pub mod job;
pub mod registry;
pub mod report;
pub mod sequence;

pub use crate::domain::model::{InstitutionRecord, ProbeOutcome, ReportOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
