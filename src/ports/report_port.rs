//! Report generation port trait.

use crate::domain::error::CoinbucketError;
use crate::domain::pipeline::PipelineResult;

/// Port for writing pipeline results.
pub trait ReportPort {
    fn write(&self, result: &PipelineResult, output_path: &str) -> Result<(), CoinbucketError>;
}
