//! JSON report adapter.

use crate::domain::error::CoinbucketError;
use crate::domain::pipeline::PipelineResult;
use crate::ports::report_port::ReportPort;
use std::fs;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn render(result: &PipelineResult) -> Result<String, CoinbucketError> {
        serde_json::to_string_pretty(result).map_err(|e| CoinbucketError::Report {
            reason: format!("failed to serialize result: {}", e),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &PipelineResult, output_path: &str) -> Result<(), CoinbucketError> {
        let content = Self::render(result)?;
        fs::write(output_path, content + "\n").map_err(|e| CoinbucketError::Report {
            reason: format!("failed to write {}: {}", output_path, e),
        })
    }
}
