//! Query routing in front of the allocation pipeline.

use crate::domain::pipeline::{Pipeline, PipelineResult};

const BUCKET_KEYWORDS: [&str; 2] = ["bucket", "portfolio"];

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// The query asked for buckets and the pipeline ran.
    Bucket(PipelineResult),
    /// Not a bucket query; the caller should answer it some other way.
    Unhandled,
}

pub fn is_bucket_query(text: &str) -> bool {
    let t = text.to_lowercase();
    BUCKET_KEYWORDS.iter().any(|k| t.contains(k))
}

pub fn route_query(text: &str, pipeline: &Pipeline<'_>) -> Route {
    if is_bucket_query(text) {
        Route::Bucket(pipeline.run(text))
    } else {
        Route::Unhandled
    }
}
