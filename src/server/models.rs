use serde::{Deserialize, Serialize};

use crate::segmentation::{SegmentReport, SegmentSummary};

/// JSON body returned by `POST /cluster`; always sent with status 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterResponse {
    Segments {
        segments: SegmentSummary,
        columns: Vec<String>,
        n_clusters: usize,
    },
    Error {
        error: String,
    },
}

impl ClusterResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ClusterResponse::Error {
            error: message.into(),
        }
    }
}

impl From<SegmentReport> for ClusterResponse {
    fn from(report: SegmentReport) -> Self {
        ClusterResponse::Segments {
            segments: report.segments,
            columns: report.columns,
            n_clusters: report.n_clusters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
