//! K-means segmentation of uploaded tabular data.
//!
//! [`cluster`] is the whole request contract: parse the upload, pick the
//! numeric columns, drop incomplete rows, run k-means and summarize each
//! segment by its per-column means.

mod engine;
mod mapping;
mod summary;
mod validation;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::table::{self, ColumnKind, TableError};

pub use self::engine::{KMeansOutcome, run_kmeans};
pub use self::mapping::{remap_labels_by_first_appearance, segment_sizes};
pub use self::summary::{round_to_cents, summarize_segments};
pub use self::validation::{ensure_distances_representable, ensure_finite, validate_params};

/// Cluster count used when the caller does not supply one.
pub const DEFAULT_N_CLUSTERS: usize = 3;
/// Number of k-means++ restarts; the lowest-inertia run wins.
pub const DEFAULT_N_INIT: usize = 10;
pub const DEFAULT_MAX_ITERATIONS: u64 = 300;
pub const DEFAULT_TOLERANCE: f64 = 1e-4;
/// Minimum number of numeric columns required before clustering.
pub const MIN_NUMERIC_COLUMNS: usize = 2;

/// Column name -> segment label -> mean, rounded to 2 decimals.
pub type SegmentSummary = BTreeMap<String, BTreeMap<usize, f64>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_N_CLUSTERS,
            n_init: DEFAULT_N_INIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ClusterParams {
    pub fn with_clusters(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Self::default()
        }
    }
}

/// Result of a successful segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReport {
    pub segments: SegmentSummary,
    pub columns: Vec<String>,
    pub n_clusters: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
    /// Row count per populated segment label.
    pub segment_sizes: BTreeMap<usize, usize>,
    pub inertia: f64,
}

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Please upload a file with at least 2 numerical columns.")]
    InsufficientNumericColumns { found: usize },
    #[error("{0}")]
    InvalidParams(String),
    #[error("n_samples={n_samples} should be >= n_clusters={n_clusters}.")]
    TooFewRows { n_samples: usize, n_clusters: usize },
    #[error("Input X contains infinity or a value too large for dtype('float64').")]
    NonFiniteInput,
    #[error("Input X contains values too large to cluster: squared distances overflow float64.")]
    ValuesTooLarge,
    #[error("{0}")]
    Clustering(String),
}

/// Segment the delimited file in `bytes` into `params.n_clusters` groups.
pub fn cluster(bytes: &[u8], params: &ClusterParams) -> Result<SegmentReport, SegmentError> {
    let table = table::parse_table(bytes)?;
    let profiles = table::infer_profiles(&table);
    let numeric_count = profiles
        .iter()
        .filter(|profile| profile.kind == ColumnKind::Numeric)
        .count();
    if numeric_count < MIN_NUMERIC_COLUMNS {
        debug!(
            columns = profiles.len(),
            numeric = numeric_count,
            "Rejecting upload without enough numeric columns"
        );
        return Err(SegmentError::InsufficientNumericColumns {
            found: numeric_count,
        });
    }
    let subset = table::numeric_subset(&table, &profiles);
    validate_params(params, subset.n_rows())?;
    ensure_finite(&subset.records)?;
    ensure_distances_representable(&subset.records)?;
    let outcome = run_kmeans(&subset.records, params).map_err(SegmentError::Clustering)?;
    let mut labels = outcome.labels;
    remap_labels_by_first_appearance(&mut labels);
    let segments = summarize_segments(&subset, &labels).map_err(SegmentError::Clustering)?;
    let sizes = segment_sizes(&labels);
    let rows_used = subset.n_rows();
    let rows_dropped = table.row_count() - rows_used;
    info!(
        rows = rows_used,
        dropped = rows_dropped,
        columns = subset.n_columns(),
        n_clusters = params.n_clusters,
        populated = sizes.len(),
        inertia = outcome.inertia,
        "Segmentation finished"
    );
    Ok(SegmentReport {
        segments,
        columns: subset.columns,
        n_clusters: params.n_clusters,
        rows_used,
        rows_dropped,
        segment_sizes: sizes,
        inertia: outcome.inertia,
    })
}
