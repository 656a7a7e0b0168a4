use ndarray::Array2;

use super::{ClusterParams, SegmentError};

/// Check the clustering parameters against the number of usable rows.
pub fn validate_params(params: &ClusterParams, n_samples: usize) -> Result<(), SegmentError> {
    if params.n_clusters == 0 {
        return Err(SegmentError::InvalidParams(
            "n_clusters must be greater than zero".to_string(),
        ));
    }
    if params.n_init == 0 {
        return Err(SegmentError::InvalidParams(
            "n_init must be greater than zero".to_string(),
        ));
    }
    if params.max_iterations == 0 {
        return Err(SegmentError::InvalidParams(
            "max_iterations must be greater than zero".to_string(),
        ));
    }
    if params.tolerance.is_nan() || params.tolerance <= 0.0 {
        return Err(SegmentError::InvalidParams(
            "tolerance must be greater than zero".to_string(),
        ));
    }
    if n_samples < params.n_clusters {
        return Err(SegmentError::TooFewRows {
            n_samples,
            n_clusters: params.n_clusters,
        });
    }
    Ok(())
}

pub fn ensure_finite(records: &Array2<f64>) -> Result<(), SegmentError> {
    if records.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(SegmentError::NonFiniteInput)
    }
}

/// Reject finite records whose summed squared distances overflow `f64`.
///
/// k-means++ seeding samples rows weighted by squared distance, so every
/// distance and their total must stay finite.
pub fn ensure_distances_representable(records: &Array2<f64>) -> Result<(), SegmentError> {
    let mut bound = 0.0_f64;
    for column in records.columns() {
        let (min, max) = column
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
                (lo.min(*value), hi.max(*value))
            });
        if min > max {
            continue;
        }
        let spread = max - min;
        bound += spread * spread;
    }
    bound *= records.nrows() as f64;
    if bound.is_finite() {
        Ok(())
    } else {
        Err(SegmentError::ValuesTooLarge)
    }
}
