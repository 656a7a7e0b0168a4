use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};

use super::ClusterParams;

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOutcome {
    /// One label in `0..n_clusters` per input row.
    pub labels: Vec<usize>,
    /// Sum of squared distances of the winning run.
    pub inertia: f64,
}

/// Fit k-means with `params.n_init` k-means++ restarts and label every row.
///
/// Panics raised inside linfa (e.g. its k-means++ sampler on degenerate
/// distances) are returned as errors.
pub fn run_kmeans(records: &Array2<f64>, params: &ClusterParams) -> Result<KMeansOutcome, String> {
    let dataset = DatasetBase::from(records.clone());
    let fitted = panic::catch_unwind(AssertUnwindSafe(
        || -> Result<(Array1<usize>, f64), String> {
            let model = KMeans::params(params.n_clusters)
                .n_runs(params.n_init)
                .max_n_iterations(params.max_iterations)
                .tolerance(params.tolerance)
                .fit(&dataset)
                .map_err(|err| format!("KMeans clustering failed: {err}"))?;
            let labels = model.predict(dataset.records());
            Ok((labels, model.inertia()))
        },
    ));
    let (labels, inertia) = match fitted {
        Ok(result) => result?,
        Err(payload) => {
            return Err(format!(
                "KMeans clustering failed: {}",
                panic_message(payload.as_ref())
            ));
        }
    };
    if labels.len() != records.nrows() {
        return Err("Cluster label length mismatch".to_string());
    }
    Ok(KMeansOutcome {
        labels: labels.to_vec(),
        inertia,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "clustering panicked"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn separates_two_obvious_groups() {
        let records = array![[0.0, 0.0], [0.1, 0.2], [10.0, 10.0], [10.2, 9.9]];
        let outcome = run_kmeans(&records, &ClusterParams::with_clusters(2)).unwrap();
        assert_eq!(outcome.labels.len(), 4);
        assert_eq!(outcome.labels[0], outcome.labels[1]);
        assert_eq!(outcome.labels[2], outcome.labels[3]);
        assert_ne!(outcome.labels[0], outcome.labels[2]);
        assert!(outcome.inertia < 1.0);
    }

    #[test]
    fn labels_stay_below_cluster_count() {
        let records = array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0], [8.0, 8.0], [9.0, 7.0]];
        let outcome = run_kmeans(&records, &ClusterParams::with_clusters(3)).unwrap();
        assert!(outcome.labels.iter().all(|label| *label < 3));
    }

    #[test]
    fn overflowing_distances_become_an_error() {
        let records = array![[1e308, 1e308], [1.5e308, 1.5e308], [-1e308, -1e308]];
        let err = run_kmeans(&records, &ClusterParams::with_clusters(2)).unwrap_err();
        assert!(err.starts_with("KMeans clustering failed"));
    }
}
