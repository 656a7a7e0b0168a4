use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use tracing::{debug, warn};

use super::AppState;
use super::models::{ClusterResponse, HealthResponse};
use crate::segmentation::{self, SegmentReport};

const FILE_FIELD: &str = "file";
const N_CLUSTERS_FIELD: &str = "n_clusters";
const NON_INTEGER_CLUSTERS: &str = "n_clusters must be an integer";

/// Parts of the multipart form accepted by `POST /cluster`.
#[derive(Debug)]
struct ClusterUpload {
    file: Bytes,
    file_name: Option<String>,
    n_clusters: Option<usize>,
}

/// `POST /cluster`: every failure becomes an `{"error": ...}` body.
pub async fn cluster(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<ClusterResponse> {
    let outcome = match multipart {
        Ok(multipart) => run_cluster(&state, multipart).await,
        Err(rejection) => Err(rejection.body_text()),
    };
    match outcome {
        Ok(report) => Json(report.into()),
        Err(message) => {
            warn!("Cluster request failed: {message}");
            Json(ClusterResponse::error(message))
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn run_cluster(state: &AppState, multipart: Multipart) -> Result<SegmentReport, String> {
    let upload = read_upload(multipart).await?;
    let params = state.config.clustering.params(upload.n_clusters);
    debug!(
        file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = upload.file.len(),
        n_clusters = params.n_clusters,
        "Received cluster upload"
    );
    let file = upload.file;
    // k-means is CPU bound; keep it off the async workers.
    let joined =
        tokio::task::spawn_blocking(move || segmentation::cluster(&file, &params)).await;
    match joined {
        Ok(result) => result.map_err(|err| err.to_string()),
        Err(err) => Err(format!("Clustering task failed: {err}")),
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<ClusterUpload, String> {
    let mut file = None;
    let mut file_name = None;
    let mut n_clusters = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("Invalid multipart body: {err}"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| format!("Failed to read uploaded file: {err}"))?;
                file = Some(bytes);
            }
            Some(N_CLUSTERS_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| format!("Failed to read n_clusters: {err}"))?;
                n_clusters = parse_n_clusters(&text)?;
            }
            _ => {}
        }
    }
    let file = file.ok_or_else(|| format!("Missing required form field: {FILE_FIELD}"))?;
    Ok(ClusterUpload {
        file,
        file_name,
        n_clusters,
    })
}

/// Blank means "use the default".
fn parse_n_clusters(text: &str) -> Result<Option<usize>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<usize>()
        .map(Some)
        .map_err(|_| NON_INTEGER_CLUSTERS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cluster_count() {
        assert_eq!(parse_n_clusters("4"), Ok(Some(4)));
        assert_eq!(parse_n_clusters(" 2 "), Ok(Some(2)));
        assert_eq!(parse_n_clusters(""), Ok(None));
    }

    #[test]
    fn rejects_non_integer_cluster_count() {
        for value in ["three", "-1", "2.5"] {
            assert_eq!(
                parse_n_clusters(value),
                Err("n_clusters must be an integer".to_string())
            );
        }
    }
}
