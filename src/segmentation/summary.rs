use std::collections::BTreeMap;

use crate::table::NumericSubset;

use super::SegmentSummary;

/// Mean of every numeric column within each populated segment.
///
/// `labels` must be aligned with the subset's retained rows.
pub fn summarize_segments(
    subset: &NumericSubset,
    labels: &[usize],
) -> Result<SegmentSummary, String> {
    if labels.len() != subset.n_rows() {
        return Err(format!(
            "Cluster label length mismatch: expected {}, got {}",
            subset.n_rows(),
            labels.len()
        ));
    }
    let mut sums: BTreeMap<usize, (Vec<f64>, usize)> = BTreeMap::new();
    for (row, label) in subset.records.rows().into_iter().zip(labels) {
        let entry = sums
            .entry(*label)
            .or_insert_with(|| (vec![0.0; subset.n_columns()], 0));
        for (sum, value) in entry.0.iter_mut().zip(row.iter()) {
            *sum += *value;
        }
        entry.1 += 1;
    }
    let mut summary = SegmentSummary::new();
    for (col_idx, name) in subset.columns.iter().enumerate() {
        let means = sums
            .iter()
            .map(|(label, (totals, count))| {
                (*label, round_to_cents(totals[col_idx] / *count as f64))
            })
            .collect();
        summary.insert(name.clone(), means);
    }
    Ok(summary)
}

/// Round to 2 decimals, ties to even.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
