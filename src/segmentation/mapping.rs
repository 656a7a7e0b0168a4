use std::collections::{BTreeMap, HashMap};

/// Renumber labels so segments are numbered in order of first appearance.
pub fn remap_labels_by_first_appearance(labels: &mut [usize]) {
    let mut next_label = 0;
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    for label in labels.iter_mut() {
        let canonical = mapping.entry(*label).or_insert_with(|| {
            let assigned = next_label;
            next_label += 1;
            assigned
        });
        *label = *canonical;
    }
}

pub fn segment_sizes(labels: &[usize]) -> BTreeMap<usize, usize> {
    let mut sizes = BTreeMap::new();
    for label in labels {
        *sizes.entry(*label).or_insert(0) += 1;
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaps_labels_in_order_of_appearance() {
        let mut labels = vec![2, 2, 0, 1, 0];
        remap_labels_by_first_appearance(&mut labels);
        assert_eq!(labels, vec![0, 0, 1, 2, 1]);
    }

    #[test]
    fn remap_keeps_labels_dense_when_clusters_are_empty() {
        let mut labels = vec![4, 1, 4];
        remap_labels_by_first_appearance(&mut labels);
        assert_eq!(labels, vec![0, 1, 0]);
    }

    #[test]
    fn counts_rows_per_segment() {
        let sizes = segment_sizes(&[0, 1, 0, 2, 0]);
        assert_eq!(sizes.into_iter().collect::<Vec<_>>(), vec![(0, 3), (1, 1), (2, 1)]);
    }
}
