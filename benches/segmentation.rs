use criterion::{Criterion, criterion_group, criterion_main};
use segmenter::segmentation::{self, ClusterParams};
use segmenter::table;
use std::hint::black_box;

const ROW_COUNT: usize = 2_000;
const COLUMN_COUNT: usize = 6;

fn synthetic_csv(rows: usize, columns: usize) -> Vec<u8> {
    let mut csv = (0..columns)
        .map(|idx| format!("f{idx}"))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(",name\n");
    for row in 0..rows {
        let center = (row % 4) as f64 * 25.0;
        for col in 0..columns {
            let noise = ((row * 31 + col * 17) % 97) as f64 / 97.0;
            csv.push_str(&format!("{:.3},", center + noise));
        }
        csv.push_str(&format!("row{row}\n"));
    }
    csv.into_bytes()
}

fn bench_parse(c: &mut Criterion) {
    let csv = synthetic_csv(ROW_COUNT, COLUMN_COUNT);
    c.bench_function("parse_and_subset_2000x6", |b| {
        b.iter(|| {
            let table = table::parse_table(black_box(&csv)).expect("parse");
            let profiles = table::infer_profiles(&table);
            black_box(table::numeric_subset(&table, &profiles));
        })
    });
}

fn bench_cluster(c: &mut Criterion) {
    let csv = synthetic_csv(ROW_COUNT, COLUMN_COUNT);
    let params = ClusterParams::with_clusters(4);
    c.bench_function("cluster_2000x6_k4", |b| {
        b.iter(|| black_box(segmentation::cluster(black_box(&csv), &params).expect("cluster")))
    });
}

criterion_group!(benches, bench_parse, bench_cluster);
criterion_main!(benches);
