/// Customers in three well-separated groups, `per_group` rows each.
///
/// Rows are interleaved low/mid/high so the first row is always in the low group.
pub fn customers_csv(per_group: usize) -> String {
    let mut csv = String::from("age,income,name\n");
    for idx in 0..per_group {
        let jitter = (idx % 5) as f64 * 0.5;
        csv.push_str(&format!("{},{},low{idx}\n", 22.0 + jitter, 18_000.0 + jitter * 100.0));
        csv.push_str(&format!("{},{},mid{idx}\n", 41.0 + jitter, 55_000.0 + jitter * 100.0));
        csv.push_str(&format!("{},{},high{idx}\n", 63.0 + jitter, 120_000.0 + jitter * 100.0));
    }
    csv
}

pub fn text_only_csv() -> &'static str {
    "name,city\nann,paris\nbob,rome\ncid,oslo\n"
}
