//! Developer utility that segments a local CSV file the same way `POST /cluster` does.

use std::path::PathBuf;

use segmenter::segmentation::{self, ClusterParams};
use segmenter::server::ClusterResponse;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let bytes = std::fs::read(&options.file)
        .map_err(|err| format!("Read {} failed: {err}", options.file.display()))?;
    let response = match segmentation::cluster(&bytes, &options.params) {
        Ok(report) => {
            eprintln!(
                "Used {} rows ({} dropped), inertia {:.4}",
                report.rows_used, report.rows_dropped, report.inertia
            );
            for (label, size) in &report.segment_sizes {
                eprintln!("  segment {label}: {size} rows");
            }
            ClusterResponse::from(report)
        }
        Err(err) => ClusterResponse::error(err.to_string()),
    };
    let json = if options.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .map_err(|err| format!("Serialize response failed: {err}"))?;
    println!("{json}");
    Ok(())
}

#[derive(Debug, Clone)]
struct Options {
    file: PathBuf,
    params: ClusterParams,
    pretty: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut file: Option<PathBuf> = None;
    let mut params = ClusterParams::default();
    let mut pretty = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--file" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--file requires a value".to_string())?;
                file = Some(PathBuf::from(value));
            }
            "--n-clusters" => {
                idx += 1;
                params.n_clusters = parse_count(&args, idx, "--n-clusters")?;
            }
            "--n-init" => {
                idx += 1;
                params.n_init = parse_count(&args, idx, "--n-init")?;
            }
            "--pretty" => {
                pretty = true;
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    let file = file.ok_or_else(|| "--file is required".to_string())?;
    Ok(Some(Options {
        file,
        params,
        pretty,
    }))
}

fn parse_count(args: &[String], idx: usize, flag: &str) -> Result<usize, String> {
    let value = args
        .get(idx)
        .ok_or_else(|| format!("{flag} requires a value"))?;
    value
        .parse::<usize>()
        .map_err(|_| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    [
        "segmenter-cluster",
        "",
        "Run k-means segmentation on a CSV file and print the JSON response.",
        "",
        "Usage:",
        "  segmenter-cluster --file <path> [options]",
        "",
        "Options:",
        "  --file <path>        CSV file with a header row (required).",
        "  --n-clusters <k>     Number of segments (default: 3).",
        "  --n-init <n>         k-means restarts; best inertia wins (default: 10).",
        "  --pretty             Pretty-print the JSON output.",
    ]
    .join("\n")
}
