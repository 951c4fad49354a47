use anyhow::{anyhow, Context, Result};
use glob::glob;
use plaidcomp::{report, FieldSpec, Formatter};
use rayon::prelude::*;
use std::{
    env, fs,
    path::{Path, PathBuf},
    process::exit,
    time::Instant,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable naming a YAML/JSON field profile to use instead of the default.
const FIELD_SPEC_ENV: &str = "PLAIDCOMP_FIELD_SPEC";
const DEFAULT_OUT_DIR: &str = "out";

fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <CSV_GLOB> [OUT_DIR]", args[0]);
        eprintln!("  {}=<profile.yaml|json>  override the column mapping", FIELD_SPEC_ENV);
        exit(2);
    }
    let out_dir = PathBuf::from(args.get(2).map(String::as_str).unwrap_or(DEFAULT_OUT_DIR));

    if let Err(e) = run(&args[1], &out_dir) {
        error!("{:#}", e);
        exit(1);
    }
}

fn run(pattern: &str, out_dir: &Path) -> Result<()> {
    let start = Instant::now();

    // ─── 2) field profile ────────────────────────────────────────────
    let spec = match env::var_os(FIELD_SPEC_ENV) {
        Some(path) => FieldSpec::from_path(&path)
            .with_context(|| format!("{} points at an unusable profile", FIELD_SPEC_ENV))?,
        None => FieldSpec::default(),
    };
    let formatter = Formatter::new(spec);

    // ─── 3) discover inputs ──────────────────────────────────────────
    let inputs: Vec<PathBuf> = glob(pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    if inputs.is_empty() {
        return Err(anyhow!("No input files match '{}'", pattern));
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {:?}", out_dir))?;
    info!(files = inputs.len(), out = %out_dir.display(), "startup");

    // ─── 4) one independent pass per file ────────────────────────────
    let stems = report::output_stems(&inputs)?;
    let failures: Vec<(PathBuf, anyhow::Error)> = inputs
        .par_iter()
        .zip(stems.par_iter())
        .filter_map(|(path, stem)| {
            match report::process_file(path, stem, &formatter, out_dir) {
                Ok(outputs) => {
                    info!(input = %path.display(), stats = %outputs.stats_json.display(), "done");
                    None
                }
                Err(err) => {
                    error!(input = %path.display(), "{:#}", err);
                    Some((path.clone(), err))
                }
            }
        })
        .collect();

    info!(
        ok = inputs.len() - failures.len(),
        failed = failures.len(),
        elapsed = ?start.elapsed(),
        "finished"
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} files failed (first: {})",
            failures.len(),
            inputs.len(),
            failures[0].0.display()
        ))
    }
}
