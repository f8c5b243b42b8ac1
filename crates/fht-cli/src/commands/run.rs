use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use fht_artifacts::{combine_csv_files, write_run_manifest, WriteManifestArgs};
use fht_ingest::{CsvFilingSource, FilingSource};
use fht_pipeline::{run_pipeline, CsvBatchSink};
use tracing::info;
use uuid::Uuid;

use super::{load_config, warn_unused_keys};

pub struct RunArgs {
    pub input: String,
    pub config_paths: Vec<String>,
    pub out: Option<String>,
    pub combine: bool,
}

/// `fht run`: pipeline over a holdings CSV, then manifest (and optionally
/// the combined file) in the output directory.
pub async fn run_pipeline_cmd(args: RunArgs) -> Result<()> {
    let loaded = load_config(&args.config_paths)?;
    warn_unused_keys(&loaded)?;
    let cfg = loaded.pipeline()?;

    let output_dir: PathBuf = args.out.clone().unwrap_or_else(|| cfg.output_dir.clone()).into();

    let source = CsvFilingSource::from_path(Path::new(&args.input))
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("load holdings failed: {}", args.input))?;
    let source: Arc<dyn FilingSource> = Arc::new(source);
    let source_name = source.name();

    let run_id = Uuid::new_v4();
    info!(%run_id, config_hash = %loaded.config_hash, out = %output_dir.display(), "run start");

    let mut sink = CsvBatchSink::new(&output_dir);
    let report = run_pipeline(source, &cfg, &mut sink).await?;

    let failed = report.failed_fund_names();
    let manifest = write_run_manifest(WriteManifestArgs {
        output_dir: &output_dir,
        run_id,
        source: source_name,
        config_hash: &loaded.config_hash,
        funds_total: report.funds_total,
        funds_failed: &failed,
        transactions_written: report.transactions_written,
        batch_files: &report.batch_files,
    })?;

    println!("run_id={}", run_id);
    println!("config_hash={}", loaded.config_hash);
    println!("funds_total={}", report.funds_total);
    println!("funds_failed={}", failed.len());
    println!("transactions_written={}", report.transactions_written);
    println!("filings_with_issues={}", report.filings_with_issues);
    for f in &report.batch_files {
        println!("batch_file={}", sink.dir().join(f).display());
    }
    println!("manifest={}", manifest.display());

    if args.combine {
        let out = output_dir.join(&cfg.combined_file);
        let res = combine_csv_files(&output_dir, &out)?;
        println!("combined={} rows={}", out.display(), res.rows);
    }

    Ok(())
}
