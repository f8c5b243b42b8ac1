use std::path::Path;

use anyhow::Result;
use fht_artifacts::combine_csv_files;
use fht_config::pipeline::DEFAULT_COMBINED_FILE;

pub fn run_combine(dir: &str, out: Option<&str>) -> Result<()> {
    let dir = Path::new(dir);
    let out = out
        .map(Path::new)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(DEFAULT_COMBINED_FILE));

    let res = combine_csv_files(dir, &out)?;
    println!("files={}", res.files.len());
    println!("rows={}", res.rows);
    println!("out={}", out.display());
    Ok(())
}
