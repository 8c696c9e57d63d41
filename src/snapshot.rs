//! Plain-text dumps of the sampler state.
//!
//! A snapshot is the one-line state header followed by one tab-separated
//! line per (view, document, token) triple:
//!
//! ```text
//! doc_ix  token_ix  view_ix  cluster_of_doc_in_view  view_of_token
//! ```
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use softcc_cc::SoftCrossCat;

/// Summary statistics that go into the snapshot header
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub loglike: f64,
    pub best_loglike: f64,
    pub best_iter: usize,
}

/// Write the snapshot of `sampler` to `writer`
pub fn write_snapshot<W: Write>(
    writer: &mut W,
    sampler: &SoftCrossCat,
    fit: Fit,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        sampler.current_state(fit.loglike, fit.best_loglike, fit.best_iter)
    )?;

    for view_ix in 0..sampler.n_views() {
        for doc_ix in 0..sampler.n_docs() {
            let k = sampler.doc_clusters(doc_ix)[view_ix];
            for (token_ix, m) in
                sampler.token_views(doc_ix).iter().enumerate()
            {
                writeln!(writer, "{doc_ix}\t{token_ix}\t{view_ix}\t{k}\t{m}")?;
            }
        }
    }
    Ok(())
}

/// The file a snapshot with the given prefix (e.g. `best`) is saved to
pub fn snapshot_path(
    output_dir: &Path,
    sampler: &SoftCrossCat,
    seed: u64,
    prefix: &str,
) -> PathBuf {
    let stem = sampler
        .corpus()
        .source()
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("corpus");
    let config = sampler.config();
    let filename = format!(
        "{stem}-alpha{}-eta{}-xi{}-{seed}-{prefix}.hlda",
        config.alpha, config.eta, config.xi,
    );
    output_dir.join(filename)
}

/// Write a snapshot to [`snapshot_path`] and return the path
pub fn save_snapshot(
    output_dir: &Path,
    sampler: &SoftCrossCat,
    seed: u64,
    prefix: &str,
    fit: Fit,
) -> io::Result<PathBuf> {
    let path = snapshot_path(output_dir, sampler, seed, prefix);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_snapshot(&mut writer, sampler, fit)?;
    writer.flush()?;
    info!("Wrote snapshot to {}", path.display());
    Ok(path)
}
