//! Per-file conversion and batch orchestration.
//!
//! Walks the input (one file or a directory tree), decodes every `.tkl`
//! file, renders GPX, and mirrors the input directory structure under the
//! output root. Strictly sequential; each file stands alone and no state is
//! shared across files.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::error::{Result, TklError};
use crate::gpx::{render_gpx, GpxConfig};
use crate::segment::{split_on_pauses, DEFAULT_PAUSE_THRESHOLD_MS};
use crate::tkl;

/// What to do when a single file fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the run at the first failing file (the original tool's
    /// behavior).
    Abort,
    /// Record the failure and continue with the next file.
    Skip,
}

/// Batch conversion configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConvertConfig {
    /// Recording gap above which a new `<trkseg>` starts, in milliseconds.
    pub pause_threshold_ms: i64,
    /// Per-file failure policy.
    pub error_policy: ErrorPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: DEFAULT_PAUSE_THRESHOLD_MS,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

/// Successful conversion of one file.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    /// Where the GPX document was written
    pub output: PathBuf,
    /// Number of decoded track points
    pub points: usize,
    /// Number of pause gaps found (segments minus one)
    pub pauses: usize,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub outcome: Result<ConvertedFile>,
}

/// Inspectable result-per-file outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One report per attempted file, in processing order
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Number of files converted successfully.
    pub fn converted(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_ok()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.files.len() - self.converted()
    }
}

/// Compute the mirrored output path for `file`.
///
/// The relative directory structure under `input_root` is reproduced under
/// `output_root`, and `.gpx` is appended to the file name:
/// `root/sub/a.tkl` with roots `root`/`out` maps to `out/sub/a.tkl.gpx`.
/// When the input root is the file itself the output lands directly in
/// `output_root`.
pub fn output_path_for(input_root: &Path, output_root: &Path, file: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .unwrap_or(file.as_os_str())
        .to_os_string();
    name.push(".gpx");

    let relative_dir = file
        .strip_prefix(input_root)
        .ok()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty());

    match relative_dir {
        Some(dir) => output_root.join(dir).join(name),
        None => output_root.join(name),
    }
}

/// Convert a single `.tkl` file and write the GPX document to `output`,
/// creating parent directories as needed.
pub fn convert_file(input: &Path, output: &Path, config: &ConvertConfig) -> Result<ConvertedFile> {
    info!("processing {}", input.display());

    let bytes = fs::read(input)?;
    let log = tkl::decode(&bytes)?;

    let name = output
        .file_name()
        .unwrap_or(output.as_os_str())
        .to_string_lossy()
        .into_owned();
    let gpx_config = GpxConfig {
        pause_threshold_ms: config.pause_threshold_ms,
    };
    let xml = render_gpx(&log, &name, &gpx_config)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &xml)?;

    let pauses = split_on_pauses(&log.points, config.pause_threshold_ms)
        .len()
        .saturating_sub(1);
    info!("finished {}", output.display());

    Ok(ConvertedFile {
        output: output.to_path_buf(),
        points: log.points.len(),
        pauses,
    })
}

/// Convert `input` (a `.tkl` file or a directory searched recursively) into
/// `output_root`.
///
/// The output root must already be a directory; that check happens once and
/// failing it is fatal for the whole run. Individual file failures follow
/// `config.error_policy` and are always recorded in the returned report.
pub fn run(input: &Path, output_root: &Path, config: &ConvertConfig) -> Result<RunReport> {
    if !output_root.is_dir() {
        return Err(TklError::OutputPathInvalid {
            path: output_root.to_path_buf(),
        });
    }

    let inputs = if input.is_dir() {
        let mut found = Vec::new();
        collect_tkl_files(input, &mut found)?;
        found
    } else {
        vec![input.to_path_buf()]
    };

    let mut report = RunReport::default();
    for file in inputs {
        let output = output_path_for(input, output_root, &file);
        let outcome = convert_file(&file, &output, config);
        if let Err(err) = &outcome {
            error!("failed to convert {}: {err}", file.display());
        }
        let failed = outcome.is_err();
        report.files.push(FileReport {
            input: file,
            outcome,
        });
        if failed && config.error_policy == ErrorPolicy::Abort {
            break;
        }
    }

    info!(
        "processed {} files, {} failed",
        report.files.len(),
        report.failed()
    );
    Ok(report)
}

/// Recursively collect `.tkl` files under `dir`, sorted so run reports are
/// deterministic.
fn collect_tkl_files(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_tkl_files(&path, found)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tkl"))
        {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_mirrors_subdirectories() {
        let out = output_path_for(
            Path::new("root"),
            Path::new("out"),
            Path::new("root/sub/a.tkl"),
        );
        assert_eq!(out, Path::new("out/sub/a.tkl.gpx"));
    }

    #[test]
    fn test_output_path_nested() {
        let out = output_path_for(
            Path::new("root"),
            Path::new("out"),
            Path::new("root/2010/06/a.tkl"),
        );
        assert_eq!(out, Path::new("out/2010/06/a.tkl.gpx"));
    }

    #[test]
    fn test_output_path_top_level_file() {
        let out = output_path_for(Path::new("root"), Path::new("out"), Path::new("root/a.tkl"));
        assert_eq!(out, Path::new("out/a.tkl.gpx"));
    }

    #[test]
    fn test_output_path_single_file_input() {
        // Input root is the file itself.
        let out = output_path_for(
            Path::new("somewhere/a.tkl"),
            Path::new("out"),
            Path::new("somewhere/a.tkl"),
        );
        assert_eq!(out, Path::new("out/a.tkl.gpx"));
    }

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.pause_threshold_ms, DEFAULT_PAUSE_THRESHOLD_MS);
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
    }
}
