use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use log::error;

use tkl2gpx::convert::{run, ConvertConfig, ErrorPolicy};

const USAGE: &str =
    "Usage: tkl2gpx [--pause-threshold-ms <n>] [--skip-errors] <file-or-folder> <output-folder>";

fn main() -> ExitCode {
    env_logger::init();

    let mut config = ConvertConfig::default();
    let mut positional: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--skip-errors" => config.error_policy = ErrorPolicy::Skip,
            "--pause-threshold-ms" => match args.next().and_then(|v| v.parse().ok()) {
                Some(ms) => config.pause_threshold_ms = ms,
                None => {
                    eprintln!("--pause-threshold-ms expects a number of milliseconds");
                    eprintln!("{USAGE}");
                    return ExitCode::from(2);
                }
            },
            _ => positional.push(arg),
        }
    }

    if positional.len() < 2 {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    let input = PathBuf::from(&positional[0]);
    let output_root = PathBuf::from(&positional[1]);

    match run(&input, &output_root, &config) {
        Ok(report) => {
            println!(
                "Processed {} files, {} failed.",
                report.files.len(),
                report.failed()
            );
            if report.failed() > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
