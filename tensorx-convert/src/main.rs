use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod convert;
mod inspect;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args.command) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tensorx={level},tensorx_convert={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run(cmd: cli::Command) -> Result<()> {
    match cmd {
        cli::Command::Encode(args) => {
            let out = args
                .out
                .clone()
                .unwrap_or_else(|| with_extension(&args.input, "tensor"));
            convert::encode_file(&args.input, &out)
        }
        cli::Command::Decode(args) => {
            let out = args
                .out
                .clone()
                .unwrap_or_else(|| with_extension(&args.input, "png"));
            convert::decode_file(&args.input, &out)
        }
        cli::Command::Inspect(args) => inspect::run_inspect(&args.input),
    }
}

/// `<dir>/<stem>.<ext>` next to `input`.
fn with_extension(input: &Path, ext: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input.file_stem().unwrap_or_else(|| OsStr::new("out"));

    let mut filename = stem.to_os_string();
    filename.push(".");
    filename.push(ext);

    let mut out = parent.to_path_buf();
    out.push(filename);
    out
}
