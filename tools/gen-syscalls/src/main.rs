//! Syscall surface generator.
//!
//! Runs once per kernel build. Reads the syscall descriptor JSON emitted by
//! the upstream parser and produces the dispatch table source, the shared
//! `syscall_list.h` header (on stdout by default) and one invocation stub
//! header per function under the base output directory.
//!
//! Pipeline: load config → load descriptors → validate → render → stage and
//!           commit files → stream listing.

mod cli;
mod verbose;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use syscall_codegen::config::GenConfig;
use syscall_codegen::descriptor;
use syscall_codegen::output::{self, OutputPaths, WrittenArtifacts};

use crate::verbose::{Timer, dprintln, vprintln};

/// Everything one run needs, resolved from the command line.
struct Options {
    input: PathBuf,
    config: Option<PathBuf>,
    outputs: OutputPaths,
}

impl From<cli::Cli> for Options {
    fn from(cli: cli::Cli) -> Self {
        Self {
            input: cli.json_file,
            config: cli.config,
            outputs: OutputPaths {
                dispatch: cli.syscall_dispatch,
                header_dir: cli.base_output,
                listing: cli.syscall_list,
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    match run(&Options::from(cli)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gen-syscalls: error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load, validate, render and write every artifact.
fn run(opts: &Options) -> Result<WrittenArtifacts> {
    let config = match &opts.config {
        Some(path) => GenConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GenConfig::default(),
    };

    let descriptors = {
        let _t = Timer::start("load descriptors");
        descriptor::load(&opts.input)
            .with_context(|| format!("failed to load {}", opts.input.display()))?
    };
    vprintln!(
        "Loaded {} descriptors from {}",
        descriptors.len(),
        opts.input.display()
    );

    let artifacts = {
        let _t = Timer::start("render");
        syscall_codegen::generate(&descriptors, &config)
            .with_context(|| format!("rejected {}", opts.input.display()))?
    };

    let written = {
        let _t = Timer::start("write");
        let stdout = std::io::stdout();
        output::write_artifacts(&artifacts, &opts.outputs, &mut stdout.lock())
            .context("failed to write generated files")?
    };

    vprintln!("  -> {}", written.dispatch.display());
    if let Some(listing) = &written.listing {
        vprintln!("  -> {}", listing.display());
    }
    for header in &written.headers {
        vprintln!("  -> {}", header.display());
    }
    dprintln!(
        "gen-syscalls: {} syscalls, {} handlers, {} stub headers",
        artifacts.syscall_count,
        artifacts.handler_count,
        written.headers.len()
    );

    Ok(written)
}
