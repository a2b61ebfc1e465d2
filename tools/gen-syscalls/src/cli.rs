//! Command-line interface definitions for gen-syscalls.

use std::path::PathBuf;

use clap::Parser;

/// Generate the syscall dispatch table, ID listing and invocation stubs.
///
/// The listing header is written to standard output unless `--syscall-list`
/// is given.
#[derive(Parser)]
#[command(name = "gen-syscalls", version, about)]
pub struct Cli {
    /// Read syscall descriptors from this JSON file.
    #[arg(long, short = 'i')]
    pub json_file: PathBuf,

    /// Output C system call dispatch table file.
    #[arg(long, short = 'd')]
    pub syscall_dispatch: PathBuf,

    /// Base output directory for syscall invocation headers.
    #[arg(long, short = 'o')]
    pub base_output: PathBuf,

    /// Write the syscall list header to this file instead of stdout.
    #[arg(long, short = 'l')]
    pub syscall_list: Option<PathBuf>,

    /// TOML file overriding symbol names and includes.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Suppress all diagnostics except errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print per-file diagnostics and timings.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
