//! Build-time generator for the kernel system-call surface.
//!
//! Given the descriptor set produced by the upstream syscall parser, this
//! crate renders three kinds of C artifacts:
//!
//! - the dispatch table mapping syscall IDs to privileged handlers, with a
//!   weak fallback alias for every handler so the link succeeds even when a
//!   subsystem is configured out,
//! - the shared `syscall_list.h` header with the sorted ID enumeration and
//!   handler prototypes,
//! - one invocation stub header per target function.
//!
//! Output is byte-identical for identical input. Nothing is written until
//! the whole descriptor set has been loaded and validated, and every file is
//! replaced atomically.
//!
//! # Usage
//!
//! Invoke via the `gen-syscalls` tool, which reads the descriptor JSON and
//! an optional TOML configuration and calls [`generate`] followed by
//! [`output::write_artifacts`].

pub mod config;
pub mod descriptor;
pub mod error;
pub mod output;
pub mod render;
pub mod syscalls;
pub mod validate;

use config::GenConfig;
use descriptor::SyscallDescriptor;
use error::CodegenError;
use render::Artifacts;
use syscalls::SyscallSet;

/// Validates `descriptors` and renders every artifact in memory.
///
/// The filesystem is not touched; pass the result to
/// [`output::write_artifacts`] to persist it.
///
/// # Errors
///
/// Returns [`CodegenError::Consistency`] if the descriptor set fails
/// validation.
pub fn generate(
    descriptors: &[SyscallDescriptor],
    config: &GenConfig,
) -> Result<Artifacts, CodegenError> {
    validate::validate(descriptors, config)?;
    let set = SyscallSet::collect(descriptors);
    Ok(render::render_all(&set, config))
}
