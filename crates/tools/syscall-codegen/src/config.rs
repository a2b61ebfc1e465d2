//! Configuration types for the syscall generator.
//!
//! Optionally deserialized from a TOML file passed with `--config`. Every
//! field defaults to the symbol names the kernel headers expect, so an empty
//! file (or no file at all) reproduces the stock output.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::CodegenError;
use crate::validate::is_c_identifier;

/// Symbol names and includes used by the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Sentinel ID routed to the bad-syscall handler.
    pub bad_syscall_id: String,
    /// Sentinel ID used as the dispatch table bound. Always last.
    pub limit_id: String,
    /// Handler for IDs outside the valid set.
    pub bad_syscall_handler: String,
    /// Target of every weak handler alias.
    pub no_syscall_handler: String,
    /// C type of the six argument registers and the return value.
    pub word_type: String,
    /// Name of the dispatch table array.
    pub table_symbol: String,
    /// Element type of the dispatch table array.
    pub table_type: String,
    /// Include guard of the listing header.
    pub list_guard: String,
    /// Headers included by the listing header.
    pub list_includes: Vec<String>,
    /// Headers included by every invocation stub header.
    pub stub_includes: Vec<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            bad_syscall_id: "K_SYSCALL_BAD".into(),
            limit_id: "K_SYSCALL_LIMIT".into(),
            bad_syscall_handler: "handler_bad_syscall".into(),
            no_syscall_handler: "handler_no_syscall".into(),
            word_type: "u32_t".into(),
            table_symbol: "_k_syscall_table".into(),
            table_type: "_k_syscall_handler_t".into(),
            list_guard: "_ZEPHYR_SYSCALL_LIST_H_".into(),
            list_includes: vec!["zephyr/types.h".into()],
            stub_includes: vec!["syscall_list.h".into(), "syscall_macros.h".into()],
        }
    }
}

impl GenConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, a parse error if it
    /// is not valid TOML for this schema, or a config error if a value is
    /// rejected by [`GenConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let text = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        let config: Self = toml::from_str(&text).map_err(|e| CodegenError::Parse {
            path: PathBuf::from(path),
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every symbol name is a C identifier and the two sentinels
    /// differ.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<(), CodegenError> {
        let symbols = [
            ("bad_syscall_id", &self.bad_syscall_id),
            ("limit_id", &self.limit_id),
            ("bad_syscall_handler", &self.bad_syscall_handler),
            ("no_syscall_handler", &self.no_syscall_handler),
            ("word_type", &self.word_type),
            ("table_symbol", &self.table_symbol),
            ("table_type", &self.table_type),
            ("list_guard", &self.list_guard),
        ];
        for (key, value) in symbols {
            if !is_c_identifier(value) {
                return Err(CodegenError::Config(format!(
                    "`{key}` must be a C identifier, got `{value}`"
                )));
            }
        }

        if self.bad_syscall_id == self.limit_id {
            return Err(CodegenError::Config(format!(
                "`bad_syscall_id` and `limit_id` are both `{}`",
                self.limit_id
            )));
        }

        for include in self.list_includes.iter().chain(&self.stub_includes) {
            if include.is_empty() || include.contains(['<', '>', '\n']) {
                return Err(CodegenError::Config(format!(
                    "invalid include `{include}`"
                )));
            }
        }
        Ok(())
    }
}
