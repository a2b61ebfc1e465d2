//! Consistency checks on a loaded descriptor set.
//!
//! Checks for duplicate and reserved IDs, dispatch entries that disagree with
//! their descriptor, unusable or clashing header names and malformed handler
//! symbols.
//! Runs before anything is rendered or written.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path};

use crate::config::GenConfig;
use crate::descriptor::SyscallDescriptor;
use crate::error::ConsistencyError;
use crate::render::header_guard;

/// Validate the descriptor set, returning the first problem found.
///
/// # Errors
///
/// Returns a [`ConsistencyError`] describing the offending descriptor.
pub fn validate(
    descriptors: &[SyscallDescriptor],
    config: &GenConfig,
) -> Result<(), ConsistencyError> {
    let handlers: BTreeSet<&str> = descriptors
        .iter()
        .map(|d| d.handler_symbol.as_str())
        .collect();
    let mut ids: BTreeMap<&str, usize> = BTreeMap::new();
    let mut headers = HeaderNames::default();

    for (index, desc) in descriptors.iter().enumerate() {
        let id = desc.numeric_id.as_str();

        if id == config.bad_syscall_id || id == config.limit_id {
            return Err(ConsistencyError::ReservedId {
                index,
                id: id.to_string(),
            });
        }

        if let Some(&first) = ids.get(id) {
            return Err(ConsistencyError::DuplicateId {
                id: id.to_string(),
                first,
                second: index,
            });
        }
        ids.insert(id, index);

        if !is_c_identifier(&desc.handler_symbol) {
            return Err(ConsistencyError::BadSymbol {
                index,
                symbol: desc.handler_symbol.clone(),
            });
        }

        if !is_relative_header_path(&desc.function_name) {
            return Err(ConsistencyError::UnsafeFunctionName {
                index,
                name: desc.function_name.clone(),
            });
        }
        headers.insert(index, &desc.function_name)?;

        check_entry(index, desc, &handlers)?;
    }

    Ok(())
}

/// Checks that `[ID] = handler` names this descriptor's ID and a handler
/// that receives a weak alias.
fn check_entry(
    index: usize,
    desc: &SyscallDescriptor,
    handlers: &BTreeSet<&str>,
) -> Result<(), ConsistencyError> {
    let Some((entry_id, entry_handler)) = parse_entry(&desc.dispatch_entry) else {
        return Err(ConsistencyError::MalformedEntry {
            index,
            entry: desc.dispatch_entry.clone(),
        });
    };

    if entry_id != desc.numeric_id {
        return Err(ConsistencyError::EntryMismatch {
            index,
            detail: format!(
                "dispatch entry is indexed by `{entry_id}` but the syscall ID is `{}`",
                desc.numeric_id
            ),
        });
    }

    if !handlers.contains(entry_handler) {
        return Err(ConsistencyError::EntryMismatch {
            index,
            detail: format!(
                "dispatch entry references `{entry_handler}`, which no descriptor declares as a handler"
            ),
        });
    }

    Ok(())
}

/// Header names seen so far, keyed by normalized path and by include guard.
#[derive(Default)]
struct HeaderNames<'a> {
    paths: BTreeMap<String, &'a str>,
    guards: BTreeMap<String, &'a str>,
}

impl<'a> HeaderNames<'a> {
    /// Records `name`, rejecting a second spelling of an existing path, a
    /// path nested under or above an existing one, and a clashing guard.
    fn insert(&mut self, index: usize, name: &'a str) -> Result<(), ConsistencyError> {
        let key = normalize(name);
        if let Some(&other) = self.paths.get(&key) {
            if other == name {
                return Ok(());
            }
            return Err(path_conflict(index, name, other));
        }

        // An existing header that is an ancestor directory of this one.
        for (pos, _) in key.match_indices('/') {
            if let Some(&other) = self.paths.get(&key[..pos]) {
                return Err(path_conflict(index, name, other));
            }
        }

        // An existing header nested below this one.
        let dir = format!("{key}/");
        if let Some((nested, &other)) = self.paths.range(dir.clone()..).next() {
            if nested.starts_with(&dir) {
                return Err(path_conflict(index, name, other));
            }
        }

        let guard = header_guard(name);
        if let Some(&other) = self.guards.get(&guard) {
            return Err(ConsistencyError::GuardCollision {
                index,
                name: name.to_string(),
                other: other.to_string(),
                guard,
            });
        }

        self.paths.insert(key, name);
        self.guards.insert(guard, name);
        Ok(())
    }
}

fn path_conflict(index: usize, name: &str, other: &str) -> ConsistencyError {
    ConsistencyError::PathConflict {
        index,
        name: name.to_string(),
        other: other.to_string(),
    }
}

/// Joins the normal components of `name` with `/`.
fn normalize(name: &str) -> String {
    Path::new(name)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits a designated initializer `[ID] = handler` into its two names.
pub fn parse_entry(entry: &str) -> Option<(&str, &str)> {
    let rest = entry.trim().strip_prefix('[')?;
    let (id, rest) = rest.split_once(']')?;
    let handler = rest.trim_start().strip_prefix('=')?.trim();
    let id = id.trim();
    (is_c_identifier(id) && is_c_identifier(handler)).then_some((id, handler))
}

/// Returns `true` if `s` is a non-empty C identifier.
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Returns `true` if `name` can be joined under the header directory
/// without escaping it.
fn is_relative_header_path(name: &str) -> bool {
    !name.is_empty()
        && !name.ends_with('/')
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
