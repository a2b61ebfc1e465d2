//! Syscall descriptor records and JSON input loading.
//!
//! The upstream parser emits each record as a positional array
//! `[function_name, handler_symbol, invocation_snippet, numeric_id,
//! dispatch_entry]`. Object records with the same field names are accepted
//! too. Records are decoded from [`serde_json::Value`] by hand so that a
//! malformed record is reported by index and field name.

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{CodegenError, FieldProblem, InputError};

/// Field names in positional order.
pub const FIELDS: [&str; 5] = [
    "function_name",
    "handler_symbol",
    "invocation_snippet",
    "numeric_id",
    "dispatch_entry",
];

/// One privileged entry point and its caller-side stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallDescriptor {
    /// Name of the generated header the invocation stub belongs to.
    pub function_name: String,
    /// Exported privileged-mode handler.
    pub handler_symbol: String,
    /// Caller-side code performing the trap.
    pub invocation_snippet: String,
    /// Symbolic ID constant, opaque to the generator.
    pub numeric_id: String,
    /// Initializer text for the dispatch table, e.g. `[ID] = handler`.
    pub dispatch_entry: String,
}

impl SyscallDescriptor {
    /// Builds a descriptor from its five fields.
    pub fn new(
        function_name: impl Into<String>,
        handler_symbol: impl Into<String>,
        invocation_snippet: impl Into<String>,
        numeric_id: impl Into<String>,
        dispatch_entry: impl Into<String>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            handler_symbol: handler_symbol.into(),
            invocation_snippet: invocation_snippet.into(),
            numeric_id: numeric_id.into(),
            dispatch_entry: dispatch_entry.into(),
        }
    }
}

/// Reads the descriptor file at `path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, a parse error if it is
/// not JSON, and an input error for the first malformed record.
pub fn load(path: &Path) -> Result<Vec<SyscallDescriptor>, CodegenError> {
    let text = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| CodegenError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(from_value(&value)?)
}

/// Decodes a descriptor set from an already-parsed JSON value.
///
/// # Errors
///
/// Returns the first [`InputError`] found, in input order.
pub fn from_value(value: &Value) -> Result<Vec<SyscallDescriptor>, InputError> {
    let records = value.as_array().ok_or(InputError::NotAnArray)?;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Array(items) => from_positional(index, items),
            Value::Object(map) => from_object(index, map),
            _ => Err(InputError::BadRecord { index }),
        })
        .collect()
}

fn from_positional(index: usize, items: &[Value]) -> Result<SyscallDescriptor, InputError> {
    if items.len() > FIELDS.len() {
        return Err(InputError::ExtraElements {
            index,
            len: items.len(),
        });
    }
    let field = |pos: usize| string_field(index, FIELDS[pos], items.get(pos));
    Ok(SyscallDescriptor {
        function_name: field(0)?,
        handler_symbol: field(1)?,
        invocation_snippet: field(2)?,
        numeric_id: field(3)?,
        dispatch_entry: field(4)?,
    })
}

fn from_object(index: usize, map: &Map<String, Value>) -> Result<SyscallDescriptor, InputError> {
    if let Some(unknown) = map.keys().find(|k| !FIELDS.contains(&k.as_str())) {
        return Err(InputError::UnknownField {
            index,
            field: unknown.clone(),
        });
    }
    let field = |name: &'static str| string_field(index, name, map.get(name));
    Ok(SyscallDescriptor {
        function_name: field(FIELDS[0])?,
        handler_symbol: field(FIELDS[1])?,
        invocation_snippet: field(FIELDS[2])?,
        numeric_id: field(FIELDS[3])?,
        dispatch_entry: field(FIELDS[4])?,
    })
}

fn string_field(
    index: usize,
    field: &'static str,
    value: Option<&Value>,
) -> Result<String, InputError> {
    let problem = match value {
        None | Some(Value::Null) => FieldProblem::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => FieldProblem::Empty,
        Some(Value::String(s)) => return Ok(s.clone()),
        Some(_) => FieldProblem::NotAString,
    };
    Err(InputError::Field {
        index,
        field,
        problem,
    })
}
