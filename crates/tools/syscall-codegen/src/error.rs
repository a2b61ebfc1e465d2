//! Error types for the syscall generator.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur during syscall generation.
#[derive(Debug)]
pub enum CodegenError {
    /// I/O error reading input or writing an output path.
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A file could not be parsed as JSON or TOML.
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// A descriptor record is malformed.
    Input(InputError),
    /// The descriptor set is internally inconsistent.
    Consistency(ConsistencyError),
    /// The generator configuration is invalid.
    Config(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Input(e) => write!(f, "invalid descriptor: {e}"),
            Self::Consistency(e) => write!(f, "inconsistent descriptor set: {e}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

// `Display` already prints the I/O cause; no `source()` chain.
impl std::error::Error for CodegenError {}

impl From<InputError> for CodegenError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<ConsistencyError> for CodegenError {
    fn from(e: ConsistencyError) -> Self {
        Self::Consistency(e)
    }
}

impl CodegenError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// What is wrong with a descriptor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field is absent.
    Missing,
    /// The field is present but not a JSON string.
    NotAString,
    /// The field is an empty string.
    Empty,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing",
            Self::NotAString => "not a string",
            Self::Empty => "empty",
        })
    }
}

/// A malformed descriptor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The top-level JSON value is not an array.
    NotAnArray,
    /// A record is neither a 5-element array nor an object.
    BadRecord {
        /// Position of the record in the input array.
        index: usize,
    },
    /// A positional record has more than five elements.
    ExtraElements {
        /// Position of the record in the input array.
        index: usize,
        /// Number of elements found.
        len: usize,
    },
    /// An object record carries a field this generator does not know.
    UnknownField {
        /// Position of the record in the input array.
        index: usize,
        /// The unrecognized key.
        field: String,
    },
    /// A required field is missing or has the wrong shape.
    Field {
        /// Position of the record in the input array.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        problem: FieldProblem,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnArray => f.write_str("top-level value must be an array of descriptors"),
            Self::BadRecord { index } => write!(
                f,
                "descriptor #{index}: expected a 5-element array or an object"
            ),
            Self::ExtraElements { index, len } => {
                write!(f, "descriptor #{index}: expected 5 elements, found {len}")
            }
            Self::UnknownField { index, field } => {
                write!(f, "descriptor #{index}: unknown field `{field}`")
            }
            Self::Field {
                index,
                field,
                problem,
            } => write!(f, "descriptor #{index}: field `{field}` is {problem}"),
        }
    }
}

/// A descriptor set that would produce a broken dispatch path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// Two descriptors share a numeric ID.
    DuplicateId {
        /// The repeated ID token.
        id: String,
        /// Index of the first descriptor using it.
        first: usize,
        /// Index of the repeating descriptor.
        second: usize,
    },
    /// A descriptor uses one of the sentinel IDs.
    ReservedId {
        /// Index of the descriptor.
        index: usize,
        /// The sentinel token.
        id: String,
    },
    /// A dispatch entry is not of the form `[ID] = handler`.
    MalformedEntry {
        /// Index of the descriptor.
        index: usize,
        /// The entry text.
        entry: String,
    },
    /// A dispatch entry does not match its descriptor.
    EntryMismatch {
        /// Index of the descriptor.
        index: usize,
        /// Description of the mismatch.
        detail: String,
    },
    /// A function name cannot be used as a relative header path.
    UnsafeFunctionName {
        /// Index of the descriptor.
        index: usize,
        /// The function name.
        name: String,
    },
    /// Two function names map to the same header file, or one header would
    /// sit inside a directory named after another.
    PathConflict {
        /// Index of the descriptor.
        index: usize,
        /// Its function name.
        name: String,
        /// The earlier function name it clashes with.
        other: String,
    },
    /// Two function names produce the same include guard.
    GuardCollision {
        /// Index of the descriptor.
        index: usize,
        /// Its function name.
        name: String,
        /// The earlier function name with the same guard.
        other: String,
        /// The shared guard macro.
        guard: String,
    },
    /// A handler symbol is not a valid C identifier.
    BadSymbol {
        /// Index of the descriptor.
        index: usize,
        /// The symbol text.
        symbol: String,
    },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id, first, second } => write!(
                f,
                "descriptor #{second}: syscall ID `{id}` already used by descriptor #{first}"
            ),
            Self::ReservedId { index, id } => {
                write!(f, "descriptor #{index}: syscall ID `{id}` is reserved")
            }
            Self::MalformedEntry { index, entry } => write!(
                f,
                "descriptor #{index}: dispatch entry `{entry}` is not of the form `[ID] = handler`"
            ),
            Self::EntryMismatch { index, detail } => {
                write!(f, "descriptor #{index}: {detail}")
            }
            Self::UnsafeFunctionName { index, name } => write!(
                f,
                "descriptor #{index}: function name `{name}` is not a relative header path"
            ),
            Self::PathConflict { index, name, other } => write!(
                f,
                "descriptor #{index}: header `{name}` clashes with header `{other}`"
            ),
            Self::GuardCollision {
                index,
                name,
                other,
                guard,
            } => write!(
                f,
                "descriptor #{index}: header `{name}` shares include guard `{guard}` with `{other}`"
            ),
            Self::BadSymbol { index, symbol } => write!(
                f,
                "descriptor #{index}: handler `{symbol}` is not a valid C identifier"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_cause_is_reported_once() {
        let err = CodegenError::io("out/a", io::Error::other("Is a directory"));
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "out/a: Is a directory");
    }

    #[test]
    fn consistency_errors_name_the_descriptor() {
        let err = CodegenError::from(ConsistencyError::PathConflict {
            index: 1,
            name: "a/b".into(),
            other: "a".into(),
        });
        assert_eq!(
            err.to_string(),
            "inconsistent descriptor set: descriptor #1: header `a/b` clashes with header `a`"
        );
    }
}
