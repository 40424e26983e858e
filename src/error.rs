//! Error taxonomy for the encoder.
//!
//! Mirrors the layered error pattern used throughout this crate: a top level
//! [`EncodeError`] aggregates the narrower error kinds raised by individual
//! subsystems, so callers can match broadly or drill into a specific cause.

use std::fmt;
use std::io;

/// Malformed DIMACS/PolyBoRi text input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub line: Option<usize>,
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "parse error at line {line}: {}", self.message),
            None => write!(f, "parse error: {}", self.message),
        }
    }
}

/// An encoding knob or literal fell outside its documented domain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DomainError {
    ConfigOutOfRange {
        name: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    ClauseTooLarge {
        size: usize,
        max: usize,
    },
    VariableIdOutOfRange {
        id: u32,
        max: u32,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigOutOfRange {
                name,
                min,
                max,
                value,
            } => write!(f, "{name} = {value} is outside [{min}, {max}]"),
            Self::ClauseTooLarge { size, max } => {
                write!(f, "clause of size {size} exceeds CLAUSE_SIZE_MAX ({max})")
            }
            Self::VariableIdOutOfRange { id, max } => {
                write!(f, "variable id {id} exceeds VARIABLEID_MAX ({max})")
            }
        }
    }
}

/// `assign_template_from` saw two inconsistent constant bindings for one variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssignmentConflict {
    pub variable_id: u32,
}

impl fmt::Display for AssignmentConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "variable {} was assigned two inconsistent constant values",
            self.variable_id
        )
    }
}

/// Top level error type returned by fallible operations across the crate.
#[derive(Debug)]
pub enum EncodeError {
    Parse(ParseError),
    Domain(DomainError),
    Assignment(AssignmentConflict),
    Io(io::Error),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Domain(e) => write!(f, "{e}"),
            Self::Assignment(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for EncodeError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<DomainError> for EncodeError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

impl From<AssignmentConflict> for EncodeError {
    fn from(e: AssignmentConflict) -> Self {
        Self::Assignment(e)
    }
}

impl From<io::Error> for EncodeError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Sentinel returned by [`crate::formula::NamedVariables::update_unassigned`] when
/// the requested name is not bound, matching the source's `VARIABLEID_ERROR`
/// convention of signalling "missing name" in-band rather than through a panic.
pub const VARIABLEID_ERROR: u32 = u32::MAX;
