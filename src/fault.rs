//! Fault taxonomy shared by every trial.
//!
//! A [`Fault`] carries the data of one failure. Its [`FaultKind`] places it in
//! a small hierarchy (for example `FileNotFound` is an `Io` fault) so that a
//! trial can anticipate either the specific kind or its family.

use std::io;
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

/// Category of a fault, with an optional parent category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    Io,
    FileNotFound,
    EndOfInput,
    Database,
    TypeResolution,
    Arithmetic,
    NullReference,
    Bounds,
    TypeMismatch,
    IllegalArgument,
    NumberFormat,
    Panic,
}

impl FaultKind {
    /// Label used as the prefix of a diagnostic line.
    pub fn label(self) -> &'static str {
        match self {
            FaultKind::Io => "I/O error",
            FaultKind::FileNotFound => "file not found error",
            FaultKind::EndOfInput => "end of input error",
            FaultKind::Database => "database error",
            FaultKind::TypeResolution => "type resolution error",
            FaultKind::Arithmetic => "arithmetic error",
            FaultKind::NullReference => "null reference error",
            FaultKind::Bounds => "index out of bounds error",
            FaultKind::TypeMismatch => "type mismatch error",
            FaultKind::IllegalArgument => "illegal argument error",
            FaultKind::NumberFormat => "number format error",
            FaultKind::Panic => "panic",
        }
    }

    pub fn parent(self) -> Option<FaultKind> {
        match self {
            FaultKind::FileNotFound | FaultKind::EndOfInput => Some(FaultKind::Io),
            FaultKind::NumberFormat => Some(FaultKind::IllegalArgument),
            _ => None,
        }
    }

    /// True if `self` is `other` or one of its descendants.
    pub fn is_a(self, other: FaultKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

#[derive(Error, Debug)]
pub enum Fault {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect to {target}: {source}")]
    Database {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("connection to {target} timed out after {after:?}")]
    ConnectTimeout { target: String, after: Duration },

    #[error("no type registered under the name '{name}' (known types: {})", .known.join(", "))]
    TypeResolution {
        name: String,
        known: Vec<&'static str>,
    },

    #[error("attempt to {operation} by zero")]
    Arithmetic { operation: &'static str },

    #[error("cannot {action}: the value is absent")]
    NullReference { action: &'static str },

    #[error("index {index} out of bounds for length {len}")]
    Bounds { index: usize, len: usize },

    #[error("{actual} cannot be cast to {expected}")]
    TypeMismatch { actual: String, expected: String },

    #[error("illegal argument {value} for {operation}: {reason}")]
    IllegalArgument {
        operation: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("for input string \"{input}\": {source}")]
    NumberFormat {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("attempt panicked: {message}")]
    Panic { message: String },
}

impl Fault {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Most specific kind of this fault.
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::Io { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => FaultKind::FileNotFound,
                io::ErrorKind::UnexpectedEof => FaultKind::EndOfInput,
                _ => FaultKind::Io,
            },
            Fault::Database { .. } | Fault::ConnectTimeout { .. } => FaultKind::Database,
            Fault::TypeResolution { .. } => FaultKind::TypeResolution,
            Fault::Arithmetic { .. } => FaultKind::Arithmetic,
            Fault::NullReference { .. } => FaultKind::NullReference,
            Fault::Bounds { .. } => FaultKind::Bounds,
            Fault::TypeMismatch { .. } => FaultKind::TypeMismatch,
            Fault::IllegalArgument { .. } => FaultKind::IllegalArgument,
            Fault::NumberFormat { .. } => FaultKind::NumberFormat,
            Fault::Panic { .. } => FaultKind::Panic,
        }
    }

    /// First of `anticipated` this fault belongs to, if any.
    ///
    /// `anticipated` is ordered most specific first, so a missing file checked
    /// against `[FileNotFound, Io]` resolves to `FileNotFound`, while the same
    /// fault checked against `[Io]` resolves to `Io`.
    pub fn classify(&self, anticipated: &[FaultKind]) -> Option<FaultKind> {
        let kind = self.kind();
        anticipated.iter().copied().find(|&candidate| kind.is_a(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtypes_belong_to_their_family() {
        assert!(FaultKind::FileNotFound.is_a(FaultKind::Io));
        assert!(FaultKind::EndOfInput.is_a(FaultKind::Io));
        assert!(FaultKind::NumberFormat.is_a(FaultKind::IllegalArgument));
        assert!(FaultKind::Io.is_a(FaultKind::Io));
        assert!(!FaultKind::Io.is_a(FaultKind::FileNotFound));
        assert!(!FaultKind::Bounds.is_a(FaultKind::Arithmetic));
    }

    #[test]
    fn test_io_kind_is_refined_by_error_kind() {
        let missing = Fault::io("a.txt", io::Error::from(io::ErrorKind::NotFound));
        let short = Fault::io("b.txt", io::Error::from(io::ErrorKind::UnexpectedEof));
        let denied = Fault::io("c.txt", io::Error::from(io::ErrorKind::PermissionDenied));

        assert_eq!(missing.kind(), FaultKind::FileNotFound);
        assert_eq!(short.kind(), FaultKind::EndOfInput);
        assert_eq!(denied.kind(), FaultKind::Io);
    }

    #[test]
    fn test_classify_prefers_first_matching_kind() {
        let missing = Fault::io("a.txt", io::Error::from(io::ErrorKind::NotFound));

        assert_eq!(
            missing.classify(&[FaultKind::FileNotFound, FaultKind::Io]),
            Some(FaultKind::FileNotFound)
        );
        assert_eq!(missing.classify(&[FaultKind::Io]), Some(FaultKind::Io));
        assert_eq!(missing.classify(&[FaultKind::Arithmetic]), None);
    }

    #[test]
    fn test_generic_io_falls_through_to_family() {
        let denied = Fault::io("c.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(
            denied.classify(&[FaultKind::FileNotFound, FaultKind::Io]),
            Some(FaultKind::Io)
        );
    }

    #[test]
    fn test_number_format_display_mentions_input() {
        let source = "abc".parse::<i32>().unwrap_err();
        let fault = Fault::NumberFormat {
            input: "abc".to_string(),
            source,
        };
        let display = fault.to_string();
        assert!(display.contains("\"abc\""));
        assert!(display.contains("invalid digit"));
    }

    #[test]
    fn test_bounds_display() {
        let fault = Fault::Bounds { index: 5, len: 3 };
        assert_eq!(fault.to_string(), "index 5 out of bounds for length 3");
    }

    #[test]
    fn test_fault_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Fault>();
        assert_sync::<Fault>();
    }
}
