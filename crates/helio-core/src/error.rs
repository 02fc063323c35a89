//! Error types for the Helio memory substrate, organized by subsystem:
//! configuration (context construction) and pool (object lifecycle).

use std::error::Error;
use std::fmt;

use crate::kind::StructKind;

/// Errors detected while validating context configuration.
///
/// Configuration errors are reported and the construction call returns
/// a failure; they never abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A binding override requested zero slots for a kind.
    ZeroBindingCount {
        /// The kind whose override was zero.
        kind: StructKind,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBindingCount { kind } => {
                write!(f, "binding for kind '{kind}' configured with count 0")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from the object lifecycle API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The concrete type handed to `create_object` does not fit the
    /// slot size registered for the kind tag.
    SlotMismatch {
        /// The kind tag the caller passed.
        kind: StructKind,
        /// Slot size registered for the kind, in bytes.
        expected: usize,
        /// Size of the concrete type, in bytes.
        actual: usize,
    },
    /// The pointer handed to `destroy_object` is not owned by any
    /// binding in the kind's chain.
    ForeignPointer {
        /// The kind tag the caller passed.
        kind: StructKind,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotMismatch {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "type of {actual} bytes does not fit kind '{kind}' slots of {expected} bytes"
            ),
            Self::ForeignPointer { kind } => {
                write!(f, "pointer is not owned by any binding of kind '{kind}'")
            }
        }
    }
}

impl Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_kind() {
        let err = ConfigError::ZeroBindingCount {
            kind: StructKind::Shader,
        };
        assert!(err.to_string().contains("shader"));
    }

    #[test]
    fn slot_mismatch_reports_both_sizes() {
        let err = PoolError::SlotMismatch {
            kind: StructKind::Buffer,
            expected: 48,
            actual: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("48"));
        assert!(msg.contains("64"));
    }
}
