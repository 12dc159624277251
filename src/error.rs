//! Rich diagnostic error types for pinpoint.
//!
//! Each concern defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains. Composition layers
//! forward these unchanged through [`PinpointError`].

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type.
///
/// Each variant wraps a concern-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum PinpointError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Experiment(#[from] ExperimentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl PinpointError {
    /// Returns the decode error if this failure happened while decoding a raw query.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            PinpointError::Decode(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the experiment error if this failure came from a proof provider.
    pub fn as_experiment(&self) -> Option<&ExperimentError> {
        match self {
            PinpointError::Experiment(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DecodeError {
    #[error("empty query string")]
    #[diagnostic(
        code(pinpoint::decode::empty),
        help("Each query line must contain at least one field. Blank lines should be skipped by the caller.")
    )]
    Empty,

    #[error("wrong field count: expected {expected}, got {actual}")]
    #[diagnostic(
        code(pinpoint::decode::field_count),
        help(
            "The query factory expects exactly {expected} delimiter-separated fields. \
             Check the delimiter setting and the query format."
        )
    )]
    FieldCount { expected: usize, actual: usize },

    #[error("field {index} is empty")]
    #[diagnostic(
        code(pinpoint::decode::empty_field),
        help("Two delimiters appear next to each other. Remove the stray delimiter or fill in the field.")
    )]
    EmptyField { index: usize },

    #[error("unexpected token in field {index}: expected `{expected}`, found `{found}`")]
    #[diagnostic(
        code(pinpoint::decode::unexpected_token),
        help("The field at position {index} is a fixed keyword for this query shape.")
    )]
    UnexpectedToken {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("invalid entity name `{name}`: {reason}")]
    #[diagnostic(
        code(pinpoint::decode::invalid_name),
        help("Entity names must be non-empty and must not contain whitespace or control characters.")
    )]
    InvalidName { name: String, reason: String },

    #[error("unknown entity `{name}`")]
    #[diagnostic(
        code(pinpoint::decode::unknown_entity),
        help(
            "The query factory is bound to a signature that does not contain `{name}`. \
             Check the spelling, or load the ontology that declares it."
        )
    )]
    UnknownEntity { name: String },
}

// ---------------------------------------------------------------------------
// Experiment errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExperimentError {
    #[error("proof provider has been disposed")]
    #[diagnostic(
        code(pinpoint::experiment::disposed),
        help(
            "The backend resources of this provider were released by `dispose()`. \
             Create a new provider to request further proofs."
        )
    )]
    Disposed,

    #[error("backend failure: {message}")]
    #[diagnostic(
        code(pinpoint::experiment::backend),
        help("The reasoning backend could not produce a proof for this query. See the cause below.")
    )]
    Backend {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("proof for {query} is not justification-complete: axioms {witness} disagree with the backend")]
    #[diagnostic(
        code(pinpoint::experiment::incomplete),
        help(
            "The backend entails the query from the listed axioms but the proof and justifier \
             cannot derive it (or the reverse). The backend is dropping inferences or axioms."
        )
    )]
    Incomplete { query: String, witness: String },
}

impl ExperimentError {
    /// Wrap a backend failure, keeping it as the error source.
    pub fn backend<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            message: source.to_string(),
            source: Box::new(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    #[diagnostic(
        code(pinpoint::config::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {path}: {message}")]
    #[diagnostic(
        code(pinpoint::config::parse),
        help("The configuration is TOML. Known keys: ontology, queries, delimiter, verify, max_verified_axioms.")
    )]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(pinpoint::config::invalid), help("{message}"))]
    Invalid { message: String },
}

/// Result type alias for pinpoint operations.
pub type PinpointResult<T> = std::result::Result<T, PinpointError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("reasoner crashed")]
    struct Crash;

    #[test]
    fn backend_error_keeps_cause() {
        let err = ExperimentError::backend(Crash);
        assert_eq!(err.to_string(), "backend failure: reasoner crashed");
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<Crash>().is_some());
    }

    #[test]
    fn top_level_accessors() {
        let err: PinpointError = DecodeError::Empty.into();
        assert_eq!(err.as_decode(), Some(&DecodeError::Empty));
        assert!(err.as_experiment().is_none());

        let err: PinpointError = ExperimentError::Disposed.into();
        assert!(matches!(err.as_experiment(), Some(ExperimentError::Disposed)));
    }

    #[test]
    fn transparent_display() {
        let err: PinpointError = DecodeError::FieldCount {
            expected: 3,
            actual: 2,
        }
        .into();
        assert_eq!(err.to_string(), "wrong field count: expected 3, got 2");
    }
}
