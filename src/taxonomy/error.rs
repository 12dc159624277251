//! Taxonomy-backend error types with rich diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Errors arising from loading or querying a told-subsumption taxonomy.
#[derive(Debug, Error, Diagnostic)]
pub enum TaxonomyError {
    #[error("unknown class: {name}")]
    #[diagnostic(
        code(pinpoint::taxonomy::unknown_class),
        help(
            "No axiom of the loaded ontology mentions \"{name}\". \
             Check the spelling of the query, or add an axiom declaring the class."
        )
    )]
    UnknownClass { name: String },

    #[error("query is not entailed: {query}")]
    #[diagnostic(
        code(pinpoint::taxonomy::not_entailed),
        help(
            "The ontology does not entail this subsumption, so it has no proof. \
             Only entailed subsumptions can be pinpointed."
        )
    )]
    NotEntailed { query: String },

    #[error("ontology syntax error on line {line}: {message}")]
    #[diagnostic(
        code(pinpoint::taxonomy::parse),
        help(
            "Each non-comment line must read `<Class> SubClassOf <Class>` or \
             `<Class> EquivalentTo <Class>`. Comments start with `#`."
        )
    )]
    Parse { line: usize, message: String },

    #[error("cannot read ontology {path}: {source}")]
    #[diagnostic(
        code(pinpoint::taxonomy::io),
        help("Check that the ontology file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for taxonomy operations.
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;
