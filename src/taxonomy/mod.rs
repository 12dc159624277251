//! Told-subsumption taxonomy: a small in-memory reasoning backend.
//!
//! Ontologies contain `SubClassOf` and `EquivalentTo` axioms between named
//! classes. [`TaxonomyReasoner`] implements
//! [`ReasoningBackend`](crate::provider::ReasoningBackend) and
//! [`EntailmentOracle`](crate::completeness::EntailmentOracle), so it can back
//! a proof provider and check proof completeness.

pub mod error;
pub mod ontology;
pub mod query;
pub mod reasoner;

pub use error::{TaxonomyError, TaxonomyResult};
pub use ontology::{Axiom, ClassName, Ontology, Subsumption};
pub use query::SubsumptionQueryFactory;
pub use reasoner::{SubsumptionInference, TaxonomyReasoner};

use crate::provider::BackendProofProvider;

/// Proof provider over a taxonomy reasoner.
pub type TaxonomyProofProvider = BackendProofProvider<TaxonomyReasoner>;

/// Create a proof provider that owns a reasoner over `ontology`.
pub fn proof_provider(ontology: Ontology) -> TaxonomyProofProvider {
    BackendProofProvider::new("taxonomy", TaxonomyReasoner::new(ontology))
}
