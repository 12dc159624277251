// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # pinpoint
//!
//! Justification-complete proofs for axiom pinpointing.
//!
//! Given a query derived by a reasoner, a [`ProofProvider`](provider::ProofProvider)
//! returns a [`JustificationCompleteProof`](proof::JustificationCompleteProof): the
//! inferences backward-reachable from the query plus a justifier mapping each
//! inference to the axioms it directly uses. Every minimal axiom set entailing
//! the query can be assembled from these per-inference sets, which is what a
//! downstream justification search relies on.
//!
//! ## Architecture
//!
//! - **Data model** (`proof`): inferences, petgraph-backed proof graphs, justifiers
//! - **Justifier** (`justifier`): axiom extraction from traced premises
//! - **Decoding** (`decoder`): raw query strings into typed queries
//! - **Providers** (`provider`): backend ownership, disposal, decoding adapter
//! - **Verification** (`completeness`): brute-force check of the completeness contract
//! - **Reference backend** (`taxonomy`): told-subsumption reasoner
//!
//! ## Library usage
//!
//! ```no_run
//! use pinpoint::decoder::QueryDecoder;
//! use pinpoint::provider::{DecodingProofProvider, ProofProvider};
//! use pinpoint::taxonomy::{self, Ontology, SubsumptionQueryFactory};
//!
//! let ontology = Ontology::parse("Heart SubClassOf Organ\nOrgan SubClassOf BodyPart\n").unwrap();
//! let factory = SubsumptionQueryFactory::bound_to(&ontology);
//! let provider = DecodingProofProvider::new(
//!     QueryDecoder::default(),
//!     factory,
//!     taxonomy::proof_provider(ontology),
//! );
//!
//! let jcp = provider.proof("Heart SubClassOf BodyPart").unwrap();
//! for inference in jcp.proof().all_inferences() {
//!     println!("{inference}: {:?}", jcp.justifier().justification(inference));
//! }
//! ```

pub mod completeness;
pub mod config;
pub mod decoder;
pub mod error;
pub mod justifier;
pub mod proof;
pub mod provider;
pub mod taxonomy;
