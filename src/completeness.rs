//! Brute-force verification of the justification-completeness contract.
//!
//! A proof with its justifier is complete when, for every axiom set `S`, the
//! query is entailed by `S` exactly when it is derivable from the proof's
//! inferences whose justifications lie inside `S`. Checking this enumerates
//! all subsets of the relevant axioms, so it is meant for small proofs in
//! tests and debug runs. Subsets are checked in parallel with rayon.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::Hash;

use rayon::prelude::*;

use crate::error::ExperimentError;
use crate::proof::{Inference, JustificationCompleteProof};

/// Largest axiom count [`verify`] will enumerate subsets for.
pub const MAX_VERIFIED_AXIOMS: usize = 24;

/// Ground-truth entailment, independent of any proof.
pub trait EntailmentOracle<C, A> {
    /// A superset of the axioms that can matter for `conclusion`: entailment
    /// from any axiom set `S` must equal entailment from `S` restricted to it.
    fn relevant_axioms(&self, conclusion: &C) -> Vec<A>;

    /// Whether `axioms` alone entail `conclusion`.
    fn entails(&self, axioms: &BTreeSet<A>, conclusion: &C) -> bool;
}

/// Outcome of a successful [`verify`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Every subset of the relevant axioms agreed.
    Verified { axioms: usize, subsets: u64 },
    /// Too many relevant axioms to enumerate.
    Skipped { axioms: usize },
}

/// Inferences of a proof paired with their justifications, computed once.
struct Steps<'p, C, A> {
    steps: Vec<(&'p C, &'p [C], BTreeSet<A>)>,
}

impl<'p, C, A> Steps<'p, C, A>
where
    C: Eq + Hash,
    A: Ord,
{
    fn new<I>(jcp: &'p JustificationCompleteProof<'_, C, I, A>) -> Self
    where
        C: Clone,
        I: Inference<C>,
    {
        let steps = jcp
            .proof()
            .all_inferences()
            .map(|i| (i.conclusion(), i.premises(), jcp.justifier().justification(i)))
            .collect();
        Self { steps }
    }

    /// Fixpoint over inferences usable with `allowed`.
    fn derives(&self, goal: &C, allowed: &BTreeSet<A>) -> bool {
        let mut derived: HashSet<&C> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for (conclusion, premises, justification) in &self.steps {
                if derived.contains(*conclusion) || !justification.is_subset(allowed) {
                    continue;
                }
                if premises.iter().all(|p| derived.contains(p)) {
                    derived.insert(*conclusion);
                    changed = true;
                }
            }
            if derived.contains(goal) {
                return true;
            }
        }
        false
    }
}

/// Whether the query of `jcp` is derivable using only inferences whose
/// justification is a subset of `allowed`.
pub fn derivable<C, I, A>(jcp: &JustificationCompleteProof<'_, C, I, A>, allowed: &BTreeSet<A>) -> bool
where
    C: Clone + Eq + Hash,
    I: Inference<C>,
    A: Ord,
{
    Steps::new(jcp).derives(jcp.query(), allowed)
}

/// Check `jcp` against `oracle` on every subset of the relevant axioms.
///
/// Returns [`Verification::Skipped`] when there are more than `limit`
/// (capped at [`MAX_VERIFIED_AXIOMS`]) relevant axioms, and
/// [`ExperimentError::Incomplete`] with the first disagreeing subset.
pub fn verify<C, I, A, O>(
    jcp: &JustificationCompleteProof<'_, C, I, A>,
    oracle: &O,
    limit: usize,
) -> Result<Verification, ExperimentError>
where
    C: Clone + Eq + Hash + fmt::Display + Sync,
    I: Inference<C>,
    A: Ord + Clone + fmt::Display + Send + Sync,
    O: EntailmentOracle<C, A> + Sync + ?Sized,
{
    let query = jcp.query();
    let universe: Vec<A> = oracle
        .relevant_axioms(query)
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let limit = limit.min(MAX_VERIFIED_AXIOMS);
    if universe.len() > limit {
        tracing::warn!(
            query = %query,
            axioms = universe.len(),
            limit,
            "too many relevant axioms, skipping completeness check"
        );
        return Ok(Verification::Skipped {
            axioms: universe.len(),
        });
    }

    let steps = Steps::new(jcp);
    let subset = |mask: u64| -> BTreeSet<A> {
        universe
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, axiom)| axiom.clone())
            .collect()
    };

    let subsets = 1u64 << universe.len();
    let witness = (0..subsets).into_par_iter().find_first(|&mask| {
        let axioms = subset(mask);
        oracle.entails(&axioms, query) != steps.derives(query, &axioms)
    });

    match witness {
        Some(mask) => {
            let witness = subset(mask)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::error!(query = %query, witness = %witness, "proof is not justification-complete");
            Err(ExperimentError::Incomplete {
                query: query.to_string(),
                witness: format!("{{{witness}}}"),
            })
        }
        None => {
            tracing::debug!(query = %query, axioms = universe.len(), subsets, "proof verified complete");
            Ok(Verification::Verified {
                axioms: universe.len(),
                subsets,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::{InferenceSource, ProofGraph};
    use crate::provider::ProofProvider;
    use crate::taxonomy::{
        self, Axiom, ClassName, Ontology, Subsumption, SubsumptionInference, TaxonomyReasoner,
    };

    fn class(name: &str) -> ClassName {
        ClassName::new(name).unwrap()
    }

    fn sub(a: &str, b: &str) -> Subsumption {
        Subsumption::new(class(a), class(b))
    }

    const DIAMOND: &str = "A SubClassOf B\nB SubClassOf D\nA SubClassOf C\nC SubClassOf D\nD EquivalentTo E\n";

    #[test]
    fn derivability_follows_justifications() {
        let provider = taxonomy::proof_provider(Ontology::parse(DIAMOND).unwrap());
        let jcp = provider.proof(&sub("A", "D")).unwrap();

        let ab = Axiom::subclass_of(class("A"), class("B"));
        let bd = Axiom::subclass_of(class("B"), class("D"));
        let ac = Axiom::subclass_of(class("A"), class("C"));

        assert!(derivable(&jcp, &BTreeSet::from([ab.clone(), bd.clone()])));
        assert!(!derivable(&jcp, &BTreeSet::from([ab, ac])));
        assert!(!derivable(&jcp, &BTreeSet::new()));
    }

    #[test]
    fn reference_backend_is_complete() {
        let provider = taxonomy::proof_provider(Ontology::parse(DIAMOND).unwrap());
        let reasoner = provider.backend().unwrap();
        for query in [sub("A", "D"), sub("A", "E"), sub("E", "D"), sub("C", "C")] {
            let jcp = provider.proof(&query).unwrap();
            let outcome = verify(&jcp, reasoner, MAX_VERIFIED_AXIOMS).unwrap();
            assert!(matches!(outcome, Verification::Verified { .. }), "{query}: {outcome:?}");
        }
    }

    #[test]
    fn detects_a_justifier_that_drops_axioms() {
        let reasoner = TaxonomyReasoner::new(Ontology::parse(DIAMOND).unwrap());
        let query = sub("A", "D");
        let proof = ProofGraph::backward_from(query.clone(), &reasoner);
        // Forgets every axiom mentioning C.
        let lossy = |i: &SubsumptionInference| -> BTreeSet<Axiom> {
            match i {
                SubsumptionInference::Asserted { axiom, .. }
                    if !axiom.classes().contains(&&class("C")) =>
                {
                    BTreeSet::from([axiom.clone()])
                }
                _ => BTreeSet::new(),
            }
        };
        let jcp = JustificationCompleteProof::new(query, proof, lossy);

        // With nothing assumed, the proof already derives A ⊑ D through C.
        let err = verify(&jcp, &reasoner, MAX_VERIFIED_AXIOMS).unwrap_err();
        assert!(matches!(err, ExperimentError::Incomplete { ref witness, .. } if witness == "{}"));
    }

    #[test]
    fn detects_a_proof_missing_inferences() {
        let reasoner = TaxonomyReasoner::new(Ontology::parse(DIAMOND).unwrap());
        let query = sub("A", "D");

        // Only the path through B survives.
        struct OnlyViaB<'r>(&'r TaxonomyReasoner);
        impl InferenceSource<Subsumption, SubsumptionInference> for OnlyViaB<'_> {
            fn inferences_for(&self, conclusion: &Subsumption) -> Vec<SubsumptionInference> {
                self.0
                    .inferences_for(conclusion)
                    .into_iter()
                    .filter(|i| i.premises().iter().all(|p| p.sub != class("C") && p.sup != class("C")))
                    .collect()
            }
        }

        let proof = ProofGraph::backward_from(query.clone(), &OnlyViaB(&reasoner));
        let jcp = JustificationCompleteProof::new(query, proof, crate::justifier::TracingJustifier::new(&reasoner));
        assert!(verify(&jcp, &reasoner, MAX_VERIFIED_AXIOMS).is_err());
    }

    #[test]
    fn skips_large_universes() {
        let text: String = (0..30).map(|n| format!("C{n} SubClassOf C{}\n", n + 1)).collect();
        let provider = taxonomy::proof_provider(Ontology::parse(&text).unwrap());
        let jcp = provider.proof(&sub("C0", "C30")).unwrap();
        let outcome = verify(&jcp, provider.backend().unwrap(), 8).unwrap();
        assert_eq!(outcome, Verification::Skipped { axioms: 30 });
    }
}
