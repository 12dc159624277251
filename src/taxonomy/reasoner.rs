//! Told-subsumption reasoner.
//!
//! Classification computes, for every class, the classes reachable over told
//! edges, and records every inference that derives each entailed
//! subsumption:
//!
//! - `Asserted`: `A ⊑ B` told by an axiom (one inference per axiom)
//! - `Reflexivity`: `A ⊑ A`, no premises
//! - `Transitivity`: `A ⊑ C` from `A ⊑ B` and `B ⊑ C`, for every middle class `B`
//!
//! Recording all alternatives is what makes the resulting proofs complete:
//! every simple told path from `A` to `C` is a derivation in the proof of `A ⊑ C`.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::sync::OnceLock;

use crate::completeness::EntailmentOracle;
use crate::justifier::{PremiseTracer, TracedPremise};
use crate::proof::{Inference, InferenceSource};
use crate::provider::ReasoningBackend;

use super::error::TaxonomyError;
use super::ontology::{Axiom, ClassName, Ontology, Subsumption};

/// One derivation step of the told-subsumption calculus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubsumptionInference {
    Asserted {
        conclusion: Subsumption,
        axiom: Axiom,
    },
    Reflexivity {
        conclusion: Subsumption,
    },
    Transitivity {
        conclusion: Subsumption,
        premises: [Subsumption; 2],
    },
}

impl Inference<Subsumption> for SubsumptionInference {
    fn name(&self) -> &str {
        match self {
            SubsumptionInference::Asserted { .. } => "asserted",
            SubsumptionInference::Reflexivity { .. } => "reflexivity",
            SubsumptionInference::Transitivity { .. } => "transitivity",
        }
    }

    fn conclusion(&self) -> &Subsumption {
        match self {
            SubsumptionInference::Asserted { conclusion, .. }
            | SubsumptionInference::Reflexivity { conclusion }
            | SubsumptionInference::Transitivity { conclusion, .. } => conclusion,
        }
    }

    fn premises(&self) -> &[Subsumption] {
        match self {
            SubsumptionInference::Transitivity { premises, .. } => premises,
            _ => &[],
        }
    }
}

impl fmt::Display for SubsumptionInference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsumptionInference::Asserted { conclusion, axiom } => {
                write!(f, "{conclusion} [asserted by {axiom}]")
            }
            SubsumptionInference::Reflexivity { conclusion } => {
                write!(f, "{conclusion} [reflexivity]")
            }
            SubsumptionInference::Transitivity {
                conclusion,
                premises: [left, right],
            } => write!(f, "{conclusion} [transitivity of {left}; {right}]"),
        }
    }
}

/// Result of classification: every entailed subsumption with its inferences.
#[derive(Debug, Default)]
struct Classification {
    inferences: HashMap<Subsumption, Vec<SubsumptionInference>>,
}

/// In-memory reasoner over an [`Ontology`]; classifies lazily, once.
#[derive(Debug)]
pub struct TaxonomyReasoner {
    ontology: Ontology,
    classification: OnceLock<Classification>,
}

impl TaxonomyReasoner {
    pub fn new(ontology: Ontology) -> Self {
        Self {
            ontology,
            classification: OnceLock::new(),
        }
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    /// Whether classification has already run.
    pub fn is_classified(&self) -> bool {
        self.classification.get().is_some()
    }

    /// All entailed subsumptions, sorted.
    pub fn entailed(&self) -> Vec<Subsumption> {
        let mut entailed: Vec<_> = self.classification().inferences.keys().cloned().collect();
        entailed.sort();
        entailed
    }

    fn classification(&self) -> &Classification {
        self.classification.get_or_init(|| {
            let classification = classify(&self.ontology);
            tracing::info!(
                classes = self.ontology.signature().len(),
                subsumptions = classification.inferences.len(),
                inferences = classification.inferences.values().map(Vec::len).sum::<usize>(),
                "classified ontology"
            );
            classification
        })
    }
}

/// Told edges `sub → [(sup, axiom)]` of a set of axioms.
fn told_edges<'o>(
    axioms: impl IntoIterator<Item = &'o Axiom>,
) -> BTreeMap<ClassName, Vec<(ClassName, &'o Axiom)>> {
    let mut edges: BTreeMap<ClassName, Vec<(ClassName, &'o Axiom)>> = BTreeMap::new();
    for axiom in axioms {
        for told in axiom.told() {
            edges.entry(told.sub).or_default().push((told.sup, axiom));
        }
    }
    edges
}

/// Classes reachable from `start` over `edges`, including `start`.
fn reachable(
    edges: &BTreeMap<ClassName, Vec<(ClassName, &Axiom)>>,
    start: &ClassName,
) -> BTreeSet<ClassName> {
    let mut seen = BTreeSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);
    while let Some(current) = queue.pop_front() {
        for (next, _) in edges.get(&current).into_iter().flatten() {
            if seen.insert(next.clone()) {
                queue.push_back(next.clone());
            }
        }
    }
    seen
}

fn classify(ontology: &Ontology) -> Classification {
    let edges = told_edges(ontology.axioms());
    let supers: BTreeMap<&ClassName, BTreeSet<ClassName>> = ontology
        .signature()
        .iter()
        .map(|class| (class, reachable(&edges, class)))
        .collect();

    let mut classification = Classification::default();
    for (&sub, sups) in &supers {
        for sup in sups {
            let conclusion = Subsumption::new(sub.clone(), sup.clone());
            let mut inferences = Vec::new();

            if sub == sup {
                inferences.push(SubsumptionInference::Reflexivity {
                    conclusion: conclusion.clone(),
                });
            }
            for (told_sup, axiom) in edges.get(sub).into_iter().flatten() {
                if told_sup == sup {
                    inferences.push(SubsumptionInference::Asserted {
                        conclusion: conclusion.clone(),
                        axiom: (*axiom).clone(),
                    });
                }
            }
            for middle in sups {
                let reaches_sup = supers.get(middle).is_some_and(|s| s.contains(sup));
                if middle == sub || middle == sup || !reaches_sup {
                    continue;
                }
                inferences.push(SubsumptionInference::Transitivity {
                    conclusion: conclusion.clone(),
                    premises: [
                        Subsumption::new(sub.clone(), middle.clone()),
                        Subsumption::new(middle.clone(), sup.clone()),
                    ],
                });
            }

            classification.inferences.insert(conclusion, inferences);
        }
    }
    classification
}

impl InferenceSource<Subsumption, SubsumptionInference> for TaxonomyReasoner {
    fn inferences_for(&self, conclusion: &Subsumption) -> Vec<SubsumptionInference> {
        self.classification()
            .inferences
            .get(conclusion)
            .cloned()
            .unwrap_or_default()
    }
}

impl PremiseTracer<SubsumptionInference, Axiom> for TaxonomyReasoner {
    type Conclusion = Subsumption;

    fn trace(&self, inference: &SubsumptionInference) -> Vec<TracedPremise<Subsumption, Axiom>> {
        match inference {
            SubsumptionInference::Asserted { axiom, .. } => {
                vec![TracedPremise::AxiomLeaf(vec![axiom.clone()])]
            }
            SubsumptionInference::Reflexivity { .. } => Vec::new(),
            SubsumptionInference::Transitivity { premises, .. } => premises
                .iter()
                .cloned()
                .map(TracedPremise::Composite)
                .collect(),
        }
    }
}

impl ReasoningBackend<Subsumption, Subsumption, SubsumptionInference, Axiom> for TaxonomyReasoner {
    type Error = TaxonomyError;

    fn locate(&self, query: &Subsumption) -> Result<Subsumption, TaxonomyError> {
        for class in [&query.sub, &query.sup] {
            if !self.ontology.contains_class(class) {
                return Err(TaxonomyError::UnknownClass {
                    name: class.to_string(),
                });
            }
        }
        if self.classification().inferences.contains_key(query) {
            Ok(query.clone())
        } else {
            Err(TaxonomyError::NotEntailed {
                query: query.to_string(),
            })
        }
    }
}

impl EntailmentOracle<Subsumption, Axiom> for TaxonomyReasoner {
    fn relevant_axioms(&self, conclusion: &Subsumption) -> Vec<Axiom> {
        let edges = told_edges(self.ontology.axioms());
        let below = reachable(&edges, &conclusion.sub);
        self.ontology
            .axioms()
            .iter()
            .filter(|axiom| axiom.told().iter().any(|t| below.contains(&t.sub)))
            .cloned()
            .collect()
    }

    fn entails(&self, axioms: &BTreeSet<Axiom>, conclusion: &Subsumption) -> bool {
        let edges = told_edges(axioms);
        reachable(&edges, &conclusion.sub).contains(&conclusion.sup)
    }
}
