//! Proof data model: inferences, proof graphs, justifiers.
//!
//! A [`ProofGraph`] is the set of inferences backward-reachable from a query
//! conclusion, materialized from an [`InferenceSource`] into a `petgraph`
//! digraph. Edges run from a conclusion to the inferences that produce it, and
//! from each inference to its premises. A [`Justifier`] maps one inference to
//! the axioms it directly depends on. [`JustificationCompleteProof`] bundles
//! the three for a downstream justification search.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::Hash;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

/// A single derivation step: zero or more premises, one conclusion.
pub trait Inference<C> {
    /// Name of the rule that produced this step.
    fn name(&self) -> &str;

    /// The derived conclusion.
    fn conclusion(&self) -> &C;

    /// The conclusions this step consumes.
    fn premises(&self) -> &[C];
}

/// Backend view over derivation state: all inferences that produce a conclusion.
pub trait InferenceSource<C, I> {
    /// Every inference deriving `conclusion`, in a stable order.
    fn inferences_for(&self, conclusion: &C) -> Vec<I>;
}

/// Read-only query interface over a proof.
pub trait Proof<C, I> {
    /// Inferences in this proof that derive `conclusion`.
    fn inferences(&self, conclusion: &C) -> Vec<&I>;
}

/// Maps an inference to the axioms it directly depends on.
///
/// Must be total and pure: the same inference always yields the same set, and
/// inferences without axiom dependencies yield the empty set.
pub trait Justifier<I, A> {
    fn justification(&self, inference: &I) -> BTreeSet<A>;
}

impl<I, A, F> Justifier<I, A> for F
where
    F: Fn(&I) -> BTreeSet<A>,
{
    fn justification(&self, inference: &I) -> BTreeSet<A> {
        self(inference)
    }
}

// ---------------------------------------------------------------------------
// Proof graph
// ---------------------------------------------------------------------------

/// Node payload of a [`ProofGraph`].
#[derive(Debug, Clone)]
pub enum ProofNode<C, I> {
    Conclusion(C),
    Inference(I),
}

/// The subgraph of inferences backward-reachable from a root conclusion.
#[derive(Debug, Clone)]
pub struct ProofGraph<C, I> {
    root: C,
    graph: DiGraph<ProofNode<C, I>, ()>,
    conclusions: HashMap<C, NodeIndex>,
}

impl<C, I> ProofGraph<C, I>
where
    C: Clone + Eq + Hash,
    I: Inference<C>,
{
    /// Build the proof of `root` by breadth-first expansion over `source`.
    ///
    /// Each conclusion is expanded once, so cyclic derivations terminate.
    pub fn backward_from<S>(root: C, source: &S) -> Self
    where
        S: InferenceSource<C, I> + ?Sized,
    {
        let mut graph = DiGraph::new();
        let mut conclusions = HashMap::new();

        let root_idx = graph.add_node(ProofNode::Conclusion(root.clone()));
        conclusions.insert(root.clone(), root_idx);

        let mut queue = VecDeque::from([(root_idx, root.clone())]);
        while let Some((idx, conclusion)) = queue.pop_front() {
            for inference in source.inferences_for(&conclusion) {
                debug_assert!(inference.conclusion() == &conclusion);
                let premises = inference.premises().to_vec();
                let inference_idx = graph.add_node(ProofNode::Inference(inference));
                graph.add_edge(idx, inference_idx, ());

                for premise in premises {
                    let premise_idx = match conclusions.get(&premise) {
                        Some(&existing) => existing,
                        None => {
                            let added = graph.add_node(ProofNode::Conclusion(premise.clone()));
                            conclusions.insert(premise.clone(), added);
                            queue.push_back((added, premise));
                            added
                        }
                    };
                    graph.add_edge(inference_idx, premise_idx, ());
                }
            }
        }

        tracing::trace!(
            conclusions = conclusions.len(),
            inferences = graph.node_count() - conclusions.len(),
            "built proof graph"
        );

        Self {
            root,
            graph,
            conclusions,
        }
    }

    /// The conclusion this proof was built for.
    pub fn root(&self) -> &C {
        &self.root
    }

    /// Whether `conclusion` occurs in the proof.
    pub fn contains(&self, conclusion: &C) -> bool {
        self.conclusions.contains_key(conclusion)
    }

    /// Number of distinct conclusions (including the root).
    pub fn conclusion_count(&self) -> usize {
        self.conclusions.len()
    }

    /// Number of inferences.
    pub fn inference_count(&self) -> usize {
        self.graph.node_count() - self.conclusions.len()
    }

    /// All conclusions, in discovery order.
    pub fn conclusions(&self) -> impl Iterator<Item = &C> + '_ {
        self.graph.node_weights().filter_map(|node| match node {
            ProofNode::Conclusion(c) => Some(c),
            ProofNode::Inference(_) => None,
        })
    }

    /// All inferences, in discovery order.
    pub fn all_inferences(&self) -> impl Iterator<Item = &I> + '_ {
        self.graph.node_weights().filter_map(|node| match node {
            ProofNode::Inference(i) => Some(i),
            ProofNode::Conclusion(_) => None,
        })
    }

    /// The underlying petgraph digraph.
    pub fn graph(&self) -> &DiGraph<ProofNode<C, I>, ()> {
        &self.graph
    }
}

impl<C, I> Proof<C, I> for ProofGraph<C, I>
where
    C: Clone + Eq + Hash,
    I: Inference<C>,
{
    fn inferences(&self, conclusion: &C) -> Vec<&I> {
        let Some(&idx) = self.conclusions.get(conclusion) else {
            return Vec::new();
        };
        // petgraph yields neighbors newest-first
        let mut found: Vec<&I> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| match &self.graph[n] {
                ProofNode::Inference(i) => Some(i),
                ProofNode::Conclusion(_) => None,
            })
            .collect();
        found.reverse();
        found
    }
}

// ---------------------------------------------------------------------------
// Justification-complete proof
// ---------------------------------------------------------------------------

/// A query, its proof, and a justifier, complete w.r.t. minimal justifications.
///
/// Every minimal axiom set entailing the query can be assembled from
/// per-inference [`Justifier`] results along some subgraph of the proof. The
/// justifier may borrow backend state for `'a`, which ties the proof to the
/// provider that produced it.
pub struct JustificationCompleteProof<'a, C, I, A> {
    query: C,
    proof: ProofGraph<C, I>,
    justifier: Box<dyn Justifier<I, A> + Send + Sync + 'a>,
}

impl<'a, C, I, A> JustificationCompleteProof<'a, C, I, A> {
    pub fn new<J>(query: C, proof: ProofGraph<C, I>, justifier: J) -> Self
    where
        J: Justifier<I, A> + Send + Sync + 'a,
    {
        Self {
            query,
            proof,
            justifier: Box::new(justifier),
        }
    }

    pub fn query(&self) -> &C {
        &self.query
    }

    pub fn proof(&self) -> &ProofGraph<C, I> {
        &self.proof
    }

    pub fn justifier(&self) -> &(dyn Justifier<I, A> + Send + Sync + 'a) {
        self.justifier.as_ref()
    }
}

impl<C, I, A> JustificationCompleteProof<'_, C, I, A>
where
    C: Clone + Eq + Hash,
    I: Inference<C>,
    A: Ord,
{
    /// Union of the justifications of every inference in the proof.
    pub fn axioms(&self) -> BTreeSet<A> {
        self.proof
            .all_inferences()
            .flat_map(|i| self.justifier.justification(i))
            .collect()
    }
}

impl<C, I, A> std::fmt::Debug for JustificationCompleteProof<'_, C, I, A>
where
    C: std::fmt::Debug,
    I: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JustificationCompleteProof")
            .field("query", &self.query)
            .field("proof", &self.proof)
            .finish_non_exhaustive()
    }
}
