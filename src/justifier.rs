//! Axiom-dependency extraction for single inferences.
//!
//! A backend exposes, per inference, how each consumed premise was obtained:
//! either directly from axioms (an axiom leaf) or as another derived
//! conclusion. [`TracingJustifier`] collects the axioms of the leaves and
//! leaves composite premises alone; composing justifications across several
//! steps is the job of whoever walks the proof.

use std::collections::BTreeSet;

use crate::proof::Justifier;

/// How one premise of an inference was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TracedPremise<C, A> {
    /// The premise comes directly from these axioms.
    AxiomLeaf(Vec<A>),
    /// The premise is a derived conclusion with its own inferences.
    Composite(C),
}

/// Backend tracing structure over inferences.
pub trait PremiseTracer<I, A> {
    type Conclusion;

    /// The traced premises of `inference`, one entry per premise.
    fn trace(&self, inference: &I) -> Vec<TracedPremise<Self::Conclusion, A>>;
}

/// Justifier that unions the axioms of an inference's axiom-leaf premises.
#[derive(Debug)]
pub struct TracingJustifier<'a, T> {
    tracer: &'a T,
}

// Manual impls: the justifier only holds a shared reference.
impl<T> Clone for TracingJustifier<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TracingJustifier<'_, T> {}

impl<'a, T> TracingJustifier<'a, T> {
    pub fn new(tracer: &'a T) -> Self {
        Self { tracer }
    }
}

impl<I, A, T> Justifier<I, A> for TracingJustifier<'_, T>
where
    T: PremiseTracer<I, A>,
    A: Ord,
{
    fn justification(&self, inference: &I) -> BTreeSet<A> {
        let mut axioms = BTreeSet::new();
        for premise in self.tracer.trace(inference) {
            match premise {
                TracedPremise::AxiomLeaf(leaf) => axioms.extend(leaf),
                TracedPremise::Composite(_) => {}
            }
        }
        axioms
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Inferences are plain ids; each maps to a fixed premise trace.
    #[derive(Default)]
    struct TableTracer {
        premises: HashMap<u32, Vec<TracedPremise<&'static str, &'static str>>>,
        calls: AtomicUsize,
    }

    impl TableTracer {
        fn with(mut self, id: u32, premises: Vec<TracedPremise<&'static str, &'static str>>) -> Self {
            self.premises.insert(id, premises);
            self
        }
    }

    impl PremiseTracer<u32, &'static str> for TableTracer {
        type Conclusion = &'static str;

        fn trace(&self, inference: &u32) -> Vec<TracedPremise<&'static str, &'static str>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.premises.get(inference).cloned().unwrap_or_default()
        }
    }

    use TracedPremise::{AxiomLeaf, Composite};

    #[test]
    fn unions_axiom_leaves() {
        let tracer = TableTracer::default().with(
            1,
            vec![AxiomLeaf(vec!["a", "b"]), Composite("x"), AxiomLeaf(vec!["b", "c"])],
        );
        let justifier = TracingJustifier::new(&tracer);

        assert_eq!(justifier.justification(&1u32), BTreeSet::from(["a", "b", "c"]));
    }

    #[test]
    fn composite_premises_are_not_expanded() {
        let tracer = TableTracer::default()
            .with(1, vec![Composite("x"), Composite("y")])
            .with(2, vec![AxiomLeaf(vec!["a"])]);
        let justifier = TracingJustifier::new(&tracer);

        assert!(justifier.justification(&1u32).is_empty());
        // Only the requested inference is traced.
        assert_eq!(tracer.calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn no_premises_is_empty_not_an_error() {
        let tracer = TableTracer::default();
        let justifier = TracingJustifier::new(&tracer);
        assert!(justifier.justification(&42u32).is_empty());
    }

    #[test]
    fn repeated_calls_agree() {
        let tracer = TableTracer::default().with(1, vec![AxiomLeaf(vec!["z", "a"])]);
        let justifier = TracingJustifier::new(&tracer);
        let first = justifier.justification(&1u32);
        for _ in 0..5 {
            assert_eq!(justifier.justification(&1u32), first);
        }
    }

    #[test]
    fn concurrent_calls() {
        let tracer = TableTracer::default()
            .with(1, vec![AxiomLeaf(vec!["a"])])
            .with(2, vec![AxiomLeaf(vec!["b"]), AxiomLeaf(vec!["c"])]);
        let justifier = TracingJustifier::new(&tracer);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8u32)
                .map(|n| {
                    let id = n % 2 + 1;
                    s.spawn(move || (id, justifier.justification(&id)))
                })
                .collect();
            for handle in handles {
                let (id, axioms) = handle.join().unwrap();
                assert_eq!(axioms.len(), id as usize);
            }
        });
        assert_eq!(tracer.calls.load(Ordering::Relaxed), 8);
    }
}
