//! Proof providers: the factory side of justification-complete proofs.
//!
//! [`BackendProofProvider`] owns a [`ReasoningBackend`] and turns its
//! derivation state into [`JustificationCompleteProof`]s.
//! [`DecodingProofProvider`] puts a [`QueryDecoder`] in front of any provider
//! so callers holding raw query strings can use it.
//!
//! Proofs borrow their provider, so `dispose(&mut self)` cannot run while a
//! proof is alive. After disposal every request fails with
//! [`ExperimentError::Disposed`].

use std::fmt;
use std::hash::Hash;

use crate::decoder::{QueryDecoder, QueryFactory};
use crate::error::{ExperimentError, PinpointResult};
use crate::justifier::{PremiseTracer, TracingJustifier};
use crate::proof::{Inference, InferenceSource, JustificationCompleteProof, ProofGraph};

/// Produces justification-complete proofs for queries of type `Q`.
pub trait ProofProvider<Q: ?Sized, C, I, A> {
    /// Build the justification-complete proof of `query`.
    fn proof(&self, query: &Q) -> PinpointResult<JustificationCompleteProof<'_, C, I, A>>;

    /// Release backend resources. Calling this again is a no-op.
    fn dispose(&mut self);

    /// Whether [`dispose`](Self::dispose) has been called.
    fn is_disposed(&self) -> bool;
}

/// The external reasoner, as seen by a [`BackendProofProvider`].
///
/// The backend supplies every inference deriving a conclusion and a premise
/// trace per inference; the pair must be complete w.r.t. minimal
/// justifications of whatever conclusion [`locate`](Self::locate) returns.
pub trait ReasoningBackend<Q: ?Sized, C, I, A>:
    InferenceSource<C, I> + PremiseTracer<I, A, Conclusion = C> + Sync
{
    type Error: std::error::Error + Send + Sync + 'static;

    /// Map a query to the conclusion whose proof is requested.
    ///
    /// Fails when the query cannot be located or the backend declines it.
    fn locate(&self, query: &Q) -> Result<C, Self::Error>;
}

/// Proof provider that exclusively owns a reasoning backend.
pub struct BackendProofProvider<B> {
    name: String,
    backend: Option<B>,
}

impl<B> BackendProofProvider<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        let name = name.into();
        tracing::debug!(provider = %name, "proof provider acquired backend");
        Self {
            name,
            backend: Some(backend),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owned backend, unless disposed.
    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    fn release(&mut self) {
        if let Some(backend) = self.backend.take() {
            drop(backend);
            tracing::debug!(provider = %self.name, "proof provider released backend");
        }
    }
}

impl<B, Q, C, I, A> ProofProvider<Q, C, I, A> for BackendProofProvider<B>
where
    B: ReasoningBackend<Q, C, I, A>,
    Q: ?Sized,
    C: Clone + Eq + Hash + fmt::Display,
    I: Inference<C>,
    A: Ord,
{
    fn proof(&self, query: &Q) -> PinpointResult<JustificationCompleteProof<'_, C, I, A>> {
        let backend = self.backend.as_ref().ok_or(ExperimentError::Disposed)?;
        let conclusion = backend.locate(query).map_err(ExperimentError::backend)?;

        let proof = ProofGraph::backward_from(conclusion.clone(), backend);
        tracing::debug!(
            provider = %self.name,
            query = %conclusion,
            conclusions = proof.conclusion_count(),
            inferences = proof.inference_count(),
            "built justification-complete proof"
        );

        Ok(JustificationCompleteProof::new(
            conclusion,
            proof,
            TracingJustifier::new(backend),
        ))
    }

    fn dispose(&mut self) {
        self.release();
    }

    fn is_disposed(&self) -> bool {
        self.backend.is_none()
    }
}

impl<B> Drop for BackendProofProvider<B> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<B> fmt::Debug for BackendProofProvider<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendProofProvider")
            .field("name", &self.name)
            .field("disposed", &self.backend.is_none())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Decoding adapter
// ---------------------------------------------------------------------------

/// Exposes a provider over typed queries as a provider over raw strings.
#[derive(Debug)]
pub struct DecodingProofProvider<F, P> {
    decoder: QueryDecoder,
    factory: F,
    inner: P,
}

impl<F, P> DecodingProofProvider<F, P>
where
    F: QueryFactory,
{
    pub fn new(decoder: QueryDecoder, factory: F, inner: P) -> Self {
        Self {
            decoder,
            factory,
            inner,
        }
    }

    /// Decode `raw` without requesting a proof.
    pub fn decode(&self, raw: &str) -> Result<F::Query, crate::error::DecodeError> {
        self.decoder.decode(raw, &self.factory)
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwrap the adapter, returning the inner provider.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<F, P, C, I, A> ProofProvider<str, C, I, A> for DecodingProofProvider<F, P>
where
    F: QueryFactory,
    P: ProofProvider<F::Query, C, I, A>,
{
    fn proof(&self, raw: &str) -> PinpointResult<JustificationCompleteProof<'_, C, I, A>> {
        let query = self.decode(raw)?;
        self.inner.proof(&query)
    }

    fn dispose(&mut self) {
        if !self.inner.is_disposed() {
            self.inner.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}
