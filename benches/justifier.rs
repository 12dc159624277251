//! Benchmarks for proof construction and justification.

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pinpoint::completeness::{self, MAX_VERIFIED_AXIOMS};
use pinpoint::decoder::QueryDecoder;
use pinpoint::proof::{Inference, ProofGraph};
use pinpoint::provider::{DecodingProofProvider, ProofProvider};
use pinpoint::taxonomy::{
    self, Axiom, ClassName, Ontology, Subsumption, SubsumptionInference, SubsumptionQueryFactory,
    TaxonomyReasoner,
};

fn chain(len: usize) -> Ontology {
    let text: String = (0..len).map(|n| format!("C{n} SubClassOf C{}\n", n + 1)).collect();
    Ontology::parse(&text).unwrap()
}

fn query(len: usize) -> Subsumption {
    Subsumption::new(
        ClassName::new("C0").unwrap(),
        ClassName::new(format!("C{len}")).unwrap(),
    )
}

fn bench_classify(c: &mut Criterion) {
    let ontology = chain(64);
    c.bench_function("classify_chain_64", |bench| {
        bench.iter(|| {
            let reasoner = TaxonomyReasoner::new(ontology.clone());
            black_box(reasoner.entailed().len())
        })
    });
}

fn bench_proof_graph(c: &mut Criterion) {
    let reasoner = TaxonomyReasoner::new(chain(32));
    let query = query(32);
    reasoner.entailed();

    c.bench_function("proof_graph_chain_32", |bench| {
        bench.iter(|| {
            let proof: ProofGraph<Subsumption, SubsumptionInference> =
                ProofGraph::backward_from(query.clone(), &reasoner);
            black_box(proof.inference_count())
        })
    });
}

fn bench_decoded_proof(c: &mut Criterion) {
    let ontology = chain(32);
    let provider = DecodingProofProvider::new(
        QueryDecoder::default(),
        SubsumptionQueryFactory::bound_to(&ontology),
        taxonomy::proof_provider(ontology),
    );

    c.bench_function("decoded_proof_axioms_chain_32", |bench| {
        bench.iter(|| {
            let jcp = provider.proof(black_box("C0 SubClassOf C32")).unwrap();
            let axioms: BTreeSet<Axiom> = jcp
                .proof()
                .all_inferences()
                .filter(|i| i.premises().is_empty())
                .flat_map(|i| jcp.justifier().justification(i))
                .collect();
            black_box(axioms.len())
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let provider = taxonomy::proof_provider(chain(10));
    let query = query(10);

    c.bench_function("verify_chain_10", |bench| {
        bench.iter(|| {
            let jcp = provider.proof(&query).unwrap();
            let reasoner = provider.backend().unwrap();
            black_box(completeness::verify(&jcp, reasoner, MAX_VERIFIED_AXIOMS).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_proof_graph,
    bench_decoded_proof,
    bench_verify
);
criterion_main!(benches);
