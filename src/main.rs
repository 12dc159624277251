//! pinpoint CLI: justification-complete proofs for subsumption queries.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use pinpoint::completeness::{self, Verification};
use pinpoint::config::ExperimentConfig;
use pinpoint::decoder::{Delimiter, QueryDecoder};
use pinpoint::error::{ExperimentError, PinpointResult};
use pinpoint::provider::{DecodingProofProvider, ProofProvider};
use pinpoint::taxonomy::{self, Ontology, SubsumptionQueryFactory, TaxonomyProofProvider, TaxonomyReasoner};

#[derive(Parser)]
#[command(name = "pinpoint", version, about = "Justification-complete proofs for axiom pinpointing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a justification-complete proof for every query in a file.
    Proofs {
        /// Experiment configuration (TOML). Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ontology file, one axiom per line.
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Query file, one `<Sub> SubClassOf <Sup>` query per line.
        #[arg(long)]
        queries: Option<PathBuf>,

        /// Query field separator: `whitespace`, `tab`, or a single character.
        #[arg(long)]
        delimiter: Option<Delimiter>,

        /// Check each proof for completeness against the reasoner.
        #[arg(long)]
        verify: bool,

        /// Skip verification above this many relevant axioms.
        #[arg(long)]
        max_verified_axioms: Option<usize>,

        /// Print one JSON object per proof.
        #[arg(long)]
        json: bool,
    },

    /// Print every entailed non-trivial subsumption of an ontology.
    Classify {
        /// Ontology file, one axiom per line.
        #[arg(long)]
        ontology: PathBuf,
    },
}

type Provider = DecodingProofProvider<SubsumptionQueryFactory, TaxonomyProofProvider>;

/// What gets reported for one query.
#[derive(Debug, Serialize)]
struct ProofSummary {
    query: String,
    conclusions: usize,
    inferences: usize,
    axioms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<String>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Proofs {
            config,
            ontology,
            queries,
            delimiter,
            verify,
            max_verified_axioms,
            json,
        } => {
            let mut experiment = match config {
                Some(path) => ExperimentConfig::load(&path)?,
                None => ExperimentConfig::default(),
            };
            if let Some(ontology) = ontology {
                experiment.ontology = ontology;
            }
            if let Some(queries) = queries {
                experiment.queries = queries;
            }
            if let Some(delimiter) = delimiter {
                experiment.delimiter = delimiter;
            }
            if let Some(max) = max_verified_axioms {
                experiment.max_verified_axioms = max;
            }
            experiment.verify |= verify;
            experiment.validate()?;

            run_proofs(&experiment, json)?;
        }

        Commands::Classify { ontology } => {
            let reasoner = TaxonomyReasoner::new(Ontology::load(&ontology)?);
            for subsumption in reasoner.entailed() {
                if subsumption.sub != subsumption.sup {
                    println!("{subsumption}");
                }
            }
        }
    }

    Ok(())
}

fn run_proofs(experiment: &ExperimentConfig, json: bool) -> Result<()> {
    let ontology = Ontology::load(&experiment.ontology)?;
    let factory = SubsumptionQueryFactory::bound_to(&ontology);
    let mut provider = DecodingProofProvider::new(
        QueryDecoder::new(experiment.delimiter),
        factory,
        taxonomy::proof_provider(ontology),
    );

    let text = std::fs::read_to_string(&experiment.queries).into_diagnostic()?;
    let (mut proved, mut failed) = (0usize, 0usize);

    for (index, line) in text.lines().enumerate() {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        match summarize(&provider, raw, experiment) {
            Ok(summary) => {
                proved += 1;
                if json {
                    println!("{}", serde_json::to_string(&summary).into_diagnostic()?);
                } else {
                    print_summary(&summary);
                }
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(line = index + 1, query = raw, error = %e, "skipping query");
            }
        }
    }

    provider.dispose();
    tracing::info!(proved, failed, "experiment finished");
    Ok(())
}

fn summarize(provider: &Provider, raw: &str, experiment: &ExperimentConfig) -> PinpointResult<ProofSummary> {
    let jcp = provider.proof(raw)?;

    let verification = if experiment.verify {
        let reasoner = provider.inner().backend().ok_or(ExperimentError::Disposed)?;
        let outcome = completeness::verify(&jcp, reasoner, experiment.max_verified_axioms)?;
        Some(match outcome {
            Verification::Verified { subsets, .. } => format!("complete ({subsets} subsets checked)"),
            Verification::Skipped { axioms } => format!("skipped ({axioms} relevant axioms)"),
        })
    } else {
        None
    };

    Ok(ProofSummary {
        query: jcp.query().to_string(),
        conclusions: jcp.proof().conclusion_count(),
        inferences: jcp.proof().inference_count(),
        axioms: jcp.axioms().iter().map(ToString::to_string).collect(),
        verification,
    })
}

fn print_summary(summary: &ProofSummary) {
    println!(
        "{}: {} conclusions, {} inferences, {} axioms",
        summary.query,
        summary.conclusions,
        summary.inferences,
        summary.axioms.len()
    );
    for axiom in &summary.axioms {
        println!("  {axiom}");
    }
    if let Some(verification) = &summary.verification {
        println!("  verification: {verification}");
    }
}
