use clap::Parser;
use colored::*;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use globalign::{
    read_fasta, GlobalignError, GlobalignResult, NeedlemanWunsch, NucleotideMatrix, Sequence,
    SequenceType, SubstitutionMatrix, SubstitutionScheme,
};

/// Align query sequences against a reference and rank them by score
#[derive(Parser)]
#[command(name = "globalign", version, about)]
struct Cli {
    /// Reference FASTA file (single record)
    reference: PathBuf,

    /// Query FASTA files, one record each
    #[arg(required = true)]
    queries: Vec<PathBuf>,

    /// Substitution matrix file; defaults to built-in BLOSUM62 for protein
    /// input and +2/-1 match/mismatch for nucleotide input
    #[arg(short, long)]
    matrix: Option<PathBuf>,

    /// Gap opening penalty (must be negative)
    #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
    gap_open: f64,

    /// Gap extension penalty (must be negative)
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    gap_extend: f64,

    /// Print the full alignment for each query, not just the ranking
    #[arg(short, long)]
    alignments: bool,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Number of worker threads (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,
}

#[derive(Serialize)]
struct ReportRow {
    id: String,
    header: String,
    score: f64,
    identity: f64,
    aligned_reference: String,
    aligned_query: String,
}

fn main() {
    // Initialize logging with GLOBALIGN_LOG environment variable support
    let log_level = std::env::var("GLOBALIGN_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<GlobalignError>() {
            Some(GlobalignError::InvalidParameter(_)) => 2,
            Some(GlobalignError::UnknownSymbol(_)) => 2,
            Some(GlobalignError::Io(_)) => 3,
            Some(GlobalignError::Format(_)) => 4,
            Some(GlobalignError::MalformedSequence(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let reference = read_fasta(&cli.reference)?;
    let queries = cli
        .queries
        .iter()
        .map(read_fasta)
        .collect::<GlobalignResult<Vec<_>>>()?;

    let rows = match &cli.matrix {
        Some(path) => {
            tracing::info!(matrix = %path.display(), "using substitution matrix file");
            rank_queries(
                SubstitutionMatrix::from_file(path)?,
                &reference,
                &queries,
                &cli,
            )?
        }
        None => match reference.detect_type() {
            SequenceType::Protein => {
                tracing::info!("using built-in BLOSUM62");
                rank_queries(SubstitutionMatrix::blosum62(), &reference, &queries, &cli)?
            }
            SequenceType::Nucleotide => {
                tracing::info!("using default nucleotide scoring");
                rank_queries(NucleotideMatrix::new(), &reference, &queries, &cli)?
            }
        },
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Reference: {}", reference.header());
        println!();
        for row in &rows {
            println!(
                "{:>10.1}  {:>5.1}%  {}",
                row.score,
                row.identity * 100.0,
                row.header
            );
            if cli.alignments {
                println!("  ref    {}", row.aligned_reference);
                println!("  query  {}", row.aligned_query);
                println!();
            }
        }
    }

    Ok(())
}

/// Align every query against the reference and sort by descending score.
fn rank_queries<S>(
    scheme: S,
    reference: &Sequence,
    queries: &[Sequence],
    cli: &Cli,
) -> anyhow::Result<Vec<ReportRow>>
where
    S: SubstitutionScheme + Sync,
{
    let aligner = NeedlemanWunsch::new(scheme, cli.gap_open, cli.gap_extend)?;

    let mut rows = queries
        .par_iter()
        .map(|query| {
            let result = aligner.align(&reference.sequence, &query.sequence)?;
            Ok(ReportRow {
                id: query.id.clone(),
                header: query.header(),
                score: result.score,
                identity: result.identity(),
                aligned_reference: String::from_utf8_lossy(&result.aligned_a).into_owned(),
                aligned_query: String::from_utf8_lossy(&result.aligned_b).into_owned(),
            })
        })
        .collect::<GlobalignResult<Vec<_>>>()?;

    rows.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(rows)
}
