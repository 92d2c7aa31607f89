use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use owl2tree::config::{ensure_allowed_extension, DEFAULT_BASE_IRI, DEFAULT_MAX_SIZE};
use owl2tree::emitter::ntriples::NTriplesEmitter;
use owl2tree::emitter::turtle::TurtleEmitter;
use owl2tree::emitter::emit_snapshot;
use owl2tree::{LoadOptions, OntologyError, OntologyService, TermRecord};

/// Query the class hierarchy of an OWL/RDF-XML ontology.
#[derive(Parser)]
#[command(name = "owl2tree", version, about)]
struct Cli {
    /// Ontology file (.owl, .rdf or .xml).
    input: PathBuf,

    #[command(subcommand)]
    command: Command,

    /// Maximum accepted source size in bytes.
    #[arg(long, env = "OWL2TREE_MAX_SIZE", default_value_t = DEFAULT_MAX_SIZE, global = true)]
    max_size: u64,

    /// Base IRI for relative references when the document has no xml:base.
    #[arg(long, env = "OWL2TREE_BASE_IRI", default_value = DEFAULT_BASE_IRI, global = true)]
    base_iri: String,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet output.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate statistics.
    Stats,
    /// One term by id.
    Get { id: String },
    /// Direct children of a term.
    Children { id: String },
    /// Direct parents of a term.
    Parents { id: String },
    /// All terms in document order.
    List {
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Terms whose labels or definitions contain QUERY.
    Search { query: String },
    /// Write the export document [default: timestamped file in the current directory].
    Export {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Re-encode the term graph as RDF.
    Rdf {
        /// Output format: ntriples, turtle.
        #[arg(short, long, value_name = "FORMAT", default_value = "ntriples")]
        format: String,

        /// Output file path [default: stdout].
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let mut out = BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    ensure_allowed_extension(&cli.input)?;
    let options = LoadOptions::default()
        .with_max_size(cli.max_size)
        .with_base_iri(cli.base_iri);
    let service = OntologyService::open(&cli.input, options)?;

    match cli.command {
        Command::Stats => print_json(&service.stats()),
        Command::Get { id } => print_json(&service.get_by_id(&id)?),
        Command::Children { id } => print_json(&service.children_of(&id)?),
        Command::Parents { id } => print_json(&service.parents_of(&id)?),
        Command::List { limit } => {
            let terms: Vec<TermRecord> =
                service.list_all().take(limit.unwrap_or(usize::MAX)).collect();
            print_json(&terms)
        }
        Command::Search { query } => print_json(&service.search(&query)?),
        Command::Export { output } => {
            let path = match output {
                Some(path) => {
                    service.export(&path)?;
                    path
                }
                None => service.export_to_dir(Path::new("."))?,
            };
            println!("{}", path.display());
            Ok(())
        }
        Command::Rdf { format, output } => {
            let format = format.to_lowercase();
            let turtle = match format.as_str() {
                "ntriples" | "nt" => false,
                "turtle" | "ttl" => true,
                _ => {
                    return Err(
                        format!("Unknown format: {format}. Use 'ntriples' or 'turtle'.").into(),
                    );
                }
            };
            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            let snapshot = service.snapshot();
            let triple_count = if turtle {
                emit_snapshot(&snapshot, &mut TurtleEmitter::new(writer))?
            } else {
                emit_snapshot(&snapshot, &mut NTriplesEmitter::new(writer))?
            };
            info!(triples = triple_count, format = %format, "emitted RDF");
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        let code = match e.downcast_ref::<OntologyError>() {
            Some(err) if err.is_query_error() => 2,
            _ => 1,
        };
        process::exit(code);
    }
}
