use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use orcid_graph::config::{DataPaths, DEFAULT_TOP_N};
use orcid_graph::graph::build_graph;
use orcid_graph::{centrality, gexf, models, query, reconcile, store};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "orcid-graph")]
#[command(about = "Build and query ORCID co-authorship networks")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile ORCID sources of a JSON record dump into one identifier per author
    Reconcile(ReconcileArgs),
    /// Build the co-authorship graph from reconciled papers
    Build(DataArgs),
    /// Rank every identifier by closeness centrality
    Centrality(CentralityArgs),
    /// Shortest path between two identifiers (defaults to the two most central)
    Path(PathArgs),
    /// List co-authors of an identifier who have no ORCID iD
    Coauthors(CoauthorsArgs),
    /// Reconcile, build and rank in one go
    Run(ReconcileArgs),
}

#[derive(Args)]
struct DataArgs {
    /// Directory holding the pipeline artifacts
    #[arg(short, long)]
    data_dir: PathBuf,
}

#[derive(Args)]
struct ReconcileArgs {
    /// JSON array of records with bibcode, author and orcid_* fields
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args)]
struct CentralityArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Number of top identifiers to print
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,
}

#[derive(Args)]
struct PathArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Source ORCID iD (defaults to the most central identifier)
    #[arg(long)]
    from: Option<String>,

    /// Target ORCID iD (defaults to the second most central identifier)
    #[arg(long)]
    to: Option<String>,
}

#[derive(Args)]
struct CoauthorsArgs {
    #[command(flatten)]
    data: DataArgs,

    /// ORCID iD whose co-authors to inspect
    #[arg(long)]
    orcid: Option<String>,
}

fn run_reconcile(args: &ReconcileArgs) -> Result<()> {
    let paths = DataPaths::new(&args.data.data_dir);
    fs::create_dir_all(paths.root())
        .with_context(|| format!("Failed to create data directory: {:?}", paths.root()))?;

    let start = Instant::now();
    let records = models::load_records(&args.input)?;
    let (papers, stats) = reconcile::reconcile_all(&records);
    store::save_papers(&paths, &papers)?;

    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        fallbacks = stats.fallbacks(),
        "Reconcile stage complete"
    );
    Ok(())
}

fn run_build(args: &DataArgs) -> Result<()> {
    let paths = DataPaths::new(&args.data_dir);
    let start = Instant::now();

    let papers = store::load_papers(&paths)?;
    let (graph, _stats) = build_graph(&papers);
    store::save_graph(&paths, &graph)?;
    gexf::save_gexf(&paths, &graph)?;

    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        "Build stage complete"
    );
    Ok(())
}

fn run_centrality(args: &CentralityArgs) -> Result<()> {
    let paths = DataPaths::new(&args.data.data_dir);
    let start = Instant::now();

    let graph = store::load_graph(&paths)?;
    let ranking = centrality::rank(&graph);
    store::save_ranking(&paths, &ranking)?;

    for (id, score) in ranking.top(args.top) {
        println!("{}\t{:.6}", id, score);
    }

    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        "Centrality stage complete"
    );
    Ok(())
}

fn run_path(args: &PathArgs) -> Result<()> {
    let paths = DataPaths::new(&args.data.data_dir);
    let graph = store::load_graph(&paths)?;

    let (source, target) = if let (Some(from), Some(to)) = (&args.from, &args.to) {
        (from.clone(), to.clone())
    } else {
        let ranking = match store::try_load_ranking(&paths)? {
            Some(ranking) => ranking,
            None => {
                info!("No saved centrality ranking, computing one");
                centrality::rank(&graph)
            }
        };
        query::resolve_endpoints(args.from.as_deref(), args.to.as_deref(), &ranking)?
    };

    println!("{}", query::shortest_path(&graph, &source, &target));
    Ok(())
}

fn run_coauthors(args: &CoauthorsArgs) -> Result<()> {
    let paths = DataPaths::new(&args.data.data_dir);

    // Checked before any file is read
    let orcid = args.orcid.as_deref().ok_or(query::QueryError::MissingNode)?;
    let papers = store::load_papers(&paths)?;
    let coauthors = query::coauthors_without_identifier(&papers, Some(orcid))?;

    println!("Coauthors missing ORCID IDs: ");
    println!("{:?}", coauthors);
    Ok(())
}

fn run_all(args: &ReconcileArgs) -> Result<()> {
    run_reconcile(args)?;
    run_build(&args.data)?;
    run_centrality(&CentralityArgs {
        data: DataArgs {
            data_dir: args.data.data_dir.clone(),
        },
        top: DEFAULT_TOP_N,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match &cli.command {
        Commands::Reconcile(args) => run_reconcile(args),
        Commands::Build(args) => run_build(args),
        Commands::Centrality(args) => run_centrality(args),
        Commands::Path(args) => run_path(args),
        Commands::Coauthors(args) => run_coauthors(args),
        Commands::Run(args) => run_all(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
