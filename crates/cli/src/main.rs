use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use termprune_graph::{AnnotationSummary, CleanerConfig, GraphCleaner};

mod input;
mod output;

/// Gene Ontology category roots used when no `--root` is given
const GO_ROOTS: [&str; 3] = ["GO:0003674", "GO:0008150", "GO:0005575"];

#[derive(Parser)]
#[command(name = "termprune")]
#[command(about = "Prune ontology term graphs down to annotated terms", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a term graph against an annotation map
    Clean(CleanArgs),

    /// Summarize annotations per category
    Summary(SummaryArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Term graph document (JSON)
    #[arg(long, short = 'g')]
    graph: PathBuf,

    /// Annotation map (JSON object: identifier -> term ids)
    #[arg(long, short = 'a')]
    annotations: Option<PathBuf>,

    /// Category root; repeat for several (default: the three GO roots)
    #[arg(long = "root", short = 'r')]
    roots: Vec<String>,
}

impl InputArgs {
    fn roots(&self) -> Vec<String> {
        if self.roots.is_empty() {
            GO_ROOTS.iter().map(|root| root.to_string()).collect()
        } else {
            self.roots.clone()
        }
    }
}

#[derive(Args)]
struct CleanArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Cleaner configuration file (JSON or TOML)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Override max_repairs
    #[arg(long)]
    max_repairs: Option<usize>,

    /// Override the connector node id
    #[arg(long)]
    connector_id: Option<String>,

    /// Override max_leaf_passes
    #[arg(long)]
    max_leaf_passes: Option<usize>,

    /// Skip the layering consistency check
    #[arg(long)]
    no_verify: bool,

    /// Clean categories one after another
    #[arg(long)]
    sequential: bool,

    /// Leave connector nodes out of the emitted graphs
    #[arg(long)]
    strip_connectors: bool,
}

#[derive(Args)]
struct SummaryArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl CleanArgs {
    fn cleaner_config(&self) -> Result<CleanerConfig> {
        let mut config = match &self.config {
            Some(path) => input::load_config(path)?,
            None => CleanerConfig::default(),
        };

        if let Some(max_repairs) = self.max_repairs {
            config.max_repairs = max_repairs;
        }
        if let Some(connector_id) = &self.connector_id {
            config.connector_id = connector_id.clone();
        }
        if let Some(passes) = self.max_leaf_passes {
            config.max_leaf_passes = Some(passes);
        }
        if self.no_verify {
            config.verify_layering = false;
        }
        if self.sequential {
            config.parallel_categories = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout is reserved for JSON
    let json_output = match &cli.command {
        Commands::Clean(args) => args.output.is_none(),
        Commands::Summary(args) => args.json,
    };
    if json_output && !cli.verbose {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Clean(args) => run_clean(args)?,
        Commands::Summary(args) => run_summary(args)?,
    }

    Ok(())
}

fn run_clean(args: CleanArgs) -> Result<()> {
    let config = args.cleaner_config()?;
    let graph = input::load_graph(&args.input.graph)?;
    let annotations = input::load_annotations(args.input.annotations.as_deref())?;
    let roots = args.input.roots();

    let cleaner = GraphCleaner::new(config).context("Invalid cleaner configuration")?;
    let report = cleaner
        .clean(&annotations, graph, &roots)
        .context("Graph cleaning failed")?;

    if report.repairs > 0 {
        log::info!(
            "Cleaning needed {} repair(s); final roots: {:?}",
            report.repairs,
            report.roots
        );
    }

    let out = output::CleanOutput::from_report(&report, args.strip_connectors);
    let json = serde_json::to_string_pretty(&out)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} categories to {}", out.categories.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let graph = input::load_graph(&args.input.graph)?;
    let annotations = input::load_annotations(args.input.annotations.as_deref())?;
    let summary = AnnotationSummary::build(&annotations, &graph, &args.input.roots());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}
