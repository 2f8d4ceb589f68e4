//! RankBoard CLI: inspect, render and export ranking documents.
//!
//! Commands:
//! - `summary`: header, counts and capabilities of the active universe
//! - `render`: write the static dashboard page plus chart configs
//! - `sepa-page`: write the pinned SEPA page for one universe
//! - `export`: filtered full ranking as CSV, or the render model as JSON
//! - `validate`: list dataset issues, exit non-zero if there are any
//! - `digest`: BLAKE3 digest of the source document

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rankboard_core::{
    digest, reconcile, ActionFilter, Config, DataSource, Dataset, RenderModel, Session,
    SourceSpec, ValidationPolicy, ViewSelection,
};
use rankboard_render::{
    export_model_json, export_table_csv, write_sepa_page, write_site, BOTTOM100_UNIVERSE_ID,
};

#[derive(Parser)]
#[command(name = "rankboard", about = "RankBoard CLI: ranked signal dashboard tooling")]
struct Cli {
    /// Config file (default: <config_dir>/rankboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Document path or http(s) URL, overriding the config.
    #[arg(long, global = true)]
    source: Option<String>,

    /// Fail the load on any validation issue.
    #[arg(long, global = true, default_value_t = false)]
    strict: bool,

    /// Log JSON lines to stderr instead of human-readable text.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Session overrides shared by the commands that reconcile.
#[derive(Args)]
struct SessionArgs {
    /// Universe id to select (unknown ids fall back to the first universe).
    #[arg(long)]
    universe: Option<String>,

    /// View: signals, sepa or charts.
    #[arg(long)]
    view: Option<ViewSelection>,

    /// Case-insensitive ticker substring.
    #[arg(long)]
    query: Option<String>,

    /// Action filter: ALL, BUY, SELL or HOLD.
    #[arg(long)]
    action: Option<ActionFilter>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header, counts and capabilities of the active universe.
    Summary {
        #[command(flatten)]
        session: SessionArgs,

        /// Print a JSON object instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write index.html and charts.json for the given session state.
    Render {
        #[command(flatten)]
        session: SessionArgs,

        /// Output directory.
        #[arg(long, default_value = "site")]
        out: PathBuf,
    },
    /// Write the SEPA-only page for one universe.
    SepaPage {
        /// Universe to pin the page to.
        #[arg(long, default_value = BOTTOM100_UNIVERSE_ID)]
        universe: String,

        /// Output HTML file.
        #[arg(long, default_value = "sepa.html")]
        out: PathBuf,
    },
    /// Export the filtered full ranking (csv) or the render model (json).
    Export {
        #[command(flatten)]
        session: SessionArgs,

        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check the document and print every issue found.
    Validate,
    /// Print the BLAKE3 digest of the source document.
    Digest,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

/// Where to load from and how strictly, after merging flags over config.
struct LoadPlan {
    source: SourceSpec,
    config: Config,
    policy: ValidationPolicy,
}

impl LoadPlan {
    fn new(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let source = match &cli.source {
            Some(location) => SourceSpec::parse(location),
            None => config.source.spec()?,
        };
        let policy = if cli.strict {
            ValidationPolicy::Strict
        } else {
            config.source.policy()
        };
        Ok(Self {
            source,
            config,
            policy,
        })
    }

    fn load_with(&self, policy: ValidationPolicy) -> Result<Dataset> {
        let started = Instant::now();
        let dataset = self
            .source
            .open(self.config.source.timeout())?
            .load(policy)
            .with_context(|| format!("failed to load {}", self.source))?;
        tracing::info!(
            source = %self.source,
            universes = dataset.universes.len(),
            digest = dataset.short_digest(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded dataset"
        );
        Ok(dataset)
    }

    fn load(&self) -> Result<Dataset> {
        self.load_with(self.policy)
    }

    /// Config session, then command-line overrides.
    fn session(&self, args: &SessionArgs) -> Session {
        let mut session = self.config.session.to_session();
        if let Some(universe) = &args.universe {
            session.universe.select(universe.clone());
        }
        if let Some(view) = args.view {
            session.view = view;
        }
        if let Some(query) = &args.query {
            session.filter.query = query.clone();
        }
        if let Some(action) = args.action {
            session.filter.action = action;
        }
        session
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let plan = LoadPlan::new(&cli)?;

    match &cli.command {
        Commands::Summary { session, json } => run_summary(&plan, session, *json),
        Commands::Render { session, out } => run_render(&plan, session, out),
        Commands::SepaPage { universe, out } => run_sepa_page(&plan, universe, out),
        Commands::Export {
            session,
            format,
            out,
        } => run_export(&plan, session, *format, out.as_deref()),
        Commands::Validate => run_validate(&plan),
        Commands::Digest => run_digest(&plan),
    }
}

fn run_summary(plan: &LoadPlan, args: &SessionArgs, json: bool) -> Result<()> {
    let dataset = plan.load()?;
    let board = match reconcile(&dataset, &plan.session(args)) {
        RenderModel::Board(board) => board,
        RenderModel::NoData { message, .. } => bail!("{message}"),
    };

    if json {
        let summary = serde_json::json!({
            "signal": board.header.signal_name,
            "as_of_date": board.header.as_of_date,
            "fundamentals_as_of": board.header.fundamentals_as_of,
            "universe": board.header.universe_id,
            "universe_name": board.header.universe_name,
            "counts": board.counts,
            "capabilities": dataset.capabilities,
            "digest": dataset.digest,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let caps = dataset.capabilities;
    println!("{}", board.header.signal_name);
    println!("{}", board.header.as_of_line());
    println!("------------------------------------");
    println!("Universe:       {}", board.header.universe_id);
    println!("Universe size:  {}", board.counts.universe_size);
    println!("Buys:           {}", board.counts.buy);
    println!("Sells:          {}", board.counts.sell);
    if caps.has_sepa {
        println!("SEPA:           {}", board.counts.sepa_count);
    }
    println!("Matching:       {}", board.filtered_full.len());
    println!("------------------------------------");
    println!(
        "Universes: {}  views: {}  sepa: {}  charts: {}  analyst: {}",
        dataset.universes.len(),
        yes_no(caps.multi_view()),
        yes_no(caps.has_sepa),
        yes_no(caps.has_charts),
        yes_no(caps.has_analyst)
    );
    println!("Digest:    {}", dataset.digest);
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn run_render(plan: &LoadPlan, args: &SessionArgs, out: &Path) -> Result<()> {
    let dataset = plan.load()?;
    let model = reconcile(&dataset, &plan.session(args));
    let index = write_site(&model, out)?;
    println!("Dashboard written to: {}", index.display());
    Ok(())
}

fn run_sepa_page(plan: &LoadPlan, universe: &str, out: &Path) -> Result<()> {
    let dataset = plan.load()?;
    write_sepa_page(&dataset, universe, out)?;
    println!("SEPA page written to: {}", out.display());
    Ok(())
}

fn run_export(
    plan: &LoadPlan,
    args: &SessionArgs,
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<()> {
    let dataset = plan.load()?;
    let model = reconcile(&dataset, &plan.session(args));
    let content = match format {
        ExportFormat::Csv => match &model {
            RenderModel::Board(board) => export_table_csv(&board.filtered_full)?,
            RenderModel::NoData { message, .. } => bail!("{message}"),
        },
        ExportFormat::Json => export_model_json(&model)?,
    };

    match out {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported to: {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// Always loads leniently so every issue can be listed, not just the first failure.
fn run_validate(plan: &LoadPlan) -> Result<()> {
    let dataset = plan.load_with(ValidationPolicy::Lenient)?;
    let issues = dataset.validate();
    if issues.is_empty() {
        println!(
            "{}: OK ({} universe(s))",
            plan.source,
            dataset.universes.len()
        );
        return Ok(());
    }

    for issue in &issues {
        eprintln!("{issue}");
    }
    eprintln!("{}: {} issue(s)", plan.source, issues.len());
    std::process::exit(1);
}

fn run_digest(plan: &LoadPlan) -> Result<()> {
    let bytes = plan
        .source
        .open(plan.config.source.timeout())?
        .fetch()
        .with_context(|| format!("failed to read {}", plan.source))?;
    println!("{}  {}", digest(&bytes), plan.source);
    Ok(())
}
