// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, anyhow};
use clap::error::ErrorKind;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use reddit_search::config::DEFAULT_CONFIG_PATH;
use reddit_search::utils::logging::{format_info, format_success, format_warning};
use reddit_search::{
    Config, ErrorResponse, IndexClient, IngestPipeline, IngestReport, JsonExporter,
    OperationTimer, SearchResponse, StructuredQuery, Validator, WriteMode,
};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

const MISSING_ARGUMENTS: &str =
    "missing arguments: expected <TOP_K> <QUERY>... or a subcommand (see --help)";

#[derive(Parser)]
#[command(name = "reddit_search")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Full-text search over crawled Reddit posts", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_PATH,
        env = "REDDIT_SEARCH_CONFIG",
        global = true
    )]
    config: PathBuf,

    /// Overrides `indexDir` from the config file
    #[arg(long, value_name = "DIR", global = true)]
    index_dir: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    /// Output format when searching without a subcommand
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(flatten)]
    search: SearchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// `reddit_search <TOP_K> <QUERY>...`, the same as the `search` subcommand.
#[derive(Args, Default)]
struct SearchArgs {
    /// Maximum number of results to return
    #[arg(requires = "query")]
    top_k: Option<usize>,

    /// Query text; multiple words are joined with spaces
    #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a free-text query against the default field and print the top hits
    Search {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Maximum number of results to return
        top_k: usize,

        /// Query text; multiple words are joined with spaces
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        query: Vec<String>,
    },

    /// Run a structured query (boolean, boost, proximity, range, wildcard)
    Query {
        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[command(subcommand)]
        mode: QueryMode,
    },

    /// Build the index from json-lines post batches
    Index {
        /// Directory holding the batches (defaults to indexing.data_dir)
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Add to the existing index instead of recreating it
        #[arg(long)]
        append: bool,

        /// Also write the build report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[arg(long)]
        no_progress: bool,
    },

    /// Print document and segment counts of the index
    Stats,
}

#[derive(Subcommand)]
enum QueryMode {
    /// Term clauses: every --must term required, --must-not terms excluded
    Boolean {
        #[arg(long, num_args = 1..)]
        must: Vec<String>,

        #[arg(long, num_args = 1..)]
        should: Vec<String>,

        #[arg(long, num_args = 1..)]
        must_not: Vec<String>,
    },

    /// Query-parser syntax with boosts, e.g. "ios^2.0 OR android"
    Boost {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Words appearing within --slop positions of each other, in order
    Proximity {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,

        #[arg(long, default_value_t = 4)]
        slop: u32,
    },

    /// Inclusive integer range on an indexed numeric field
    Range {
        #[arg(long, default_value = "mod_date")]
        field: String,

        #[arg(allow_negative_numbers = true)]
        start: i64,

        #[arg(allow_negative_numbers = true)]
        end: i64,
    },

    /// `*` matches any run of characters, `?` a single one
    Wildcard { pattern: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Compact json on one line
    Json,
    /// Indented json
    Pretty,
    /// Human readable listing
    Text,
}

impl QueryMode {
    fn into_structured(self) -> Result<StructuredQuery> {
        Ok(match self {
            QueryMode::Boolean {
                must,
                should,
                must_not,
            } => StructuredQuery::Boolean {
                must,
                should,
                must_not,
            },
            QueryMode::Boost { query } => StructuredQuery::Boost(Validator::normalize_query(&query)?),
            QueryMode::Proximity { words, slop } => StructuredQuery::Proximity { words, slop },
            QueryMode::Range { field, start, end } => StructuredQuery::Range { field, start, end },
            QueryMode::Wildcard { pattern } => StructuredQuery::Wildcard(pattern),
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut stdout = io::stdout();

    let status = match parse_cli(std::env::args_os()) {
        Ok(cli) => {
            if !cli.color {
                colored::control::set_override(false);
            }
            reddit_search::utils::logging::init_logger(cli.color, cli.verbose);
            execute(cli, &mut stdout).await
        }
        Err(err) => report_usage_error(err, &mut stdout),
    };

    let _ = stdout.flush();
    ExitCode::from(status)
}

/// Parses arguments, turning the bare `<TOP_K> <QUERY>...` form into `search`.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cli = Cli::try_parse_from(args)?;

    if cli.command.is_none() {
        let SearchArgs { top_k, query } = std::mem::take(&mut cli.search);
        let Some(top_k) = top_k else {
            return Err(Cli::command().error(ErrorKind::MissingRequiredArgument, MISSING_ARGUMENTS));
        };
        cli.command = Some(Commands::Search {
            format: cli.format,
            top_k,
            query,
        });
    }

    Ok(cli)
}

fn report_usage_error(err: clap::Error, out: &mut impl Write) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            print_error(out, MISSING_ARGUMENTS);
            EXIT_USAGE
        }
        _ => {
            print_error(out, err.to_string().trim());
            EXIT_USAGE
        }
    }
}

fn print_error(out: &mut impl Write, message: &str) {
    let written = ErrorResponse::new(message)
        .to_json()
        .map_err(anyhow::Error::from)
        .and_then(|json| writeln!(out, "{}", json).map_err(anyhow::Error::from));

    if let Err(err) = written {
        error!("Failed to write error response: {:#}", err);
    }
}

async fn execute(cli: Cli, out: &mut impl Write) -> u8 {
    match run(cli, out).await {
        Ok(()) => 0,
        Err(err) => {
            error!("{:#}", err);
            print_error(out, &format!("{:#}", err));
            EXIT_FAILURE
        }
    }
}

async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    info!("Loading configuration from: {}", cli.config.display());
    let config = Config::load(&cli.config, cli.index_dir.as_deref())
        .context("Failed to load configuration")?;

    let command = cli
        .command
        .ok_or_else(|| anyhow!("No command given"))?;

    match command {
        Commands::Search {
            format,
            top_k,
            query,
        } => cmd_search(&config, top_k, &query, format, out),
        Commands::Query {
            top_k,
            format,
            mode,
        } => {
            let top_k = top_k.unwrap_or(config.search.default_limit);
            cmd_query(&config, top_k, mode.into_structured()?, format, out)
        }
        Commands::Index {
            data_dir,
            append,
            report,
            no_progress,
        } => cmd_index(&config, data_dir, append, report, !no_progress, cli.color, out).await,
        Commands::Stats => cmd_stats(&config, out),
    }
}

fn open_client(config: &Config) -> Result<IndexClient> {
    IndexClient::open(&config.index_dir, config.search.clone()).with_context(|| {
        format!("Failed to open index at {}", config.index_dir.display())
    })
}

fn cmd_search(
    config: &Config,
    top_k: usize,
    words: &[String],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let timer = OperationTimer::new("search");

    Validator::validate_top_k(top_k)?;
    let query = Validator::normalize_query(words)?;
    info!("Searching for: {}", query);

    let client = open_client(config)?;
    let response = client.search_text(&query, top_k).context("Search failed")?;

    print_response(&response, format, out)?;
    timer.finish();
    Ok(())
}

fn cmd_query(
    config: &Config,
    top_k: usize,
    query: StructuredQuery,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let timer = OperationTimer::new("structured query");

    Validator::validate_top_k(top_k)?;
    info!("Running structured query: {:?}", query);

    let client = open_client(config)?;
    let response = client
        .search_structured(&query, top_k)
        .context("Search failed")?;

    print_response(&response, format, out)?;
    timer.finish();
    Ok(())
}

fn print_response(
    response: &SearchResponse,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", response.to_json(false)?)?,
        OutputFormat::Pretty => writeln!(out, "{}", response.to_json(true)?)?,
        OutputFormat::Text => write!(out, "{}", response.format_text())?,
    }
    Ok(())
}

async fn cmd_index(
    config: &Config,
    data_dir: Option<PathBuf>,
    append: bool,
    report_path: Option<PathBuf>,
    show_progress: bool,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let data_dir = data_dir
        .or_else(|| config.indexing.data_dir.clone())
        .ok_or_else(|| anyhow!("No data directory: pass --data-dir or set indexing.data_dir"))?;

    let mode = if append {
        WriteMode::Append
    } else {
        WriteMode::Create
    };

    info!(
        "Indexing {} into {} ({:?})",
        data_dir.display(),
        config.index_dir.display(),
        mode
    );

    let pipeline = IngestPipeline::new(config.indexing.clone()).with_progress(show_progress, color);
    let stats = pipeline
        .run(&data_dir, &config.index_dir, mode)
        .await
        .context("Indexing failed")?;

    let report = IngestReport::new(&data_dir, &config.index_dir, stats);

    if let Some(path) = report_path {
        JsonExporter::new(path)?
            .export_report(&report, true)
            .context("Failed to write index report")?;
    }

    eprintln!(
        "{}",
        format_success(&format!(
            "Indexed {} posts from {} files in {:.2}s ({:.1} posts/s)",
            report.stats.posts_indexed,
            report.stats.files_processed,
            report.stats.duration_secs,
            report.stats.posts_per_second()
        ))
    );
    if report.stats.lines_skipped > 0 || report.stats.files_failed > 0 {
        eprintln!(
            "{}",
            format_warning(&format!(
                "{} malformed lines skipped, {} files unreadable ({:.1}% of files read)",
                report.stats.lines_skipped,
                report.stats.files_failed,
                report.stats.success_rate()
            ))
        );
    }
    if report.stats.duplicates_skipped > 0 {
        eprintln!(
            "{}",
            format_info(&format!(
                "{} duplicate posts dropped",
                report.stats.duplicates_skipped
            ))
        );
    }

    writeln!(out, "{}", serde_json::to_string(&report)?)?;
    Ok(())
}

fn cmd_stats(config: &Config, out: &mut impl Write) -> Result<()> {
    let client = open_client(config)?;
    let stats = client.stats();
    info!("Total documents: {}", stats.num_docs);
    writeln!(out, "{}", serde_json::to_string(&stats)?)?;
    Ok(())
}
