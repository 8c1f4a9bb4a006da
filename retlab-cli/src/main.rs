//! RetLab CLI: build price and return tables, answer the project questions.
//!
//! Commands:
//! - `universe`: list the configured tickers
//! - `prices`: one ticker's price file as loaded
//! - `matrix` / `returns` / `abnormal`: the pipeline tables
//! - `avg` / `annualized`: aggregate statistics over a return column
//! - `answers`: the four project questions

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use retlab_core::export::{write_csv, write_parquet};
use retlab_core::pprint::PrettyPrinter;
use retlab_core::stats::{annualized_return, equal_weighted_returns, yearly_average};
use retlab_core::{
    AnswerPeriod, DateSeries, Pipeline, PriceField, ProjectAnswers, ProjectConfig, TimeSeriesTable,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(
    name = "retlab",
    about = "RetLab CLI: stock returns, abnormal returns and portfolio statistics"
)]
struct Cli {
    /// Project config TOML. Defaults to the built-in universe under ./data.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured tickers and names.
    Universe,
    /// Show one ticker's price file with standardised columns.
    Prices {
        ticker: String,

        /// Write the table to a .csv or .parquet file instead of printing.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Price matrix: one column per ticker on the union of dates.
    Matrix {
        /// Tickers (any case). Defaults to the whole universe.
        tickers: Vec<String>,

        /// Price field: open, high, low, close, adj_close, volume.
        #[arg(long, default_value = "adj_close")]
        field: String,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Daily returns plus the market column, on market dates only.
    Returns {
        tickers: Vec<String>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Daily returns minus the market return.
    Abnormal {
        tickers: Vec<String>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Average of a return column over one calendar year.
    Avg {
        /// Column label, e.g. aapl or mkt.
        column: String,

        year: i32,

        /// Average abnormal instead of raw returns.
        #[arg(long, default_value_t = false)]
        abnormal: bool,

        /// Tickers to load. Defaults to the whole universe.
        tickers: Vec<String>,
    },
    /// Annualized return of a column (or `ew`, the equal-weighted portfolio).
    Annualized {
        column: String,

        /// First day of the window (YYYY-MM-DD), inclusive.
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the window (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: NaiveDate,

        #[arg(long, default_value_t = false)]
        abnormal: bool,

        tickers: Vec<String>,
    },
    /// Answer the four project questions for the universe.
    Answers {
        /// Year used to rank tickers by average daily return.
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        /// Print JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    let pipeline = Pipeline::new(&config);

    match cli.command {
        Commands::Universe => run_universe(&pipeline),
        Commands::Prices { ticker, output } => {
            let table = pipeline.read_prices(&ticker)?;
            emit_table(&table, &format!("{} prices:", ticker.to_uppercase()), output.as_deref())
        }
        Commands::Matrix {
            tickers,
            field,
            output,
        } => {
            let field: PriceField = field.parse()?;
            let table = price_matrix(&pipeline, &tickers, &field)?;
            emit_table(&table, &format!("{field} price matrix:"), output.as_deref())
        }
        Commands::Returns { tickers, output } => {
            let table = return_table(&pipeline, &tickers, false)?;
            emit_table(&table, "returns:", output.as_deref())
        }
        Commands::Abnormal { tickers, output } => {
            let table = return_table(&pipeline, &tickers, true)?;
            emit_table(&table, "abnormal returns:", output.as_deref())
        }
        Commands::Avg {
            column,
            year,
            abnormal,
            tickers,
        } => {
            let table = return_table(&pipeline, &tickers, abnormal)?;
            let avg = yearly_average(&table, &column.to_lowercase(), year)?;
            let msg = format!("average daily return of {column} in {year}:");
            println!("{}", PrettyPrinter::default().format_scalar(avg, Some(&msg)));
            Ok(())
        }
        Commands::Annualized {
            column,
            start,
            end,
            abnormal,
            tickers,
        } => {
            let table = return_table(&pipeline, &tickers, abnormal)?;
            let series = column_or_portfolio(&table, &column.to_lowercase())?;
            let ann = annualized_return(&series, start, end)?;
            let msg = format!("annualized return of {column} from {start} to {end}:");
            println!("{}", PrettyPrinter::default().format_scalar(ann, Some(&msg)));
            Ok(())
        }
        Commands::Answers {
            year,
            start,
            end,
            json,
        } => {
            let defaults = AnswerPeriod::default();
            let period = AnswerPeriod {
                rank_year: year.unwrap_or(defaults.rank_year),
                start: start.unwrap_or(defaults.start),
                end: end.unwrap_or(defaults.end),
            };
            run_answers(&pipeline, period, json)
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ProjectConfig> {
    match path {
        Some(p) => {
            let config = ProjectConfig::from_file(p)
                .with_context(|| format!("loading config {}", p.display()))?;
            info!(path = %p.display(), tickers = config.tickers.len(), "loaded config");
            Ok(config)
        }
        None => Ok(ProjectConfig::default()),
    }
}

fn price_matrix(
    pipeline: &Pipeline,
    tickers: &[String],
    field: &PriceField,
) -> Result<TimeSeriesTable> {
    if tickers.is_empty() {
        Ok(pipeline.universe_price_matrix(field)?)
    } else {
        Ok(pipeline.price_matrix(tickers, field)?)
    }
}

/// Adjusted-close returns (with `mkt`), or abnormal returns (without).
fn return_table(pipeline: &Pipeline, tickers: &[String], abnormal: bool) -> Result<TimeSeriesTable> {
    let prices = price_matrix(pipeline, tickers, &PriceField::AdjClose)?;
    let returns = pipeline.returns(&prices)?;
    if abnormal {
        Ok(pipeline.abnormal_returns(&returns)?)
    } else {
        Ok(returns)
    }
}

/// A named column, or `ew` for the equal-weighted mean of ticker columns.
fn column_or_portfolio(table: &TimeSeriesTable, column: &str) -> Result<DateSeries> {
    if column == "ew" && table.column("ew").is_none() {
        let tickers: Vec<&str> = table
            .columns()
            .iter()
            .filter(|c| !c.is_mkt())
            .map(|c| c.as_str())
            .collect();
        return Ok(equal_weighted_returns(table, &tickers)?);
    }
    Ok(table.series(column)?)
}

fn emit_table(table: &TimeSeriesTable, msg: &str, output: Option<&Path>) -> Result<()> {
    let Some(path) = output else {
        println!("{}", PrettyPrinter::default().format_table(table, Some(msg)));
        return Ok(());
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(table, BufWriter::new(file))?;
        }
        Some("parquet") => write_parquet(table, path)?,
        _ => bail!(
            "unsupported output '{}': use a .csv or .parquet extension",
            path.display()
        ),
    }
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "table written"
    );
    Ok(())
}

fn run_universe(pipeline: &Pipeline) -> Result<()> {
    let universe = pipeline.universe();
    println!("Tickers: {}", universe.len());
    println!("{}", "-".repeat(40));
    for (symbol, name) in universe.iter() {
        println!("{symbol:<8} {name}");
    }
    Ok(())
}

fn run_answers(pipeline: &Pipeline, period: AnswerPeriod, json: bool) -> Result<()> {
    let answers = ProjectAnswers::compute(pipeline, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answers)?);
        return Ok(());
    }

    let pp = PrettyPrinter::default();
    let window = format!("{} to {}", period.start, period.end);
    println!(
        "{}",
        pp.format_text(
            &format!(
                "{} ({:.6})",
                answers.q1_top_ticker, answers.q1_average_return
            ),
            Some(&format!(
                "Q1: highest average daily return in {}",
                period.rank_year
            )),
        )
    );
    println!(
        "{}",
        pp.format_scalar(
            answers.q2_ew_annualized,
            Some(&format!("Q2: annualized EW portfolio return, {window}")),
        )
    );
    println!(
        "{}",
        pp.format_scalar(
            answers.q3_top_annualized,
            Some(&format!(
                "Q3: annualized return of {}, {window}",
                answers.q1_top_ticker
            )),
        )
    );
    println!(
        "{}",
        pp.format_scalar(
            answers.q4_top_abnormal_annualized,
            Some(&format!(
                "Q4: annualized abnormal return of {}, {window}",
                answers.q1_top_ticker
            )),
        )
    );
    println!("dataset: {}", answers.dataset_hash);
    Ok(())
}
