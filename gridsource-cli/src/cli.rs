use std::path::PathBuf;

use clap::Args as ClapArgs;
use clap::Parser;
use clap::Subcommand;
use gridsource_lib::loader::OLYMPIC_WINNERS_URL;
use gridsource_lib::loader::Source;
use gridsource_lib::query::AggFunc;
use gridsource_lib::query::ColumnVo;
use gridsource_lib::query::SortModelItem;

/// Command-line arguments for gridsource
#[derive(Parser, Debug)]
#[command(version, about = "Serve grid row requests from an in-memory dataset")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log to stderr instead of the log file
    #[arg(long, short, global = true, action)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request one block of rows and print the response as JSON
    Query(QueryArgs),

    /// Validate column definitions and print the resolved columns
    Columns {
        /// File or URL holding the column definitions
        source: Source,
    },

    /// Manage saved column layouts
    Layout {
        #[command(subcommand)]
        command: LayoutCommand,

        /// Layout database (defaults to the platform data directory)
        #[arg(long, global = true)]
        db: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct QueryArgs {
    /// File or URL holding the dataset
    #[arg(long, default_value = OLYMPIC_WINNERS_URL)]
    pub source: Source,

    /// Column definitions; their comparators are used when sorting
    #[arg(long)]
    pub columns: Option<Source>,

    /// Sort column as `col` or `col:desc`; repeat for multi-column sort
    #[arg(long = "sort", value_parser = parse_sort)]
    pub sort: Vec<SortModelItem>,

    /// Column filter as `col=<json filter model>`
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filter: Vec<FilterArg>,

    /// First row of the block
    #[arg(long, default_value_t = 0, conflicts_with = "page")]
    pub start: usize,

    /// Row after the last row of the block
    #[arg(long, default_value_t = 100, conflicts_with = "page")]
    pub end: usize,

    /// Zero-based page to request instead of `--start`/`--end`
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page when `--page` is given
    #[arg(long, default_value_t = 100)]
    pub page_size: usize,

    /// Group by this column; repeat for nested groups
    #[arg(long = "group-by")]
    pub group_by: Vec<String>,

    /// Open a group level by key, outermost first
    #[arg(long = "group-key")]
    pub group_key: Vec<String>,

    /// Aggregate a column on group rows as `col:func`
    #[arg(long = "agg", value_parser = parse_agg)]
    pub agg: Vec<ColumnVo>,

    /// Simulated server latency in milliseconds
    #[arg(long, default_value_t = 200)]
    pub latency_ms: u64,

    /// Print only the row ids and the row count
    #[arg(long, action)]
    pub ids: bool,
}

/// One `--filter` argument.
#[derive(Debug, Clone)]
pub struct FilterArg {
    pub column: String,
    pub spec: serde_json::Value,
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommand {
    /// Save a layout from a JSON file of column states
    Save {
        file: PathBuf,

        /// Store it as the reset layout
        #[arg(long, action)]
        reset: bool,
    },

    /// Print a stored layout
    Show {
        /// Show the reset layout
        #[arg(long, action)]
        reset: bool,
    },

    /// Apply a stored layout to column definitions and print the result
    Apply {
        /// File or URL holding the column definitions
        columns: Source,

        /// Apply the reset layout
        #[arg(long, action)]
        reset: bool,
    },

    /// Remove the saved layout
    Clear,
}

fn parse_sort(s: &str) -> Result<SortModelItem, String> {
    match s.split_once(':') {
        None => Ok(SortModelItem::asc(s)),
        Some((col, "asc")) => Ok(SortModelItem::asc(col)),
        Some((col, "desc")) => Ok(SortModelItem::desc(col)),
        Some((_, other)) => Err(format!("unknown sort direction '{}', expected asc or desc", other)),
    }
}

fn parse_filter(s: &str) -> Result<FilterArg, String> {
    let (column, spec) = s
        .split_once('=')
        .ok_or_else(|| format!("expected col=<json>, got '{}'", s))?;
    let spec = serde_json::from_str(spec).map_err(|e| format!("invalid filter for '{}': {}", column, e))?;
    Ok(FilterArg {
        column: column.to_string(),
        spec,
    })
}

fn parse_agg(s: &str) -> Result<ColumnVo, String> {
    let (col, func) = s
        .split_once(':')
        .ok_or_else(|| format!("expected col:func, got '{}'", s))?;
    let func: AggFunc = serde_json::from_value(serde_json::Value::String(func.to_lowercase()))
        .map_err(|_| format!("unknown aggregation '{}'", func))?;
    Ok(ColumnVo::new(col).with_agg_func(func))
}
