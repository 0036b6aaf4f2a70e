//! Command-line argument definitions and parsing
//!
//! Clap definitions only; the handlers live in `commands`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use matterq::{LoaderConfig, OutputFormat, ResolverConfig};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "matterq",
    version,
    about = "Query the front matter of a folder of markdown notes",
    long_about = "matterq reads the front matter block at the top of markdown notes and \
                  lets you filter, sort, limit and project the results like a spreadsheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Filter, sort and project documents by their front matter
    Query(QueryArgs),
    /// Print the parsed front matter of one document
    Show(ShowArgs),
    /// List every front matter field used across documents
    Fields(FieldsArgs),
}

/// Options controlling which documents are read
#[derive(Args, Debug, Clone)]
pub struct DocumentOptions {
    /// Files or directories to read
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Follow symbolic links when walking directories
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum depth for directory recursion
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Include hidden files and directories (starting with .)
    #[arg(long)]
    pub include_hidden: bool,

    /// Only read files with these extensions
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Skip paths matching these glob patterns
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Skip files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Fail instead of skipping files that cannot be read
    #[arg(long)]
    pub strict: bool,
}

impl DocumentOptions {
    pub fn resolver_config(&self) -> ResolverConfig {
        let defaults = ResolverConfig::default();
        ResolverConfig {
            follow_links: self.follow_links,
            max_depth: self.max_depth,
            include_hidden: self.include_hidden,
            extensions: if self.extensions.is_empty() {
                defaults.extensions
            } else {
                self.extensions
                    .iter()
                    .map(|ext| ext.trim_start_matches('.').to_lowercase())
                    .collect()
            },
            exclude_patterns: self.exclude_patterns.clone(),
        }
    }

    pub fn loader_config(&self) -> LoaderConfig {
        let defaults = LoaderConfig::default();
        LoaderConfig {
            max_file_size: self.max_file_size.or(defaults.max_file_size),
            skip_unreadable: !self.strict,
        }
    }
}

/// Output formats for query results
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum FormatArg {
    /// Markdown table
    #[default]
    Table,
    /// JSON array
    Json,
    /// YAML sequence
    Yaml,
    /// Document paths, one per line
    Paths,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Paths => OutputFormat::Paths,
        }
    }
}

/// Output formats for a single record
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum RecordFormatArg {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub documents: DocumentOptions,

    /// Condition as FIELD=VALUE, FIELD:OP=VALUE or FIELD:exists (repeatable)
    #[arg(short = 'w', long = "where", value_name = "EXPR")]
    pub conditions: Vec<String>,

    /// Read where/sort/limit/fields from a YAML or JSON file
    #[arg(long, value_name = "FILE")]
    pub query_file: Option<PathBuf>,

    /// Field to sort by
    #[arg(short, long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Comma-separated fields to show
    #[arg(short, long, value_delimiter = ',', value_name = "FIELDS")]
    pub fields: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Table)]
    pub format: FormatArg,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Document to parse
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = RecordFormatArg::Yaml)]
    pub format: RecordFormatArg,
}

/// Arguments for the fields command
#[derive(Args, Debug)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub documents: DocumentOptions,
}
