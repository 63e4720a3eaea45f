use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "tocmap",
    version,
    about = "Recover specification structure from a table of contents and map it onto page content"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Validate(ValidateArgs),
    Status(StatusArgs),
    Section(SectionArgs),
    Search(SearchArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PageBackend {
    Pdftotext,
    Lopdf,
    Text,
}

impl PageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdftotext => "pdftotext",
            Self::Lopdf => "lopdf",
            Self::Text => "text",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long, default_value = ".cache/tocmap")]
    pub cache_root: PathBuf,

    /// Defaults to <cache-root>/runs/<run-id>.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, default_value = "tocmap")]
    pub output_prefix: String,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_index: bool,

    #[arg(long, value_enum, default_value_t = PageBackend::Pdftotext)]
    pub backend: PageBackend,

    #[arg(long = "title", default_value = "USB Power Delivery Specification")]
    pub doc_title: String,

    /// First page (0-based) scanned for TOC lines.
    #[arg(long, default_value_t = 13)]
    pub toc_start_page: usize,

    /// End of the TOC scan window (0-based, exclusive).
    #[arg(long, default_value_t = 34)]
    pub toc_end_page: usize,

    /// Lowest page (1-based) any section may start on.
    #[arg(long)]
    pub section_start_page: Option<usize>,

    /// Last page (1-based, inclusive) any section may extend to.
    #[arg(long)]
    pub section_end_page: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long)]
    pub toc_path: PathBuf,

    #[arg(long)]
    pub sections_path: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = "tocmap")]
    pub output_prefix: String,

    #[arg(long, default_value_t = false)]
    pub fail_on_mismatch: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/tocmap")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SectionArgs {
    #[arg(long, default_value = ".cache/tocmap")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Defaults to the most recent indexed run.
    #[arg(long)]
    pub run_id: Option<String>,

    #[arg(long = "id")]
    pub section_id: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long, default_value = ".cache/tocmap")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub run_id: Option<String>,

    #[arg(long)]
    pub query: String,

    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
