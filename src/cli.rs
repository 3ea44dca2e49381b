use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::{Record, RecordOutcome, ScanReport, TAG_NOT_FOUND_MARKER};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "hisi-nvme")]
#[command(version = VERSION)]
#[command(about = "Read configuration records from Hi-Si NVME partition images", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Read the nvme values
    #[arg(short, long, required = true)]
    pub read: bool,

    /// Print the tag offset and tag length next to each value
    #[arg(short, long)]
    pub debug: bool,

    /// Log scan progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON tag catalog replacing the built-in one
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Run the per-tag scan on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// NVME image to read
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn banner() -> String {
    format!("Hi-Si NVME parser -- v{VERSION}")
}

/// One report line: `NAME = value`, with offset and tag hex length in debug mode.
pub fn format_record(record: &Record, debug: bool) -> String {
    let mut line = match &record.outcome {
        RecordOutcome::Found { value, .. } => format!("{} = {}", record.name, value),
        RecordOutcome::TagNotFound => format!("{} = {}", record.name, TAG_NOT_FOUND_MARKER),
        RecordOutcome::Failed { reason } => format!("{} = <error: {}>", record.name, reason),
    };

    if debug {
        let offset = record
            .offset()
            .map_or_else(|| "-".to_string(), |offset| offset.to_string());
        let _ = write!(line, " (OFFSET = {offset}) (LENGHT = {})", record.hex_len);
    }
    line
}

pub fn render_text(report: &ScanReport, debug: bool) -> String {
    let mut out = String::new();
    for record in &report.records {
        out.push_str(&format_record(record, debug));
        out.push('\n');
    }
    out
}

pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
