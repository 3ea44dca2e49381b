use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hisi_nvme::cli::{self, Cli, OutputFormat};
use hisi_nvme::{ImageSource, RecordCatalog, ScanOptions, scan_image_with};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => RecordCatalog::load(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
        None => RecordCatalog::builtin(),
    };

    let image = ImageSource::open(&cli.image)
        .with_context(|| format!("Failed to open image: {}", cli.image.display()))?;

    let options = ScanOptions {
        parallel: !cli.sequential,
        ..ScanOptions::default()
    };

    let report = scan_image_with(&image, &catalog, &options)
        .with_context(|| format!("Failed to parse image: {}", cli.image.display()))?;

    match cli.format {
        OutputFormat::Text => {
            println!("\n{}\n", cli::banner());
            print!("{}", cli::render_text(&report, cli.debug));
            println!();
        }
        OutputFormat::Json => {
            println!("{}", cli::render_json(&report)?);
        }
    }

    tracing::info!(
        found = report.found_count(),
        total = report.records.len(),
        "scan complete"
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
