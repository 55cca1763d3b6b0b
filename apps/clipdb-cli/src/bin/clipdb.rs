use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clipdb_core::config::{expand_path, Config, ExportSettings};
use clipdb_core::TextCodec;
use clipdb_pipeline::Orchestrator;
use clipdb_render::{book_files, render_all, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "clipdb",
    version,
    about = "Organise e-reader clippings into one deduplicated file per book"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split the clippings export into per-book files, then render them.
    Extract(ExtractArgs),
    /// Re-render every book file already in the destination.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Clippings file, or the device mount holding `My Clippings.txt`.
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    destination: Option<String>,
    /// Text encoding label of the export (utf8, latin1, windows-1252, ...).
    #[arg(long)]
    encoding: Option<String>,
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Write each clipping's metadata line under its text.
    #[arg(long)]
    include_metadata: bool,
    #[arg(long)]
    no_progress: bool,
    /// Print run counters as JSON on stdout.
    #[arg(long)]
    stats_json: bool,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[arg(long)]
    destination: Option<String>,
    #[arg(long)]
    encoding: Option<String>,
    #[arg(long)]
    format: OutputFormat,
}

impl ExtractArgs {
    fn apply(&self, mut settings: ExportSettings) -> ExportSettings {
        if let Some(source) = &self.source {
            settings.source = source.clone();
        }
        if let Some(destination) = &self.destination {
            settings.destination = destination.clone();
        }
        if let Some(encoding) = &self.encoding {
            settings.encoding = encoding.clone();
        }
        if let Some(format) = self.format {
            settings.format = format.to_string();
        }
        settings.include_metadata |= self.include_metadata;
        settings.show_progress &= !self.no_progress;
        settings
    }
}

fn output_format(settings: &ExportSettings) -> OutputFormat {
    settings.format.parse().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "only txt files will be created");
        OutputFormat::Txt
    })
}

fn extract(args: &ExtractArgs, settings: ExportSettings) -> anyhow::Result<()> {
    let settings = args.apply(settings);
    settings.validate()?;
    let source = settings.source_file();
    let destination = settings.destination_dir();
    let format = output_format(&settings);
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        format = %format,
        include_metadata = settings.include_metadata,
        "using parameters"
    );

    let span = tracing::info_span!("clipdb_run", source = %source.display());
    let orchestrator = Orchestrator::new(span).with_progress(settings.show_progress);
    let report = orchestrator.run(
        &source,
        &destination,
        &settings.encoding,
        settings.include_metadata,
    )?;

    let codec = TextCodec::for_label(&settings.encoding)?;
    let outputs = render_all(&report.files, format, &codec)?;
    tracing::info!(count = outputs.len(), "converted successfully");

    println!("\nExported titles:\n");
    for path in &outputs {
        println!("{}", path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());
    }
    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&report.stats)?);
    }
    Ok(())
}

fn render(args: &RenderArgs, settings: ExportSettings) -> anyhow::Result<()> {
    let destination = expand_path(args.destination.as_deref().unwrap_or(&settings.destination));
    let codec = TextCodec::for_label(args.encoding.as_deref().unwrap_or(&settings.encoding))?;
    let books = book_files(&destination);
    if books.is_empty() {
        println!("No book files found under {}.", destination.display());
        return Ok(());
    }
    let outputs = render_all(&books, args.format, &codec)
        .with_context(|| format!("rendering books under {}", destination.display()))?;
    println!("✅ Rendered {} books as {}", outputs.len(), args.format);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.export_settings()?;
    match &cli.command {
        Command::Extract(args) => extract(args, settings),
        Command::Render(args) => render(args, settings),
    }
}
