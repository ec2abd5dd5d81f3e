use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use ldes_extractor::{
    CollectionType, Extractor, ExtractorOptions, Member, member_stream_to_store, parse_date_time,
    quads_to_string, store_to_string, turtle_to_store,
};
use oxigraph::io::RdfFormat;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ldes-extract")]
#[command(
    about = "Extract a time-bounded subset of the members of a versioned LDES",
    long_about = None
)]
struct Cli {
    /// Turtle file holding the LDES and its members
    #[arg(short, long)]
    input: PathBuf,

    /// Identifier of the LDES to extract from
    #[arg(short, long)]
    ldes: String,

    /// Start of the window (xsd:dateTime, inclusive). Defaults to the Unix epoch
    #[arg(long)]
    start: Option<String>,

    /// End of the window (xsd:dateTime, inclusive). Defaults to now
    #[arg(long)]
    end: Option<String>,

    /// Only extract versions of this identifier
    #[arg(long)]
    version_identifier: Option<String>,

    /// Identifier given to the extracted collection
    #[arg(long)]
    extractor_identifier: Option<String>,

    /// Overrides the ldes:versionOfPath of the LDES
    #[arg(long)]
    version_of_path: Option<String>,

    /// Overrides the ldes:timestampPath of the LDES
    #[arg(long)]
    timestamp_path: Option<String>,

    /// Group members per version identifier
    #[arg(long)]
    group: bool,

    /// Group members per version identifier and materialize their timestamps
    #[arg(long, conflicts_with = "group")]
    materialize: bool,

    /// Type asserted for the extracted collection
    #[arg(long, value_enum, default_value_t = CollectionKind::EventStream)]
    collection_type: CollectionKind,

    /// Also write the metadata of the extraction
    #[arg(long)]
    with_metadata: bool,

    /// Output file. Defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CollectionKind {
    EventStream,
    Collection,
}

fn parse_instant(value: &str, flag: &str) -> Result<DateTime<Utc>> {
    match parse_date_time(value) {
        Some(instant) => Ok(instant),
        None => bail!("--{} is not a valid xsd:dateTime: {}", flag, value),
    }
}

fn options_from(cli: &Cli) -> Result<ExtractorOptions> {
    let mut options = ExtractorOptions::new(cli.ldes.clone());
    if let Some(start) = &cli.start {
        options = options.with_start_date(parse_instant(start, "start")?);
    }
    if let Some(end) = &cli.end {
        options = options.with_end_date(parse_instant(end, "end")?);
    }
    options.version_identifier = cli.version_identifier.clone();
    options.extractor_identifier = cli.extractor_identifier.clone();
    options.version_of_path = cli.version_of_path.clone();
    options.timestamp_path = cli.timestamp_path.clone();
    if cli.group || cli.materialize {
        options = options.materialized(cli.materialize);
    }
    options.collection_type = match cli.collection_type {
        CollectionKind::EventStream => CollectionType::EventStream,
        CollectionKind::Collection => CollectionType::Collection,
    };
    Ok(options)
}

/// Writes the members as N-Quads, linked into the collection named by the run's metadata
fn render(extractor: &Extractor, members: Vec<Member>, with_metadata: bool) -> Result<String> {
    let metadata = extractor.metadata()?;
    let collection = metadata.extractor_identifier().as_str();
    let extracted = member_stream_to_store(members.into_iter().map(Ok), Some(collection))?;
    let mut output = store_to_string(&extracted)?;
    if with_metadata {
        output.push_str(&quads_to_string(metadata.quads(), RdfFormat::NQuads)?);
    }
    Ok(output)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("ldes_extract=info,ldes_extractor=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = options_from(&cli)?;

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let store = turtle_to_store(&text, None)?;
    info!("Loaded {} quads from {}", store.len()?, cli.input.display());

    let mut extractor = Extractor::new(store);
    let members = extractor.create(&options)?;
    info!("Extracted {} members from {}", members.len(), cli.ldes);

    let output = render(&extractor, members, cli.with_metadata)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote extraction to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
