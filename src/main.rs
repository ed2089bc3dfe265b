use iot_schema::canonical::YamlSchemaView;
use iot_schema::config::SynthesisConfig;
use iot_schema::ingestion::{CsvTermSource, CsvVocabularySource, TermSource, VocabularySource};
use iot_schema::output::{self, OutputFormat};
use iot_schema::synthesis::SchemaSynthesizer;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iot-schema")]
#[command(about = "Convert the Index of Terms into a LinkML schema")]
#[command(version)]
struct Args {
    /// Term table exported from the glossary sheet (.tsv or .csv)
    #[arg(long)]
    terms: PathBuf,

    /// Controlled-vocabulary table, one column per field
    #[arg(long)]
    vocabulary: PathBuf,

    /// Canonical schema (e.g. mixs.yaml); local imports are followed
    #[arg(long, default_value = "../mixs-source/model/schema/mixs.yaml")]
    canonical: PathBuf,

    /// Schema output file
    #[arg(long, default_value = "iot.yaml")]
    out: PathBuf,

    /// Where rows of unresolved duplicate names are written
    #[arg(long, default_value = "iot_duplicated_names.tsv")]
    unresolved_report: PathBuf,

    /// Column whose values must be unique in collected data
    #[arg(long)]
    idcol: Option<String>,

    /// Optional JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: yaml or json
    #[arg(long, default_value = "yaml")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SynthesisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SynthesisConfig::default(),
    };
    if let Some(idcol) = args.idcol {
        config.identifier_column = idcol;
    }

    info!("Loading canonical schema from {:?}", args.canonical);
    let canonical = YamlSchemaView::load(&args.canonical)
        .with_context(|| format!("Failed to load canonical schema {}", args.canonical.display()))?;

    // Both tables load completely before anything is written.
    let terms = CsvTermSource::from_path(&args.terms)?;
    let rows = terms
        .load_terms()
        .with_context(|| format!("Failed to load term table {}", terms.source_id()))?;
    let vocabulary_source = CsvVocabularySource::from_path(&args.vocabulary)?;
    let vocabulary = vocabulary_source
        .load_vocabulary()
        .with_context(|| format!("Failed to load vocabulary {}", vocabulary_source.source_id()))?;

    let synthesizer = SchemaSynthesizer::new(config);
    let result = synthesizer.run(&rows, &vocabulary, &canonical);

    output::write_unresolved_report_file(&result.unresolved, &args.unresolved_report)?;
    output::write_schema(&result.schema, args.format, &args.out)?;

    let warnings = result.diagnostics.iter().filter(|d| d.is_warning()).count();
    info!(
        "Done: {} packages, {} slots, {} enums, {} warnings",
        result.package_universe.len(),
        result.schema.slots.len(),
        result.schema.enums.len(),
        warnings
    );

    Ok(())
}
