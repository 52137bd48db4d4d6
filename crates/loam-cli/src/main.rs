//! loam CLI - schema-driven content annotation
//!
//! Discovers a content directory, loads the schema document, runs the
//! annotation pipeline, and prints the result. Annotation problems are
//! diagnostics, not failures: the exit code is nonzero only when the content
//! directory cannot be read or the schema document is malformed.

use anyhow::{Context, Result};
use clap::Parser;
use loam_core::{discover, pipeline, Diagnostics, PipelineOptions, SchemaConfig, SourceOptions};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;

use cli::{Cli, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;
    run(&cli)
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let schema = SchemaConfig::load(&cli.schema)
        .with_context(|| format!("loading schema from {}", cli.schema.display()))?;

    let source_options = SourceOptions {
        source_name: cli.source_name.clone(),
        project_root: cli.project_root.clone(),
    };
    let mut diagnostics = Diagnostics::new();
    let objects = discover(&cli.dir, &source_options, &mut diagnostics)
        .with_context(|| format!("scanning content directory {}", cli.dir.display()))?;

    let mut options = PipelineOptions {
        merge_data: cli.merge_data,
        verbose_matching: cli.verbose,
        schema_label: cli
            .schema
            .file_name()
            .map_or_else(|| "loam.yaml".to_string(), |n| n.to_string_lossy().into_owned()),
        ..PipelineOptions::default()
    };
    if let Some(pages_dir) = &schema.pages_dir {
        options = options.with_pages_dir(pages_dir);
    }

    let outcome = pipeline::run(objects, &schema.models, &options);

    let mut all_diagnostics = diagnostics.into_records();
    all_diagnostics.extend(outcome.diagnostics);

    match cli.output {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "objects": outcome.objects,
                "data": outcome.merged_data,
                "diagnostics": all_diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
        OutputFormat::Summary => {
            println!(
                "{} of {} files were matched to models",
                outcome.matched, outcome.total
            );
            for diagnostic in &all_diagnostics {
                println!("{diagnostic}");
            }
        },
    }

    Ok(())
}
