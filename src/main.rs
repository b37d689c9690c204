use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use csv_presets::backends::manifest::PresetManifest;
use csv_presets::backends::{GraphInput, PresetGraph};
use csv_presets::cli::Args;
use csv_presets::options::{OptionsModel, TracingObserver};
use csv_presets::pipeline::discover::resolve_csv_path;
use csv_presets::pipeline::extract::extract_colors;
use csv_presets::pipeline::presets::{generate_presets, select_color_input};
use csv_presets::preview;

fn init_logging(verbose: bool) {
    let directive = if verbose {
        "csv_presets=debug"
    } else {
        "csv_presets=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut model = OptionsModel::with_observer(TracingObserver);
    for update in args.option_updates() {
        model.update(update);
    }

    let csv_path = resolve_csv_path(&args.path, args.resource.as_deref())?;
    let colors = extract_colors(&csv_path, &model.snapshot())
        .with_context(|| format!("no colors found in {}", csv_path.display()))?;

    if args.preview {
        preview::render(&mut std::io::stderr(), &colors).context("failed to print preview")?;
    }

    let inputs = args
        .inputs
        .iter()
        .map(|spec| GraphInput::parse(spec))
        .collect::<Result<Vec<_>>>()?;
    let mut graph = PresetManifest::new(args.graph.clone(), inputs);
    let input = select_color_input(graph.color_inputs(), args.use_input.as_deref())?;
    generate_presets(&mut graph, &colors, &input)?;

    match &args.output {
        Some(path) => graph.write_to(path)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(graph.serialize().as_bytes())
                .context("failed to write presets to stdout")?;
        }
    }
    Ok(())
}
