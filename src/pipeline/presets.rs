use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::backends::{GraphInput, PresetGraph};
use crate::color::NamedColor;

/// Choose the graph input the presets will bind.
///
/// An explicit `requested` identifier must exist. Otherwise the first color
/// input is used, with a warning when the graph has several.
pub fn select_color_input(inputs: &[GraphInput], requested: Option<&str>) -> Result<GraphInput> {
    if let Some(id) = requested {
        return inputs
            .iter()
            .find(|input| input.identifier == id)
            .cloned()
            .with_context(|| format!("no color input named {id:?}"));
    }

    match inputs {
        [] => bail!("graph has no color input"),
        [only] => Ok(only.clone()),
        [first, ..] => {
            warn!(
                count = inputs.len(),
                chosen = %first.identifier,
                "several color inputs found, using the first"
            );
            Ok(first.clone())
        }
    }
}

/// Create one preset per color on `graph`, binding `input`.
///
/// Returns the number of presets created. An empty list creates nothing.
pub fn generate_presets(
    graph: &mut dyn PresetGraph,
    colors: &[NamedColor],
    input: &GraphInput,
) -> Result<usize> {
    if colors.is_empty() {
        warn!(graph = graph.name(), "no colors to generate presets from");
        return Ok(0);
    }

    for named in colors {
        graph
            .new_preset(&named.label, input, named.color)
            .with_context(|| format!("failed to create preset {:?}", named.label))?;
        info!(graph = graph.name(), preset = %named.label, "generated preset");
    }
    Ok(colors.len())
}
