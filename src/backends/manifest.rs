use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorValue;

use super::{GraphInput, PresetGraph};

/// One stored preset: a label and the channel values bound to one input.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub label: String,
    pub input: String,
    pub values: Vec<f32>,
}

/// In-memory graph that collects presets and writes them as a KDL manifest.
#[derive(Debug, Clone)]
pub struct PresetManifest {
    graph: String,
    inputs: Vec<GraphInput>,
    presets: Vec<Preset>,
}

impl PresetManifest {
    pub fn new(graph: impl Into<String>, inputs: Vec<GraphInput>) -> Self {
        Self {
            graph: graph.into(),
            inputs,
            presets: Vec::new(),
        }
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Serialize every preset in creation order.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("graph {:?} {{\n", self.graph));
        for preset in &self.presets {
            let values: Vec<String> = preset.values.iter().map(|v| format_channel(*v)).collect();
            out.push_str(&format!("    preset {:?} {{\n", preset.label));
            out.push_str(&format!("        {} {}\n", preset.input, values.join(" ")));
            out.push_str("    }\n");
        }
        out.push_str("}\n");
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.serialize())
            .with_context(|| format!("failed to write presets to {}", path.display()))?;
        Ok(())
    }
}

/// Channels are printed with up to six decimals, trailing zeros trimmed.
fn format_channel(value: f32) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

impl PresetGraph for PresetManifest {
    fn name(&self) -> &str {
        &self.graph
    }

    fn color_inputs(&self) -> &[GraphInput] {
        &self.inputs
    }

    fn new_preset(&mut self, label: &str, input: &GraphInput, color: ColorValue) -> Result<()> {
        if !self.inputs.contains(input) {
            anyhow::bail!(
                "graph {:?} has no color input {:?}",
                self.graph,
                input.identifier
            );
        }
        let values = color.channels()[..input.kind.channel_count()].to_vec();
        self.presets.push(Preset {
            label: label.to_string(),
            input: input.identifier.clone(),
            values,
        });
        Ok(())
    }
}
