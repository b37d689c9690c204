pub mod manifest;

use anyhow::Result;

use crate::color::ColorValue;

/// Declared type of a color graph input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorInputKind {
    Rgb,
    Rgba,
}

impl ColorInputKind {
    pub fn channel_count(self) -> usize {
        match self {
            ColorInputKind::Rgb => 3,
            ColorInputKind::Rgba => 4,
        }
    }
}

/// A color-typed input parameter of a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInput {
    pub identifier: String,
    pub kind: ColorInputKind,
}

impl GraphInput {
    pub fn new(identifier: impl Into<String>, kind: ColorInputKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }

    /// Parse `id` or `id:rgb` / `id:rgba`. A bare identifier is RGBA.
    pub fn parse(spec: &str) -> Result<Self> {
        let (identifier, kind) = match spec.rsplit_once(':') {
            Some((id, "rgb")) => (id, ColorInputKind::Rgb),
            Some((id, "rgba")) => (id, ColorInputKind::Rgba),
            Some((_, other)) => anyhow::bail!("unknown color input type {other:?} in {spec:?}"),
            None => (spec, ColorInputKind::Rgba),
        };
        if identifier.is_empty() {
            anyhow::bail!("empty graph input identifier in {spec:?}");
        }
        Ok(Self::new(identifier, kind))
    }
}

/// A graph that can store named presets.
pub trait PresetGraph {
    /// Name of the graph, used in logs and output.
    fn name(&self) -> &str;

    /// The color-typed inputs a preset may bind.
    fn color_inputs(&self) -> &[GraphInput];

    /// Create a preset `label` that sets `input` to `color`.
    fn new_preset(&mut self, label: &str, input: &GraphInput, color: ColorValue) -> Result<()>;
}
