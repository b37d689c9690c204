//! Create graph presets from a CSV of named colors.
//!
//! The core is [`pipeline::extract::extract_colors`], which reads a CSV into
//! ordered (label, color) pairs under an [`options::ExtractionOptions`]
//! snapshot. The rest of the crate finds the CSV in a package, applies the
//! user's option edits, and hands the colors to a [`backends::PresetGraph`].

pub mod backends;
pub mod cli;
pub mod color;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod preview;

pub use color::{ColorValue, NamedColor};
pub use error::ExtractError;
pub use options::{ExtractionOptions, OptionUpdate, OptionsModel};
pub use pipeline::extract::extract_colors;
