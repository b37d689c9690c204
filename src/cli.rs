use std::path::PathBuf;

use clap::Parser;

use crate::options::{ColorCells, ColorValueFormat, CsvDialect, FormatSetting, OptionUpdate};

/// Create color presets for a material graph from a CSV of named colors.
#[derive(Parser, Debug)]
#[command(name = "csv-presets", version, about)]
pub struct Args {
    /// CSV file, or package directory to search for one
    pub path: PathBuf,

    /// CSV dialect
    #[arg(long, value_enum)]
    pub dialect: Option<CsvDialect>,

    /// The first record is data, not a header
    #[arg(long)]
    pub no_header: bool,

    /// No label cell; labels are derived from the color
    #[arg(long)]
    pub no_label: bool,

    /// Index of the cell holding the label
    #[arg(long, value_name = "N")]
    pub label_cell: Option<usize>,

    /// Cell holding the color (`1`), or one cell per channel (`1,2,3`)
    #[arg(long, value_name = "N|N,N,N", value_parser = ColorCells::parse)]
    pub color_cells: Option<ColorCells>,

    /// Separator between channels inside a single color cell
    #[arg(long, value_name = "TEXT")]
    pub separator: Option<String>,

    /// Encoding of the channel values
    #[arg(long, value_enum)]
    pub format: Option<ColorValueFormat>,

    /// Read a fourth (alpha) channel from the CSV
    #[arg(long)]
    pub alpha: bool,

    /// Raw option edit, applied after the flags above (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = OptionUpdate::parse_assignment)]
    pub set: Vec<OptionUpdate>,

    /// CSV file name to use when PATH is a package with several
    #[arg(long, value_name = "NAME")]
    pub resource: Option<String>,

    /// Name of the target graph
    #[arg(long, default_value = "graph")]
    pub graph: String,

    /// Color input of the graph, as `ID` or `ID:rgb` / `ID:rgba` (repeatable)
    #[arg(long = "input", value_name = "ID[:KIND]", default_value = "color")]
    pub inputs: Vec<String>,

    /// Color input the presets bind (first input if omitted)
    #[arg(long, value_name = "ID")]
    pub use_input: Option<String>,

    /// Write the preset manifest to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a colored preview of the extracted colors to stderr
    #[arg(long)]
    pub preview: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Option edits requested on the command line, in application order.
    pub fn option_updates(&self) -> Vec<OptionUpdate> {
        let mut updates = Vec::new();
        if let Some(dialect) = self.dialect {
            updates.push(OptionUpdate::CsvDialect(dialect));
        }
        if self.no_header {
            updates.push(OptionUpdate::HasHeader(false));
        }
        if self.no_label {
            updates.push(OptionUpdate::HasLabel(false));
        }
        if let Some(index) = self.label_cell {
            updates.push(OptionUpdate::LabelCell(index));
        }
        if let Some(cells) = &self.color_cells {
            updates.push(OptionUpdate::ColorCells(cells.clone()));
        }
        if let Some(separator) = &self.separator {
            updates.push(OptionUpdate::ColorSeparator(separator.clone()));
        }
        if let Some(format) = self.format {
            updates.push(OptionUpdate::ValueFormat(FormatSetting::Known(format)));
        }
        if self.alpha {
            updates.push(OptionUpdate::HasAlpha(true));
        }
        updates.extend(self.set.iter().cloned());
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_no_updates() {
        let args = Args::parse_from(["csv-presets", "colors.csv"]);
        assert!(args.option_updates().is_empty());
        assert_eq!(args.inputs, ["color"]);
    }

    #[test]
    fn flags_become_updates() {
        let args = Args::parse_from([
            "csv-presets",
            "colors.csv",
            "--dialect",
            "excel-tab",
            "--no-header",
            "--color-cells",
            "1,2,3",
            "--format",
            "float",
            "--alpha",
        ]);
        assert_eq!(
            args.option_updates(),
            vec![
                OptionUpdate::CsvDialect(CsvDialect::ExcelTab),
                OptionUpdate::HasHeader(false),
                OptionUpdate::ColorCells(ColorCells::Cells([1, 2, 3].into_iter().collect())),
                OptionUpdate::ValueFormat(FormatSetting::Known(ColorValueFormat::Float)),
                OptionUpdate::HasAlpha(true),
            ]
        );
    }

    #[test]
    fn raw_edits_come_last() {
        let args = Args::parse_from([
            "csv-presets",
            "colors.csv",
            "--set",
            "colorSeparator=;",
            "--label-cell",
            "2",
        ]);
        assert_eq!(
            args.option_updates(),
            vec![
                OptionUpdate::LabelCell(2),
                OptionUpdate::ColorSeparator(";".into()),
            ]
        );
    }

    #[test]
    fn malformed_raw_edit_is_rejected() {
        let result = Args::try_parse_from(["csv-presets", "colors.csv", "--set", "labelRow=x"]);
        assert!(result.is_err());
    }
}
