//! Extraction options and the update/reset protocol around them.
//!
//! [`ExtractionOptions`] is a plain snapshot handed to the extractor.
//! [`OptionsModel`] owns the live copy, applies [`OptionUpdate`] commands
//! without validating them, and notifies its observers after every change.

use std::collections::BTreeSet;
use std::fmt;

/// Field and record conventions used to split the CSV text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CsvDialect {
    /// `,` delimited, `"` quoted, CRLF or LF records.
    Excel,
    /// Same as `excel` with a tab delimiter.
    ExcelTab,
    /// `,` delimited, `"` quoted. Written with `\n` records; read like `excel`.
    Unix,
}

impl CsvDialect {
    pub fn name(self) -> &'static str {
        match self {
            CsvDialect::Excel => "excel",
            CsvDialect::ExcelTab => "excel-tab",
            CsvDialect::Unix => "unix",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "excel" => Some(CsvDialect::Excel),
            "excel-tab" | "excel_tab" => Some(CsvDialect::ExcelTab),
            "unix" => Some(CsvDialect::Unix),
            _ => None,
        }
    }
}

/// Encoding of the raw channel numbers in the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorValueFormat {
    /// Already normalized to [0, 1].
    Float,
    /// 0-255, divided by 255 on extraction.
    Integer,
}

impl ColorValueFormat {
    pub fn name(self) -> &'static str {
        match self {
            ColorValueFormat::Float => "float",
            ColorValueFormat::Integer => "integer",
        }
    }
}

/// Stored value format. Edits are not validated, so text that names no known
/// format is kept as-is and rejected only when extraction starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSetting {
    Known(ColorValueFormat),
    Unrecognized(String),
}

impl FormatSetting {
    fn from_text(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "float" => FormatSetting::Known(ColorValueFormat::Float),
            "integer" | "int" => FormatSetting::Known(ColorValueFormat::Integer),
            _ => FormatSetting::Unrecognized(value.to_string()),
        }
    }
}

impl fmt::Display for FormatSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSetting::Known(format) => f.write_str(format.name()),
            FormatSetting::Unrecognized(raw) => write!(f, "{raw:?}"),
        }
    }
}

/// Which cell(s) of a record hold the color channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorCells {
    /// One cell whose text is split on the color separator.
    Single(usize),
    /// One cell per channel, read in ascending index order.
    Cells(BTreeSet<usize>),
}

impl ColorCells {
    /// Parse `"1"` as a single cell and `"1,2,3"` as a cell set.
    pub fn parse(value: &str) -> Result<Self, std::num::ParseIntError> {
        let value = value.trim();
        if value.contains(',') {
            let cells = value
                .split(',')
                .map(|part| part.trim().parse::<usize>())
                .collect::<Result<BTreeSet<_>, _>>()?;
            Ok(ColorCells::Cells(cells))
        } else {
            Ok(ColorCells::Single(value.parse()?))
        }
    }
}

impl fmt::Display for ColorCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorCells::Single(index) => write!(f, "{index}"),
            ColorCells::Cells(cells) => {
                let parts: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                write!(f, "{{{}}}", parts.join(","))
            }
        }
    }
}

/// Snapshot of every setting that governs how a CSV is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    pub csv_dialect: CsvDialect,
    /// Skip the first record.
    pub has_header: bool,
    /// Read the label from `label_cell`; otherwise derive it from the color.
    pub has_label: bool,
    pub label_cell: usize,
    pub color_cells: ColorCells,
    /// Splits a single color cell into channels.
    pub color_separator: String,
    pub value_format: FormatSetting,
    /// Read a 4th channel instead of appending an opaque alpha.
    pub has_alpha: bool,
}

const DEFAULT_DIALECT: CsvDialect = CsvDialect::Excel;
const DEFAULT_HAS_HEADER: bool = true;
const DEFAULT_HAS_LABEL: bool = true;
const DEFAULT_LABEL_CELL: usize = 0;
const DEFAULT_COLOR_CELL: usize = 1;
const DEFAULT_SEPARATOR: &str = "-";
const DEFAULT_FORMAT: ColorValueFormat = ColorValueFormat::Integer;
const DEFAULT_HAS_ALPHA: bool = false;

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            csv_dialect: DEFAULT_DIALECT,
            has_header: DEFAULT_HAS_HEADER,
            has_label: DEFAULT_HAS_LABEL,
            label_cell: DEFAULT_LABEL_CELL,
            color_cells: ColorCells::Single(DEFAULT_COLOR_CELL),
            color_separator: DEFAULT_SEPARATOR.to_string(),
            value_format: FormatSetting::Known(DEFAULT_FORMAT),
            has_alpha: DEFAULT_HAS_ALPHA,
        }
    }
}

impl ExtractionOptions {
    /// Apply one command to this snapshot.
    pub fn apply(&mut self, update: OptionUpdate) {
        match update {
            OptionUpdate::CsvDialect(v) => self.csv_dialect = v,
            OptionUpdate::HasHeader(v) => self.has_header = v,
            OptionUpdate::HasLabel(v) => self.has_label = v,
            OptionUpdate::LabelCell(v) => self.label_cell = v,
            OptionUpdate::ColorCells(v) => self.color_cells = v,
            OptionUpdate::ColorSeparator(v) => self.color_separator = v,
            OptionUpdate::ValueFormat(v) => self.value_format = v,
            OptionUpdate::HasAlpha(v) => self.has_alpha = v,
        }
    }
}

/// Errors raised while turning a textual `key=value` edit into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown option key: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("expected key=value, got {0:?}")]
    MissingSeparator(String),
}

/// "Set field X to value V".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionUpdate {
    CsvDialect(CsvDialect),
    HasHeader(bool),
    HasLabel(bool),
    LabelCell(usize),
    ColorCells(ColorCells),
    ColorSeparator(String),
    ValueFormat(FormatSetting),
    HasAlpha(bool),
}

impl OptionUpdate {
    /// Field name the command writes to.
    pub fn key(&self) -> &'static str {
        match self {
            OptionUpdate::CsvDialect(_) => "csv_dialect",
            OptionUpdate::HasHeader(_) => "has_header",
            OptionUpdate::HasLabel(_) => "has_label",
            OptionUpdate::LabelCell(_) => "label_cell",
            OptionUpdate::ColorCells(_) => "color_cells",
            OptionUpdate::ColorSeparator(_) => "color_separator",
            OptionUpdate::ValueFormat(_) => "value_format",
            OptionUpdate::HasAlpha(_) => "has_alpha",
        }
    }

    /// Parse a `key=value` edit.
    pub fn parse_assignment(assignment: &str) -> Result<Self, OptionsError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| OptionsError::MissingSeparator(assignment.to_string()))?;
        Self::from_key_value(key.trim(), value)
    }

    /// Build a command from a field name and its text value.
    ///
    /// An empty (or all-whitespace) value resets the field to its default.
    /// The separator is the exception: it is taken verbatim unless empty.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, OptionsError> {
        let defaults = ExtractionOptions::default();
        let blank = value.trim().is_empty();

        let update = match key {
            "csv_dialect" | "csvDialect" | "dialect" => {
                if blank {
                    OptionUpdate::CsvDialect(defaults.csv_dialect)
                } else {
                    let dialect = CsvDialect::parse(value.trim()).ok_or_else(|| {
                        OptionsError::InvalidValue {
                            key: "csv_dialect",
                            value: value.to_string(),
                        }
                    })?;
                    OptionUpdate::CsvDialect(dialect)
                }
            }
            "has_header" | "hasHeader" => {
                OptionUpdate::HasHeader(parse_flag("has_header", value, defaults.has_header)?)
            }
            "has_label" | "hasLabel" => {
                OptionUpdate::HasLabel(parse_flag("has_label", value, defaults.has_label)?)
            }
            "has_alpha" | "hasAlpha" => {
                OptionUpdate::HasAlpha(parse_flag("has_alpha", value, defaults.has_alpha)?)
            }
            "label_cell" | "labelRow" | "label_row" => {
                if blank {
                    OptionUpdate::LabelCell(defaults.label_cell)
                } else {
                    let index =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| OptionsError::InvalidValue {
                                key: "label_cell",
                                value: value.to_string(),
                            })?;
                    OptionUpdate::LabelCell(index)
                }
            }
            "color_cells" | "colorRow" | "color_row" => {
                if blank {
                    OptionUpdate::ColorCells(defaults.color_cells)
                } else {
                    let cells =
                        ColorCells::parse(value).map_err(|_| OptionsError::InvalidValue {
                            key: "color_cells",
                            value: value.to_string(),
                        })?;
                    OptionUpdate::ColorCells(cells)
                }
            }
            "color_separator" | "colorSeparator" | "separator" => {
                if value.is_empty() {
                    OptionUpdate::ColorSeparator(defaults.color_separator)
                } else {
                    OptionUpdate::ColorSeparator(value.to_string())
                }
            }
            "value_format" | "colorValueFormat" | "format" => {
                if blank {
                    OptionUpdate::ValueFormat(defaults.value_format)
                } else {
                    OptionUpdate::ValueFormat(FormatSetting::from_text(value))
                }
            }
            other => return Err(OptionsError::UnknownKey(other.to_string())),
        };
        Ok(update)
    }
}

fn parse_flag(key: &'static str, value: &str, default: bool) -> Result<bool, OptionsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(OptionsError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// What happened to the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsChange {
    Updated(OptionUpdate),
    Reset,
}

/// Receives a notification after every change to an [`OptionsModel`].
pub trait OptionsObserver {
    fn options_changed(&mut self, change: &OptionsChange, options: &ExtractionOptions);
}

/// Logs every change at debug level through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl OptionsObserver for TracingObserver {
    fn options_changed(&mut self, change: &OptionsChange, options: &ExtractionOptions) {
        match change {
            OptionsChange::Updated(update) => tracing::debug!(
                key = update.key(),
                dialect = options.csv_dialect.name(),
                color_cells = %options.color_cells,
                value_format = %options.value_format,
                "extraction option updated"
            ),
            OptionsChange::Reset => tracing::debug!(
                dialect = options.csv_dialect.name(),
                color_cells = %options.color_cells,
                value_format = %options.value_format,
                "extraction options reset to defaults"
            ),
        }
    }
}

/// Owns the live options and applies edits to them.
#[derive(Default)]
pub struct OptionsModel {
    options: ExtractionOptions,
    observers: Vec<Box<dyn OptionsObserver>>,
}

impl OptionsModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model that reports its changes to `observer`.
    pub fn with_observer(observer: impl OptionsObserver + 'static) -> Self {
        let mut model = Self::new();
        model.subscribe(observer);
        model
    }

    pub fn subscribe(&mut self, observer: impl OptionsObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Immutable copy for one extraction call.
    pub fn snapshot(&self) -> ExtractionOptions {
        self.options.clone()
    }

    /// Set one field. The value is stored without validation.
    pub fn update(&mut self, update: OptionUpdate) {
        self.options.apply(update.clone());
        self.notify(OptionsChange::Updated(update));
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        self.options = ExtractionOptions::default();
        self.notify(OptionsChange::Reset);
    }

    fn notify(&mut self, change: OptionsChange) {
        for observer in &mut self.observers {
            observer.options_changed(&change, &self.options);
        }
    }
}

impl fmt::Debug for OptionsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsModel")
            .field("options", &self.options)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every notification for inspection.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<OptionsChange>>>);

    impl OptionsObserver for Recorder {
        fn options_changed(&mut self, change: &OptionsChange, _options: &ExtractionOptions) {
            self.0.borrow_mut().push(change.clone());
        }
    }

    #[test]
    fn defaults_match_table() {
        let options = ExtractionOptions::default();
        assert_eq!(options.csv_dialect, CsvDialect::Excel);
        assert!(options.has_header);
        assert!(options.has_label);
        assert_eq!(options.label_cell, 0);
        assert_eq!(options.color_cells, ColorCells::Single(1));
        assert_eq!(options.color_separator, "-");
        assert_eq!(
            options.value_format,
            FormatSetting::Known(ColorValueFormat::Integer)
        );
        assert!(!options.has_alpha);
    }

    #[test]
    fn reset_restores_every_field() {
        let mut model = OptionsModel::new();
        model.update(OptionUpdate::CsvDialect(CsvDialect::Unix));
        model.update(OptionUpdate::HasHeader(false));
        model.update(OptionUpdate::HasLabel(false));
        model.update(OptionUpdate::LabelCell(4));
        model.update(OptionUpdate::ColorCells(ColorCells::Cells(
            [1, 2, 3].into_iter().collect(),
        )));
        model.update(OptionUpdate::ColorSeparator(";".into()));
        model.update(OptionUpdate::ValueFormat(FormatSetting::Unrecognized(
            "hex".into(),
        )));
        model.update(OptionUpdate::HasAlpha(true));
        assert_ne!(model.options(), &ExtractionOptions::default());

        model.reset();
        assert_eq!(model.options(), &ExtractionOptions::default());
    }

    #[test]
    fn update_accepts_garbage_without_validation() {
        let mut model = OptionsModel::new();
        model.update(OptionUpdate::ValueFormat(FormatSetting::Unrecognized(
            "bogus".into(),
        )));
        model.update(OptionUpdate::LabelCell(usize::MAX));
        assert_eq!(
            model.options().value_format,
            FormatSetting::Unrecognized("bogus".into())
        );
        assert_eq!(model.options().label_cell, usize::MAX);
    }

    #[test]
    fn observers_see_updates_and_resets() {
        let recorder = Recorder::default();
        let mut model = OptionsModel::with_observer(recorder.clone());

        model.update(OptionUpdate::HasAlpha(true));
        model.reset();

        let seen = recorder.0.borrow();
        assert_eq!(
            *seen,
            vec![
                OptionsChange::Updated(OptionUpdate::HasAlpha(true)),
                OptionsChange::Reset,
            ]
        );
    }

    #[test]
    fn snapshot_is_detached_from_model() {
        let mut model = OptionsModel::new();
        let before = model.snapshot();
        model.update(OptionUpdate::HasHeader(false));
        assert!(before.has_header);
        assert!(!model.options().has_header);
    }

    #[test]
    fn parse_single_and_set_color_cells() {
        assert_eq!(ColorCells::parse("3").unwrap(), ColorCells::Single(3));
        assert_eq!(
            ColorCells::parse("3, 1,2").unwrap(),
            ColorCells::Cells([1, 2, 3].into_iter().collect())
        );
        assert!(ColorCells::parse("a,b").is_err());
    }

    #[test]
    fn settings_display_for_logs() {
        assert_eq!(CsvDialect::ExcelTab.name(), "excel-tab");
        assert_eq!(ColorCells::Single(1).to_string(), "1");
        assert_eq!(
            ColorCells::Cells([3, 1, 2].into_iter().collect()).to_string(),
            "{1,2,3}"
        );
        assert_eq!(
            FormatSetting::Known(ColorValueFormat::Float).to_string(),
            "float"
        );
        assert_eq!(
            FormatSetting::Unrecognized("hex".into()).to_string(),
            "\"hex\""
        );
    }

    #[test]
    fn key_value_edits_accept_both_spellings() {
        assert_eq!(
            OptionUpdate::from_key_value("colorRow", "1,2,3").unwrap(),
            OptionUpdate::ColorCells(ColorCells::Cells([1, 2, 3].into_iter().collect()))
        );
        assert_eq!(
            OptionUpdate::from_key_value("label_cell", "2").unwrap(),
            OptionUpdate::LabelCell(2)
        );
        assert_eq!(
            OptionUpdate::from_key_value("csvDialect", "excel-tab").unwrap(),
            OptionUpdate::CsvDialect(CsvDialect::ExcelTab)
        );
    }

    #[test]
    fn empty_edit_falls_back_to_default() {
        assert_eq!(
            OptionUpdate::from_key_value("labelRow", "").unwrap(),
            OptionUpdate::LabelCell(0)
        );
        assert_eq!(
            OptionUpdate::from_key_value("colorSeparator", "").unwrap(),
            OptionUpdate::ColorSeparator("-".into())
        );
        assert_eq!(
            OptionUpdate::from_key_value("hasHeader", " ").unwrap(),
            OptionUpdate::HasHeader(true)
        );
    }

    #[test]
    fn unknown_format_text_is_stored() {
        assert_eq!(
            OptionUpdate::from_key_value("colorValueFormat", "hex").unwrap(),
            OptionUpdate::ValueFormat(FormatSetting::Unrecognized("hex".into()))
        );
        assert_eq!(
            OptionUpdate::from_key_value("format", "Float").unwrap(),
            OptionUpdate::ValueFormat(FormatSetting::Known(ColorValueFormat::Float))
        );
    }

    #[test]
    fn malformed_edits_are_rejected() {
        assert!(matches!(
            OptionUpdate::from_key_value("nope", "1"),
            Err(OptionsError::UnknownKey(_))
        ));
        assert!(matches!(
            OptionUpdate::from_key_value("labelRow", "abc"),
            Err(OptionsError::InvalidValue { .. })
        ));
        assert!(matches!(
            OptionUpdate::parse_assignment("hasAlpha"),
            Err(OptionsError::MissingSeparator(_))
        ));
    }

    #[test]
    fn assignment_keeps_separator_whitespace() {
        assert_eq!(
            OptionUpdate::parse_assignment("separator= ").unwrap(),
            OptionUpdate::ColorSeparator(" ".into())
        );
    }
}
