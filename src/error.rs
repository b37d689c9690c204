use std::path::PathBuf;

/// Why an extraction produced no colors.
///
/// Every variant aborts the whole file: no partial list is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid color value format {0}: expected float or integer")]
    Configuration(String),

    #[error("cannot read CSV resource {}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cell index {index} is out of range for CSV row {row} with length {len}")]
    RowIndex { row: usize, index: usize, len: usize },

    #[error("cannot parse {value:?} in CSV row {row}, cell {cell} as a color channel")]
    ValueParse {
        row: usize,
        cell: usize,
        value: String,
    },

    #[error("CSV row {row} has {found} color channels, expected {expected}")]
    ChannelCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("color channel {value} in CSV row {row} is outside [0, 1] after normalization")]
    ChannelRange { row: usize, value: f32 },
}

impl ExtractError {
    /// Short, stable name of the failure kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Configuration(_) => "configuration",
            ExtractError::Resource { .. } => "resource",
            ExtractError::RowIndex { .. } => "row_index",
            ExtractError::ValueParse { .. } => "value_parse",
            ExtractError::ChannelCount { .. } => "channel_count",
            ExtractError::ChannelRange { .. } => "channel_range",
        }
    }
}
