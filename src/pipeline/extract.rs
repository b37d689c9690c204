use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator};
use tracing::{debug, error, info};

use crate::color::{ColorValue, NamedColor};
use crate::error::ExtractError;
use crate::options::{ColorCells, ColorValueFormat, CsvDialect, ExtractionOptions, FormatSetting};

const INTEGER_SCALE: f32 = 255.0;

/// Read a CSV of named colors into an ordered list of (label, color) pairs.
///
/// Records are read in file order, the first one dropped when the options
/// declare a header. Any failure (unusable value format, unreadable file,
/// out-of-range cell, unparsable or out-of-range channel) aborts the whole
/// extraction and is returned instead of a partial list.
pub fn extract_colors(
    path: &Path,
    options: &ExtractionOptions,
) -> Result<Vec<NamedColor>, ExtractError> {
    debug!(path = %path.display(), ?options, "extracting colors from CSV");

    let result = extract(path, options);
    match &result {
        Ok(colors) => info!(
            path = %path.display(),
            count = colors.len(),
            "extracted colors from CSV"
        ),
        Err(e) => error!(path = %path.display(), kind = e.kind(), "{e}"),
    }
    result
}

fn extract(path: &Path, options: &ExtractionOptions) -> Result<Vec<NamedColor>, ExtractError> {
    let format = resolve_format(&options.value_format)?;
    let records = read_records(path, options.csv_dialect)?;

    let skip = usize::from(options.has_header);
    records
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, record)| parse_record(record, i + 1, format, options))
        .collect()
}

fn resolve_format(setting: &FormatSetting) -> Result<ColorValueFormat, ExtractError> {
    match setting {
        FormatSetting::Known(format) => Ok(*format),
        FormatSetting::Unrecognized(raw) => Err(ExtractError::Configuration(format!("{raw:?}"))),
    }
}

/// Reader settings for each dialect. Rows may differ in length.
fn reader_builder(dialect: CsvDialect) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .quote(b'"')
        .double_quote(true);

    // Record endings only differ when writing; every dialect reads CR, LF and CRLF.
    match dialect {
        CsvDialect::Excel | CsvDialect::Unix => builder.delimiter(b','),
        CsvDialect::ExcelTab => builder.delimiter(b'\t'),
    };
    builder.terminator(Terminator::CRLF);
    builder
}

/// Read every record up front; the file is closed before any row is parsed.
fn read_records(path: &Path, dialect: CsvDialect) -> Result<Vec<StringRecord>, ExtractError> {
    let resource_error = |source| ExtractError::Resource {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = reader_builder(dialect)
        .from_path(path)
        .map_err(resource_error)?;
    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(resource_error)
}

/// Turn one record into a named color. `row` is the 1-based record number
/// in the file, header included.
fn parse_record(
    record: &StringRecord,
    row: usize,
    format: ColorValueFormat,
    options: &ExtractionOptions,
) -> Result<NamedColor, ExtractError> {
    let mut channels = read_channels(record, row, options)?;

    if format == ColorValueFormat::Integer {
        for channel in &mut channels {
            *channel /= INTEGER_SCALE;
        }
    }

    let expected = if options.has_alpha { 4 } else { 3 };
    if channels.len() != expected {
        return Err(ExtractError::ChannelCount {
            row,
            expected,
            found: channels.len(),
        });
    }
    if let Some(&value) = channels.iter().find(|c| !(0.0..=1.0).contains(*c)) {
        return Err(ExtractError::ChannelRange { row, value });
    }

    let color = ColorValue::from_channels(&channels).ok_or(ExtractError::ChannelCount {
        row,
        expected,
        found: channels.len(),
    })?;

    let label = if options.has_label {
        cell(record, row, options.label_cell)?.to_string()
    } else if options.has_alpha {
        color.to_hex_rgba()
    } else {
        color.to_hex()
    };

    Ok(NamedColor::new(label, color))
}

fn read_channels(
    record: &StringRecord,
    row: usize,
    options: &ExtractionOptions,
) -> Result<Vec<f32>, ExtractError> {
    match &options.color_cells {
        ColorCells::Cells(indices) => indices
            .iter()
            .map(|&index| parse_channel(cell(record, row, index)?, row, index))
            .collect(),
        ColorCells::Single(index) => {
            let text = cell(record, row, *index)?;
            text.split(options.color_separator.as_str())
                .map(|piece| parse_channel(piece, row, *index))
                .collect()
        }
    }
}

fn cell(record: &StringRecord, row: usize, index: usize) -> Result<&str, ExtractError> {
    record.get(index).ok_or(ExtractError::RowIndex {
        row,
        index,
        len: record.len(),
    })
}

fn parse_channel(text: &str, row: usize, cell: usize) -> Result<f32, ExtractError> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ExtractError::ValueParse {
            row,
            cell,
            value: text.to_string(),
        })
}
