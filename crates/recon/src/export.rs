use std::io::Write;

use crate::error::MatchError;
use crate::model::{FinalMatch, COL_DIFF_PCT, COL_RAW_DIFF_PCT_2};

/// Output header: input columns in order, `raw_diff_pct_2` if no source had
/// it, then `diff_pct` unless an input column already carries that name.
pub fn output_columns(input_columns: &[String]) -> Vec<String> {
    let mut columns = input_columns.to_vec();
    if !columns.iter().any(|c| c == COL_RAW_DIFF_PCT_2) {
        columns.push(COL_RAW_DIFF_PCT_2.into());
    }
    if !columns.iter().any(|c| c == COL_DIFF_PCT) {
        columns.push(COL_DIFF_PCT.into());
    }
    columns
}

pub fn format_metric(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write final matches as CSV. Original cells are written verbatim; the
/// derived `diff_pct` replaces any input value of the same name. Internal
/// ranking data never reaches the file.
pub fn write_matches_csv(
    input_columns: &[String],
    matches: &[FinalMatch],
    writer: impl Write,
) -> Result<(), MatchError> {
    let columns = output_columns(input_columns);

    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(&columns)
        .map_err(|e| MatchError::Io(format!("CSV write error: {e}")))?;

    for m in matches {
        let record = columns.iter().map(|column| {
            if column == COL_DIFF_PCT {
                format_metric(m.candidate.diff_pct)
            } else {
                m.candidate.raw_fields.get(column).cloned().unwrap_or_default()
            }
        });
        csv.write_record(record)
            .map_err(|e| MatchError::Io(format!("CSV write error: {e}")))?;
    }

    csv.flush()?;
    Ok(())
}

pub fn matches_to_csv_string(
    input_columns: &[String],
    matches: &[FinalMatch],
) -> Result<String, MatchError> {
    let mut buf = Vec::new();
    write_matches_csv(input_columns, matches, &mut buf)?;
    String::from_utf8(buf).map_err(|e| MatchError::Io(e.to_string()))
}
