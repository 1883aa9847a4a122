use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::MatchError;
use crate::model::{RawRow, SourceTable, SwapBatch, COL_RAW_DIFF_PCT_2, REQUIRED_COLUMNS};

/// Parse one source CSV. Cells are kept verbatim; coercion happens in
/// preprocessing so a bad cell never fails the load.
pub fn parse_source(name: &str, csv_data: &str) -> Result<SourceTable, MatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| MatchError::Csv {
            file: name.into(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == required) {
            return Err(MatchError::MissingColumn {
                file: name.into(),
                column: required.into(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| MatchError::Csv {
            file: name.into(),
            message: e.to_string(),
        })?;

        if record.len() > columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(MatchError::Csv {
                file: name.into(),
                message: format!(
                    "line {line}: record has {} fields, header has {}",
                    record.len(),
                    columns.len()
                ),
            });
        }

        // Short records leave trailing columns absent (read back as unknown).
        let fields: HashMap<String, String> = columns
            .iter()
            .zip(record.iter())
            .map(|(c, v)| (c.clone(), v.to_string()))
            .collect();

        rows.push(RawRow {
            source: name.into(),
            fields,
        });
    }

    if !columns.iter().any(|c| c == COL_RAW_DIFF_PCT_2) {
        debug!(source = name, "no raw_diff_pct_2 column; secondary estimate unknown for all rows");
    }
    debug!(source = name, rows = rows.len(), "parsed source");

    Ok(SourceTable {
        name: name.into(),
        columns,
        rows,
    })
}

/// Concatenate sources in the given order. Columns are unioned in first-seen
/// order; a row from a source lacking a column reads it as missing.
pub fn concat_sources(sources: Vec<SourceTable>) -> SwapBatch {
    let mut columns = Vec::new();
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for source in sources {
        for column in source.columns {
            if seen.insert(column.clone()) {
                columns.push(column);
            }
        }
        rows.extend(source.rows);
    }

    SwapBatch { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{COL_TIME_DIFF, COL_TX1};

    const WITH_SECONDARY: &str = "\
tx1,tx2,bt1,bt2,raw_diff_pct_1,raw_diff_pct_2,time_diff
0xa,sol_a,2026-01-15 10:00:00,2026-01-15 10:00:00,0.002,0.001,12
0xb,sol_b,2026-01-15 10:05:00,2026-01-15 10:06:00,0.003,,60
";

    const WITHOUT_SECONDARY: &str = "\
tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff,chain
0xc,sol_c,2026-01-16,2026-01-16,0.004,-30,base
";

    #[test]
    fn parse_basic() {
        let table = parse_source("a.csv", WITH_SECONDARY).unwrap();
        assert_eq!(table.columns.len(), 7);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get(COL_TX1), Some("0xa"));
        assert_eq!(table.rows[1].get(COL_RAW_DIFF_PCT_2), Some(""));
        assert_eq!(table.rows[1].source, "a.csv");
    }

    #[test]
    fn missing_required_column() {
        let csv = "tx1,tx2,bt1,bt2,raw_diff_pct_1\n0xa,sol_a,,,0.1\n";
        let err = parse_source("bad.csv", csv).unwrap_err();
        match err {
            MatchError::MissingColumn { file, column } => {
                assert_eq!(file, "bad.csv");
                assert_eq!(column, COL_TIME_DIFF);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn secondary_estimate_is_optional() {
        let table = parse_source("b.csv", WITHOUT_SECONDARY).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get(COL_RAW_DIFF_PCT_2), None);
    }

    #[test]
    fn header_whitespace_trimmed() {
        let csv = " tx1 , tx2 ,bt1,bt2,raw_diff_pct_1,time_diff\n0xa,sol_a,,,0.1,5\n";
        let table = parse_source("ws.csv", csv).unwrap();
        assert_eq!(table.rows[0].get("tx2"), Some("sol_a"));
    }

    #[test]
    fn header_only_source() {
        let csv = "tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff\n";
        let table = parse_source("empty.csv", csv).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.columns.len(), 6);
    }

    #[test]
    fn short_record_leaves_cells_absent() {
        let csv = "tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff\n0xa,sol_a,,,0.1\n";
        let table = parse_source("short.csv", csv).unwrap();
        assert_eq!(table.rows[0].get(COL_TIME_DIFF), None);
    }

    #[test]
    fn long_record_rejected() {
        let csv = "tx1,tx2,bt1,bt2,raw_diff_pct_1,time_diff\n0xa,sol_a,,,0.1,5,extra\n";
        let err = parse_source("long.csv", csv).unwrap_err();
        assert!(err.to_string().contains("7 fields"));
    }

    #[test]
    fn concat_unions_columns_in_first_seen_order() {
        let a = parse_source("a.csv", WITH_SECONDARY).unwrap();
        let b = parse_source("b.csv", WITHOUT_SECONDARY).unwrap();
        let batch = concat_sources(vec![a, b]);

        assert_eq!(
            batch.columns,
            vec![
                "tx1",
                "tx2",
                "bt1",
                "bt2",
                "raw_diff_pct_1",
                "raw_diff_pct_2",
                "time_diff",
                "chain"
            ]
        );
        assert_eq!(batch.rows.len(), 3);
        assert_eq!(batch.rows[2].get(COL_TX1), Some("0xc"));
        assert_eq!(batch.rows[0].get("chain"), None);
    }

    #[test]
    fn concat_nothing() {
        let batch = concat_sources(Vec::new());
        assert!(batch.columns.is_empty());
        assert!(batch.rows.is_empty());
    }
}
