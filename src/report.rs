// Copyright 2025 coScene
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// CSV projection of heterogeneous reading records
//
// Stored readings are not guaranteed to share a shape (schemas drift,
// backends differ), so the projector flattens whatever it is handed:
//
// - Header row is the sorted union of every key across all records
// - A record missing a column yields an empty cell (so does a JSON null)
// - Numbers never use exponent notation, and integral floats drop the
//   trailing `.0` (22.0 renders as `22`, 22.3 as `22.3`)
// - Cells containing delimiters get standard CSV quoting
//
// Projection is all-or-nothing: one non-object record fails the whole
// report rather than emitting a partial table.

use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::reading::json_type_name;

/// Failures while projecting records into CSV
#[derive(Debug, Error)]
pub enum ReportError {
    /// A record was not a JSON object and cannot become a table row
    #[error("record {index} is not a JSON object, got {found}")]
    NotAnObject { index: usize, found: &'static str },
}

/// Project records into CSV text.
///
/// Returns `Ok(None)` when there are no records at all; an empty store is a
/// normal outcome and callers render their own "no data" response for it.
///
/// # Errors
///
/// Fails with `ReportError::NotAnObject` if any record is not a JSON object.
/// Validation runs over every record before a single byte of CSV is built,
/// so a failed projection produces no output.
pub fn readings_to_csv(records: &[Value]) -> Result<Option<String>, ReportError> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut columns = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let fields = record.as_object().ok_or_else(|| ReportError::NotAnObject {
            index,
            found: json_type_name(record),
        })?;
        columns.extend(fields.keys().cloned());
        rows.push(fields);
    }

    // BTreeSet iteration is already the sorted key union
    let columns: Vec<String> = columns.into_iter().collect();

    let mut csv = String::new();
    let header: Vec<String> = columns.iter().map(|name| escape_cell(name.clone())).collect();
    csv.push_str(&header.join(","));
    csv.push('\n');

    for fields in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|name| match fields.get(name) {
                Some(value) => escape_cell(render_cell(value)),
                None => String::new(),
            })
            .collect();
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }

    Ok(Some(csv))
}

/// Render one JSON value as CSV cell text
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => render_number(number),
        Value::String(text) => text.clone(),
        // Flat records are the normal case; anything nested keeps its
        // compact JSON form so no information is dropped
        nested => nested.to_string(),
    }
}

/// Render a numeric cell in plain decimal notation.
///
/// `Number::to_string` would produce `22.0` for integral floats and exponent
/// forms for large magnitudes, so integers render through `i64`/`u64` and
/// floats through `f64`'s `Display`, which is shortest-exact plain decimal.
fn render_number(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        int.to_string()
    } else if let Some(int) = number.as_u64() {
        int.to_string()
    } else if let Some(float) = number.as_f64() {
        format!("{}", float)
    } else {
        number.to_string()
    }
}

/// Quote a cell when it contains a delimiter, quote, or line break
fn escape_cell(cell: String) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_records_is_no_data() {
        let result = readings_to_csv(&[]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_header_is_sorted_key_union() {
        let records = vec![json!({"b": 1, "a": 2}), json!({"c": 3, "a": 4})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "a,b,c");
    }

    #[test]
    fn test_missing_keys_render_empty_cells() {
        let records = vec![json!({"a": 1}), json!({"b": 2})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["a,b", "1,", ",2"]);
    }

    #[test]
    fn test_integral_float_drops_point_zero() {
        let records = vec![json!({"value": 22.0})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        assert_eq!(csv, "value\n22\n");
    }

    #[test]
    fn test_fractional_float_keeps_digits() {
        let records = vec![json!({"value": 22.3})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        assert_eq!(csv, "value\n22.3\n");
    }

    #[test]
    fn test_large_float_avoids_exponent_notation() {
        let records = vec![json!({"value": 1e21})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        assert_eq!(csv, "value\n1000000000000000000000\n");
        assert!(!csv.contains('e'));
    }

    #[test]
    fn test_non_object_record_fails_whole_projection() {
        let records = vec![json!({"a": 1}), json!([1, 2, 3])];
        let err = readings_to_csv(&records).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("record 1"), "got: {}", text);
        assert!(text.contains("array"), "got: {}", text);
    }

    #[test]
    fn test_cells_with_commas_are_quoted() {
        let records = vec![json!({"location": "den, upstairs"})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        assert_eq!(csv, "location\n\"den, upstairs\"\n");
    }

    #[test]
    fn test_quotes_inside_cells_are_doubled() {
        let records = vec![json!({"sensor": "the \"good\" one"})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        assert_eq!(csv, "sensor\n\"the \"\"good\"\" one\"\n");
    }

    #[test]
    fn test_null_renders_as_empty_cell() {
        let records = vec![json!({"units": null, "value": 1})];
        let csv = readings_to_csv(&records).unwrap().unwrap();
        assert_eq!(csv, "units,value\n,1\n");
    }
}
