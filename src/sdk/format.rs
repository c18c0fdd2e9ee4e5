//! Output shapes for listing calls.
//!
//! A listing payload is first decoded into one canonical form, a sequence of
//! field/value maps. The three renderers below each take that form and know
//! nothing about the request that produced it.

use std::{fmt, str::FromStr};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{SdkError, SdkResult};

pub type Row = Map<String, Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Typed records matching the wire schema.
    #[default]
    Records,
    /// One plain key/value map per result.
    Mapping,
    /// A single [`Table`] with one row per result.
    Table,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Records => "records",
            OutputFormat::Mapping => "mapping",
            OutputFormat::Table => "table",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "records" => Ok(OutputFormat::Records),
            "mapping" => Ok(OutputFormat::Mapping),
            "table" => Ok(OutputFormat::Table),
            other => Err(SdkError::Config(format!(
                "unknown output format '{other}', expected one of: records, mapping, table"
            ))),
        }
    }
}

impl TryFrom<&str> for OutputFormat {
    type Error = SdkError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Column-oriented view of a listing: named columns, one row per result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, top to bottom. Short rows read as `null`.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row.get(idx).unwrap_or(&Value::Null)).collect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Listing<T> {
    Records(Vec<T>),
    Mapping(Vec<Row>),
    Table(Table),
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        match self {
            Listing::Records(records) => records.len(),
            Listing::Mapping(rows) => rows.len(),
            Listing::Table(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            Listing::Records(_) => OutputFormat::Records,
            Listing::Mapping(_) => OutputFormat::Mapping,
            Listing::Table(_) => OutputFormat::Table,
        }
    }

    pub fn into_records(self) -> Option<Vec<T>> {
        match self {
            Listing::Records(records) => Some(records),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<Vec<Row>> {
        match self {
            Listing::Mapping(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Listing::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Decodes a listing payload into the canonical row sequence.
pub fn canonical(payload: Value) -> SdkResult<Vec<Row>> {
    Ok(serde_json::from_value(payload)?)
}

pub fn render<T: DeserializeOwned>(rows: Vec<Row>, format: OutputFormat) -> SdkResult<Listing<T>> {
    Ok(match format {
        OutputFormat::Records => Listing::Records(to_records(rows)?),
        OutputFormat::Mapping => Listing::Mapping(to_mapping(rows)),
        OutputFormat::Table => Listing::Table(to_table(&rows)),
    })
}

pub fn to_records<T: DeserializeOwned>(rows: Vec<Row>) -> SdkResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(SdkError::from))
        .collect()
}

pub fn to_mapping(rows: Vec<Row>) -> Vec<Row> {
    rows
}

/// Columns appear in first-seen field order; a field missing from a row is `null`.
pub fn to_table(rows: &[Row]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = rows
        .iter()
        .map(|row| columns.iter().map(|c| row.get(c).cloned().unwrap_or(Value::Null)).collect())
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Link, MovieSummary};

    fn movie_rows() -> Vec<Row> {
        canonical(json!([
            { "movieId": 1, "title": "Toy Story (1995)", "genres": "Adventure|Animation" },
            { "movieId": 2, "title": "Jumanji (1995)", "genres": null },
        ]))
        .unwrap()
    }

    #[test]
    fn parses_known_formats_case_insensitively() {
        assert_eq!("records".parse::<OutputFormat>().unwrap(), OutputFormat::Records);
        assert_eq!("Mapping".parse::<OutputFormat>().unwrap(), OutputFormat::Mapping);
        assert_eq!(" TABLE ".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
    }

    #[test]
    fn unknown_format_is_config_error() {
        let err = OutputFormat::try_from("spreadsheet").unwrap_err();
        assert!(matches!(err, SdkError::Config(ref msg) if msg.contains("spreadsheet")));
    }

    #[test]
    fn records_decode_into_wire_types() {
        let listing = render::<MovieSummary>(movie_rows(), OutputFormat::Records).unwrap();
        let records = listing.into_records().unwrap();
        assert_eq!(records[0].title, "Toy Story (1995)");
        assert_eq!(records[1].genres, None);
    }

    #[test]
    fn table_keeps_wire_field_order() {
        let table = to_table(&movie_rows());
        assert_eq!(table.columns, vec!["movieId", "title", "genres"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("movieId").unwrap(), vec![&json!(1), &json!(2)]);
        assert_eq!(table.rows[1][2], Value::Null);
        assert!(table.column("rating").is_none());
    }

    #[test]
    fn column_reads_short_rows_as_null() {
        let table = Table {
            columns: vec!["movieId".to_string(), "title".to_string()],
            rows: vec![vec![json!(1), json!("Heat (1995)")], vec![json!(2)]],
        };
        assert_eq!(table.column("title").unwrap(), vec![&json!("Heat (1995)"), &Value::Null]);
    }

    #[test]
    fn table_fills_missing_cells_with_null() {
        let rows = canonical(json!([{ "a": 1 }, { "b": 2 }])).unwrap();
        let table = to_table(&rows);
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec![json!(1), Value::Null], vec![Value::Null, json!(2)]]);
    }

    #[test]
    fn all_shapes_agree_on_rows_and_fields() {
        let rows = movie_rows();
        let records = to_records::<MovieSummary>(rows.clone()).unwrap();
        let mapping = to_mapping(rows.clone());
        let table = to_table(&rows);

        assert_eq!(records.len(), mapping.len());
        assert_eq!(mapping.len(), table.len());
        for (i, record) in records.iter().enumerate() {
            let as_value = serde_json::to_value(record).unwrap();
            assert_eq!(Value::Object(mapping[i].clone()), as_value);
            for (c, column) in table.columns.iter().enumerate() {
                assert_eq!(table.rows[i][c], as_value[column]);
            }
        }
    }

    #[test]
    fn empty_payload_renders_empty_in_every_shape() {
        for format in [OutputFormat::Records, OutputFormat::Mapping, OutputFormat::Table] {
            let listing = render::<Link>(canonical(json!([])).unwrap(), format).unwrap();
            assert!(listing.is_empty());
            assert_eq!(listing.format(), format);
        }
    }

    #[test]
    fn non_array_payload_is_decode_error() {
        assert!(matches!(canonical(json!({ "detail": "nope" })), Err(SdkError::Decode(_))));
    }
}
