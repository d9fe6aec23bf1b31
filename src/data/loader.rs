use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    normalize_column_name, Dataset, Row, COMPANY, DATE, DEPARTMENT, WAGE,
};
use crate::error::{LoadError, LoadResult};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a wage dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (the usual export)
/// * `.json`    – `[{ "company": "A", "wage": 100, ... }, ...]`
/// * `.parquet` – any column types; cells are read through their display form
pub fn load_file(path: &Path) -> LoadResult<Dataset> {
    if !path.is_file() {
        return Err(LoadError::SourceNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_reader(File::open(path)?),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!(
        "Loaded {} rows from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.column_names()
    );
    Ok(dataset)
}

/// Load CSV data from any reader.
pub fn load_reader<R: Read>(reader: R) -> LoadResult<Dataset> {
    // Short records pad with empty cells instead of failing the load.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let layout = ColumnLayout::resolve(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells: Vec<&str> = record.iter().collect();
        rows.push(layout.row(&cells));
    }

    layout.finish(rows)
}

/// Parse a WAGE cell. Anything that is not a finite number becomes `None`.
///
/// A leading `$` and well-formed thousands separators are accepted, so
/// `"$1,250.50"` reads as `1250.5` while `"1,2,3"` is missing.
pub fn coerce_wage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let cleaned = if unsigned.contains(',') {
        strip_thousands(unsigned)?
    } else {
        unsigned.to_string()
    };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Remove `,` separators from the integer part, provided they split it into
/// a leading group of 1-3 digits followed by groups of exactly 3.
fn strip_thousands(s: &str) -> Option<String> {
    let (int_part, rest) = match s.find('.') {
        Some(dot) => s.split_at(dot),
        None => (s, ""),
    };
    if rest.contains(',') {
        return None;
    }
    let digits = int_part.strip_prefix('-').unwrap_or(int_part);
    let mut groups = digits.split(',');
    let lead = groups.next()?;
    let all_digits = |g: &str| g.chars().all(|c| c.is_ascii_digit());
    if lead.is_empty() || lead.len() > 3 || !all_digits(lead) {
        return None;
    }
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
    }
    Some(s.replace(',', ""))
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Positions of the required columns in a source header row.
struct ColumnLayout {
    company: usize,
    department: usize,
    date: usize,
    wage: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn resolve(raw_headers: &[String]) -> LoadResult<Self> {
        let names: Vec<String> = raw_headers
            .iter()
            .map(|h| normalize_column_name(h.trim_start_matches('\u{feff}')))
            .collect();

        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(LoadError::DuplicateColumn(dup.clone()));
        }

        let find = |col: &str| {
            names
                .iter()
                .position(|n| n == col)
                .ok_or_else(|| LoadError::MissingColumn(col.to_string()))
        };
        let company = find(COMPANY)?;
        let department = find(DEPARTMENT)?;
        let date = find(DATE)?;
        let wage = find(WAGE)?;

        let required = [company, department, date, wage];
        let extra = names
            .iter()
            .enumerate()
            .filter(|(i, _)| !required.contains(i))
            .map(|(i, n)| (i, n.clone()))
            .collect();

        Ok(ColumnLayout {
            company,
            department,
            date,
            wage,
            extra,
        })
    }

    fn row(&self, cells: &[&str]) -> Row {
        let cell = |i: usize| cells.get(i).copied().unwrap_or("");
        Row {
            company: cell(self.company).to_string(),
            department: cell(self.department).to_string(),
            date: cell(self.date).to_string(),
            wage: coerce_wage(cell(self.wage)),
            extra: self.extra.iter().map(|(i, _)| cell(*i).to_string()).collect(),
        }
    }

    fn finish(self, rows: Vec<Row>) -> LoadResult<Dataset> {
        if rows.is_empty() {
            return Err(LoadError::EmptyDataset);
        }
        let extra_columns = self.extra.into_iter().map(|(_, n)| n).collect();
        let dataset = Dataset::new(rows, extra_columns);

        let missing = dataset.missing_wages();
        if missing > 0 {
            log::warn!(
                "{missing} of {} WAGE values are not numeric and count as zero",
                dataset.len()
            );
        }
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "company": "A", "department": "X", "date": "Jan-2024", "wage": 100 },
///   ...
/// ]
/// ```
///
/// Keys missing from a record read as empty cells.
fn load_json(path: &Path) -> LoadResult<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonShape("expected top-level array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::JsonShape(format!("record {i} is not an object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let layout = ColumnLayout::resolve(&headers)?;
    let rows = objects
        .into_iter()
        .map(|obj| {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or_default())
                .collect();
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            layout.row(&cells)
        })
        .collect();

    layout.finish(rows)
}

fn json_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Column types are free: every cell goes through
/// Arrow's display formatter (nulls become empty) and then the same
/// normalization as CSV.
fn load_parquet(path: &Path) -> LoadResult<Dataset> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let layout = ColumnLayout::resolve(&headers)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| array_value_to_string(col.as_ref(), row))
                .collect::<Result<Vec<String>, _>>()?;
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            rows.push(layout.row(&cells));
        }
    }

    layout.finish(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn load_str(csv: &str) -> LoadResult<Dataset> {
        load_reader(csv.as_bytes())
    }

    #[test]
    fn normalizes_headers_and_keeps_cells_verbatim() {
        let ds = load_str(" company ,Department,date,  Wage\nAcme , Ops,Jan-2024,100\n")
            .unwrap();
        assert_eq!(ds.len(), 1);
        let row = &ds.rows[0];
        assert_eq!(row.company, "Acme ");
        assert_eq!(row.department, " Ops");
        assert_eq!(row.date, "Jan-2024");
        assert_eq!(row.wage, Some(100.0));
    }

    #[test]
    fn bad_wage_becomes_missing_without_aborting() {
        let ds = load_str(
            "COMPANY,DEPARTMENT,DATE,WAGE\n\
             A,X,Jan-2024,100\n\
             A,X,Jan-2024,abc\n\
             B,Y,Feb-2024,\n\
             B,Y,Feb-2024,50.5\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 4);
        let wages: Vec<Option<f64>> = ds.rows.iter().map(|r| r.wage).collect();
        assert_eq!(wages, vec![Some(100.0), None, None, Some(50.5)]);
    }

    #[test]
    fn coerce_accepts_currency_formatting() {
        assert_eq!(coerce_wage(" $1,250.50 "), Some(1250.5));
        assert_eq!(coerce_wage("-3"), Some(-3.0));
        assert_eq!(coerce_wage("1e3"), Some(1000.0));
        assert_eq!(coerce_wage("NaN"), None);
        assert_eq!(coerce_wage("inf"), None);
        assert_eq!(coerce_wage("12 USD"), None);
        assert_eq!(coerce_wage(""), None);
    }

    #[test]
    fn short_record_pads_with_missing_cells() {
        let ds = load_str(
            "COMPANY,DEPARTMENT,DATE,WAGE\n\
             A,X,Jan-2024,100\n\
             B,Y,Feb-2024\n\
             C,Z,Mar-2024,5\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows[1].company, "B");
        assert_eq!(ds.rows[1].date, "Feb-2024");
        assert_eq!(ds.rows[1].wage, None);
        assert_eq!(ds.rows[2].wage, Some(5.0));
    }

    #[test]
    fn misplaced_commas_are_not_thousands_separators() {
        assert_eq!(coerce_wage("1,2,3"), None);
        assert_eq!(coerce_wage("12,34"), None);
        assert_eq!(coerce_wage("1234,567"), None);
        assert_eq!(coerce_wage(",123"), None);
        assert_eq!(coerce_wage("1.5,0"), None);
        assert_eq!(coerce_wage("-12,345,678.9"), Some(-12_345_678.9));
        assert_eq!(coerce_wage("999,000"), Some(999_000.0));
    }

    #[test]
    fn extra_columns_are_kept_in_source_order() {
        let ds = load_str("employee,company,department,date,wage,grade\nAnn,A,X,Jan,1,G3\n")
            .unwrap();
        assert_eq!(ds.extra_columns, vec!["EMPLOYEE", "GRADE"]);
        assert_eq!(ds.rows[0].extra, vec!["Ann", "G3"]);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let err = load_str("COMPANY,DEPARTMENT,DATE\nA,X,Jan\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "WAGE"));
    }

    #[test]
    fn colliding_headers_are_rejected() {
        let err = load_str("company,COMPANY ,department,date,wage\nA,B,X,Jan,1\n").unwrap_err();
        assert!(matches!(err, LoadError::DuplicateColumn(ref c) if c == "COMPANY"));
    }

    #[test]
    fn header_only_source_is_empty() {
        let err = load_str("company,department,date,wage\n").unwrap_err();
        assert!(matches!(err, LoadError::EmptyDataset));
    }

    #[test]
    fn bom_prefixed_header_resolves() {
        let ds = load_str("\u{feff}company,department,date,wage\nA,X,Jan,5\n").unwrap();
        assert_eq!(ds.rows[0].company, "A");
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::SourceNotFound(p) if p == path));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "irrelevant").unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref e) if e == "xlsx"));
    }

    #[test]
    fn loads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "Company,Department,Date,Wage\nA,X,Jan-2024,100\nB,Y,Feb-2024,200\n")
            .unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.companies(), vec!["A", "B"]);
    }

    #[test]
    fn loads_json_records() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"Company": "A", "Department": "X", "Date": "Jan-2024", "Wage": 100}},
                {{"Company": "B", "Department": "Y", "Date": "Feb-2024", "Wage": "oops"}},
                {{"Company": "B", "Department": "Y", "Date": "Feb-2024", "Wage": null}}
            ]"#
        )
        .unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows[0].wage, Some(100.0));
        assert_eq!(ds.rows[1].wage, None);
        assert_eq!(ds.rows[2].wage, None);
    }

    #[test]
    fn json_extra_columns_follow_key_order() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"zone": "N", "company": "A", "department": "X", "date": "Jan", "wage": 1, "badge": 7}}]"#
        )
        .unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.extra_columns, vec!["ZONE", "BADGE"]);
        assert_eq!(ds.rows[0].extra, vec!["N", "7"]);
    }

    #[test]
    fn loads_parquet_with_nulls_and_mixed_case_headers() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(" Company", DataType::Utf8, false),
            Field::new("department ", DataType::Utf8, false),
            Field::new("Date", DataType::Utf8, false),
            Field::new("Wage", DataType::Float64, true),
            Field::new("headcount", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B", "C"])),
                Arc::new(StringArray::from(vec!["X", "Y", "X"])),
                Arc::new(StringArray::from(vec!["Jan-2024", "Feb-2024", "Jan-2024"])),
                Arc::new(Float64Array::from(vec![Some(100.5), None, Some(200.0)])),
                Arc::new(Int64Array::from(vec![Some(3), Some(4), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.extra_columns, vec!["HEADCOUNT"]);
        assert_eq!(ds.companies(), vec!["A", "B", "C"]);
        let wages: Vec<Option<f64>> = ds.rows.iter().map(|r| r.wage).collect();
        assert_eq!(wages, vec![Some(100.5), None, Some(200.0)]);
        assert_eq!(ds.rows[0].extra, vec!["3"]);
        assert_eq!(ds.rows[2].extra, vec![""]);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"company": "A"}}"#).unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::JsonShape(_)));
    }
}
