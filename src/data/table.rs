//! Validated columnar long-format score table and its CSV adapter.
use std::path::Path;

use crate::data::errors::{DataError, DataResult};

/// Header names the CSV adapter requires, in column order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["student_id", "grade", "year", "content_area", "scale_score"];

/// Long-format assessment score table.
///
/// One row per (student, grade, year, content area) observation, stored as
/// parallel column vectors. Construction validates shape and score
/// finiteness once so downstream extraction can index freely.
#[derive(Debug, Clone)]
pub struct LongTable {
    student_id: Vec<String>,
    grade: Vec<u8>,
    year: Vec<i32>,
    content_area: Vec<String>,
    scale_score: Vec<f64>,
}

impl LongTable {
    /// Build a table from parallel columns.
    ///
    /// # Errors
    /// - [`DataError::ColumnLengthMismatch`] if any column differs in length
    ///   from `student_id`.
    /// - [`DataError::InvalidScore`] if any scale score is NaN or infinite.
    pub fn new(
        student_id: Vec<String>, grade: Vec<u8>, year: Vec<i32>, content_area: Vec<String>,
        scale_score: Vec<f64>,
    ) -> DataResult<Self> {
        let n = student_id.len();
        check_len("grade", grade.len(), n)?;
        check_len("year", year.len(), n)?;
        check_len("content_area", content_area.len(), n)?;
        check_len("scale_score", scale_score.len(), n)?;
        for (row, &score) in scale_score.iter().enumerate() {
            if !score.is_finite() {
                return Err(DataError::InvalidScore { row, value: score });
            }
        }
        Ok(LongTable { student_id, grade, year, content_area, scale_score })
    }

    /// Load a table from a long-format CSV file with a header row.
    ///
    /// Required columns: `student_id`, `grade`, `year`, `content_area`,
    /// `scale_score`. Extra columns are ignored.
    ///
    /// # Errors
    /// - [`DataError::MissingColumn`] if a required header is absent.
    /// - [`DataError::ParseField`] / [`DataError::InvalidScore`] on malformed
    ///   rows.
    /// - [`DataError::Csv`] / [`DataError::Io`] from the underlying reader.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let headers = reader.headers()?.clone();
        let mut col_idx = [0usize; 5];
        for (slot, column) in col_idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or(DataError::MissingColumn { column })?;
        }

        let mut student_id = Vec::new();
        let mut grade = Vec::new();
        let mut year = Vec::new();
        let mut content_area = Vec::new();
        let mut scale_score = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            student_id.push(field(&record, col_idx[0]).to_owned());
            grade.push(parse_field::<u8>(&record, col_idx[1], row, "grade")?);
            year.push(parse_field::<i32>(&record, col_idx[2], row, "year")?);
            content_area.push(field(&record, col_idx[3]).to_owned());
            scale_score.push(parse_field::<f64>(&record, col_idx[4], row, "scale_score")?);
        }
        LongTable::new(student_id, grade, year, content_area, scale_score)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.student_id.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.student_id.is_empty()
    }

    pub fn student_id(&self, row: usize) -> &str {
        &self.student_id[row]
    }

    pub fn grade(&self, row: usize) -> u8 {
        self.grade[row]
    }

    pub fn year(&self, row: usize) -> i32 {
        self.year[row]
    }

    pub fn content_area(&self, row: usize) -> &str {
        &self.content_area[row]
    }

    pub fn scale_score(&self, row: usize) -> f64 {
        self.scale_score[row]
    }
}

fn check_len(column: &'static str, actual: usize, expected: usize) -> DataResult<()> {
    if actual != expected {
        return Err(DataError::ColumnLengthMismatch { column, expected, actual });
    }
    Ok(())
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord, idx: usize, row: usize, column: &'static str,
) -> DataResult<T> {
    let text = field(record, idx);
    text.parse::<T>().map_err(|_| DataError::ParseField { row, column, text: text.to_owned() })
}

#[cfg(test)]
mod tests {
    /*
    Scope
    -----
    Construction validation for `LongTable` and the CSV adapter's header
    handling: length mismatches, non-finite scores, missing columns.
    */
    use super::*;
    use std::io::Write;

    fn sample_columns() -> (Vec<String>, Vec<u8>, Vec<i32>, Vec<String>, Vec<f64>) {
        (
            vec!["a".into(), "b".into()],
            vec![3, 3],
            vec![2015, 2015],
            vec!["math".into(), "math".into()],
            vec![512.0, 498.5],
        )
    }

    #[test]
    // Purpose: valid parallel columns construct a table of the right size.
    fn new_accepts_valid_columns() {
        let (sid, g, y, ca, ss) = sample_columns();
        let table = LongTable::new(sid, g, y, ca, ss).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.student_id(1), "b");
        assert_eq!(table.scale_score(0), 512.0);
    }

    #[test]
    // Purpose: a short column is rejected with the column name attached.
    fn new_rejects_length_mismatch() {
        let (sid, g, y, ca, mut ss) = sample_columns();
        ss.pop();
        match LongTable::new(sid, g, y, ca, ss) {
            Err(DataError::ColumnLengthMismatch { column, expected, actual }) => {
                assert_eq!(column, "scale_score");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ColumnLengthMismatch, got {other:?}"),
        }
    }

    #[test]
    // Purpose: NaN scores are rejected at construction, not at use.
    fn new_rejects_non_finite_score() {
        let (sid, g, y, ca, mut ss) = sample_columns();
        ss[1] = f64::NAN;
        assert!(matches!(
            LongTable::new(sid, g, y, ca, ss),
            Err(DataError::InvalidScore { row: 1, .. })
        ));
    }

    #[test]
    // Purpose: the CSV adapter surfaces a missing required column as a
    // fatal MissingColumn error naming the column.
    fn from_csv_rejects_missing_column() {
        let mut file = tempfile_with("student_id,grade,year,scale_score\na,3,2015,512.0\n");
        file.flush().unwrap();
        match LongTable::from_csv_path(file.path()) {
            Err(DataError::MissingColumn { column }) => assert_eq!(column, "content_area"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    // Purpose: a well-formed CSV with extra columns loads and ignores them.
    fn from_csv_loads_and_ignores_extra_columns() {
        let mut file = tempfile_with(
            "district,student_id,grade,year,content_area,scale_score\n\
             d1,a,3,2015,math,512.0\n\
             d1,b,5,2017,math,498.5\n",
        );
        file.flush().unwrap();
        let table = LongTable::from_csv_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.grade(1), 5);
        assert_eq!(table.year(1), 2017);
        assert_eq!(table.content_area(0), "math");
    }

    fn tempfile_with(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }
}
