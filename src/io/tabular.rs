//! Column-wise reading of headed delimited input files.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::BuildError;

/// A headed CSV file parsed column by column.
///
/// Cells are kept as strings until a caller asks for a typed column, so a
/// malformed cell in an unused column never fails the build.
#[derive(Debug, Clone)]
pub struct TabularFile {
    path: PathBuf,
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl TabularFile {
    /// Reads and parses a file.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingFile`] if the file cannot be opened and
    /// [`BuildError::DataFormat`] if it is not valid headed CSV.
    pub fn from_path(path: &Path) -> Result<Self, BuildError> {
        let file = File::open(path).map_err(|source| BuildError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(path, io::BufReader::new(file))
    }

    /// Parses CSV from any reader; `path` is used only in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DataFormat`] on a missing header row or a
    /// record whose width differs from the header.
    pub fn from_reader(path: &Path, reader: impl Read) -> Result<Self, BuildError> {
        let format_err = |message: String| BuildError::DataFormat {
            path: path.to_path_buf(),
            message,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| format_err(format!("cannot read header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(format_err("missing header row".to_string()));
        }

        let mut columns = vec![Vec::new(); headers.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| format_err(format!("row {}: {e}", row + 2)))?;
            for (column, cell) in columns.iter_mut().zip(record.iter()) {
                column.push(cell.to_string());
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            columns,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Raw cells of a named column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DataFormat`] if the column is absent.
    pub fn column(&self, name: &str) -> Result<&[String], BuildError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| BuildError::DataFormat {
                path: self.path.clone(),
                message: format!("column `{name}` not found"),
            })
    }

    /// A named column coerced to `f32`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DataFormat`] if the column is absent or any
    /// cell is empty or not a finite number.
    pub fn column_f32(&self, name: &str) -> Result<Vec<f32>, BuildError> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| BuildError::DataFormat {
                        path: self.path.clone(),
                        message: format!(
                            "column `{name}`, row {}: `{cell}` is not a number",
                            row + 2
                        ),
                    })
            })
            .collect()
    }

    /// Header names starting with `prefix`, in file order.
    pub fn columns_starting(&self, prefix: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }
}
