use crate::error::DriftError;
use ndarray::{Array1, ArrayView1, Axis};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

const MISSING_TOKENS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric values with nulls stored as NaN
    Numeric(Array1<f64>),

    /// At least one cell was neither a number nor a null marker
    Text,
}

/// A column oriented table loaded from a CSV file
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    values: HashMap<String, Column>,
    n_rows: usize,
}

fn parse_cell(cell: &str) -> Option<f64> {
    if MISSING_TOKENS.contains(&cell) {
        return Some(f64::NAN);
    }

    match cell {
        "True" | "true" | "TRUE" => Some(1.0),
        "False" | "false" | "FALSE" => Some(0.0),
        _ => cell.parse::<f64>().ok(),
    }
}

impl Dataset {
    /// Load a CSV file with a header row.
    ///
    /// Any failure to open or parse the file (missing file, ragged rows,
    /// empty file, duplicate headers) is reported as `DataUnavailable`.
    pub fn from_csv(path: &Path) -> Result<Self, DriftError> {
        let file = File::open(path).map_err(|e| DriftError::unavailable(path, e))?;
        let dataset =
            Self::parse(BufReader::new(file)).map_err(|e| DriftError::unavailable(path, e))?;

        debug!(
            "Loaded {} rows x {} columns from {}",
            dataset.n_rows,
            dataset.columns.len(),
            path.display()
        );

        Ok(dataset)
    }

    pub(crate) fn parse<R: Read>(reader: R) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| e.to_string())?
            .iter()
            .map(String::from)
            .collect::<Vec<_>>();

        if headers.is_empty() {
            return Err("missing header row".to_string());
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(format!("duplicate column {duplicate}"));
        }

        let mut raw: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        let mut numeric = vec![true; headers.len()];
        let mut n_rows = 0;

        for record in reader.records() {
            let record = record.map_err(|e| e.to_string())?;

            for (i, cell) in record.iter().enumerate() {
                if !numeric[i] {
                    continue;
                }

                match parse_cell(cell) {
                    Some(value) => raw[i].push(value),
                    None => {
                        numeric[i] = false;
                        raw[i] = Vec::new();
                    }
                }
            }

            n_rows += 1;
        }

        let values = headers
            .iter()
            .zip(raw)
            .zip(numeric)
            .map(|((name, data), is_numeric)| {
                let column = if is_numeric {
                    Column::Numeric(Array1::from(data))
                } else {
                    Column::Text
                };
                (name.clone(), column)
            })
            .collect();

        Ok(Self {
            columns: headers,
            values,
            n_rows,
        })
    }

    /// Build a numeric dataset from named columns of equal length
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, DriftError> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut values = HashMap::with_capacity(columns.len());

        for (name, data) in columns {
            if data.len() != n_rows {
                return Err(DriftError::ColumnLengthMismatch {
                    column: name,
                    expected: n_rows,
                    actual: data.len(),
                });
            }

            if values.contains_key(&name) {
                return Err(DriftError::DuplicateColumn(name));
            }

            names.push(name.clone());
            values.insert(name, Column::Numeric(Array1::from(data)));
        }

        Ok(Self {
            columns: names,
            values,
            n_rows,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.values.get(name)
    }

    pub fn numeric(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        match self.values.get(name) {
            Some(Column::Numeric(array)) => Some(array.view()),
            _ => None,
        }
    }

    pub(crate) fn numeric_mut(&mut self, name: &str) -> Option<&mut Array1<f64>> {
        match self.values.get_mut(name) {
            Some(Column::Numeric(array)) => Some(array),
            _ => None,
        }
    }

    /// Finite values of a numeric column; nulls and infinities are dropped
    pub fn non_null(&self, name: &str) -> Option<Vec<f64>> {
        self.numeric(name)
            .map(|col| col.iter().filter(|x| x.is_finite()).copied().collect())
    }

    /// New dataset holding the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let values = self
            .values
            .iter()
            .map(|(name, column)| {
                let selected = match column {
                    Column::Numeric(array) => Column::Numeric(array.select(Axis(0), indices)),
                    Column::Text => Column::Text,
                };
                (name.clone(), selected)
            })
            .collect();

        Self {
            columns: self.columns.clone(),
            values,
            n_rows: indices.len(),
        }
    }
}
