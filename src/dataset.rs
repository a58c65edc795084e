use crate::error::{QuizError, Result};
use std::path::Path;
use tracing::debug;

/// One term/definition pair. The index is its row position in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub index: usize,
    pub term: String,
    pub definition: String,
}

/// The loaded two-column dataset; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Original header names, used only for display ("Pattern: A -> B")
    pub headers: (String, String),
    items: Vec<Item>,
}

impl Dataset {
    /// Build a dataset from two aligned columns.
    pub fn from_columns(column_a: Vec<String>, column_b: Vec<String>) -> Result<Self> {
        if column_a.len() != column_b.len() {
            return Err(QuizError::malformed(format!(
                "column A has {} rows but column B has {}",
                column_a.len(),
                column_b.len()
            )));
        }

        let items = column_a
            .into_iter()
            .zip(column_b)
            .enumerate()
            .map(|(index, (term, definition))| Item {
                index,
                term,
                definition,
            })
            .collect();

        Ok(Self {
            headers: ("A".to_string(), "B".to_string()),
            items,
        })
    }

    pub fn with_headers(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.headers = (a.into(), b.into());
        self
    }

    /// Load a CSV file; the first two columns are used regardless of their names.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| QuizError::malformed(format!("{}: {e}", path.display())))?;
        let dataset = Self::from_reader(reader)?;
        debug!(path = %path.display(), items = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    /// Parse CSV from any reader. Every record must have exactly two fields.
    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader
            .headers()
            .map_err(|e| QuizError::malformed(e.to_string()))?
            .clone();
        if headers.len() != 2 {
            return Err(QuizError::malformed(format!(
                "expected 2 columns, header has {}",
                headers.len()
            )));
        }

        let mut column_a = Vec::new();
        let mut column_b = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| QuizError::malformed(e.to_string()))?;
            match (record.get(0), record.get(1), record.len()) {
                (Some(a), Some(b), 2) => {
                    column_a.push(a.to_string());
                    column_b.push(b.to_string());
                }
                (_, _, n) => {
                    return Err(QuizError::malformed(format!(
                        "row {} has {n} fields, expected 2",
                        row + 1
                    )))
                }
            }
        }

        Ok(Self::from_columns(column_a, column_b)?.with_headers(&headers[0], &headers[1]))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
