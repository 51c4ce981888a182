use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A single loosely-typed value as delivered by a spreadsheet or table API.
///
/// Deserializes straight from JSON: `null` becomes `Empty`, booleans and
/// numbers keep their type, everything else is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// One ordered row of cells.
pub type Row = Vec<Cell>;

/// The outcome of reading a cell as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Absent,
    Value(f64),
    Invalid,
}

impl Cell {
    /// Returns `true` for cells that carry no value at all.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as a string. Text passes through unchanged.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(value) => value.to_string(),
            Cell::Number(value) => value.to_string(),
            Cell::Text(text) => text.clone(),
        }
    }

    fn numeric(&self) -> Numeric {
        match self {
            _ if self.is_blank() => Numeric::Absent,
            Cell::Number(value) => Numeric::Value(*value),
            Cell::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) => Numeric::Value(value),
                Err(_) => Numeric::Invalid,
            },
            _ => Numeric::Invalid,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A borrowed row together with its position in the source, so parse
/// failures can say exactly where the bad value lives.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    index: usize,
    cells: &'a [Cell],
}

impl<'a> RowView<'a> {
    pub fn new(index: usize, cells: &'a [Cell]) -> Self {
        Self { index, cells }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `column` rendered as text; missing cells read as "".
    pub fn text(&self, column: usize) -> String {
        self.cells.get(column).map(Cell::to_text).unwrap_or_default()
    }

    /// Reads a finite number from `column`.
    ///
    /// A missing or blank cell is `0.0`. A cell that holds something that is
    /// not a finite number is an error.
    pub fn number(&self, column: usize) -> Result<f64, CoreError> {
        match self.numeric(column) {
            Numeric::Absent => Ok(0.0),
            Numeric::Value(value) if value.is_finite() => Ok(value),
            _ => Err(self.invalid_number(column)),
        }
    }

    /// Like [`RowView::number`], but a missing or blank cell is `None`.
    pub fn optional_number(&self, column: usize) -> Result<Option<f64>, CoreError> {
        match self.numeric(column) {
            Numeric::Absent => Ok(None),
            _ => self.number(column).map(Some),
        }
    }

    /// Like [`RowView::number`], but also accepts positive infinity, which is
    /// how an upstream sheet reports a ratio with a zero denominator.
    pub fn ratio(&self, column: usize) -> Result<f64, CoreError> {
        match self.numeric(column) {
            Numeric::Absent => Ok(0.0),
            Numeric::Value(value) if value.is_finite() || value == f64::INFINITY => Ok(value),
            _ => Err(self.invalid_number(column)),
        }
    }

    /// Reads a non-negative whole number from `column`; blank is `0`.
    pub fn count(&self, column: usize) -> Result<u64, CoreError> {
        let value = self.number(column)?;
        if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
            return Err(CoreError::InvalidCount {
                row: self.index,
                column,
                value: self.text(column),
            });
        }
        Ok(value as u64)
    }

    fn numeric(&self, column: usize) -> Numeric {
        self.cells
            .get(column)
            .map(Cell::numeric)
            .unwrap_or(Numeric::Absent)
    }

    fn invalid_number(&self, column: usize) -> CoreError {
        CoreError::InvalidNumber {
            row: self.index,
            column,
            value: self.text(column),
        }
    }
}
