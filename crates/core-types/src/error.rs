use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid number in row {row}, column {column}: {value:?}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Invalid count in row {row}, column {column}: {value:?} is not a non-negative whole number")]
    InvalidCount {
        row: usize,
        column: usize,
        value: String,
    },
}
