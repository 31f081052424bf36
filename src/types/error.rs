use validator::ValidationErrors;
use thiserror::Error;
use crate::types::category::TypeCategory;
use crate::types::filter::FilterOperator;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid condition format: `{0}`, expected `column operator value`")]
    InvalidConditionFormat(String),

    #[error("Unknown column: `{0}`")]
    UnknownColumn(String),

    #[error("Unsupported operator: `{0}`")]
    UnsupportedOperator(String),

    #[error("Operator `{operator}` is not allowed for column `{column}` of {category} type")]
    OperatorNotAllowed {
        column: String,
        operator: FilterOperator,
        category: TypeCategory,
    },

    #[error("Invalid date value: `{0}`")]
    InvalidDate(String),

    #[error("Configured date format `{0}` can't format a date")]
    InvalidDateFormat(String),

    #[error("No condition at index {index}, filter has {len}")]
    ConditionIndexOutOfRange {
        index: usize,
        len: usize,
    },

    #[error("Table has duplicated column `{0}`")]
    DuplicateColumn(String),

    #[error(transparent)]
    QueryStringError(#[from] serde_urlencoded::ser::Error),
}

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Config path `{0}` is not exist")]
    ConfigIsNotExist(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ConfigParseError(#[from] serde_yaml::Error),

    #[error(transparent)]
    ValidationErrors(#[from] ValidationErrors),
}
