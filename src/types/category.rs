use std::fmt::{Display, Formatter};
use serde::{Serialize, Deserialize};
use crate::types::filter::FilterOperator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    Text,
    Number,
    Boolean,
    Date,
    Array,
    Json,
    Range,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Eq,
    FilterOperator::Neq,
    FilterOperator::Like,
    FilterOperator::Ilike,
    FilterOperator::Match,
    FilterOperator::Imatch,
    FilterOperator::Fts,
    FilterOperator::Plfts,
    FilterOperator::Phfts,
    FilterOperator::Wfts,
    FilterOperator::In,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Eq,
    FilterOperator::Neq,
    FilterOperator::Gt,
    FilterOperator::Gte,
    FilterOperator::Lt,
    FilterOperator::Lte,
    FilterOperator::In,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Is,
];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Eq,
    FilterOperator::Neq,
    FilterOperator::Gt,
    FilterOperator::Gte,
    FilterOperator::Lt,
    FilterOperator::Lte,
];

const ARRAY_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Cs,
    FilterOperator::Cd,
    FilterOperator::Ov,
];

const JSON_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Cs,
];

const RANGE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Sl,
    FilterOperator::Sr,
    FilterOperator::Nxr,
    FilterOperator::Nxl,
    FilterOperator::Adj,
    FilterOperator::Ov,
];

impl TypeCategory {
    pub fn name(&self) -> &'static str {
        match self {
            TypeCategory::Text => "text",
            TypeCategory::Number => "number",
            TypeCategory::Boolean => "boolean",
            TypeCategory::Date => "date",
            TypeCategory::Array => "array",
            TypeCategory::Json => "json",
            TypeCategory::Range => "range",
        }
    }

    /// Operators offered for columns of this category, in picker order
    pub fn operators(&self) -> &'static [FilterOperator] {
        match self {
            TypeCategory::Text => TEXT_OPERATORS,
            TypeCategory::Number => NUMBER_OPERATORS,
            TypeCategory::Boolean => BOOLEAN_OPERATORS,
            TypeCategory::Date => DATE_OPERATORS,
            TypeCategory::Array => ARRAY_OPERATORS,
            TypeCategory::Json => JSON_OPERATORS,
            TypeCategory::Range => RANGE_OPERATORS,
        }
    }

    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.operators().contains(&operator)
    }
}

impl Display for TypeCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_allows_only_is() {
        assert!(TypeCategory::Boolean.allows(FilterOperator::Is));
        assert!(!TypeCategory::Boolean.allows(FilterOperator::Eq));
    }

    #[test]
    fn test_ov_shared_by_array_and_range() {
        assert!(TypeCategory::Array.allows(FilterOperator::Ov));
        assert!(TypeCategory::Range.allows(FilterOperator::Ov));
        assert!(!TypeCategory::Json.allows(FilterOperator::Ov));
    }

    #[test]
    fn test_range_only_operators_stay_in_range() {
        for operator in [FilterOperator::Sl, FilterOperator::Sr, FilterOperator::Nxr, FilterOperator::Nxl, FilterOperator::Adj] {
            assert!(TypeCategory::Range.allows(operator));
            assert!(!TypeCategory::Text.allows(operator));
            assert!(!TypeCategory::Array.allows(operator));
        }
    }

    #[test]
    fn test_date_has_no_in() {
        assert!(TypeCategory::Number.allows(FilterOperator::In));
        assert!(!TypeCategory::Date.allows(FilterOperator::In));
    }
}
