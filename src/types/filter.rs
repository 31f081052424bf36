use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::constant::{AND_PARAM_NAME, OR_PARAM_NAME};
use crate::types::error::FilterError;
use crate::types::value::{Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
    In,
    Is,
    Cs,
    Cd,
    Ov,
    Fts,
    Plfts,
    Phfts,
    Wfts,
    Match,
    Imatch,
    // range only, no free-text token
    Sl,
    Sr,
    Nxr,
    Nxl,
    Adj,
}

/// Free-text operator tokens. Longer symbols come first so that `>=` is not
/// read as `>` followed by a value starting with `=`.
pub const FREE_TEXT_TOKENS: &[&str] = &[
    "!=", ">=", "<=", "=", ">", "<",
    "plfts", "phfts", "wfts", "fts",
    "ilike", "like",
    "imatch", "match",
    "in", "is",
    "cs", "cd", "ov",
];

impl FilterOperator {
    pub fn code(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Like => "like",
            FilterOperator::Ilike => "ilike",
            FilterOperator::In => "in",
            FilterOperator::Is => "is",
            FilterOperator::Cs => "cs",
            FilterOperator::Cd => "cd",
            FilterOperator::Ov => "ov",
            FilterOperator::Fts => "fts",
            FilterOperator::Plfts => "plfts",
            FilterOperator::Phfts => "phfts",
            FilterOperator::Wfts => "wfts",
            FilterOperator::Match => "match",
            FilterOperator::Imatch => "imatch",
            FilterOperator::Sl => "sl",
            FilterOperator::Sr => "sr",
            FilterOperator::Nxr => "nxr",
            FilterOperator::Nxl => "nxl",
            FilterOperator::Adj => "adj",
        }
    }

    /// Maps a free-text grammar token, case-insensitive
    pub fn from_token(token: &str) -> Option<FilterOperator> {
        let operator = match token.to_lowercase().as_str() {
            "=" => FilterOperator::Eq,
            "!=" => FilterOperator::Neq,
            ">" => FilterOperator::Gt,
            ">=" => FilterOperator::Gte,
            "<" => FilterOperator::Lt,
            "<=" => FilterOperator::Lte,
            "like" => FilterOperator::Like,
            "ilike" => FilterOperator::Ilike,
            "in" => FilterOperator::In,
            "is" => FilterOperator::Is,
            "cs" => FilterOperator::Cs,
            "cd" => FilterOperator::Cd,
            "ov" => FilterOperator::Ov,
            "fts" => FilterOperator::Fts,
            "plfts" => FilterOperator::Plfts,
            "phfts" => FilterOperator::Phfts,
            "wfts" => FilterOperator::Wfts,
            "match" => FilterOperator::Match,
            "imatch" => FilterOperator::Imatch,
            _ => return None,
        };

        Some(operator)
    }

    /// Human wording for operator pickers and condition descriptions
    pub fn label(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "equals",
            FilterOperator::Neq => "not equal",
            FilterOperator::Gt => "greater than",
            FilterOperator::Gte => "greater than or equal",
            FilterOperator::Lt => "less than",
            FilterOperator::Lte => "less than or equal",
            FilterOperator::Like => "like",
            FilterOperator::Ilike => "like (case insensitive)",
            FilterOperator::In => "one of",
            FilterOperator::Is => "is",
            FilterOperator::Cs => "contains",
            FilterOperator::Cd => "contained in",
            FilterOperator::Ov => "overlaps",
            FilterOperator::Fts => "full-text search",
            FilterOperator::Plfts => "plain full-text search",
            FilterOperator::Phfts => "phrase full-text search",
            FilterOperator::Wfts => "web full-text search",
            FilterOperator::Match => "matches regex",
            FilterOperator::Imatch => "matches regex (case insensitive)",
            FilterOperator::Sl => "strictly left of",
            FilterOperator::Sr => "strictly right of",
            FilterOperator::Nxr => "does not extend right of",
            FilterOperator::Nxl => "does not extend left of",
            FilterOperator::Adj => "adjacent to",
        }
    }

    pub fn is_full_text(&self) -> bool {
        matches!(
            self,
            FilterOperator::Fts | FilterOperator::Plfts | FilterOperator::Phfts | FilterOperator::Wfts
        )
    }

    /// Renders `operator.value`, or `operator(lang).terms` for full-text search
    pub fn render(&self, value: &str) -> String {
        if self.is_full_text() {
            format!("{}{}", self.code(), value)
        } else {
            format!("{}.{}", self.code(), value)
        }
    }
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    /// Accepts PostgREST codes (`gte`, `cs`, `adj`, ...) as sent by operator pickers
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let operator = match code.to_lowercase().as_str() {
            "eq" => FilterOperator::Eq,
            "neq" => FilterOperator::Neq,
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "like" => FilterOperator::Like,
            "ilike" => FilterOperator::Ilike,
            "in" => FilterOperator::In,
            "is" => FilterOperator::Is,
            "cs" => FilterOperator::Cs,
            "cd" => FilterOperator::Cd,
            "ov" => FilterOperator::Ov,
            "fts" => FilterOperator::Fts,
            "plfts" => FilterOperator::Plfts,
            "phfts" => FilterOperator::Phfts,
            "wfts" => FilterOperator::Wfts,
            "match" => FilterOperator::Match,
            "imatch" => FilterOperator::Imatch,
            "sl" => FilterOperator::Sl,
            "sr" => FilterOperator::Sr,
            "nxr" => FilterOperator::Nxr,
            "nxl" => FilterOperator::Nxl,
            "adj" => FilterOperator::Adj,
            _ => return Err(FilterError::UnsupportedOperator(code.to_string())),
        };

        Ok(operator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn param_name(&self) -> &'static str {
        match self {
            LogicalOperator::And => AND_PARAM_NAME,
            LogicalOperator::Or => OR_PARAM_NAME,
        }
    }
}

impl Default for LogicalOperator {
    fn default() -> Self {
        LogicalOperator::And
    }
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.param_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterCondition {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        FilterCondition {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Readable form of the badge, e.g. `age greater than 30`
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.column, self.operator.label(), self.value)
    }
}

/// Badge text, e.g. `name eq John`
impl Display for FilterCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    pub conditions: Vec<FilterCondition>,
    pub logical_operator: LogicalOperator,
}

impl FilterSet {
    pub fn new(logical_operator: LogicalOperator) -> Self {
        FilterSet {
            conditions: vec![],
            logical_operator,
        }
    }

    pub fn with_conditions(conditions: Vec<FilterCondition>, logical_operator: LogicalOperator) -> Self {
        FilterSet {
            conditions,
            logical_operator,
        }
    }

    pub fn push(&mut self, condition: FilterCondition) -> &mut Self {
        self.conditions.push(condition);

        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// Parameter map ready for the request query string, plus the conditions it
/// was built from so they can be shown again as badges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledFilter {
    pub params: BTreeMap<String, String>,
    pub conditions: Vec<FilterCondition>,
    pub logical_operator: LogicalOperator,
}

impl CompiledFilter {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_filter_set(&self) -> FilterSet {
        FilterSet::with_conditions(self.conditions.clone(), self.logical_operator)
    }

    pub fn to_query_string(&self) -> Result<String, FilterError> {
        Ok(serde_urlencoded::to_string(&self.params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_token_maps() {
        for token in FREE_TEXT_TOKENS {
            assert!(FilterOperator::from_token(token).is_some(), "token {}", token);
        }

        assert_eq!(FilterOperator::from_token("ILIKE"), Some(FilterOperator::Ilike));
        assert_eq!(FilterOperator::from_token("~~"), None);
    }

    #[test]
    fn test_range_operators_have_no_token() {
        assert_eq!(FilterOperator::from_token("sl"), None);
        assert_eq!(FilterOperator::from_token("adj"), None);
    }

    #[test]
    fn test_from_str_code() {
        assert_eq!("gte".parse::<FilterOperator>().unwrap(), FilterOperator::Gte);
        assert_eq!("NXL".parse::<FilterOperator>().unwrap(), FilterOperator::Nxl);
        assert!(matches!(
            ">=".parse::<FilterOperator>(),
            Err(FilterError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn test_render() {
        assert_eq!(FilterOperator::Eq.render("John"), "eq.John");
        assert_eq!(FilterOperator::Fts.render("(english).hello"), "fts(english).hello");
    }

    #[test]
    fn test_condition_badge() {
        let condition = FilterCondition::new("age", FilterOperator::Gt, 30i64);

        assert_eq!(condition.to_string(), "age gt 30");
        assert_eq!(condition.value_kind(), ValueKind::Number);
    }

    #[test]
    fn test_condition_describe() {
        let condition = FilterCondition::new("age", FilterOperator::Gte, 30i64);
        assert_eq!(condition.describe(), "age greater than or equal 30");

        let condition = FilterCondition::new("during", FilterOperator::Nxl, "[1,5)");
        assert_eq!(condition.describe(), "during does not extend left of [1,5)");
    }

    #[test]
    fn test_labels_are_distinct() {
        let operators: Vec<FilterOperator> = ["eq", "neq", "gt", "gte", "lt", "lte", "like", "ilike", "in", "is",
            "cs", "cd", "ov", "fts", "plfts", "phfts", "wfts", "match", "imatch", "sl", "sr", "nxr", "nxl", "adj"]
            .iter()
            .map(|code| code.parse().unwrap())
            .collect();

        let labels: std::collections::HashSet<&str> = operators.iter().map(FilterOperator::label).collect();

        assert_eq!(labels.len(), operators.len());
        assert!(operators.iter().all(|operator| operator.to_string() == operator.code()));
    }

    #[test]
    fn test_query_string() {
        let mut compiled = CompiledFilter::default();
        compiled.params.insert("and".to_string(), "(name.eq.John Doe,age.gt.30)".to_string());

        assert_eq!(
            compiled.to_query_string().unwrap(),
            "and=%28name.eq.John+Doe%2Cage.gt.30%29"
        );
    }
}
