use std::sync::OnceLock;
use log::{debug, warn};
use regex::Regex;
use crate::types::error::FilterError;
use crate::types::filter::{FilterCondition, FilterOperator, FilterSet, LogicalOperator, FREE_TEXT_TOKENS};
use crate::types::table::Table;
use crate::types::value::Value;

static AND_REGEX: OnceLock<Regex> = OnceLock::new();
static OR_REGEX: OnceLock<Regex> = OnceLock::new();
static CONDITION_REGEX: OnceLock<Regex> = OnceLock::new();

fn and_regex() -> &'static Regex {
    AND_REGEX.get_or_init(|| Regex::new(r"(?i)\s+AND\s+").unwrap())
}

fn or_regex() -> &'static Regex {
    OR_REGEX.get_or_init(|| Regex::new(r"(?i)\s+OR\s+").unwrap())
}

fn condition_regex() -> &'static Regex {
    CONDITION_REGEX.get_or_init(|| {
        let tokens = FREE_TEXT_TOKENS.iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<String>>()
            .join("|");

        Regex::new(&format!(r"(?i)^([a-zA-Z0-9_]+)\s*({})\s*(.*)$", tokens)).unwrap()
    })
}

/// Strips a matching pair of quotes. An opening quote without the same
/// closing quote is kept as part of the value.
fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }

    if value.starts_with('\'') || value.starts_with('"') {
        debug!("Value `{}` has no closing quote, keeping it verbatim", value);
    }

    value
}

/// Splits the query into condition strings and picks the logical operator.
///
/// Whichever keyword splits the query into more parts wins, ties go to `or`.
/// A query mixing both keywords is not grouped by precedence.
fn split_conditions(query: &str) -> (Vec<&str>, LogicalOperator) {
    let and_parts: Vec<&str> = and_regex().split(query).collect();
    let or_parts: Vec<&str> = or_regex().split(query).collect();

    if and_parts.len() > 1 || or_parts.len() > 1 {
        if and_parts.len() > 1 && or_parts.len() > 1 {
            warn!("Query `{}` mixes AND with OR, only the more frequent one is applied", query);
        }

        return if and_parts.len() > or_parts.len() {
            (and_parts, LogicalOperator::And)
        } else {
            (or_parts, LogicalOperator::Or)
        };
    }

    (vec![query], LogicalOperator::And)
}

fn parse_condition(part: &str, table: &Table) -> Result<FilterCondition, FilterError> {
    let part = part.trim();

    let captures = match condition_regex().captures(part) {
        Some(captures) => captures,
        None => return Err(FilterError::InvalidConditionFormat(part.to_string())),
    };

    let column = &captures[1];
    let token = &captures[2];
    let value = unquote(&captures[3]);

    if !table.has_column(column) {
        return Err(FilterError::UnknownColumn(column.to_string()));
    }

    let operator = FilterOperator::from_token(token)
        .ok_or_else(|| FilterError::UnsupportedOperator(token.to_string()))?;

    Ok(FilterCondition::new(column, operator, Value::Utf8(value.to_string())))
}

/// Parses a typed search such as `name = 'John' AND age > 30`.
///
/// Empty input gives an empty set. The first invalid condition aborts the
/// whole parse.
pub fn parse_query(query: &str, table: &Table) -> Result<FilterSet, FilterError> {
    let query = query.trim();

    if query.is_empty() {
        return Ok(FilterSet::default());
    }

    let (parts, logical_operator) = split_conditions(query);

    debug!("Parsing {} condition(s) joined by {} on table {}", parts.len(), logical_operator, table.name);

    let conditions = parts.iter()
        .map(|part| parse_condition(part, table))
        .collect::<Result<Vec<FilterCondition>, FilterError>>()?;

    Ok(FilterSet::with_conditions(conditions, logical_operator))
}
