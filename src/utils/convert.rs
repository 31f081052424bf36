use std::collections::BTreeMap;
use std::fmt::Write;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::{debug, trace, warn};
use crate::compiler_context::CompilerContext;
use crate::constant::{
    FALSE_LITERAL, FTS_LANGUAGE_SEPARATOR, LIST_SEPARATOR, NULL_LITERAL, SQL_WILDCARD, TRUE_LITERAL,
    USER_WILDCARD,
};
use crate::types::category::TypeCategory;
use crate::types::error::FilterError;
use crate::types::filter::{FilterCondition, FilterOperator, LogicalOperator};
use crate::types::value::Value;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
];

/// Where a value came from. Free-text values are raw strings with no knowledge
/// of the column type, structured values are shaped by the column category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    FreeText,
    Structured(TypeCategory),
}

impl ValueMode {
    fn category(&self) -> Option<TypeCategory> {
        match self {
            ValueMode::FreeText => None,
            ValueMode::Structured(category) => Some(*category),
        }
    }
}

fn is_wrapped(value: &str, open: char, close: char) -> bool {
    value.len() >= 2 && value.starts_with(open) && value.ends_with(close)
}

fn strip_parens(value: &str) -> &str {
    if is_wrapped(value, '(', ')') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn split_list(value: &str) -> Vec<String> {
    value.split(LIST_SEPARATOR)
        .map(|element| element.trim().to_string())
        .collect()
}

fn convert_is_value(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    match lowered.as_str() {
        NULL_LITERAL | TRUE_LITERAL | FALSE_LITERAL => lowered,
        _ => raw.to_string(),
    }
}

fn quote_list_element(element: &str) -> String {
    format!("\"{}\"", element.replace('"', "\\\""))
}

fn convert_in_value(value: &Value, raw: &str, mode: ValueMode) -> String {
    if is_wrapped(raw, '(', ')') {
        return raw.to_string();
    }

    let category = match mode.category() {
        None => return format!("({})", raw),
        Some(category) => category,
    };

    let elements: Vec<String> = match value {
        Value::Utf8(_) => split_list(raw),
        value => value.elements().iter().map(|element| element.to_string()).collect(),
    };

    let elements: Vec<String> = if category == TypeCategory::Text {
        elements.iter().map(|element| quote_list_element(element)).collect()
    } else {
        elements
    };

    format!("({})", elements.join(&LIST_SEPARATOR.to_string()))
}

fn render_json_element(element: &serde_json::Value) -> String {
    match element {
        serde_json::Value::String(value) => value.clone(),
        value => value.to_string(),
    }
}

fn parse_structured_elements(raw: &str, category: TypeCategory) -> Vec<String> {
    if category == TypeCategory::Array || category == TypeCategory::Json {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(elements)) => {
                return elements.iter().map(render_json_element).collect();
            },
            Ok(element) => {
                return vec![render_json_element(&element)];
            },
            Err(err) => {
                debug!("Value `{}` is not JSON ({}), splitting on commas", raw, err);
            },
        }
    }

    split_list(strip_parens(raw))
}

fn convert_containment_value(value: &Value, raw: &str, mode: ValueMode) -> String {
    if is_wrapped(raw, '{', '}') {
        return raw.to_string();
    }

    let category = match mode.category() {
        None => return format!("{{{}}}", strip_parens(raw)),
        Some(category) => category,
    };

    let elements: Vec<String> = match value {
        Value::Utf8(_) => parse_structured_elements(raw, category),
        // an object filters json columns by key/value containment and keeps its JSON text
        Value::Json(object @ serde_json::Value::Object(_)) => return object.to_string(),
        value => value.elements().iter().map(|element| element.to_string()).collect(),
    };

    format!("{{{}}}", elements.join(&LIST_SEPARATOR.to_string()))
}

fn convert_full_text_value(raw: &str, context: &CompilerContext) -> String {
    match raw.split_once(FTS_LANGUAGE_SEPARATOR) {
        Some((language, terms)) => format!("({}).{}", language.trim(), terms.trim()),
        None => format!("({}).{}", context.default_fts_language, raw),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date_time.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    None
}

fn convert_date_value(value: &Value, raw: &str, context: &CompilerContext) -> Result<String, FilterError> {
    let date = match value {
        Value::Date(date) => Some(*date),
        // milliseconds since epoch
        Value::Int64(millis) => Utc.timestamp_millis_opt(*millis)
            .single()
            .map(|date_time| date_time.date_naive()),
        Value::Utf8(_) | Value::Json(serde_json::Value::String(_)) => parse_date(raw),
        _ => None,
    };

    let date = match date {
        Some(date) => date,
        None => {
            warn!("Can't coerce `{}` to a date", raw);

            return Err(FilterError::InvalidDate(raw.to_string()));
        }
    };

    let mut formatted = String::new();

    if write!(formatted, "{}", date.format(&context.date_format)).is_err() {
        warn!("Date format `{}` can't be applied to a date", context.date_format);

        return Err(FilterError::InvalidDateFormat(context.date_format.clone()));
    }

    Ok(formatted)
}

/// Normalizes a value for the given operator, producing the text that follows
/// the operator code in a PostgREST filter.
pub fn convert_value(
    operator: FilterOperator,
    value: &Value,
    mode: ValueMode,
    context: &CompilerContext,
) -> Result<String, FilterError> {
    let rendered = value.to_string();
    let raw = rendered.trim();

    let converted = match operator {
        FilterOperator::Is => convert_is_value(raw),
        FilterOperator::In => convert_in_value(value, raw, mode),
        FilterOperator::Like | FilterOperator::Ilike => raw.replace(USER_WILDCARD, &SQL_WILDCARD.to_string()),
        FilterOperator::Cs | FilterOperator::Cd | FilterOperator::Ov => convert_containment_value(value, raw, mode),
        FilterOperator::Fts | FilterOperator::Plfts | FilterOperator::Phfts | FilterOperator::Wfts =>
            convert_full_text_value(raw, context),
        _ => match mode {
            ValueMode::Structured(TypeCategory::Date) => convert_date_value(value, raw, context)?,
            _ => raw.to_string(),
        },
    };

    trace!("Converted `{}` value `{}` to `{}`", operator, raw, converted);

    Ok(converted)
}

/// Renders `operator.value` for a single condition
pub fn convert_condition(
    condition: &FilterCondition,
    mode: ValueMode,
    context: &CompilerContext,
) -> Result<String, FilterError> {
    let value = convert_value(condition.operator, &condition.value, mode, context)?;

    Ok(condition.operator.render(&value))
}

/// Builds the parameter map from `(column, operator.value)` pairs: nothing for
/// no pairs, `column` for one, the logical operator wrapping all of them otherwise.
pub fn convert_filters(
    converted: Vec<(String, String)>,
    logical_operator: LogicalOperator,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    match converted.len() {
        0 => {},
        1 => {
            let (column, filter) = converted.into_iter().next().unwrap_or_default();

            params.insert(column, filter);
        },
        _ => {
            let joined = converted.iter()
                .map(|(column, filter)| format!("{}.{}", column, filter))
                .collect::<Vec<String>>()
                .join(&LIST_SEPARATOR.to_string());

            params.insert(
                logical_operator.param_name().to_string(),
                format!("({})", joined),
            );
        },
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn free_text(operator: FilterOperator, value: &str) -> String {
        convert_value(operator, &Value::from(value), ValueMode::FreeText, &CompilerContext::default()).unwrap()
    }

    fn structured(operator: FilterOperator, value: Value, category: TypeCategory) -> Result<String, FilterError> {
        convert_value(operator, &value, ValueMode::Structured(category), &CompilerContext::default())
    }

    #[test]
    fn test_is_literals() {
        assert_eq!(free_text(FilterOperator::Is, "NULL"), "null");
        assert_eq!(free_text(FilterOperator::Is, "Null"), "null");
        assert_eq!(free_text(FilterOperator::Is, "TRUE"), "true");
        assert_eq!(free_text(FilterOperator::Is, "False"), "false");
        assert_eq!(free_text(FilterOperator::Is, "unknown"), "unknown");
    }

    #[test]
    fn test_in_wrapping() {
        assert_eq!(free_text(FilterOperator::In, "1,2,3"), "(1,2,3)");
        assert_eq!(free_text(FilterOperator::In, "(1,2,3)"), "(1,2,3)");
        assert_eq!(free_text(FilterOperator::In, "a,\"b\""), "(a,\"b\")");
    }

    #[test]
    fn test_in_structured_quotes_text() {
        assert_eq!(
            structured(FilterOperator::In, Value::from("john, say \"hi\""), TypeCategory::Text).unwrap(),
            r#"("john","say \"hi\"")"#
        );
        assert_eq!(
            structured(FilterOperator::In, Value::from(vec![1i64, 2]), TypeCategory::Number).unwrap(),
            "(1,2)"
        );
        assert_eq!(
            structured(FilterOperator::In, Value::from("(1,2)"), TypeCategory::Number).unwrap(),
            "(1,2)"
        );
    }

    #[test]
    fn test_like_wildcards() {
        assert_eq!(free_text(FilterOperator::Like, "*Smith*"), "%Smith%");
        assert_eq!(free_text(FilterOperator::Ilike, "jo*"), "jo%");
    }

    #[test]
    fn test_containment_braces() {
        assert_eq!(free_text(FilterOperator::Cs, "sport,outdoor"), "{sport,outdoor}");
        assert_eq!(free_text(FilterOperator::Cs, "(sport,outdoor)"), "{sport,outdoor}");
        assert_eq!(free_text(FilterOperator::Cd, "{a,b}"), "{a,b}");
        assert_eq!(free_text(FilterOperator::Ov, "x"), "{x}");
    }

    #[test]
    fn test_containment_structured_json() {
        assert_eq!(
            structured(FilterOperator::Cs, Value::from(r#"["a", "b"]"#), TypeCategory::Array).unwrap(),
            "{a,b}"
        );
        assert_eq!(
            structured(FilterOperator::Cs, Value::from("5"), TypeCategory::Array).unwrap(),
            "{5}"
        );
        assert_eq!(
            structured(FilterOperator::Cs, Value::from("a, b ,c"), TypeCategory::Array).unwrap(),
            "{a,b,c}"
        );
        assert_eq!(
            structured(FilterOperator::Ov, Value::from(vec!["x", "y"]), TypeCategory::Array).unwrap(),
            "{x,y}"
        );
        assert_eq!(
            structured(FilterOperator::Cs, Value::Json(json!({"role": "admin"})), TypeCategory::Json).unwrap(),
            r#"{"role":"admin"}"#
        );
    }

    #[test]
    fn test_range_overlap_is_braced_like_free_text() {
        assert_eq!(
            structured(FilterOperator::Ov, Value::from("a,b"), TypeCategory::Range).unwrap(),
            free_text(FilterOperator::Ov, "a,b")
        );
        assert_eq!(
            structured(FilterOperator::Ov, Value::from("(1,10)"), TypeCategory::Range).unwrap(),
            "{1,10}"
        );
    }

    #[test]
    fn test_full_text_language() {
        assert_eq!(free_text(FilterOperator::Fts, "english:hello world"), "(english).hello world");
        assert_eq!(free_text(FilterOperator::Fts, "hello"), "(english).hello");
        assert_eq!(free_text(FilterOperator::Wfts, "french:a:b"), "(french).a:b");

        let context = CompilerContext::new("german".to_string(), "%Y-%m-%d".to_string(), true);
        assert_eq!(
            convert_value(FilterOperator::Plfts, &Value::from("hallo"), ValueMode::FreeText, &context).unwrap(),
            "(german).hallo"
        );
    }

    #[test]
    fn test_date_coercion() {
        assert_eq!(
            structured(FilterOperator::Gte, Value::from("2024-03-05T10:20:30Z"), TypeCategory::Date).unwrap(),
            "2024-03-05"
        );
        assert_eq!(
            structured(FilterOperator::Eq, Value::from("2024/03/05"), TypeCategory::Date).unwrap(),
            "2024-03-05"
        );
        assert_eq!(
            structured(
                FilterOperator::Lt,
                Value::Date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
                TypeCategory::Date
            ).unwrap(),
            "2023-12-31"
        );
        assert_eq!(
            structured(FilterOperator::Eq, Value::Int64(0), TypeCategory::Date).unwrap(),
            "1970-01-01"
        );
    }

    #[test]
    fn test_invalid_date() {
        assert!(matches!(
            structured(FilterOperator::Eq, Value::from("yesterday"), TypeCategory::Date),
            Err(FilterError::InvalidDate(value)) if value == "yesterday"
        ));
    }

    #[test]
    fn test_time_fields_in_date_format_blame_the_format() {
        let context = CompilerContext::new("english".to_string(), "%Y-%m-%d %H:%M".to_string(), true);

        let result = convert_value(
            FilterOperator::Eq,
            &Value::from("2024-03-05"),
            ValueMode::Structured(TypeCategory::Date),
            &context,
        );

        assert!(matches!(result, Err(FilterError::InvalidDateFormat(format)) if format == "%Y-%m-%d %H:%M"));
    }

    #[test]
    fn test_free_text_date_passes_through() {
        assert_eq!(free_text(FilterOperator::Eq, "2024-03-05T10:20:30Z"), "2024-03-05T10:20:30Z");
    }

    #[test]
    fn test_default_trims() {
        assert_eq!(free_text(FilterOperator::Eq, "  John "), "John");
    }

    #[test]
    fn test_convert_filters_shapes() {
        assert!(convert_filters(vec![], LogicalOperator::And).is_empty());

        let single = convert_filters(
            vec![("age".to_string(), "gt.30".to_string())],
            LogicalOperator::Or,
        );
        assert_eq!(single.get("age").map(String::as_str), Some("gt.30"));

        let combined = convert_filters(
            vec![
                ("name".to_string(), "eq.John".to_string()),
                ("age".to_string(), "gt.30".to_string()),
            ],
            LogicalOperator::Or,
        );
        assert_eq!(combined.len(), 1);
        assert_eq!(combined.get("or").map(String::as_str), Some("(name.eq.John,age.gt.30)"));
    }
}
