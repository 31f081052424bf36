use log::trace;
use crate::types::category::TypeCategory;

const NUMBER_TYPE_TOKENS: &[&str] = &[
    "smallint", "integer", "bigint", "int2", "int4", "int8",
    "numeric", "decimal", "real", "double precision", "float4", "float8",
    "smallserial", "bigserial", "serial", "money",
];

const TEXT_TYPE_TOKENS: &[&str] = &[
    "char", "text", "uuid", "name",
];

const DATE_TYPE_TOKENS: &[&str] = &[
    "timestamp", "date", "time", "interval",
];

const BOOLEAN_TYPE_TOKENS: &[&str] = &[
    "bool",
];

const JSON_TYPE_TOKENS: &[&str] = &[
    "json",
];

const ARRAY_TYPE_TOKENS: &[&str] = &[
    "array", "[]",
];

const RANGE_TYPE_TOKENS: &[&str] = &[
    "range",
];

// Checked in this order, the first category with a matching token wins
const CATEGORY_PRIORITY: &[(TypeCategory, &[&str])] = &[
    (TypeCategory::Number, NUMBER_TYPE_TOKENS),
    (TypeCategory::Text, TEXT_TYPE_TOKENS),
    (TypeCategory::Date, DATE_TYPE_TOKENS),
    (TypeCategory::Boolean, BOOLEAN_TYPE_TOKENS),
    (TypeCategory::Json, JSON_TYPE_TOKENS),
    (TypeCategory::Array, ARRAY_TYPE_TOKENS),
    (TypeCategory::Range, RANGE_TYPE_TOKENS),
];

pub fn resolve_category(type_name: &str) -> TypeCategory {
    let type_name = type_name.to_lowercase();

    for (category, tokens) in CATEGORY_PRIORITY {
        if tokens.iter().any(|token| type_name.contains(token)) {
            trace!("Column type `{}` resolved to {}", type_name, category);

            return *category;
        }
    }

    trace!("Column type `{}` is unknown, using text", type_name);

    TypeCategory::Text
}
