pub const AND_PARAM_NAME: &str = "and";
pub const OR_PARAM_NAME: &str = "or";

pub const DEFAULT_FTS_LANGUAGE: &str = "english";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub const NULL_LITERAL: &str = "null";
pub const TRUE_LITERAL: &str = "true";
pub const FALSE_LITERAL: &str = "false";

pub const USER_WILDCARD: char = '*';
pub const SQL_WILDCARD: char = '%';

pub const FTS_LANGUAGE_SEPARATOR: char = ':';
pub const LIST_SEPARATOR: char = ',';
