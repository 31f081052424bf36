use std::fs::File;
use std::path::PathBuf;
use std::io::Read;
use serde::Deserialize;
use validator::Validate;
use crate::constant::{DEFAULT_DATE_FORMAT, DEFAULT_FTS_LANGUAGE};
use crate::types::error::ContextError;

#[derive(Clone, Deserialize, Validate, Debug, PartialEq)]
#[serde(default)]
pub struct CompilerContext {
    /// Text search configuration used when a full-text value has no `lang:` prefix
    #[validate(length(min = 1))]
    pub default_fts_language: String,
    /// chrono format applied to date column values
    #[validate(length(min = 1))]
    pub date_format: String,
    /// Reject structured conditions whose operator is not offered for the column type
    pub enforce_operator_gating: bool,
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self {
            default_fts_language: DEFAULT_FTS_LANGUAGE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            enforce_operator_gating: true,
        }
    }
}

impl CompilerContext {
    pub fn new(
        default_fts_language: String,
        date_format: String,
        enforce_operator_gating: bool,
    ) -> CompilerContext {
        Self {
            default_fts_language,
            date_format,
            enforce_operator_gating,
        }
    }

    pub fn from_yaml(contents: &str) -> Result<CompilerContext, ContextError> {
        let context = serde_yaml::from_str::<CompilerContext>(contents)?;

        context.validate()?;

        Ok(context)
    }

    pub fn read_from_file(config_path: PathBuf) -> Result<CompilerContext, ContextError> {
        if !config_path.exists() {
            return Err(ContextError::ConfigIsNotExist(config_path.display().to_string()));
        }

        let mut file = File::open(config_path)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        CompilerContext::from_yaml(contents.as_str())
    }
}
