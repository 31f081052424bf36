use std::collections::HashSet;
use log::error;
use serde::{Serialize, Deserialize};
use crate::types::category::TypeCategory;
use crate::types::error::FilterError;
use crate::types::filter::FilterOperator;
use crate::utils::category::resolve_category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Raw backend type name, e.g. `character varying` or `jsonb`
    #[serde(rename = "type")]
    pub type_: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Column {
        Self {
            name: name.into(),
            type_: type_.into(),
        }
    }

    pub fn category(&self) -> TypeCategory {
        resolve_category(&self.type_)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Deserialize)]
struct TableDefinition {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Table, FilterError> {
        let name = name.into();
        let mut seen: HashSet<&str> = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                error!("Table `{}` defines column `{}` more than once", name, column.name);

                return Err(FilterError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(
            Self {
                name,
                columns,
            }
        )
    }

    /// Reads a table definition as returned by the REST API:
    /// `{"name": "...", "columns": [{"name": "...", "type": "..."}]}`
    pub fn from_json(json: &str) -> anyhow::Result<Table> {
        let definition = serde_json::from_str::<TableDefinition>(json)?;

        Ok(Table::new(definition.name, definition.columns)?)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Operators a filter picker should offer for the column
    pub fn operators_for(&self, name: &str) -> Option<&'static [FilterOperator]> {
        self.get_column(name).map(|column| column.category().operators())
    }
}
