use log::{debug, trace, warn};
use serde::Serialize;
use crate::compiler_context::CompilerContext;
use crate::query_parser::parse_query;
use crate::types::error::FilterError;
use crate::types::filter::{CompiledFilter, FilterCondition, FilterOperator, FilterSet};
use crate::types::table::Table;
use crate::utils::convert::{convert_condition, convert_filters, ValueMode};

/// Which front-end produced a compiled filter, so it can be rebuilt the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterSource {
    FreeText,
    Structured,
}

pub struct FilterCompiler {
    table: Table,
    context: CompilerContext,
}

impl FilterCompiler {
    pub fn new(table: Table) -> Self {
        FilterCompiler::with_context(table, CompilerContext::default())
    }

    pub fn with_context(table: Table, context: CompilerContext) -> Self {
        FilterCompiler {
            table,
            context,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn context(&self) -> &CompilerContext {
        &self.context
    }

    pub fn operators_for(&self, column: &str) -> Option<&'static [FilterOperator]> {
        self.table.operators_for(column)
    }

    /// Compiles a search typed into the query box
    pub fn compile_text(&self, query: &str) -> Result<CompiledFilter, FilterError> {
        let filter_set = parse_query(query, &self.table)?;

        self.compile_set(&filter_set, FilterSource::FreeText)
    }

    /// Compiles conditions assembled with the filter builder
    pub fn compile(&self, filter_set: &FilterSet) -> Result<CompiledFilter, FilterError> {
        self.compile_set(filter_set, FilterSource::Structured)
    }

    /// Drops one condition, e.g. when its badge is dismissed, and compiles the rest.
    /// An index past the last condition is an error and nothing is recompiled.
    pub fn remove_condition(
        &self,
        compiled: &CompiledFilter,
        source: FilterSource,
        index: usize,
    ) -> Result<CompiledFilter, FilterError> {
        let mut filter_set = compiled.to_filter_set();

        if index >= filter_set.conditions.len() {
            warn!("No condition at index {} to remove, {} present", index, filter_set.conditions.len());

            return Err(FilterError::ConditionIndexOutOfRange {
                index,
                len: filter_set.conditions.len(),
            });
        }

        let removed = filter_set.conditions.remove(index);
        debug!("Removed condition {}: {}", index, removed.describe());

        self.compile_set(&filter_set, source)
    }

    fn value_mode(&self, condition: &FilterCondition, source: FilterSource) -> Result<ValueMode, FilterError> {
        let column = self.table.get_column(&condition.column)
            .ok_or_else(|| FilterError::UnknownColumn(condition.column.clone()))?;

        if source == FilterSource::FreeText {
            return Ok(ValueMode::FreeText);
        }

        let category = column.category();

        if self.context.enforce_operator_gating && !category.allows(condition.operator) {
            return Err(FilterError::OperatorNotAllowed {
                column: column.name.clone(),
                operator: condition.operator,
                category,
            });
        }

        Ok(ValueMode::Structured(category))
    }

    fn compile_set(&self, filter_set: &FilterSet, source: FilterSource) -> Result<CompiledFilter, FilterError> {
        let mut converted: Vec<(String, String)> = Vec::with_capacity(filter_set.len());

        for condition in &filter_set.conditions {
            trace!("Compiling condition: {}", condition.describe());

            let mode = self.value_mode(condition, source)?;

            converted.push((
                condition.column.clone(),
                convert_condition(condition, mode, &self.context)?,
            ));
        }

        let params = convert_filters(converted, filter_set.logical_operator);

        debug!("Compiled {} condition(s) on table {} into {:?}", filter_set.len(), self.table.name, params);

        Ok(
            CompiledFilter {
                params,
                conditions: filter_set.conditions.clone(),
                logical_operator: filter_set.logical_operator,
            }
        )
    }
}
