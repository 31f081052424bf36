//! Compiles table filters typed into a search box, or assembled with a filter
//! builder, into PostgREST query parameters.
//!
//! ```
//! use postgrest_filter::{Column, FilterCompiler, Table};
//!
//! let table = Table::new("people", vec![
//!     Column::new("age", "integer"),
//!     Column::new("name", "text"),
//! ]).unwrap();
//!
//! let compiled = FilterCompiler::new(table)
//!     .compile_text("name = 'John' AND age > 30")
//!     .unwrap();
//!
//! assert_eq!(compiled.params["and"], "(name.eq.John,age.gt.30)");
//! ```

pub mod compiler_context;
pub mod constant;
pub mod filter_builder;
pub mod query_parser;
pub mod types;
pub mod utils;

pub use compiler_context::CompilerContext;
pub use filter_builder::{FilterCompiler, FilterSource};
pub use query_parser::parse_query;
pub use types::category::TypeCategory;
pub use types::error::{ContextError, FilterError};
pub use types::filter::{CompiledFilter, FilterCondition, FilterOperator, FilterSet, LogicalOperator};
pub use types::table::{Column, Table};
pub use types::value::{Value, ValueKind};
pub use utils::category::resolve_category;
