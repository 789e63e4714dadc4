mod inspector;
mod table;

pub use inspector::{browse_query, SchemaInspector, BROWSE_LIMIT};
pub use table::{ColumnDefinition, TableSummary};
