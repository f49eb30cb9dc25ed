// ABOUTME: Dump/restore engine
// ABOUTME: Value encoding, schema introspection, script assembly, batch splitting and import

pub mod batch;
pub mod dump;
pub mod restore;
pub mod schema;
pub mod value;

pub use batch::{BatchSplitter, SeparatorSplitter, SEPARATOR};
pub use dump::{assemble_script, dump_database, DumpSummary};
pub use restore::{
    ensure_database, execute_batches, import_script, import_script_with, retarget_script,
    BatchFailure, ImportReport,
};
pub use schema::{list_columns, list_databases, list_tables, ColumnInfo, TableInfo};
pub use value::{encode_literal, Row, Value};
