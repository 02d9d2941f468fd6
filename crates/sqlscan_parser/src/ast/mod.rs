pub mod create_table;
pub use create_table::*;
pub mod query;
pub use query::*;
