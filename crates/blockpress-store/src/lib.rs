//! Blockpress store: relational persistence for the block document model.
//!
//! ## Crate layout
//! - `row`: persisted row shapes and the wide-row encode/decode for the
//!   block table.
//! - `table`: typed in-memory tables and the `Db` schema.
//! - `adapter`: the relational schema adapter, graph reads and
//!   replace-all writes with storage-side order recomputation.
//! - `gateway`: the operation boundary (create/update/delete/list) with
//!   validation and slug-conflict checks.
//! - `error`: the gateway-facing error taxonomy.

pub mod adapter;
pub mod error;
pub mod gateway;
pub mod row;
pub mod table;

pub use error::{Error, ErrorClass, StoreError};
pub use gateway::{ArticleInput, ArticlePage, Gateway, ListFilter, Pagination};
pub use table::{Db, Table};
