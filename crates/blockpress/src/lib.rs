//! Blockpress: block-document articles over a relational store.
//!
//! ## Crate layout
//! - `core`: the pure domain model (block registry, article aggregate,
//!   sections, and read-side projections).
//! - `store`: rows, tables, the schema adapter, and the persistence
//!   gateway.
//!
//! The `prelude` module mirrors the surface an embedding application
//! needs: build a [`store::Db`], wrap it in a [`store::Gateway`], and
//! move blocks in and out through the projections in `core`.

pub use blockpress_core as core;
pub use blockpress_store as store;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        Article, ArticleSummary, Block, BlockBody, BlockKind, Category, CustomField, HeadingLevel,
        IngredientItem, LegacyArticle, ListStyle, Ratings, Section, Slug, Timestamp, Ulid,
        editable_blocks, field_name, flatten_sections, group_into_sections, legacy_article,
    };
    pub use crate::store::{
        ArticleInput, ArticlePage, Db, Error, ErrorClass, Gateway, ListFilter, Pagination,
    };
}
