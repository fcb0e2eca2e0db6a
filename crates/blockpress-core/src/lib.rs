//! Blockpress core: the block-document data model.
//!
//! ## Crate layout
//! - `types`: shared scalar types (Ulid, Timestamp, Slug).
//! - `block`: the closed block-type registry and the tagged block union.
//! - `article`: the article aggregate and listing summary projection.
//! - `section`: editor-only section grouping over the flat block list.
//! - `assemble`: read-side projections (editable blocks, legacy
//!   flattened article).
//!
//! Everything here is pure: no storage, no I/O. The relational adapter
//! and persistence gateway live in `blockpress-store`.

pub mod article;
pub mod assemble;
pub mod block;
pub mod section;
pub mod types;

pub use article::{Article, ArticleSummary, Category};
pub use assemble::{
    CustomerReview, FaqEntry, LegacyArticle, ManufacturerInfo, Pricing, editable_blocks,
    legacy_article,
};
pub use block::{
    Block, BlockBody, BlockKind, BlockKindError, CustomField, HeadingLevel, IngredientItem,
    ListStyle, Ratings, field_name,
};
pub use section::{
    Section, duplicate_section, flatten_sections, group_into_sections, move_section_down,
    move_section_up, remove_section,
};
pub use types::{Slug, SlugError, Timestamp, TimestampError, Ulid};
