//! In-memory typed tables.
//!
//! One `Table<R>` per row type, keyed by row id in a `BTreeMap`. Tables
//! sit behind `RefCell` inside `Db`; the adapter's prepare phase never
//! borrows them mutably, and the apply phase performs only infallible
//! inserts and removes, so a failed write leaves every table untouched.

use crate::row::{
    ArticleRow, BlockRow, CategoryRow, CustomFieldRow, IngredientItemRow, RatingRow, RowKind,
    StringRow,
};
use blockpress_core::types::Ulid;
use derive_more::{Deref, DerefMut};
use std::{cell::RefCell, collections::BTreeMap};

///
/// Table
///

#[derive(Debug, Deref, DerefMut)]
pub struct Table<R: RowKind>(BTreeMap<Ulid, R>);

impl<R: RowKind> Table<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a row under its own id, replacing any previous row.
    pub fn put(&mut self, row: R) {
        self.0.insert(row.id(), row);
    }

    /// All rows matching the foreign-key predicate, in key order.
    pub fn collect_where(&self, keep: impl Fn(&R) -> bool) -> Vec<R> {
        self.0.values().filter(|r| keep(r)).cloned().collect()
    }

    /// Ids of all rows matching the predicate.
    pub fn ids_where(&self, keep: impl Fn(&R) -> bool) -> Vec<Ulid> {
        self.0
            .values()
            .filter(|r| keep(r))
            .map(RowKind::id)
            .collect()
    }
}

impl<R: RowKind> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

///
/// Db
///
/// The relational schema: one table per persisted row type. Single-writer
/// semantics; every gateway operation runs to completion before another
/// starts.
///

#[derive(Debug, Default)]
pub struct Db {
    pub articles: RefCell<Table<ArticleRow>>,
    pub categories: RefCell<Table<CategoryRow>>,
    pub blocks: RefCell<Table<BlockRow>>,
    pub ratings: RefCell<Table<RatingRow>>,
    pub pros: RefCell<Table<StringRow>>,
    pub cons: RefCell<Table<StringRow>>,
    pub ingredients: RefCell<Table<StringRow>>,
    pub highlights: RefCell<Table<StringRow>>,
    pub custom_fields: RefCell<Table<CustomFieldRow>>,
    pub ingredient_items: RefCell<Table<IngredientItemRow>>,
}

impl Db {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category and return its row.
    pub fn insert_category(&self, label: impl Into<String>) -> CategoryRow {
        let row = CategoryRow {
            id: Ulid::generate(),
            label: label.into(),
        };
        self.categories.borrow_mut().put(row.clone());

        row
    }

    #[must_use]
    pub fn category_label(&self, id: Ulid) -> Option<String> {
        self.categories
            .borrow()
            .get(&id)
            .map(|row| row.label.clone())
    }

    /// Total rows across every child table for the given block ids.
    /// Diagnostic surface used by cascade tests.
    #[must_use]
    pub fn child_row_count(&self, block_ids: &[Ulid]) -> usize {
        let of = |id: &Ulid| block_ids.contains(id);

        self.ratings.borrow().ids_where(|r| of(&r.block_id)).len()
            + self.pros.borrow().ids_where(|r| of(&r.block_id)).len()
            + self.cons.borrow().ids_where(|r| of(&r.block_id)).len()
            + self
                .ingredients
                .borrow()
                .ids_where(|r| of(&r.block_id))
                .len()
            + self
                .highlights
                .borrow()
                .ids_where(|r| of(&r.block_id))
                .len()
            + self
                .custom_fields
                .borrow()
                .ids_where(|r| of(&r.block_id))
                .len()
            + self
                .ingredient_items
                .borrow()
                .ids_where(|r| of(&r.block_id))
                .len()
    }
}

///
/// TESTS
///
