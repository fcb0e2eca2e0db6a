//! Relational schema adapter: the bidirectional mapping between the
//! article aggregate and normalized rows.
//!
//! Writes are replace-all: every existing block row and its cascade
//! children are deleted, then the incoming graph is recreated with
//! `order` recomputed from array position at every level. Caller-supplied
//! order values on stored rows are never trusted on the way back in.
//!
//! Every write runs in two phases. `prepare` builds the full target row
//! set and can fail; `apply` only inserts and removes and cannot. A
//! reader therefore observes either the old graph or the new one, never a
//! partial write.

use crate::{
    error::{Error, StoreError},
    row::{
        ArticleRow, BlockChildren, BlockRow, CustomFieldRow, IngredientItemRow, RatingRow,
        RowKind, StringRow,
    },
    table::{Db, Table},
};
use blockpress_core::{
    article::{Article, Category},
    block::Block,
    types::{Slug, Ulid},
};
use std::{cell::RefCell, collections::BTreeSet};

/// Load the full nested graph by article id.
pub fn load(db: &Db, id: Ulid) -> Result<Article, Error> {
    let row = db
        .articles
        .borrow()
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::not_found(format!("article {id}")))?;

    assemble(db, row)
}

/// Load the full nested graph by slug.
pub fn load_by_slug(db: &Db, slug: &str) -> Result<Article, Error> {
    let row = db
        .articles
        .borrow()
        .collect_where(|r| r.slug == slug)
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(format!("article slug '{slug}'")))?;

    assemble(db, row)
}

/// Id of the article owning the given slug, when one exists.
#[must_use]
pub fn find_id_by_slug(db: &Db, slug: &str) -> Option<Ulid> {
    db.articles
        .borrow()
        .ids_where(|r| r.slug == slug)
        .into_iter()
        .next()
}

/// All article ids, in key order.
#[must_use]
pub fn all_ids(db: &Db) -> Vec<Ulid> {
    db.articles.borrow().ids_where(|_| true)
}

/// Insert a new article plus its full block graph. Accept-if-present id
/// policy: a non-nil caller id is kept, a nil one gets a fresh Ulid.
pub fn create(db: &Db, article: &Article) -> Result<Ulid, Error> {
    if find_id_by_slug(db, &article.slug).is_some() {
        return Err(Error::conflict(article.slug.as_str()));
    }

    let id = accept_or_generate(article.id);
    let prepared = prepare(article, id);
    apply(db, &[], prepared);

    Ok(id)
}

/// Replace-all write: delete every existing block row (cascading its
/// children), update the article scalars, and recreate the incoming
/// graph.
pub fn replace(db: &Db, id: Ulid, article: &Article) -> Result<(), Error> {
    if !db.articles.borrow().contains_key(&id) {
        return Err(Error::not_found(format!("article {id}")));
    }
    if let Some(owner) = find_id_by_slug(db, &article.slug)
        && owner != id
    {
        return Err(Error::conflict(article.slug.as_str()));
    }

    let old_block_ids = db.blocks.borrow().ids_where(|b| b.article_id == id);
    let prepared = prepare(article, id);
    apply(db, &old_block_ids, prepared);

    Ok(())
}

/// Delete the article row and cascade the whole block graph.
pub fn delete(db: &Db, id: Ulid) -> Result<(), Error> {
    if !db.articles.borrow().contains_key(&id) {
        return Err(Error::not_found(format!("article {id}")));
    }

    let block_ids = db.blocks.borrow().ids_where(|b| b.article_id == id);
    remove_blocks(db, &block_ids);
    db.articles.borrow_mut().remove(&id);

    Ok(())
}

// ---------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------

fn assemble(db: &Db, row: ArticleRow) -> Result<Article, Error> {
    let mut block_rows = db
        .blocks
        .borrow()
        .collect_where(|b| b.article_id == row.id);
    block_rows.sort_by_key(|b| (b.order, b.id));

    let mut blocks = Vec::with_capacity(block_rows.len());
    for block_row in block_rows {
        let children = load_children(db, block_row.id)?;
        let body = block_row.decode(&children)?;
        blocks.push(Block {
            id: block_row.id,
            body,
        });
    }

    let category = row.category_id.map(|category_id| Category {
        id: category_id,
        label: db.category_label(category_id).unwrap_or_default(),
    });

    Ok(Article {
        id: row.id,
        title: row.title,
        slug: Slug::parse(&row.slug).map_err(|e| {
            StoreError::corrupt(format!("article {} has invalid slug column: {e}", row.id))
        })?,
        author: row.author,
        published_at: row.published_at,
        cover_image: row.cover_image,
        category,
        created_at: row.created_at,
        updated_at: row.updated_at,
        blocks,
    })
}

fn load_children(db: &Db, block_id: Ulid) -> Result<BlockChildren, StoreError> {
    let sorted = |mut rows: Vec<StringRow>| {
        rows.sort_by_key(|r| (r.order, r.id));
        rows
    };

    let mut ingredient_items = db
        .ingredient_items
        .borrow()
        .collect_where(|r| r.block_id == block_id);
    ingredient_items.sort_by_key(|r| (r.number, r.id));

    let ratings = db.ratings.borrow().collect_where(|r| r.block_id == block_id);
    if ratings.len() > 1 {
        return Err(StoreError::invariant(format!(
            "block {block_id} has {} rating rows, at most one is allowed",
            ratings.len()
        )));
    }

    Ok(BlockChildren {
        rating: ratings.into_iter().next(),
        pros: sorted(db.pros.borrow().collect_where(|r| r.block_id == block_id)),
        cons: sorted(db.cons.borrow().collect_where(|r| r.block_id == block_id)),
        ingredients: sorted(
            db.ingredients
                .borrow()
                .collect_where(|r| r.block_id == block_id),
        ),
        highlights: sorted(
            db.highlights
                .borrow()
                .collect_where(|r| r.block_id == block_id),
        ),
        custom_fields: db
            .custom_fields
            .borrow()
            .collect_where(|r| r.block_id == block_id),
        ingredient_items,
    })
}

// ---------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------

struct PreparedGraph {
    article: ArticleRow,
    blocks: Vec<BlockRow>,
    ratings: Vec<RatingRow>,
    pros: Vec<StringRow>,
    cons: Vec<StringRow>,
    ingredients: Vec<StringRow>,
    highlights: Vec<StringRow>,
    custom_fields: Vec<CustomFieldRow>,
    ingredient_items: Vec<IngredientItemRow>,
}

fn accept_or_generate(id: Ulid) -> Ulid {
    if id.is_nil() { Ulid::generate() } else { id }
}

/// Build the complete target row set. Block `order` is the array index;
/// a block id already used earlier in the same write gets a fresh one so
/// a duplicated-but-not-reminted section cannot drop blocks.
#[allow(clippy::cast_possible_truncation)]
fn prepare(article: &Article, article_id: Ulid) -> PreparedGraph {
    let mut seen = BTreeSet::new();
    let mut graph = PreparedGraph {
        article: ArticleRow {
            id: article_id,
            title: article.title.clone(),
            slug: article.slug.as_str().to_string(),
            author: article.author.clone(),
            published_at: article.published_at,
            cover_image: article.cover_image.clone(),
            category_id: article.category.as_ref().map(|c| c.id),
            created_at: article.created_at,
            updated_at: article.updated_at,
        },
        blocks: Vec::with_capacity(article.blocks.len()),
        ratings: Vec::new(),
        pros: Vec::new(),
        cons: Vec::new(),
        ingredients: Vec::new(),
        highlights: Vec::new(),
        custom_fields: Vec::new(),
        ingredient_items: Vec::new(),
    };

    for (index, block) in article.blocks.iter().enumerate() {
        let mut block_id = accept_or_generate(block.id);
        if !seen.insert(block_id) {
            block_id = Ulid::generate();
            seen.insert(block_id);
        }

        let (row, children) = BlockRow::encode(block_id, article_id, index as u32, &block.body);
        graph.blocks.push(row);
        graph.ratings.extend(children.rating);
        graph.pros.extend(children.pros);
        graph.cons.extend(children.cons);
        graph.ingredients.extend(children.ingredients);
        graph.highlights.extend(children.highlights);
        graph.custom_fields.extend(children.custom_fields);
        graph.ingredient_items.extend(children.ingredient_items);
    }

    graph
}

/// Infallible apply phase: cascade-remove the old block graph, then
/// insert every prepared row.
fn apply(db: &Db, old_block_ids: &[Ulid], prepared: PreparedGraph) {
    remove_blocks(db, old_block_ids);

    db.articles.borrow_mut().put(prepared.article);
    let mut blocks = db.blocks.borrow_mut();
    for row in prepared.blocks {
        blocks.put(row);
    }
    drop(blocks);

    let mut ratings = db.ratings.borrow_mut();
    for row in prepared.ratings {
        ratings.put(row);
    }
    drop(ratings);

    put_strings(&db.pros, prepared.pros);
    put_strings(&db.cons, prepared.cons);
    put_strings(&db.ingredients, prepared.ingredients);
    put_strings(&db.highlights, prepared.highlights);

    let mut custom_fields = db.custom_fields.borrow_mut();
    for row in prepared.custom_fields {
        custom_fields.put(row);
    }
    drop(custom_fields);

    let mut ingredient_items = db.ingredient_items.borrow_mut();
    for row in prepared.ingredient_items {
        ingredient_items.put(row);
    }
}

fn put_strings(table: &RefCell<Table<StringRow>>, rows: Vec<StringRow>) {
    let mut table = table.borrow_mut();
    for row in rows {
        table.put(row);
    }
}

/// Remove block rows and every child row they own.
fn remove_blocks(db: &Db, block_ids: &[Ulid]) {
    if block_ids.is_empty() {
        return;
    }
    let owned = |block_id: &Ulid| block_ids.contains(block_id);

    let mut blocks = db.blocks.borrow_mut();
    for id in block_ids {
        blocks.remove(id);
    }
    drop(blocks);

    remove_where(&db.ratings, |r: &RatingRow| owned(&r.block_id));
    remove_where(&db.pros, |r: &StringRow| owned(&r.block_id));
    remove_where(&db.cons, |r: &StringRow| owned(&r.block_id));
    remove_where(&db.ingredients, |r: &StringRow| owned(&r.block_id));
    remove_where(&db.highlights, |r: &StringRow| owned(&r.block_id));
    remove_where(&db.custom_fields, |r: &CustomFieldRow| owned(&r.block_id));
    remove_where(&db.ingredient_items, |r: &IngredientItemRow| {
        owned(&r.block_id)
    });
}

fn remove_where<R: RowKind>(table: &RefCell<Table<R>>, matches: impl Fn(&R) -> bool) {
    let mut table = table.borrow_mut();
    let doomed = table.ids_where(matches);
    for id in doomed {
        table.remove(&id);
    }
}

///
/// TESTS
///
