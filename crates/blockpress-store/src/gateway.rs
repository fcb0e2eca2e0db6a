//! The transactional boundary exposed to the surrounding application.
//!
//! HTTP handlers are external collaborators; they validate nothing and
//! call these four operations. Updates are last-writer-wins at the
//! replace-all level: whichever write applies last fully owns the block
//! graph.

use crate::{adapter, error::Error, table::Db};
use blockpress_core::{
    article::{Article, ArticleSummary, Category},
    block::Block,
    types::{Slug, SlugError, Timestamp, Ulid},
};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_LIMIT: usize = 10;
const MAX_PAGE_LIMIT: usize = 100;

///
/// ArticleInput
///
/// The create/update payload: article scalars plus the flat block array.
/// Section-grouped editors flatten before calling in.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub author: String,
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category_id: Option<Ulid>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

///
/// Pagination
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

///
/// ArticlePage
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<ArticleSummary>,
    pub pagination: Pagination,
}

///
/// ListFilter
///

#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    pub category: Option<Ulid>,
    pub search: Option<String>,
    /// 1-based page number; 0 is treated as 1.
    pub page: usize,
    /// Page size; 0 takes the default, larger values clamp to the cap.
    pub limit: usize,
}

///
/// Gateway
///
/// Session-style handle over one `Db`. `debug()` turns on operation
/// summaries for everything executed through this handle.
///

pub struct Gateway<'a> {
    db: &'a Db,
    debug: bool,
}

impl<'a> Gateway<'a> {
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db, debug: false }
    }

    /// Enable debug logging for operations executed through this handle.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn get_article(&self, id: Ulid) -> Result<Article, Error> {
        adapter::load(self.db, id)
    }

    pub fn get_article_by_slug(&self, slug: &str) -> Result<Article, Error> {
        adapter::load_by_slug(self.db, slug)
    }

    /// Filtered, paginated listing of lightweight summaries. The
    /// description comes from each article's first paragraph block only;
    /// no full flatten happens at listing scale.
    pub fn list_articles(&self, filter: &ListFilter) -> Result<ArticlePage, Error> {
        let needle = filter.search.as_deref().map(str::to_lowercase);

        let mut matched: Vec<Article> = Vec::new();
        for id in adapter::all_ids(self.db) {
            let article = adapter::load(self.db, id)?;

            if let Some(category) = filter.category
                && article.category.as_ref().map(|c| c.id) != Some(category)
            {
                continue;
            }
            if let Some(needle) = &needle
                && !matches_search(&article, needle)
            {
                continue;
            }

            matched.push(article);
        }

        // Newest first; id breaks created_at ties so pages are stable.
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let limit = match filter.limit {
            0 => DEFAULT_PAGE_LIMIT,
            n => n.min(MAX_PAGE_LIMIT),
        };
        let page = filter.page.max(1);
        let total = matched.len();
        let total_pages = total.div_ceil(limit);

        let articles: Vec<ArticleSummary> = matched
            .iter()
            .skip((page - 1) * limit)
            .take(limit)
            .map(Article::summary)
            .collect();

        self.debug_log(format!(
            "list: total={total} page={page} limit={limit} returned={}",
            articles.len()
        ));

        Ok(ArticlePage {
            articles,
            pagination: Pagination {
                total,
                page,
                limit,
                total_pages,
            },
        })
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Validate, derive the slug when none is supplied, and insert the
    /// full graph.
    pub fn create_article(&self, input: ArticleInput) -> Result<Article, Error> {
        self.validate_required(&input)?;
        let slug = self.resolve_slug(&input)?;

        let now = Timestamp::now();
        let article = Article {
            id: Ulid::nil(),
            title: input.title.trim().to_string(),
            slug,
            author: input.author.trim().to_string(),
            published_at: input.published_at.unwrap_or(now),
            cover_image: input.cover_image,
            category: self.resolve_category(input.category_id)?,
            created_at: now,
            updated_at: now,
            blocks: input.blocks,
        };

        let id = adapter::create(self.db, &article)?;
        self.debug_log(format!(
            "create: article={id} slug='{}' blocks={}",
            article.slug,
            article.blocks.len()
        ));

        adapter::load(self.db, id)
    }

    /// Replace-all update. Changing the slug to one owned by a different
    /// article is a conflict; keeping one's own slug is not.
    pub fn update_article(&self, id: Ulid, input: ArticleInput) -> Result<Article, Error> {
        let existing = adapter::load(self.db, id)?;
        self.validate_required(&input)?;
        let slug = self.resolve_slug(&input)?;

        if slug != existing.slug
            && let Some(owner) = adapter::find_id_by_slug(self.db, &slug)
            && owner != id
        {
            return Err(Error::conflict(slug.as_str()));
        }

        let article = Article {
            id,
            title: input.title.trim().to_string(),
            slug,
            author: input.author.trim().to_string(),
            published_at: input.published_at.unwrap_or(existing.published_at),
            cover_image: input.cover_image,
            category: self.resolve_category(input.category_id)?,
            created_at: existing.created_at,
            updated_at: Timestamp::now(),
            blocks: input.blocks,
        };

        adapter::replace(self.db, id, &article)?;
        self.debug_log(format!(
            "update: article={id} slug='{}' blocks={}",
            article.slug,
            article.blocks.len()
        ));

        adapter::load(self.db, id)
    }

    /// Delete the article; cascade semantics remove the whole graph.
    pub fn delete_article(&self, id: Ulid) -> Result<(), Error> {
        adapter::delete(self.db, id)?;
        self.debug_log(format!("delete: article={id}"));

        Ok(())
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn validate_required(&self, input: &ArticleInput) -> Result<(), Error> {
        if input.title.trim().is_empty() {
            return Err(Error::validation("title", "title must not be empty"));
        }
        if input.author.trim().is_empty() {
            return Err(Error::validation("author", "author must not be empty"));
        }

        Ok(())
    }

    fn resolve_slug(&self, input: &ArticleInput) -> Result<Slug, Error> {
        match &input.slug {
            Some(supplied) => Slug::parse(supplied)
                .map_err(|e| Error::validation("slug", e.to_string())),
            None => Slug::derive(&input.title).map_err(|e| match e {
                SlugError::Empty => {
                    Error::validation("slug", "cannot derive a slug from this title")
                }
                other => Error::validation("slug", other.to_string()),
            }),
        }
    }

    fn resolve_category(&self, category_id: Option<Ulid>) -> Result<Option<Category>, Error> {
        let Some(id) = category_id else {
            return Ok(None);
        };

        let label = self
            .db
            .category_label(id)
            .ok_or_else(|| Error::validation("categoryId", format!("unknown category {id}")))?;

        Ok(Some(Category { id, label }))
    }
}

fn matches_search(article: &Article, needle: &str) -> bool {
    if article.title.to_lowercase().contains(needle) {
        return true;
    }

    article
        .blocks
        .iter()
        .any(|b| b.content().to_lowercase().contains(needle))
}
