use crate::{
    block::{Block, BlockBody},
    types::{Slug, Timestamp, Ulid},
};
use serde::{Deserialize, Serialize};

/// Char budget for the listing description sourced from the first
/// paragraph block.
const SUMMARY_DESCRIPTION_CHARS: usize = 300;

///
/// Category
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Category {
    pub id: Ulid,
    pub label: String,
}

///
/// Article
///
/// Top-level aggregate: scalar fields plus the ordered block list. Block
/// order is Vec position; the stored `order` column is derived from it on
/// every write.
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Ulid,
    pub title: String,
    pub slug: Slug,
    pub author: String,
    pub published_at: Timestamp,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Article {
    /// Lightweight listing projection. Scans for the first paragraph
    /// block only, never the full graph.
    #[must_use]
    pub fn summary(&self) -> ArticleSummary {
        let description = self
            .blocks
            .iter()
            .find_map(|block| match &block.body {
                BlockBody::Paragraph { content } => Some(truncate_chars(
                    content,
                    SUMMARY_DESCRIPTION_CHARS,
                )),
                _ => None,
            })
            .unwrap_or_default();

        ArticleSummary {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            category: self
                .category
                .as_ref()
                .map(|c| c.label.clone())
                .unwrap_or_default(),
            description,
            cover_image: self.cover_image.clone().unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

///
/// ArticleSummary
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: Ulid,
    pub title: String,
    pub slug: Slug,
    pub category: String,
    pub description: String,
    pub cover_image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Truncate on a char boundary, never mid code point.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn article_with(blocks: Vec<Block>) -> Article {
        Article {
            id: Ulid::generate(),
            title: "Omega-3 Review".to_string(),
            slug: Slug::parse("omega-3-review").expect("slug"),
            author: "Jane".to_string(),
            published_at: Timestamp::from_seconds(1_700_000_000),
            cover_image: None,
            category: None,
            created_at: Timestamp::from_seconds(1_700_000_000),
            updated_at: Timestamp::from_seconds(1_700_000_000),
            blocks,
        }
    }

    #[test]
    fn summary_takes_first_paragraph_only() {
        let mut heading = Block::new(BlockKind::Heading);
        heading.body = BlockBody::Heading {
            level: crate::block::HeadingLevel::Two,
            content: "Overview".to_string(),
        };
        let first = Block::with_body(BlockBody::Paragraph {
            content: "first".to_string(),
        });
        let second = Block::with_body(BlockBody::Paragraph {
            content: "second".to_string(),
        });

        let summary = article_with(vec![heading, first, second]).summary();
        assert_eq!(summary.description, "first");
    }

    #[test]
    fn summary_defaults_when_no_paragraph() {
        let summary = article_with(vec![Block::new(BlockKind::Divider)]).summary();

        assert_eq!(summary.description, "");
        assert_eq!(summary.category, "");
        assert_eq!(summary.cover_image, "");
    }

    #[test]
    fn summary_truncates_on_char_boundary() {
        let long = "é".repeat(400);
        let article = article_with(vec![Block::with_body(BlockBody::Paragraph {
            content: long,
        })]);

        let summary = article.summary();
        assert_eq!(summary.description.chars().count(), 300);
    }
}
