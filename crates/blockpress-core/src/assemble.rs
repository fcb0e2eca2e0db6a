//! Read-side projections over the canonical block graph.
//!
//! Both views are derived on demand and never persisted; the block list
//! stays the single source of truth. The legacy flattened view exists for
//! renderers predating the block model and is total: every field carries
//! its documented default when no matching block or custom field exists.

use crate::{
    article::Article,
    block::{Block, BlockBody, IngredientItem, field_name},
};
use serde::{Deserialize, Serialize};

///
/// Pricing
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub single_bottle: String,
    pub three_bottles: String,
    pub six_bottles: String,
}

///
/// ManufacturerInfo
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerInfo {
    pub name: String,
    pub location: String,
    pub description: String,
}

///
/// FaqEntry
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

///
/// CustomerReview
///

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReview {
    pub reviewer: String,
    pub location: String,
    pub rating: f64,
    pub review_title: String,
    pub content: String,
}

///
/// LegacyArticle
///
/// The flattened single-object article shape. Read-only, regenerated
/// from the block list on every call.
///

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyArticle {
    pub overview: String,
    pub description: String,
    pub how_to_take: String,
    pub safety: String,
    pub effectiveness: String,
    pub how_it_works: String,
    pub conclusion: String,
    pub official_website: String,

    pub overall_rating: f64,
    pub ingredients_rating: f64,
    pub value_rating: f64,
    pub manufacturer_rating: f64,
    pub safety_rating: f64,

    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub brand_highlights: Vec<String>,
    pub key_ingredients: Vec<String>,

    pub pricing: Pricing,
    pub manufacturer_info: ManufacturerInfo,

    pub ingredients: Vec<IngredientItem>,
    pub faqs: Vec<FaqEntry>,
    pub customer_reviews: Vec<CustomerReview>,
}

/// The flat editor shape. The canonical model already is this shape; the
/// function is the documented seam between storage reads and the editor.
#[must_use]
pub fn editable_blocks(article: &Article) -> Vec<Block> {
    article.blocks.clone()
}

/// Project the legacy flattened view from the block list.
#[must_use]
pub fn legacy_article(article: &Article) -> LegacyArticle {
    let blocks = &article.blocks;

    let ratings = blocks.iter().find_map(|b| b.body.ratings());

    LegacyArticle {
        overview: first_content(blocks, |b| matches!(b, BlockBody::Overview { .. })),
        description: first_content(blocks, |b| matches!(b, BlockBody::Description { .. })),
        how_to_take: first_content(blocks, |b| matches!(b, BlockBody::HowToTake { .. })),
        safety: first_content(blocks, |b| matches!(b, BlockBody::Safety { .. })),
        effectiveness: first_content(blocks, |b| matches!(b, BlockBody::Effectiveness { .. })),
        how_it_works: first_content(blocks, |b| matches!(b, BlockBody::HowItWorks { .. })),
        conclusion: first_content(blocks, |b| matches!(b, BlockBody::Conclusion { .. })),
        official_website: first_content(blocks, |b| {
            matches!(b, BlockBody::OfficialWebsite { .. })
        }),

        overall_rating: blocks
            .iter()
            .find_map(|b| match &b.body {
                BlockBody::ProductReview { overall_rating, .. } => Some(*overall_rating),
                _ => None,
            })
            .unwrap_or(0.0),
        ingredients_rating: ratings.map_or(0.0, |r| r.ingredients),
        value_rating: ratings.map_or(0.0, |r| r.value),
        manufacturer_rating: ratings.map_or(0.0, |r| r.manufacturer),
        safety_rating: ratings.map_or(0.0, |r| r.safety),

        pros: collect_strings(blocks, BlockBody::pros),
        cons: collect_strings(blocks, BlockBody::cons),
        brand_highlights: collect_strings(blocks, BlockBody::highlights),
        key_ingredients: collect_strings(blocks, BlockBody::ingredients),

        pricing: Pricing {
            single_bottle: first_field(blocks, field_name::SINGLE_BOTTLE_PRICE),
            three_bottles: first_field(blocks, field_name::THREE_BOTTLE_PRICE),
            six_bottles: first_field(blocks, field_name::SIX_BOTTLE_PRICE),
        },
        manufacturer_info: ManufacturerInfo {
            name: first_field(blocks, field_name::MANUFACTURER_NAME),
            location: first_field(blocks, field_name::MANUFACTURER_LOCATION),
            description: first_field(blocks, field_name::MANUFACTURER_DESCRIPTION),
        },

        ingredients: blocks
            .iter()
            .filter_map(|b| b.body.ingredient_items())
            .flatten()
            .cloned()
            .collect(),
        faqs: blocks
            .iter()
            .filter_map(|b| match &b.body {
                BlockBody::Faq { custom_fields } => Some(FaqEntry {
                    question: field(custom_fields, field_name::QUESTION),
                    answer: field(custom_fields, field_name::ANSWER),
                }),
                _ => None,
            })
            .collect(),
        customer_reviews: blocks
            .iter()
            .filter_map(|b| match &b.body {
                BlockBody::Review {
                    content,
                    custom_fields,
                } => Some(CustomerReview {
                    reviewer: field(custom_fields, field_name::REVIEWER_NAME),
                    location: field(custom_fields, field_name::REVIEWER_LOCATION),
                    rating: field(custom_fields, field_name::RATING)
                        .parse()
                        .unwrap_or(0.0),
                    review_title: field(custom_fields, field_name::REVIEW_TITLE),
                    content: content.clone(),
                }),
                _ => None,
            })
            .collect(),
    }
}

/// Content of the first block matching the predicate, else empty.
fn first_content(blocks: &[Block], matches: impl Fn(&BlockBody) -> bool) -> String {
    blocks
        .iter()
        .find(|b| matches(&b.body))
        .map(|b| b.content().to_string())
        .unwrap_or_default()
}

/// Concatenate an array field across all blocks that carry it, per-block
/// order then block order.
fn collect_strings(
    blocks: &[Block],
    select: impl Fn(&BlockBody) -> Option<&[String]>,
) -> Vec<String> {
    blocks
        .iter()
        .filter_map(|b| select(&b.body))
        .flatten()
        .cloned()
        .collect()
}

/// First custom field with the given name across all blocks, else empty.
fn first_field(blocks: &[Block], name: &str) -> String {
    blocks
        .iter()
        .filter_map(|b| b.body.custom_fields())
        .flatten()
        .find(|f| f.name == name && !f.value.is_empty())
        .map(|f| f.value.clone())
        .unwrap_or_default()
}

fn field(fields: &[crate::block::CustomField], name: &str) -> String {
    fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.value.clone())
        .unwrap_or_default()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        block::{BlockKind, CustomField, Ratings},
        types::{Slug, Timestamp, Ulid},
    };

    fn article_with(blocks: Vec<Block>) -> Article {
        Article {
            id: Ulid::generate(),
            title: "Test".to_string(),
            slug: Slug::parse("test").expect("slug"),
            author: "Jane".to_string(),
            published_at: Timestamp::EPOCH,
            cover_image: None,
            category: None,
            created_at: Timestamp::EPOCH,
            updated_at: Timestamp::EPOCH,
            blocks,
        }
    }

    #[test]
    fn empty_article_yields_all_defaults() {
        let legacy = legacy_article(&article_with(Vec::new()));

        assert_eq!(legacy.overview, "");
        assert_eq!(legacy.overall_rating, 0.0);
        assert_eq!(legacy.safety_rating, 0.0);
        assert!(legacy.pros.is_empty());
        assert_eq!(legacy.pricing, Pricing::default());
        assert_eq!(legacy.manufacturer_info, ManufacturerInfo::default());
        assert!(legacy.faqs.is_empty());
        assert!(legacy.customer_reviews.is_empty());
    }

    #[test]
    fn first_matching_block_wins_for_named_fields() {
        let blocks = vec![
            Block::with_body(BlockBody::Overview {
                content: "first".to_string(),
            }),
            Block::with_body(BlockBody::Overview {
                content: "second".to_string(),
            }),
        ];

        let legacy = legacy_article(&article_with(blocks));
        assert_eq!(legacy.overview, "first");
    }

    #[test]
    fn ratings_come_from_first_block_carrying_them() {
        let mut review = BlockKind::ProductReview.default_body();
        if let BlockBody::ProductReview {
            overall_rating,
            ratings,
            ..
        } = &mut review
        {
            *overall_rating = 4.5;
            *ratings = Some(Ratings {
                ingredients: 4.0,
                value: 3.5,
                manufacturer: 4.8,
                safety: 5.0,
                effectiveness: 4.2,
            });
        }

        let legacy = legacy_article(&article_with(vec![Block::with_body(review)]));
        assert_eq!(legacy.overall_rating, 4.5);
        assert_eq!(legacy.ingredients_rating, 4.0);
        assert_eq!(legacy.value_rating, 3.5);
        assert_eq!(legacy.manufacturer_rating, 4.8);
        assert_eq!(legacy.safety_rating, 5.0);
    }

    #[test]
    fn array_fields_concatenate_across_blocks() {
        let first = Block::with_body(BlockBody::ProsCons {
            pros: vec!["a".to_string(), "b".to_string()],
            cons: vec!["x".to_string()],
        });
        let mut review = BlockKind::ProductReview.default_body();
        if let BlockBody::ProductReview { pros, .. } = &mut review {
            *pros = vec!["c".to_string()];
        }

        let legacy = legacy_article(&article_with(vec![first, Block::with_body(review)]));
        assert_eq!(legacy.pros, vec!["a", "b", "c"]);
        assert_eq!(legacy.cons, vec!["x"]);
    }

    #[test]
    fn pricing_and_manufacturer_come_from_custom_fields() {
        let mut review = BlockKind::ProductReview.default_body();
        if let BlockBody::ProductReview { custom_fields, .. } = &mut review {
            *custom_fields = vec![
                CustomField::new(field_name::SINGLE_BOTTLE_PRICE, "$39"),
                CustomField::new(field_name::MANUFACTURER_NAME, "Acme Labs"),
            ];
        }

        let legacy = legacy_article(&article_with(vec![Block::with_body(review)]));
        assert_eq!(legacy.pricing.single_bottle, "$39");
        assert_eq!(legacy.pricing.three_bottles, "");
        assert_eq!(legacy.manufacturer_info.name, "Acme Labs");
        assert_eq!(legacy.manufacturer_info.location, "");
    }

    #[test]
    fn faq_blocks_map_to_entries_in_order() {
        let faq = |q: &str, a: &str| {
            Block::with_body(BlockBody::Faq {
                custom_fields: vec![
                    CustomField::new(field_name::QUESTION, q),
                    CustomField::new(field_name::ANSWER, a),
                ],
            })
        };

        let legacy = legacy_article(&article_with(vec![faq("q1", "a1"), faq("q2", "a2")]));
        assert_eq!(
            legacy.faqs,
            vec![
                FaqEntry {
                    question: "q1".to_string(),
                    answer: "a1".to_string()
                },
                FaqEntry {
                    question: "q2".to_string(),
                    answer: "a2".to_string()
                },
            ]
        );
    }

    #[test]
    fn customer_reviews_take_body_content_and_fields() {
        let review = Block::with_body(BlockBody::Review {
            content: "Great stuff".to_string(),
            custom_fields: vec![
                CustomField::new(field_name::REVIEWER_NAME, "Sam"),
                CustomField::new(field_name::RATING, "4.5"),
                CustomField::new(field_name::REVIEW_TITLE, "Works"),
            ],
        });

        let legacy = legacy_article(&article_with(vec![review]));
        assert_eq!(legacy.customer_reviews.len(), 1);
        let cr = &legacy.customer_reviews[0];
        assert_eq!(cr.reviewer, "Sam");
        assert_eq!(cr.rating, 4.5);
        assert_eq!(cr.content, "Great stuff");
        assert_eq!(cr.location, "");
    }

    #[test]
    fn unparseable_review_rating_defaults_to_zero() {
        let review = Block::with_body(BlockBody::Review {
            content: String::new(),
            custom_fields: vec![CustomField::new(field_name::RATING, "five stars")],
        });

        let legacy = legacy_article(&article_with(vec![review]));
        assert_eq!(legacy.customer_reviews[0].rating, 0.0);
    }

    #[test]
    fn projection_does_not_mutate_input() {
        let article = article_with(vec![Block::new(BlockKind::ProductReview)]);
        let before = article.clone();

        let _ = legacy_article(&article);
        assert_eq!(article, before);
    }

    #[test]
    fn editable_blocks_match_canonical_order() {
        let blocks = vec![
            Block::new(BlockKind::Heading),
            Block::new(BlockKind::Paragraph),
        ];
        let article = article_with(blocks.clone());

        assert_eq!(editable_blocks(&article), blocks);
    }
}
