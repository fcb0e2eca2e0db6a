//! Relational row shapes for the persisted layout.
//!
//! `BlockRow` is the wide nullable shape of the block table: one `kind`
//! discriminant plus optional columns, of which each kind uses only its
//! legal subset. Conversion to and from the tagged `BlockBody` union
//! lives here; columns outside a kind's legal set are written as `None`
//! and surface as absent on read.

use crate::error::StoreError;
use blockpress_core::{
    block::{BlockBody, BlockKind, CustomField, HeadingLevel, IngredientItem, ListStyle, Ratings},
    types::{Timestamp, Ulid},
};
use serde::{Deserialize, Serialize};

///
/// RowKind
///
/// Implemented by every persisted row type; the table name shows up in
/// corruption messages and debug summaries.
///

pub trait RowKind: Clone {
    const TABLE: &'static str;

    fn id(&self) -> Ulid;
}

///
/// ArticleRow
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ArticleRow {
    pub id: Ulid,
    pub title: String,
    pub slug: String,
    pub author: String,
    pub published_at: Timestamp,
    pub cover_image: Option<String>,
    pub category_id: Option<Ulid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RowKind for ArticleRow {
    const TABLE: &'static str = "article";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// CategoryRow
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct CategoryRow {
    pub id: Ulid,
    pub label: String,
}

impl RowKind for CategoryRow {
    const TABLE: &'static str = "category";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// BlockRow
///

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BlockRow {
    pub id: Ulid,
    pub article_id: Ulid,
    pub kind: String,
    pub order: u32,
    pub content: Option<String>,

    // heading / list / image / code
    pub level: Option<u8>,
    pub list_style: Option<String>,
    pub image_url: Option<String>,
    pub language: Option<String>,

    // cta
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub cta_button_text: Option<String>,
    pub cta_button_link: Option<String>,
    pub cta_background_color: Option<String>,

    // product review
    pub product_name: Option<String>,
    pub overall_rating: Option<f64>,
    pub how_to_use: Option<String>,
    pub price: Option<String>,
    pub verdict: Option<String>,
    pub author: Option<String>,
    pub review_date: Option<String>,
    pub medically_cited: Option<bool>,
    pub fact_checked: Option<bool>,
}

impl RowKind for BlockRow {
    const TABLE: &'static str = "block";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// RatingRow
/// 0..1 per block.
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RatingRow {
    pub id: Ulid,
    pub block_id: Ulid,
    pub ingredients: f64,
    pub value: f64,
    pub manufacturer: f64,
    pub safety: f64,
    pub effectiveness: f64,
}

impl RowKind for RatingRow {
    const TABLE: &'static str = "rating";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// StringRow
///
/// Shared row shape for the four ordered content-string collections
/// (pros, cons, ingredients, highlights); each lives in its own table.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct StringRow {
    pub id: Ulid,
    pub block_id: Ulid,
    pub order: u32,
    pub content: String,
}

impl RowKind for StringRow {
    const TABLE: &'static str = "content_string";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// CustomFieldRow
/// Unordered name/value pairs.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct CustomFieldRow {
    pub id: Ulid,
    pub block_id: Ulid,
    pub name: String,
    pub value: String,
}

impl RowKind for CustomFieldRow {
    const TABLE: &'static str = "custom_field";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// IngredientItemRow
/// Ordered by `number`, then id for ties.
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IngredientItemRow {
    pub id: Ulid,
    pub block_id: Ulid,
    pub number: u32,
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub study_year: Option<u32>,
    pub study_source: Option<String>,
    pub study_description: Option<String>,
}

impl RowKind for IngredientItemRow {
    const TABLE: &'static str = "ingredient_item";

    fn id(&self) -> Ulid {
        self.id
    }
}

///
/// BlockChildren
///
/// The nested rows produced when one block is encoded. Child `order`
/// values are assigned from array position here and nowhere else.
///

#[derive(Clone, Debug, Default)]
pub struct BlockChildren {
    pub rating: Option<RatingRow>,
    pub pros: Vec<StringRow>,
    pub cons: Vec<StringRow>,
    pub ingredients: Vec<StringRow>,
    pub highlights: Vec<StringRow>,
    pub custom_fields: Vec<CustomFieldRow>,
    pub ingredient_items: Vec<IngredientItemRow>,
}

impl BlockRow {
    /// Encode one block at the given article position. Child rows always
    /// get fresh ids; they are recreated on every write.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn encode(
        block_id: Ulid,
        article_id: Ulid,
        order: u32,
        body: &BlockBody,
    ) -> (Self, BlockChildren) {
        let mut row = Self {
            id: block_id,
            article_id,
            kind: body.kind().as_str().to_string(),
            order,
            ..Self::default()
        };
        let mut children = BlockChildren::default();

        match body {
            BlockBody::Paragraph { content }
            | BlockBody::Quote { content }
            | BlockBody::Html { content }
            | BlockBody::Overview { content }
            | BlockBody::Description { content }
            | BlockBody::HowToTake { content }
            | BlockBody::Safety { content }
            | BlockBody::Effectiveness { content }
            | BlockBody::HowItWorks { content }
            | BlockBody::Conclusion { content }
            | BlockBody::OfficialWebsite { content } => {
                row.content = Some(content.clone());
            }
            BlockBody::Heading { level, content } => {
                row.level = Some(level.as_u8());
                row.content = Some(content.clone());
            }
            BlockBody::Image { url, caption } => {
                row.image_url = Some(url.clone());
                row.content = Some(caption.clone());
            }
            BlockBody::List { style, content } => {
                row.list_style = Some(list_style_name(*style).to_string());
                row.content = Some(content.clone());
            }
            BlockBody::Code { language, content } => {
                row.language = Some(language.clone());
                row.content = Some(content.clone());
            }
            BlockBody::Divider => {}
            BlockBody::Cta {
                text,
                link,
                button_text,
                button_link,
                background_color,
            } => {
                row.cta_text = Some(text.clone());
                row.cta_link = Some(link.clone());
                row.cta_button_text = Some(button_text.clone());
                row.cta_button_link = Some(button_link.clone());
                row.cta_background_color = Some(background_color.clone());
            }
            BlockBody::ProductReview {
                product_name,
                overall_rating,
                how_to_use,
                price,
                verdict,
                author,
                review_date,
                medically_cited,
                fact_checked,
                ratings,
                pros,
                cons,
                ingredients,
                highlights,
                custom_fields,
                ingredient_items,
            } => {
                row.product_name = Some(product_name.clone());
                row.overall_rating = Some(*overall_rating);
                row.how_to_use = Some(how_to_use.clone());
                row.price = Some(price.clone());
                row.verdict = Some(verdict.clone());
                row.author = Some(author.clone());
                row.review_date = Some(review_date.clone());
                row.medically_cited = Some(*medically_cited);
                row.fact_checked = Some(*fact_checked);

                children.rating = ratings.clone().map(|r| encode_rating(block_id, r));
                children.pros = encode_strings(block_id, pros);
                children.cons = encode_strings(block_id, cons);
                children.ingredients = encode_strings(block_id, ingredients);
                children.highlights = encode_strings(block_id, highlights);
                children.custom_fields = encode_custom_fields(block_id, custom_fields);
                children.ingredient_items = encode_ingredient_items(block_id, ingredient_items);
            }
            BlockBody::ProsCons { pros, cons } => {
                children.pros = encode_strings(block_id, pros);
                children.cons = encode_strings(block_id, cons);
            }
            BlockBody::IngredientsSection {
                content,
                ingredients,
                ingredient_items,
            } => {
                row.content = Some(content.clone());
                children.ingredients = encode_strings(block_id, ingredients);
                children.ingredient_items = encode_ingredient_items(block_id, ingredient_items);
            }
            BlockBody::Review {
                content,
                custom_fields,
            } => {
                row.content = Some(content.clone());
                children.custom_fields = encode_custom_fields(block_id, custom_fields);
            }
            BlockBody::Faq { custom_fields } => {
                children.custom_fields = encode_custom_fields(block_id, custom_fields);
            }
        }

        (row, children)
    }

    /// Decode the wide row plus its children back into the tagged union.
    /// An unrecognized `kind` column means the table no longer matches the
    /// registry; that is corruption, not caller error.
    pub fn decode(&self, children: &BlockChildren) -> Result<BlockBody, StoreError> {
        let kind: BlockKind = self.kind.parse().map_err(|_| {
            StoreError::corrupt(format!(
                "block {} has unrecognized kind column '{}'",
                self.id, self.kind
            ))
        })?;

        let content = || self.content.clone().unwrap_or_default();

        let body = match kind {
            BlockKind::Paragraph => BlockBody::Paragraph { content: content() },
            BlockKind::Quote => BlockBody::Quote { content: content() },
            BlockKind::Html => BlockBody::Html { content: content() },
            BlockKind::Overview => BlockBody::Overview { content: content() },
            BlockKind::Description => BlockBody::Description { content: content() },
            BlockKind::HowToTake => BlockBody::HowToTake { content: content() },
            BlockKind::Safety => BlockBody::Safety { content: content() },
            BlockKind::Effectiveness => BlockBody::Effectiveness { content: content() },
            BlockKind::HowItWorks => BlockBody::HowItWorks { content: content() },
            BlockKind::Conclusion => BlockBody::Conclusion { content: content() },
            BlockKind::OfficialWebsite => BlockBody::OfficialWebsite { content: content() },
            BlockKind::Heading => {
                let level = self.level.unwrap_or(2);
                BlockBody::Heading {
                    level: HeadingLevel::try_from(level).map_err(|_| {
                        StoreError::corrupt(format!(
                            "block {} has heading level {level} out of range",
                            self.id
                        ))
                    })?,
                    content: content(),
                }
            }
            BlockKind::Image => BlockBody::Image {
                url: self.image_url.clone().unwrap_or_default(),
                caption: content(),
            },
            BlockKind::List => BlockBody::List {
                style: match self.list_style.as_deref() {
                    Some("ordered") => ListStyle::Ordered,
                    _ => ListStyle::Unordered,
                },
                content: content(),
            },
            BlockKind::Code => BlockBody::Code {
                language: self.language.clone().unwrap_or_default(),
                content: content(),
            },
            BlockKind::Divider => BlockBody::Divider,
            BlockKind::Cta => BlockBody::Cta {
                text: self.cta_text.clone().unwrap_or_default(),
                link: self.cta_link.clone().unwrap_or_default(),
                button_text: self.cta_button_text.clone().unwrap_or_default(),
                button_link: self.cta_button_link.clone().unwrap_or_default(),
                background_color: self.cta_background_color.clone().unwrap_or_default(),
            },
            BlockKind::ProductReview => BlockBody::ProductReview {
                product_name: self.product_name.clone().unwrap_or_default(),
                overall_rating: self.overall_rating.unwrap_or(0.0),
                how_to_use: self.how_to_use.clone().unwrap_or_default(),
                price: self.price.clone().unwrap_or_default(),
                verdict: self.verdict.clone().unwrap_or_default(),
                author: self.author.clone().unwrap_or_default(),
                review_date: self.review_date.clone().unwrap_or_default(),
                medically_cited: self.medically_cited.unwrap_or(false),
                fact_checked: self.fact_checked.unwrap_or(false),
                ratings: children.rating.as_ref().map(decode_rating),
                pros: decode_strings(&children.pros),
                cons: decode_strings(&children.cons),
                ingredients: decode_strings(&children.ingredients),
                highlights: decode_strings(&children.highlights),
                custom_fields: decode_custom_fields(&children.custom_fields),
                ingredient_items: decode_ingredient_items(&children.ingredient_items),
            },
            BlockKind::ProsCons => BlockBody::ProsCons {
                pros: decode_strings(&children.pros),
                cons: decode_strings(&children.cons),
            },
            BlockKind::IngredientsSection => BlockBody::IngredientsSection {
                content: content(),
                ingredients: decode_strings(&children.ingredients),
                ingredient_items: decode_ingredient_items(&children.ingredient_items),
            },
            BlockKind::Review => BlockBody::Review {
                content: content(),
                custom_fields: decode_custom_fields(&children.custom_fields),
            },
            BlockKind::Faq => BlockBody::Faq {
                custom_fields: decode_custom_fields(&children.custom_fields),
            },
        };

        Ok(body)
    }
}

const fn list_style_name(style: ListStyle) -> &'static str {
    match style {
        ListStyle::Ordered => "ordered",
        ListStyle::Unordered => "unordered",
    }
}

fn encode_rating(block_id: Ulid, ratings: Ratings) -> RatingRow {
    let ratings = ratings.clamped();

    RatingRow {
        id: Ulid::generate(),
        block_id,
        ingredients: ratings.ingredients,
        value: ratings.value,
        manufacturer: ratings.manufacturer,
        safety: ratings.safety,
        effectiveness: ratings.effectiveness,
    }
}

fn decode_rating(row: &RatingRow) -> Ratings {
    Ratings {
        ingredients: row.ingredients,
        value: row.value,
        manufacturer: row.manufacturer,
        safety: row.safety,
        effectiveness: row.effectiveness,
    }
    .clamped()
}

#[allow(clippy::cast_possible_truncation)]
fn encode_strings(block_id: Ulid, items: &[String]) -> Vec<StringRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, content)| StringRow {
            id: Ulid::generate(),
            block_id,
            order: i as u32,
            content: content.clone(),
        })
        .collect()
}

fn decode_strings(rows: &[StringRow]) -> Vec<String> {
    rows.iter().map(|r| r.content.clone()).collect()
}

fn encode_custom_fields(block_id: Ulid, fields: &[CustomField]) -> Vec<CustomFieldRow> {
    fields
        .iter()
        .map(|f| CustomFieldRow {
            id: Ulid::generate(),
            block_id,
            name: f.name.clone(),
            value: f.value.clone(),
        })
        .collect()
}

fn decode_custom_fields(rows: &[CustomFieldRow]) -> Vec<CustomField> {
    rows.iter()
        .map(|r| CustomField {
            name: r.name.clone(),
            value: r.value.clone(),
        })
        .collect()
}

fn encode_ingredient_items(block_id: Ulid, items: &[IngredientItem]) -> Vec<IngredientItemRow> {
    items
        .iter()
        .map(|item| IngredientItemRow {
            id: Ulid::generate(),
            block_id,
            number: item.number,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            description: item.description.clone(),
            study_year: item.study_year,
            study_source: item.study_source.clone(),
            study_description: item.study_description.clone(),
        })
        .collect()
}

fn decode_ingredient_items(rows: &[IngredientItemRow]) -> Vec<IngredientItem> {
    rows.iter()
        .map(|r| IngredientItem {
            number: r.number,
            name: r.name.clone(),
            image_url: r.image_url.clone(),
            description: r.description.clone(),
            study_year: r.study_year,
            study_source: r.study_source.clone(),
            study_description: r.study_description.clone(),
        })
        .collect()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_sets_only_legal_columns() {
        let body = BlockBody::Paragraph {
            content: "hello".to_string(),
        };
        let (row, children) = BlockRow::encode(Ulid::generate(), Ulid::generate(), 0, &body);

        assert_eq!(row.kind, "paragraph");
        assert_eq!(row.content.as_deref(), Some("hello"));
        assert!(row.level.is_none());
        assert!(row.product_name.is_none());
        assert!(children.rating.is_none());
        assert!(children.custom_fields.is_empty());
    }

    #[test]
    fn every_kind_roundtrips_through_its_row() {
        for kind in BlockKind::ALL {
            let body = kind.default_body();
            let block_id = Ulid::generate();
            let (row, children) = BlockRow::encode(block_id, Ulid::generate(), 3, &body);

            assert_eq!(row.order, 3);
            let decoded = row.decode(&children).expect("decode");
            assert_eq!(decoded, body, "roundtrip mismatch for kind {kind}");
        }
    }

    #[test]
    fn unknown_kind_column_is_corruption() {
        let row = BlockRow {
            id: Ulid::generate(),
            kind: "carousel".to_string(),
            ..BlockRow::default()
        };

        let err = row.decode(&BlockChildren::default()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn out_of_range_heading_level_is_corruption() {
        let row = BlockRow {
            id: Ulid::generate(),
            kind: "heading".to_string(),
            level: Some(9),
            ..BlockRow::default()
        };

        let err = row.decode(&BlockChildren::default()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn child_string_rows_are_dense_in_array_order() {
        let body = BlockBody::ProsCons {
            pros: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            cons: Vec::new(),
        };
        let (_, children) = BlockRow::encode(Ulid::generate(), Ulid::generate(), 0, &body);

        let orders: Vec<u32> = children.pros.iter().map(|r| r.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn ratings_are_clamped_at_encode_time() {
        let mut body = BlockKind::ProductReview.default_body();
        if let BlockBody::ProductReview { ratings, .. } = &mut body {
            *ratings = Some(Ratings {
                ingredients: 99.0,
                ..Ratings::default()
            });
        }

        let (_, children) = BlockRow::encode(Ulid::generate(), Ulid::generate(), 0, &body);
        let rating = children.rating.expect("rating row");
        assert_eq!(rating.ingredients, 5.0);
    }
}
