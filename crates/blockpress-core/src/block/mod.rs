pub mod kind;

pub use kind::{BlockKind, BlockKindError};

use crate::types::Ulid;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// field_name
///
/// Custom-field names carrying semi-structured data that has no dedicated
/// column: pricing tiers, manufacturer info, FAQ question/answer, and
/// customer-review metadata.
///

pub mod field_name {
    pub const SINGLE_BOTTLE_PRICE: &str = "singleBottlePrice";
    pub const THREE_BOTTLE_PRICE: &str = "threeBottlePrice";
    pub const SIX_BOTTLE_PRICE: &str = "sixBottlePrice";

    pub const MANUFACTURER_NAME: &str = "manufacturerName";
    pub const MANUFACTURER_LOCATION: &str = "manufacturerLocation";
    pub const MANUFACTURER_DESCRIPTION: &str = "manufacturerDescription";

    pub const QUESTION: &str = "question";
    pub const ANSWER: &str = "answer";

    pub const REVIEWER_NAME: &str = "reviewerName";
    pub const REVIEWER_LOCATION: &str = "reviewerLocation";
    pub const RATING: &str = "rating";
    pub const REVIEW_TITLE: &str = "reviewTitle";
}

///
/// HeadingLevelError
///

#[derive(Debug, ThisError)]
pub enum HeadingLevelError {
    #[error("heading level out of range: {level} (expected 1..=3)")]
    OutOfRange { level: u8 },
}

///
/// HeadingLevel
///
/// Numeric on the wire (1..=3); level two headings open editor sections.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = HeadingLevelError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(HeadingLevelError::OutOfRange { level }),
        }
    }
}

///
/// ListStyle
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

///
/// Ratings
///
/// Per-criterion sub-scores, at most one child per block. Scores clamp to
/// the 0..=5 scale at construction; the read path stays total.
///

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Ratings {
    pub ingredients: f64,
    pub value: f64,
    pub manufacturer: f64,
    pub safety: f64,
    pub effectiveness: f64,
}

impl Ratings {
    pub const MAX_SCORE: f64 = 5.0;

    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |score: f64| score.clamp(0.0, Self::MAX_SCORE);

        Self {
            ingredients: clamp(self.ingredients),
            value: clamp(self.value),
            manufacturer: clamp(self.manufacturer),
            safety: clamp(self.safety),
            effectiveness: clamp(self.effectiveness),
        }
    }
}

///
/// CustomField
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

impl CustomField {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

///
/// IngredientItem
///
/// Rich ingredient-detail record, ordered by `number` within its block.
///

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngredientItem {
    pub number: u32,
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub study_year: Option<u32>,
    pub study_source: Option<String>,
    pub study_description: Option<String>,
}

///
/// BlockBody
///
/// Tagged union over the closed block registry: one variant per kind,
/// each carrying only its legal fields. Fields outside a kind's legal set
/// cannot be represented, which is the write-side "ignored" rule made
/// structural.
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockBody {
    #[serde(rename_all = "camelCase")]
    Paragraph {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Heading {
        level: HeadingLevel,
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default)]
        url: String,
        #[serde(default)]
        caption: String,
    },
    #[serde(rename_all = "camelCase")]
    Quote {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    List {
        #[serde(default)]
        style: ListStyle,
        /// Newline-delimited items.
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Code {
        #[serde(default)]
        language: String,
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Html {
        #[serde(default)]
        content: String,
    },
    Divider,
    #[serde(rename_all = "camelCase")]
    Cta {
        #[serde(default)]
        text: String,
        #[serde(default)]
        link: String,
        #[serde(default)]
        button_text: String,
        #[serde(default)]
        button_link: String,
        #[serde(default)]
        background_color: String,
    },
    #[serde(rename_all = "camelCase")]
    ProductReview {
        #[serde(default)]
        product_name: String,
        #[serde(default)]
        overall_rating: f64,
        #[serde(default)]
        how_to_use: String,
        #[serde(default)]
        price: String,
        #[serde(default)]
        verdict: String,
        #[serde(default)]
        author: String,
        #[serde(default)]
        review_date: String,
        #[serde(default)]
        medically_cited: bool,
        #[serde(default)]
        fact_checked: bool,
        #[serde(default)]
        ratings: Option<Ratings>,
        #[serde(default)]
        pros: Vec<String>,
        #[serde(default)]
        cons: Vec<String>,
        #[serde(default)]
        ingredients: Vec<String>,
        #[serde(default)]
        highlights: Vec<String>,
        #[serde(default)]
        custom_fields: Vec<CustomField>,
        #[serde(default)]
        ingredient_items: Vec<IngredientItem>,
    },
    #[serde(rename_all = "camelCase")]
    ProsCons {
        #[serde(default)]
        pros: Vec<String>,
        #[serde(default)]
        cons: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    IngredientsSection {
        #[serde(default)]
        content: String,
        #[serde(default)]
        ingredients: Vec<String>,
        #[serde(default)]
        ingredient_items: Vec<IngredientItem>,
    },
    #[serde(rename_all = "camelCase")]
    Review {
        /// Review body text.
        #[serde(default)]
        content: String,
        #[serde(default)]
        custom_fields: Vec<CustomField>,
    },
    #[serde(rename_all = "camelCase")]
    Faq {
        #[serde(default)]
        custom_fields: Vec<CustomField>,
    },
    #[serde(rename_all = "camelCase")]
    Overview {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Description {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    HowToTake {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Safety {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Effectiveness {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    HowItWorks {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Conclusion {
        #[serde(default)]
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    OfficialWebsite {
        #[serde(default)]
        content: String,
    },
}

impl BlockBody {
    /// Discriminant for this body.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph { .. } => BlockKind::Paragraph,
            Self::Heading { .. } => BlockKind::Heading,
            Self::Image { .. } => BlockKind::Image,
            Self::Quote { .. } => BlockKind::Quote,
            Self::List { .. } => BlockKind::List,
            Self::Code { .. } => BlockKind::Code,
            Self::Html { .. } => BlockKind::Html,
            Self::Divider => BlockKind::Divider,
            Self::Cta { .. } => BlockKind::Cta,
            Self::ProductReview { .. } => BlockKind::ProductReview,
            Self::ProsCons { .. } => BlockKind::ProsCons,
            Self::IngredientsSection { .. } => BlockKind::IngredientsSection,
            Self::Review { .. } => BlockKind::Review,
            Self::Faq { .. } => BlockKind::Faq,
            Self::Overview { .. } => BlockKind::Overview,
            Self::Description { .. } => BlockKind::Description,
            Self::HowToTake { .. } => BlockKind::HowToTake,
            Self::Safety { .. } => BlockKind::Safety,
            Self::Effectiveness { .. } => BlockKind::Effectiveness,
            Self::HowItWorks { .. } => BlockKind::HowItWorks,
            Self::Conclusion { .. } => BlockKind::Conclusion,
            Self::OfficialWebsite { .. } => BlockKind::OfficialWebsite,
        }
    }

    /// Primary text of this body: the `content` column for text-bearing
    /// kinds, the caption for images, the call-to-action text, and the
    /// verdict for product reviews. Empty where no text is legal.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::Quote { content }
            | Self::List { content, .. }
            | Self::Code { content, .. }
            | Self::Html { content }
            | Self::IngredientsSection { content, .. }
            | Self::Review { content, .. }
            | Self::Overview { content }
            | Self::Description { content }
            | Self::HowToTake { content }
            | Self::Safety { content }
            | Self::Effectiveness { content }
            | Self::HowItWorks { content }
            | Self::Conclusion { content }
            | Self::OfficialWebsite { content } => content,
            Self::Image { caption, .. } => caption,
            Self::Cta { text, .. } => text,
            Self::ProductReview { verdict, .. } => verdict,
            Self::Divider | Self::Faq { .. } | Self::ProsCons { .. } => "",
        }
    }

    /// Items of a list body, split on newlines with blank lines dropped.
    #[must_use]
    pub fn list_items(&self) -> Option<Vec<&str>> {
        match self {
            Self::List { content, .. } => Some(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }

    #[must_use]
    pub const fn ratings(&self) -> Option<&Ratings> {
        match self {
            Self::ProductReview { ratings, .. } => ratings.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn pros(&self) -> Option<&[String]> {
        match self {
            Self::ProductReview { pros, .. } | Self::ProsCons { pros, .. } => Some(pros),
            _ => None,
        }
    }

    #[must_use]
    pub fn cons(&self) -> Option<&[String]> {
        match self {
            Self::ProductReview { cons, .. } | Self::ProsCons { cons, .. } => Some(cons),
            _ => None,
        }
    }

    #[must_use]
    pub fn ingredients(&self) -> Option<&[String]> {
        match self {
            Self::ProductReview { ingredients, .. }
            | Self::IngredientsSection { ingredients, .. } => Some(ingredients),
            _ => None,
        }
    }

    #[must_use]
    pub fn highlights(&self) -> Option<&[String]> {
        match self {
            Self::ProductReview { highlights, .. } => Some(highlights),
            _ => None,
        }
    }

    #[must_use]
    pub fn custom_fields(&self) -> Option<&[CustomField]> {
        match self {
            Self::ProductReview { custom_fields, .. }
            | Self::Review { custom_fields, .. }
            | Self::Faq { custom_fields } => Some(custom_fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn ingredient_items(&self) -> Option<&[IngredientItem]> {
        match self {
            Self::ProductReview {
                ingredient_items, ..
            }
            | Self::IngredientsSection {
                ingredient_items, ..
            } => Some(ingredient_items),
            _ => None,
        }
    }
}

impl BlockKind {
    /// Registry defaults for a freshly created block of this kind.
    /// Pure and total over the closed set.
    #[must_use]
    pub fn default_body(self) -> BlockBody {
        match self {
            Self::Paragraph => BlockBody::Paragraph {
                content: String::new(),
            },
            Self::Heading => BlockBody::Heading {
                level: HeadingLevel::Two,
                content: String::new(),
            },
            Self::Image => BlockBody::Image {
                url: String::new(),
                caption: String::new(),
            },
            Self::Quote => BlockBody::Quote {
                content: String::new(),
            },
            Self::List => BlockBody::List {
                style: ListStyle::Unordered,
                content: String::new(),
            },
            Self::Code => BlockBody::Code {
                language: "text".to_string(),
                content: String::new(),
            },
            Self::Html => BlockBody::Html {
                content: String::new(),
            },
            Self::Divider => BlockBody::Divider,
            Self::Cta => BlockBody::Cta {
                text: String::new(),
                link: String::new(),
                button_text: String::new(),
                button_link: String::new(),
                background_color: String::new(),
            },
            Self::ProductReview => BlockBody::ProductReview {
                product_name: String::new(),
                overall_rating: 0.0,
                how_to_use: String::new(),
                price: String::new(),
                verdict: String::new(),
                author: String::new(),
                review_date: String::new(),
                medically_cited: false,
                fact_checked: false,
                ratings: Some(Ratings::default()),
                pros: Vec::new(),
                cons: Vec::new(),
                ingredients: Vec::new(),
                highlights: Vec::new(),
                custom_fields: vec![
                    CustomField::new(field_name::SINGLE_BOTTLE_PRICE, ""),
                    CustomField::new(field_name::THREE_BOTTLE_PRICE, ""),
                    CustomField::new(field_name::SIX_BOTTLE_PRICE, ""),
                    CustomField::new(field_name::MANUFACTURER_NAME, ""),
                    CustomField::new(field_name::MANUFACTURER_LOCATION, ""),
                    CustomField::new(field_name::MANUFACTURER_DESCRIPTION, ""),
                ],
                ingredient_items: Vec::new(),
            },
            Self::ProsCons => BlockBody::ProsCons {
                pros: Vec::new(),
                cons: Vec::new(),
            },
            Self::IngredientsSection => BlockBody::IngredientsSection {
                content: String::new(),
                ingredients: Vec::new(),
                ingredient_items: Vec::new(),
            },
            Self::Review => BlockBody::Review {
                content: String::new(),
                custom_fields: vec![
                    CustomField::new(field_name::REVIEWER_NAME, ""),
                    CustomField::new(field_name::REVIEWER_LOCATION, ""),
                    CustomField::new(field_name::RATING, ""),
                    CustomField::new(field_name::REVIEW_TITLE, ""),
                ],
            },
            Self::Faq => BlockBody::Faq {
                custom_fields: vec![
                    CustomField::new(field_name::QUESTION, ""),
                    CustomField::new(field_name::ANSWER, ""),
                ],
            },
            Self::Overview => BlockBody::Overview {
                content: String::new(),
            },
            Self::Description => BlockBody::Description {
                content: String::new(),
            },
            Self::HowToTake => BlockBody::HowToTake {
                content: String::new(),
            },
            Self::Safety => BlockBody::Safety {
                content: String::new(),
            },
            Self::Effectiveness => BlockBody::Effectiveness {
                content: String::new(),
            },
            Self::HowItWorks => BlockBody::HowItWorks {
                content: String::new(),
            },
            Self::Conclusion => BlockBody::Conclusion {
                content: String::new(),
            },
            Self::OfficialWebsite => BlockBody::OfficialWebsite {
                content: String::new(),
            },
        }
    }
}

///
/// Block
///
/// One polymorphic content unit. Position within the article is Vec
/// position; the persisted `order` column is always recomputed from it.
///

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Block {
    #[serde(default = "Ulid::nil")]
    pub id: Ulid,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl Block {
    /// Mint a block of the given kind with a fresh id and registry
    /// defaults.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Ulid::generate(),
            body: kind.default_body(),
        }
    }

    #[must_use]
    pub fn with_body(body: BlockBody) -> Self {
        Self {
            id: Ulid::generate(),
            body,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.body.content()
    }

    /// Deep copy with a fresh id, for section duplication.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: Ulid::generate(),
            body: self.body.clone(),
        }
    }

    /// Level-2 headings open a new editor section.
    #[must_use]
    pub const fn is_section_boundary(&self) -> bool {
        matches!(
            self.body,
            BlockBody::Heading {
                level: HeadingLevel::Two,
                ..
            }
        )
    }
}

///
/// TESTS
///
