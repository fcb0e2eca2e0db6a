use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// BlockKindError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum BlockKindError {
    #[error("unrecognized block type: '{name}'")]
    Unrecognized { name: String },
}

///
/// BlockKind
///
/// Closed registry of block type discriminants. The string form is the
/// wire name used by the editor JSON shape and the persisted `kind`
/// column. Unrecognized names are rejected at the boundary, never
/// coerced.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Code,
    Conclusion,
    Cta,
    Description,
    Divider,
    Effectiveness,
    Faq,
    Heading,
    HowItWorks,
    HowToTake,
    Html,
    Image,
    IngredientsSection,
    List,
    OfficialWebsite,
    Overview,
    Paragraph,
    ProductReview,
    ProsCons,
    Quote,
    Review,
    Safety,
}

impl BlockKind {
    pub const ALL: &'static [Self] = &[
        Self::Code,
        Self::Conclusion,
        Self::Cta,
        Self::Description,
        Self::Divider,
        Self::Effectiveness,
        Self::Faq,
        Self::Heading,
        Self::HowItWorks,
        Self::HowToTake,
        Self::Html,
        Self::Image,
        Self::IngredientsSection,
        Self::List,
        Self::OfficialWebsite,
        Self::Overview,
        Self::Paragraph,
        Self::ProductReview,
        Self::ProsCons,
        Self::Quote,
        Self::Review,
        Self::Safety,
    ];

    /// Wire name, as stored in the `kind` column and the editor `type` tag.
    #[must_use]
    #[remain::check]
    pub fn as_str(&self) -> &'static str {
        #[remain::sorted]
        match self {
            Self::Code => "code",
            Self::Conclusion => "conclusion",
            Self::Cta => "cta",
            Self::Description => "description",
            Self::Divider => "divider",
            Self::Effectiveness => "effectiveness",
            Self::Faq => "faq",
            Self::Heading => "heading",
            Self::HowItWorks => "howItWorks",
            Self::HowToTake => "howToTake",
            Self::Html => "html",
            Self::Image => "image",
            Self::IngredientsSection => "ingredientsSection",
            Self::List => "list",
            Self::OfficialWebsite => "officialWebsite",
            Self::Overview => "overview",
            Self::Paragraph => "paragraph",
            Self::ProductReview => "productReview",
            Self::ProsCons => "prosCons",
            Self::Quote => "quote",
            Self::Review => "review",
            Self::Safety => "safety",
        }
    }

    /// Human-readable label for editor palettes ("productReview" becomes
    /// "Product Review").
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().from_case(Case::Camel).to_case(Case::Title)
    }

    /// Legacy single-purpose content kinds, one named field each in the
    /// flattened article view.
    #[must_use]
    pub const fn is_legacy_content(&self) -> bool {
        matches!(
            self,
            Self::Conclusion
                | Self::Description
                | Self::Effectiveness
                | Self::HowItWorks
                | Self::HowToTake
                | Self::OfficialWebsite
                | Self::Overview
                | Self::Safety
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = BlockKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BlockKindError::Unrecognized {
                name: s.to_string(),
            })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip() {
        for kind in BlockKind::ALL {
            let parsed: BlockKind = kind.as_str().parse().expect("parse");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "table".parse::<BlockKind>().unwrap_err();
        assert_eq!(
            err,
            BlockKindError::Unrecognized {
                name: "table".to_string()
            }
        );
    }

    #[test]
    fn serde_tag_matches_wire_name() {
        for kind in BlockKind::ALL {
            let json = serde_json::to_string(kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn legacy_content_kinds_are_the_single_purpose_set() {
        let legacy: Vec<BlockKind> = BlockKind::ALL
            .iter()
            .copied()
            .filter(BlockKind::is_legacy_content)
            .collect();

        assert_eq!(legacy.len(), 8);
        assert!(legacy.contains(&BlockKind::Overview));
        assert!(legacy.contains(&BlockKind::OfficialWebsite));
        assert!(!BlockKind::Paragraph.is_legacy_content());
        assert!(!BlockKind::ProductReview.is_legacy_content());
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(BlockKind::ProductReview.label(), "Product Review");
        assert_eq!(BlockKind::Faq.label(), "Faq");
    }
}
