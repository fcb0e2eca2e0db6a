//! Editor-only section grouping over the flat block list.
//!
//! Sections are a UI convenience for moving a level-2 heading together
//! with its body; they are reconstructable from any flat block array and
//! are never persisted.

use crate::block::{Block, BlockBody, BlockKind, HeadingLevel};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};

///
/// Section
///
/// A contiguous run of blocks starting at a level-2 heading, or the
/// implicit first run.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, PartialEq, Deserialize, Serialize)]
pub struct Section(pub Vec<Block>);

impl Section {
    /// The section a brand-new article opens with: an "Overview" heading
    /// and an empty paragraph.
    #[must_use]
    pub fn starter() -> Self {
        let mut heading = Block::new(BlockKind::Heading);
        heading.body = BlockBody::Heading {
            level: HeadingLevel::Two,
            content: "Overview".to_string(),
        };

        Self(vec![heading, Block::new(BlockKind::Paragraph)])
    }

    #[must_use]
    pub fn into_blocks(self) -> Vec<Block> {
        self.0
    }
}

/// Split a flat ordered block list into sections. A level-2 heading opens
/// a new section unless the current one is still empty; everything else
/// appends to the current run. Empty input yields the starter section.
#[must_use]
pub fn group_into_sections(blocks: Vec<Block>) -> Vec<Section> {
    if blocks.is_empty() {
        return vec![Section::starter()];
    }

    let mut sections: Vec<Section> = Vec::new();
    let mut current: Vec<Block> = Vec::new();

    for block in blocks {
        if block.is_section_boundary() && !current.is_empty() {
            sections.push(Section(std::mem::take(&mut current)));
        }
        current.push(block);
    }
    if !current.is_empty() {
        sections.push(Section(current));
    }

    sections
}

/// Flatten sections back into one ordered block list, section order then
/// block-within-section order. The stored `order` column is recomputed
/// from the resulting positions at write time, never carried over.
#[must_use]
pub fn flatten_sections(sections: Vec<Section>) -> Vec<Block> {
    sections
        .into_iter()
        .flat_map(Section::into_blocks)
        .collect()
}

/// Swap the section at `index` with the one above it.
/// Returns false when the move is out of range.
pub fn move_section_up(sections: &mut [Section], index: usize) -> bool {
    if index == 0 || index >= sections.len() {
        return false;
    }
    sections.swap(index - 1, index);

    true
}

/// Swap the section at `index` with the one below it.
pub fn move_section_down(sections: &mut [Section], index: usize) -> bool {
    if index + 1 >= sections.len() {
        return false;
    }
    sections.swap(index, index + 1);

    true
}

/// Remove and return the section at `index`.
pub fn remove_section(sections: &mut Vec<Section>, index: usize) -> Option<Section> {
    if index >= sections.len() {
        return None;
    }

    Some(sections.remove(index))
}

/// Deep-clone the section at `index`, re-minting every block id, and
/// insert the copy directly after the original. Fresh ids keep the copy
/// from colliding with the original when the graph is persisted.
pub fn duplicate_section(sections: &mut Vec<Section>, index: usize) -> bool {
    let Some(section) = sections.get(index) else {
        return false;
    };

    let copy = Section(section.iter().map(Block::duplicate).collect());
    sections.insert(index + 1, copy);

    true
}

///
/// TESTS
///


#[cfg(test)]
mod property {
    use super::*;
    use proptest::prelude::*;

    fn arb_block() -> impl Strategy<Value = Block> {
        prop_oneof![
            "[a-z ]{0,12}".prop_map(|content| Block::with_body(BlockBody::Paragraph { content })),
            ("[a-z]{0,8}", 1u8..=3).prop_map(|(content, level)| {
                Block::with_body(BlockBody::Heading {
                    level: HeadingLevel::try_from(level).expect("level in range"),
                    content,
                })
            }),
            Just(Block::new(BlockKind::Divider)),
            "[a-z]{0,8}".prop_map(|content| Block::with_body(BlockBody::Quote { content })),
        ]
    }

    proptest! {
        /// Grouping then flattening is idempotent on content and
        /// relative order.
        #[test]
        fn group_flatten_is_idempotent(blocks in prop::collection::vec(arb_block(), 0..24)) {
            let once = flatten_sections(group_into_sections(blocks));
            let twice = flatten_sections(group_into_sections(once.clone()));

            prop_assert_eq!(once, twice);
        }

        /// Grouping never reorders or drops blocks.
        #[test]
        fn grouping_preserves_blocks(blocks in prop::collection::vec(arb_block(), 1..24)) {
            let ids: Vec<_> = blocks.iter().map(|b| b.id).collect();
            let flat = flatten_sections(group_into_sections(blocks));
            let round: Vec<_> = flat.iter().map(|b| b.id).collect();

            prop_assert_eq!(ids, round);
        }

        /// Every non-first section starts at a level-2 heading.
        #[test]
        fn sections_start_at_boundaries(blocks in prop::collection::vec(arb_block(), 1..24)) {
            let sections = group_into_sections(blocks);

            for section in &sections[1..] {
                prop_assert!(section[0].is_section_boundary());
            }
            for section in &sections {
                prop_assert!(!section.is_empty());
            }
        }
    }
}
