//! Write-then-read round trips across the schema adapter.

use blockpress_core::{
    article::Article,
    block::{Block, BlockBody, BlockKind, CustomField, HeadingLevel, IngredientItem, Ratings},
    types::{Slug, Timestamp, Ulid},
};
use blockpress_store::{Db, adapter};
use proptest::prelude::*;

fn article(slug: &str, blocks: Vec<Block>) -> Article {
    Article {
        id: Ulid::nil(),
        title: "Round Trip".to_string(),
        slug: Slug::parse(slug).expect("slug"),
        author: "Jane".to_string(),
        published_at: Timestamp::from_seconds(500),
        cover_image: Some("https://img.example/cover.png".to_string()),
        category: None,
        created_at: Timestamp::from_seconds(500),
        updated_at: Timestamp::from_seconds(500),
        blocks,
    }
}

fn rich_product_review() -> Block {
    let mut body = BlockKind::ProductReview.default_body();
    if let BlockBody::ProductReview {
        product_name,
        overall_rating,
        ratings,
        pros,
        cons,
        ingredients,
        highlights,
        custom_fields,
        ingredient_items,
        ..
    } = &mut body
    {
        *product_name = "Omega Forte".to_string();
        *overall_rating = 4.5;
        *ratings = Some(Ratings {
            ingredients: 4.0,
            value: 3.5,
            manufacturer: 4.8,
            safety: 5.0,
            effectiveness: 4.2,
        });
        *pros = vec!["Good".to_string(), "Cheap".to_string()];
        *cons = vec!["Large pills".to_string()];
        *ingredients = vec!["Omega-3".to_string()];
        *highlights = vec!["GMP certified".to_string()];
        *custom_fields = vec![
            CustomField::new("singleBottlePrice", "$39"),
            CustomField::new("manufacturerName", "Acme Labs"),
        ];
        *ingredient_items = vec![
            IngredientItem {
                number: 2,
                name: "EPA".to_string(),
                description: "Eicosapentaenoic acid".to_string(),
                ..IngredientItem::default()
            },
            IngredientItem {
                number: 1,
                name: "DHA".to_string(),
                study_year: Some(2019),
                study_source: Some("Journal of Lipids".to_string()),
                ..IngredientItem::default()
            },
        ];
    }

    Block::with_body(body)
}

#[test]
fn full_graph_roundtrips_up_to_ids_and_order() {
    let db = Db::new();
    let input = article(
        "full-graph",
        vec![
            Block::with_body(BlockBody::Heading {
                level: HeadingLevel::Two,
                content: "Overview".to_string(),
            }),
            rich_product_review(),
            Block::with_body(BlockBody::Faq {
                custom_fields: vec![
                    CustomField::new("question", "Does it work?"),
                    CustomField::new("answer", "Yes"),
                ],
            }),
        ],
    );

    let id = adapter::create(&db, &input).expect("create");
    let loaded = adapter::load(&db, id).expect("load");

    assert_eq!(loaded.title, input.title);
    assert_eq!(loaded.slug, input.slug);
    assert_eq!(loaded.cover_image, input.cover_image);
    assert_eq!(loaded.blocks.len(), input.blocks.len());
    // Ingredient items come back ordered by number: DHA before EPA.
    let BlockBody::ProductReview {
        ingredient_items, ..
    } = &loaded.blocks[1].body
    else {
        panic!("expected product review");
    };
    assert_eq!(ingredient_items[0].name, "DHA");
    assert_eq!(ingredient_items[1].name, "EPA");

    for (got, want) in loaded.blocks.iter().zip(&input.blocks) {
        if want.kind() == BlockKind::ProductReview {
            continue; // ingredient items re-sorted by number, checked above
        }
        assert_eq!(got.body, want.body);
    }
}

#[test]
fn load_by_slug_matches_load_by_id() {
    let db = Db::new();
    let id = adapter::create(&db, &article("by-slug", vec![rich_product_review()]))
        .expect("create");

    let by_id = adapter::load(&db, id).expect("by id");
    let by_slug = adapter::load_by_slug(&db, "by-slug").expect("by slug");
    assert_eq!(by_id, by_slug);

    assert!(adapter::load_by_slug(&db, "missing").unwrap_err().is_not_found());
}

#[test]
fn replace_rewrites_the_whole_graph() {
    let db = Db::new();
    let id = adapter::create(&db, &article("rewrite", vec![rich_product_review()]))
        .expect("create");

    let mut next = adapter::load(&db, id).expect("load");
    next.blocks = vec![Block::with_body(BlockBody::Paragraph {
        content: "replaced".to_string(),
    })];
    adapter::replace(&db, id, &next).expect("replace");

    let loaded = adapter::load(&db, id).expect("load");
    assert_eq!(loaded.blocks.len(), 1);
    assert_eq!(loaded.blocks[0].content(), "replaced");

    // The old product review's children are gone with it.
    assert!(db.ratings.borrow().is_empty());
    assert!(db.custom_fields.borrow().is_empty());
    assert!(db.ingredient_items.borrow().is_empty());
}

fn arb_block() -> impl Strategy<Value = Block> {
    prop_oneof![
        "[a-z ]{0,16}".prop_map(|content| Block::with_body(BlockBody::Paragraph { content })),
        ("[a-z]{0,8}", 1u8..=3).prop_map(|(content, level)| {
            Block::with_body(BlockBody::Heading {
                level: HeadingLevel::try_from(level).expect("level"),
                content,
            })
        }),
        (
            prop::collection::vec("[a-z]{1,6}", 0..4),
            prop::collection::vec("[a-z]{1,6}", 0..4)
        )
            .prop_map(|(pros, cons)| Block::with_body(BlockBody::ProsCons { pros, cons })),
        prop::collection::vec(("[a-zA-Z]{1,8}", "[a-z ]{0,8}"), 0..4).prop_map(|fields| {
            Block::with_body(BlockBody::Faq {
                custom_fields: fields
                    .into_iter()
                    .map(|(name, value)| CustomField::new(name, value))
                    .collect(),
            })
        }),
        Just(Block::new(BlockKind::Divider)),
    ]
}

proptest! {
    /// After any write-then-read round trip the stored block `order`
    /// sequence is exactly 0..N-1 in array order, and child collections
    /// are dense within each block.
    #[test]
    fn stored_order_is_always_dense(blocks in prop::collection::vec(arb_block(), 0..12)) {
        let db = Db::new();
        let id = adapter::create(&db, &article("dense", blocks)).expect("create");

        let mut rows = db.blocks.borrow().collect_where(|b| b.article_id == id);
        rows.sort_by_key(|b| b.order);
        for (index, row) in rows.iter().enumerate() {
            prop_assert_eq!(row.order as usize, index);
        }

        for row in &rows {
            let mut pros = db.pros.borrow().collect_where(|r| r.block_id == row.id);
            pros.sort_by_key(|r| r.order);
            for (index, child) in pros.iter().enumerate() {
                prop_assert_eq!(child.order as usize, index);
            }
        }
    }

    /// read(write(G)) preserves block bodies and relative order.
    #[test]
    fn roundtrip_preserves_bodies(blocks in prop::collection::vec(arb_block(), 0..12)) {
        let db = Db::new();
        let input = article("bodies", blocks);
        let id = adapter::create(&db, &input).expect("create");

        let loaded = adapter::load(&db, id).expect("load");
        prop_assert_eq!(loaded.blocks.len(), input.blocks.len());
        for (got, want) in loaded.blocks.iter().zip(&input.blocks) {
            prop_assert_eq!(&got.body, &want.body);
        }
    }
}
