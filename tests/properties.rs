//! Property tests for search, sort, pagination and id allocation

use std::collections::HashSet;

use admin_grid::query::{SortDirection, SortState, filter, stable_sort};
use admin_grid::{CrudStore, DynamicRecord, Record, RecordId, TableBuilder, TableEngine};
use proptest::prelude::*;
use serde_json::{Map, json};

const GROUPS: [&str; 3] = ["alpha", "beta", "gamma"];

fn arb_group() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(GROUPS[0].to_string()),
        Just(GROUPS[1].to_string()),
        Just(GROUPS[2].to_string()),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<DynamicRecord>> {
    prop::collection::vec((arb_group(), "[a-z]{0,6}", any::<i32>()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (group, name, score))| {
                DynamicRecord::new(i as i64 + 1, Map::new())
                    .with("group", group)
                    .with("name", name)
                    .with("score", score)
            })
            .collect()
    })
}

/// Records whose `rank` attribute is a permutation of `0..n`
fn arb_distinct_records() -> impl Strategy<Value = Vec<DynamicRecord>> {
    (1usize..30)
        .prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        .prop_map(|ranks| {
            ranks
                .into_iter()
                .enumerate()
                .map(|(i, rank)| DynamicRecord::new(i as i64 + 1, Map::new()).with("rank", rank))
                .collect()
        })
}

fn arb_query() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z0-9]{1,3}", Just("ALPHA".to_string())]
}

fn engine(records: Vec<DynamicRecord>, page_size: usize) -> TableEngine<DynamicRecord> {
    let columns = TableBuilder::new()
        .text("group", "Group")
        .text("name", "Name")
        .number("score", "Score")
        .number("rank", "Rank")
        .build();
    TableEngine::new(columns, page_size).with_records(records)
}

fn ids(rows: &[&DynamicRecord]) -> Vec<RecordId> {
    rows.iter().map(|r| r.id()).collect()
}

#[derive(Clone, Debug)]
enum Op {
    Create,
    Delete(usize),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![Just(Op::Create), any::<usize>().prop_map(Op::Delete)],
        1..40,
    )
}

proptest! {
    #[test]
    fn filter_is_idempotent(records in arb_records(), query in arb_query()) {
        let once = filter(&records, &query);
        let twice = filter(&once, &query);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sort_keeps_ties_in_collection_order(records in arb_records(), descending in any::<bool>()) {
        let sort = SortState {
            column_key: Some("group".to_string()),
            direction: if descending { SortDirection::Desc } else { SortDirection::Asc },
        };
        let sorted = stable_sort(records.clone(), &sort);
        prop_assert_eq!(sorted.len(), records.len());

        for pair in sorted.windows(2) {
            if pair[0].field("group") == pair[1].field("group") {
                prop_assert!(pair[0].id() < pair[1].id());
            }
        }
    }

    #[test]
    fn pages_reproduce_ordered_sequence(
        records in arb_records(),
        query in arb_query(),
        page_size in 1usize..12,
        sort_column in prop_oneof![Just(None), Just(Some("group")), Just(Some("score"))]
    ) {
        let mut engine = engine(records, page_size);
        engine.set_search_query(query);
        if let Some(column) = sort_column {
            engine.set_sort(column);
        }

        let expected = ids(&engine.ordered());
        let mut collected = Vec::new();
        for page in 1..=engine.total_pages() {
            engine.set_page(page);
            let view = engine.view();
            prop_assert!(view.rows.len() <= page_size);
            collected.extend(ids(&view.rows));
        }
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn sort_toggle_reverses_distinct_keys(records in arb_distinct_records()) {
        let mut engine = engine(records, 10);
        engine.set_sort("rank");
        let ascending = ids(&engine.ordered());
        engine.set_sort("rank");
        let mut descending = ids(&engine.ordered());
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    #[test]
    fn created_ids_stay_unique(ops in arb_ops()) {
        let mut store = CrudStore::<DynamicRecord>::new();

        for op in ops {
            match op {
                Op::Create => {
                    let present = store.ids();
                    let draft = Map::from_iter([("name".to_string(), json!("x"))]);
                    let created = store.create(draft).unwrap();
                    prop_assert!(!present.contains(&created.id()));
                    prop_assert!(present.iter().all(|id| *id < created.id()));
                }
                Op::Delete(index) => {
                    if !store.is_empty() {
                        let id = store.ids()[index % store.len()].clone();
                        store.delete(&id).unwrap();
                    }
                }
            }
            let ids = store.ids();
            let unique: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }
    }
}
