use graphtable::{
    error::{ErrorKind, ErrorOrigin, QueryErrorKind, UpdateErrorKind},
    prelude::*,
};
use proptest::prelude::*;

fn store() -> MemoryStore {
    graphtable::open("limit = \"zero_is_unbounded\"\nshard_kind = \"long\"\n").expect("open store")
}

fn person(id: &str, name: &str) -> Entry {
    Entry::new(TableType::Vertex, Id::string(id))
        .with_column(LABEL_COLUMN, "person")
        .with_column("name", name)
}

fn knows(from: &str, to: &str) -> [Entry; 2] {
    let out = EdgeId::new(from, Direction::Out, "knows", "", to);
    let inbound = out.switch_owner();

    [edge_entry(&out, "{}"), edge_entry(&inbound, "{}")]
}

fn age_index(label: u32, age: i64, vertex: &str) -> Entry {
    let id = format_index_id(
        TableType::RangeLongIndex,
        IndexLabelId::new(label),
        Some(&FieldValue::Long(age)),
        Some(NumericKind::Long),
    )
    .expect("range index id");

    Entry::new(TableType::RangeLongIndex, id).with_column(vertex, "")
}

fn name_index(label: u32, name: &str, vertex: &str) -> Entry {
    let id = format_index_id(
        TableType::SecondaryIndex,
        IndexLabelId::new(label),
        Some(&FieldValue::from(name)),
        None,
    )
    .expect("secondary index id");

    Entry::new(TableType::SecondaryIndex, id).with_column(vertex, "")
}

fn seeded() -> MemoryStore {
    let store = store();
    let mut batch = Vec::new();
    for (id, name, age) in [("v1", "marko", 29), ("v2", "vadas", 27), ("v4", "josh", 32)] {
        batch.push(Mutation::insert(person(id, name)));
        batch.push(Mutation::insert(name_index(1, name, id)));
        batch.push(Mutation::insert(age_index(2, age, id)));
    }
    for [out, inbound] in [knows("v1", "v2"), knows("v1", "v4")] {
        batch.push(Mutation::insert(out));
        batch.push(Mutation::insert(inbound));
    }
    store.mutate(&batch).expect("seed");

    store
}

fn vertices_of(entries: impl Iterator<Item = Entry>) -> Vec<String> {
    entries
        .flat_map(|e| e.column_keys().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

#[test]
fn graph_round_trip_through_every_table_family() {
    let store = seeded();

    let by_name = Query::by_conditions(
        TableType::SecondaryIndex,
        [
            Condition::equals(ConditionKey::FieldValues, "josh"),
            Condition::equals(ConditionKey::IndexLabelId, 1),
        ],
    );
    assert_eq!(vertices_of(store.query(&by_name).expect("query")), vec!["v4"]);

    let older = Query::by_conditions(
        TableType::RangeLongIndex,
        [
            Condition::equals(ConditionKey::IndexLabelId, 2),
            Condition::new(ConditionKey::FieldValues, RelationKind::Gte, 28),
        ],
    );
    assert_eq!(vertices_of(store.query(&older).expect("query")), vec!["v1", "v4"]);

    let out_of_v1 = Query::by_ids(TableType::EdgeOut, [Id::string("v1")]);
    assert_eq!(store.count(&out_of_v1).expect("count"), 2);

    let into_v4 = Query::by_ids(TableType::EdgeIn, [Id::string("v4")]);
    let edges: Vec<Entry> = store.query(&into_v4).expect("query").collect();
    assert_eq!(edges.len(), 1);
    let column = edges[0].column_keys().next().expect("one edge");
    assert_eq!(split(column), vec!["I", "knows", "", "v1"]);
}

#[test]
fn label_deletes_evict_index_regions() {
    let store = seeded();
    let evict = |table, label: &str| {
        Mutation::delete(
            Entry::new(table, Id::string(label)).with_column(INDEX_LABEL_COLUMN, label),
        )
    };

    store
        .mutate(&[evict(TableType::SecondaryIndex, "1"), evict(TableType::RangeLongIndex, "2")])
        .expect("evict");

    assert!(store.table(TableType::SecondaryIndex).expect("table").is_empty());
    assert!(store.table(TableType::RangeLongIndex).expect("table").is_empty());
    assert_eq!(store.table(TableType::Vertex).expect("table").len(), 3);
}

#[test]
fn core_errors_map_onto_public_kinds() {
    let store = seeded();

    let [out, _] = knows("v2", "v4");
    let err: graphtable::Error = store.apply(&Mutation::append(out)).expect_err("append").into();
    assert_eq!(err.kind, ErrorKind::Update(UpdateErrorKind::Unsupported));
    assert_eq!(err.origin, ErrorOrigin::Edge);

    let label_only = Query::by_conditions(
        TableType::RangeLongIndex,
        [
            Condition::equals(ConditionKey::IndexLabelId, 2),
            Condition::equals(ConditionKey::Label, "person"),
        ],
    );
    let err: graphtable::Error = store.query(&label_only).err().expect("shape").into();
    assert_eq!(err.kind, ErrorKind::Query(QueryErrorKind::Invalid));

    let bad_config = graphtable::open("shard_kind = 4").err().expect("bad config");
    assert_eq!(bad_config.kind, ErrorKind::Config);

    let json = serde_json::to_string(&bad_config).expect("serialize");
    assert!(json.contains("\"Config\""));
}

#[test]
fn store_pages_edges_by_column() {
    let store = store();
    let mut batch = Vec::new();
    for i in 0..5 {
        let [out, _] = knows("hub", &format!("v{i}"));
        batch.push(Mutation::insert(out));
    }
    store.mutate(&batch).expect("seed");

    let all = Query::all(TableType::EdgeOut);
    assert_eq!(store.count(&store.paged(all.clone(), 0, 0)).expect("count"), 5);
    assert_eq!(store.count(&store.paged(all.clone(), 3, 0)).expect("count"), 2);
    assert_eq!(store.count(&store.paged(all, 1, 3)).expect("count"), 3);
}

proptest! {
    #[test]
    fn edge_pages_cover_every_edge_once(
        fan_out in prop::collection::vec(1usize..6, 1..5),
        page in 1u64..7,
    ) {
        let store = store();
        let mut batch = Vec::new();
        for (owner, n) in fan_out.iter().enumerate() {
            for other in 0..*n {
                let [out, _] = knows(&format!("o{owner}"), &format!("t{other}"));
                batch.push(Mutation::insert(out));
            }
        }
        store.mutate(&batch).expect("seed");
        let total: u64 = fan_out.iter().map(|n| *n as u64).sum();

        let mut seen = Vec::new();
        let mut offset = 0;
        while offset < total {
            let query = store.paged(Query::all(TableType::EdgeOut), offset, page);
            for entry in store.query(&query).expect("query") {
                for column in entry.column_keys() {
                    seen.push(format!("{}>{column}", entry.id()));
                }
            }
            offset += page;
        }

        let mut expected = Vec::new();
        for entry in store.query(&Query::all(TableType::EdgeOut)).expect("query") {
            for column in entry.column_keys() {
                expected.push(format!("{}>{column}", entry.id()));
            }
        }

        prop_assert_eq!(seen.len() as u64, total);
        prop_assert_eq!(seen, expected);
    }
}
