/// Property check for the snapshot path: any store, however it was
/// assembled, survives serialize → apply onto an empty peer intact, and
/// serializing it twice yields identical bytes.

use proptest::prelude::*;

use lockview_shared::{
    FieldSet, FieldValue, ObjectId, ReplicationContext, SceneStore, TypeTag,
};

fn field_value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<bool>().prop_map(FieldValue::Bool),
        any::<i64>().prop_map(FieldValue::Int),
        // Finite range: NaN would break the equality check, not the codec
        (-1.0e9f64..1.0e9f64).prop_map(FieldValue::Float),
        prop::array::uniform3(-1.0e6f32..1.0e6f32).prop_map(FieldValue::Vec3),
        "[ -~]{0,24}".prop_map(FieldValue::Str),
        prop::collection::vec(any::<u8>(), 0..48).prop_map(FieldValue::Bytes),
    ]
}

fn fields_strategy() -> impl Strategy<Value = FieldSet> {
    prop::collection::btree_map("[a-z]{1,8}", field_value_strategy(), 0..6)
}

fn objects_strategy() -> impl Strategy<Value = Vec<(Option<String>, FieldSet)>> {
    prop::collection::vec(
        (prop::option::of("[A-Za-z0-9]{1,12}"), fields_strategy()),
        0..12,
    )
}

fn build_store(objects: &[(Option<String>, FieldSet)]) -> SceneStore {
    let mut store = SceneStore::new();
    for (name, fields) in objects {
        let id = store.allocate_id();
        store.register_created(id, TypeTag::new("Node"), name.clone(), fields.clone());
    }
    store
}

fn tuples(store: &SceneStore) -> Vec<(ObjectId, String, Option<String>, FieldSet)> {
    store
        .iter()
        .map(|object| {
            (
                object.id(),
                object.type_tag().as_str().to_string(),
                object.name().map(str::to_string),
                object.fields().clone(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn snapshot_round_trip_reproduces_any_store(objects in objects_strategy()) {
        let mut source = build_store(&objects);
        let mut context = ReplicationContext::new();

        let snapshot = context.drain_and_serialize(&mut source, true);
        let second = context.drain_and_serialize(&mut source, true);
        prop_assert_eq!(&snapshot, &second);

        let mut target = SceneStore::new();
        let applied = context.apply(&mut target, &snapshot, &mut ()).unwrap();
        prop_assert_eq!(applied, source.len());
        prop_assert_eq!(tuples(&source), tuples(&target));
    }
}
