use std::{net::TcpListener, thread, thread::JoinHandle};

use lockview_shared::{
    exit_codes, ConnectionGroup, FieldSet, FieldValue, ObjectId, ReplicationContext, SceneStore,
    TypeTag, ViewParams,
};
use lockview_slave::{FrameOutcome, SlaveConfig, SlaveCoordinator, SlaveError, SlavePhase};

fn seeded_store() -> (SceneStore, ObjectId) {
    let mut store = SceneStore::new();
    let root = store.allocate_id();
    let mut fields = FieldSet::new();
    fields.insert("matrix".into(), FieldValue::Matrix4([0.0; 16]));
    store.register_created(root, TypeTag::new("Transform"), Some("Root1".into()), fields);
    let extra = store.allocate_id();
    store.register_created(extra, TypeTag::new("Geometry"), None, FieldSet::new());
    (store, root)
}

/// Stands in for the master: binds, then runs `script` against the accepted
/// channel's group.
fn fake_master(
    script: impl FnOnce(&mut ConnectionGroup) + Send + 'static,
) -> (String, JoinHandle<()>) {
    let mut group = ConnectionGroup::new();
    group.bind("127.0.0.1:0").unwrap();
    let addr = group.local_addr().unwrap().to_string();
    let handle = thread::spawn(move || {
        group.accept_point().unwrap();
        script(&mut group);
        group.disconnect();
    });
    (addr, handle)
}

fn send_init(group: &mut ConnectionGroup, store: &mut SceneStore, scale: f32) {
    let mut context = ReplicationContext::new();
    group.signal().unwrap();
    group.put_value(&scale).unwrap();
    let snapshot = context.drain_and_serialize(store, true);
    group.put_value(&snapshot).unwrap();
    group.put_value(&0u8).unwrap();
    group.flush().unwrap();
}

// ============================================================================
// Init handshake
// ============================================================================

#[test]
fn init_stores_scale_factor_and_locates_root() {
    let (mut store, root) = seeded_store();
    let (addr, master) = fake_master(move |group| {
        send_init(group, &mut store, 0.5);
    });

    let mut slave = SlaveCoordinator::new(SlaveConfig::new(addr, "Root1"), SceneStore::new());
    slave.connect_and_init().unwrap();

    assert_eq!(slave.scale_factor(), 0.5);
    assert_eq!(slave.root_id(), Some(root));
    assert_eq!(slave.phase(), SlavePhase::Running);
    assert_eq!(slave.store().len(), 2);
    // Replicated state never looks like local edits
    assert_eq!(slave.store().pending_changes(), 0);

    master.join().unwrap();
}

#[test]
fn missing_root_is_fatal_before_the_frame_loop() {
    let (mut store, _) = seeded_store();
    let (addr, master) = fake_master(move |group| {
        send_init(group, &mut store, 1.0);
    });

    let mut slave = SlaveCoordinator::new(SlaveConfig::new(addr, "Elsewhere"), SceneStore::new());
    let err = slave.connect_and_init().unwrap_err();

    assert!(matches!(err, SlaveError::RootNotFound(ref name) if name == "Elsewhere"));
    assert_eq!(err.exit_code(), exit_codes::ROOT_NOT_FOUND);
    // The frame loop is never entered
    assert_ne!(slave.phase(), SlavePhase::Running);
    assert!(matches!(
        slave.frame_update(&mut ViewParams::default()),
        Err(SlaveError::Comm(_))
    ));

    master.join().unwrap();
}

#[test]
fn unreachable_master_is_a_distinct_failure() {
    // Grab a port, then free it so nothing listens there
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut slave = SlaveCoordinator::new(SlaveConfig::new(addr, "Root1"), SceneStore::new());
    let err = slave.connect_and_init().unwrap_err();

    assert!(matches!(err, SlaveError::ConnectFailure(_)));
    assert_eq!(err.exit_code(), exit_codes::CONNECT_FAIL);
    assert_eq!(slave.phase(), SlavePhase::Disconnected);
}

// ============================================================================
// Frame loop
// ============================================================================

#[test]
fn finish_flag_is_echoed_and_ends_the_session() {
    let (mut store, root) = seeded_store();
    let (addr, master) = fake_master(move |group| {
        let mut context = ReplicationContext::new();
        send_init(group, &mut store, 1.0);
        store.clear_changes();

        // Final frame: one change, the finish flag, the view payload
        let mut fields = FieldSet::new();
        fields.insert("visible".into(), FieldValue::Bool(false));
        store.record_changed(root, fields);
        let diff = context.drain_and_serialize(&mut store, false);
        group.signal().unwrap();
        group.put_value(&diff).unwrap();
        group.put_value(&1u8).unwrap();
        group.put_value(&0u8).unwrap();
        group.put_value(&0.25f32).unwrap();
        group.put_value(&500.0f32).unwrap();
        group.flush().unwrap();

        // The slave answers its payload, then acknowledges the finish
        let _pad: u8 = group.get_value_from(0).unwrap();
        let ack: u8 = group.get_value_from(0).unwrap();
        assert_eq!(ack, 1);
    });

    let mut slave = SlaveCoordinator::new(SlaveConfig::new(addr, "Root1"), SceneStore::new());
    slave.connect_and_init().unwrap();

    let mut view = ViewParams::default();
    let outcome = slave.frame_update(&mut view).unwrap();
    assert_eq!(outcome, FrameOutcome::Finished);
    assert_eq!(slave.phase(), SlavePhase::Exited);

    // The final diff was applied before the exit
    let root_object = slave.store().get(root).unwrap();
    assert_eq!(root_object.field("visible"), Some(&FieldValue::Bool(false)));
    // The view payload arrived with it
    assert_eq!(view.near, 0.25);
    assert_eq!(view.far, 500.0);

    master.join().unwrap();
}

#[test]
fn master_hangup_mid_run_maps_to_the_comm_exit_code() {
    let (mut store, _) = seeded_store();
    let (addr, master) = fake_master(move |group| {
        send_init(group, &mut store, 1.0);
        // Master dies without a finish flag
        group.disconnect();
    });

    let mut slave = SlaveCoordinator::new(SlaveConfig::new(addr, "Root1"), SceneStore::new());
    slave.connect_and_init().unwrap();
    master.join().unwrap();

    let err = slave.frame_update(&mut ViewParams::default()).unwrap_err();
    assert!(matches!(err, SlaveError::Comm(_)));
    assert_eq!(err.exit_code(), exit_codes::COMM_ERROR);
    assert_eq!(slave.phase(), SlavePhase::Exited);
}
