/// Full-cluster integration: one real master, two real slaves, loopback TCP.
/// Covers the init handshake, lockstep frame replication, and the finish
/// teardown in one session.

use lockview_master::MasterPhase;
use lockview_shared::{exit_codes, FieldSet, FieldValue, TypeTag, ViewParams};
use lockview_test::{clustered_master, demo_store, run_slave};

#[test]
fn two_slaves_mirror_the_master_in_lockstep() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut master = clustered_master(2, demo_store());
    let addr = master.local_addr().unwrap().to_string();

    let slaves: Vec<_> = (0..2).map(|_| run_slave(addr.clone(), "Root1")).collect();

    // Blocks until both slaves are in, then runs the init handshake
    master.configure_network().unwrap();
    assert_eq!(master.phase(), MasterPhase::Ready);

    let root = master.store().find_by_name("Root1").unwrap().id();
    let initial_count = master.store().len();

    // Frame 1: flip the root's visibility and grow the scene by one object
    let mut fields = FieldSet::new();
    fields.insert("visible".into(), FieldValue::Bool(false));
    master.store_mut().record_changed(root, fields);
    let fresh = master.store_mut().allocate_id();
    master.store_mut().register_created(
        fresh,
        TypeTag::new("Geometry"),
        Some("Fresh".into()),
        FieldSet::new(),
    );

    let mut view = ViewParams::new(0.25, 500.0);
    master.frame_update(&mut view);
    assert_eq!(master.phase(), MasterPhase::Ready);

    // Frame 2: the finish flag ends every session cleanly
    master.finish(&mut view);
    assert_eq!(master.phase(), MasterPhase::Teardown);

    for slave in slaves {
        let report = slave.join().unwrap();
        assert_eq!(report.exit_code, exit_codes::SUCCESS);
        // Every display anchored on the same root object
        assert_eq!(report.root_id, Some(root));
        // The init scale factor arrived as sent
        assert_eq!(report.scale_factor, 0.5);
        // The frame payload tracked the master's projection
        assert_eq!(report.view.near, 0.25);
        assert_eq!(report.view.far, 500.0);
        // The created object arrived, nothing was lost
        assert_eq!(report.object_count, initial_count + 1);
    }
}
