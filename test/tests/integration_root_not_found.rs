/// A slave configured for a root name the snapshot does not carry must die
/// with its own exit code, and the master must survive that loss.

use lockview_master::MasterPhase;
use lockview_shared::{exit_codes, ViewParams};
use lockview_test::{clustered_master, demo_store, run_slave};

#[test]
fn slave_with_wrong_root_exits_and_master_degrades_not_dies() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut master = clustered_master(1, demo_store());
    let addr = master.local_addr().unwrap().to_string();

    let slave = run_slave(addr, "NoSuchRoot");
    master.configure_network().unwrap();

    // The slave completes the handshake, fails the root probe locally, and
    // exits without ever touching the frame loop
    let report = slave.join().unwrap();
    assert_eq!(report.exit_code, exit_codes::ROOT_NOT_FOUND);
    assert!(report.root_id.is_none());

    // The master's next frame hits the dead connection; the call returns
    // normally and networking shuts off for good
    let mut view = ViewParams::default();
    master.frame_update(&mut view);
    assert_eq!(master.phase(), MasterPhase::Degraded);

    master.frame_update(&mut view);
    assert_eq!(master.phase(), MasterPhase::Degraded);
}
