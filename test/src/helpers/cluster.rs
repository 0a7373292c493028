use std::{net::TcpListener, thread, thread::JoinHandle};

use lockview_master::{MasterConfig, MasterCoordinator};
use lockview_shared::{FieldSet, FieldValue, ObjectId, SceneStore, TypeTag, ViewParams};
use lockview_slave::{SlaveConfig, SlaveCoordinator};

/// Grabs an ephemeral port and frees it again for the master to bind.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// A small scene: a named root, a named panel, and an anonymous geometry.
pub fn demo_store() -> SceneStore {
    let mut store = SceneStore::new();

    let root = store.allocate_id();
    let mut root_fields = FieldSet::new();
    root_fields.insert("matrix".into(), FieldValue::Matrix4([0.0; 16]));
    root_fields.insert("visible".into(), FieldValue::Bool(true));
    store.register_created(root, TypeTag::new("Transform"), Some("Root1".into()), root_fields);

    let panel = store.allocate_id();
    let mut panel_fields = FieldSet::new();
    panel_fields.insert("text".into(), FieldValue::Str("status".into()));
    store.register_created(panel, TypeTag::new("Widget"), Some("Panel".into()), panel_fields);

    let geometry = store.allocate_id();
    let mut geometry_fields = FieldSet::new();
    geometry_fields.insert("center".into(), FieldValue::Vec3([0.0, 1.0, 0.0]));
    store.register_created(geometry, TypeTag::new("Geometry"), None, geometry_fields);

    store
}

/// A master bound on loopback with `scale_factor` 0.5, ready for
/// `configure_network`.
pub fn clustered_master(slave_count: usize, store: SceneStore) -> MasterCoordinator {
    let config = MasterConfig {
        listen_addr: "127.0.0.1".to_string(),
        listen_port: free_port(),
        slave_count,
        scale_factor: 0.5,
    };
    let mut master = MasterCoordinator::new(config, store);
    master.bind().unwrap();
    master
}

/// What a slave saw over its whole session.
pub struct SlaveReport {
    pub exit_code: i32,
    pub root_id: Option<ObjectId>,
    pub scale_factor: f32,
    pub view: ViewParams,
    pub object_count: usize,
}

/// Runs a complete slave lifecycle on its own thread: connect, init, frames
/// until finish or fault, and reports back.
pub fn run_slave(addr: String, root_name: &str) -> JoinHandle<SlaveReport> {
    let root_name = root_name.to_string();
    thread::spawn(move || {
        let config = SlaveConfig::new(addr, root_name);
        let mut slave = SlaveCoordinator::new(config, SceneStore::new());
        let mut view = ViewParams::default();
        let exit_code = slave.run(&mut view);
        SlaveReport {
            exit_code,
            root_id: slave.root_id(),
            scale_factor: slave.scale_factor(),
            view,
            object_count: slave.store().len(),
        }
    })
}
