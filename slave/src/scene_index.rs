use std::collections::HashMap;

use log::debug;

use lockview_shared::{ObjectId, ReplicationHandler, SceneObject};

/// Side index maintained while diffs apply: named objects for the root
/// lookup, and live object counts per type tag for diagnostics.
///
/// Collecting names as objects arrive means the root probe after the init
/// snapshot is a map lookup instead of a store scan.
pub struct SceneIndex {
    named: HashMap<String, ObjectId>,
    live_counts: HashMap<String, i64>,
}

impl SceneIndex {
    pub fn new() -> Self {
        Self {
            named: HashMap::new(),
            live_counts: HashMap::new(),
        }
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.named.get(name).copied()
    }

    pub fn live_count(&self, type_tag: &str) -> i64 {
        self.live_counts.get(type_tag).copied().unwrap_or(0)
    }
}

impl Default for SceneIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicationHandler for SceneIndex {
    fn on_created(&mut self, object: &SceneObject) {
        let tag = object.type_tag().as_str();
        *self.live_counts.entry(tag.to_string()).or_insert(0) += 1;
        match object.name() {
            Some(name) => {
                debug!("created: {tag} id {:?} name: {name}", object.id());
                self.named.insert(name.to_string(), object.id());
            }
            None => debug!("created: {tag} id {:?} name: <NULL>", object.id()),
        }
    }

    fn on_changed(&mut self, object: &SceneObject) {
        debug!("changed: {} id {:?}", object.type_tag().as_str(), object.id());
    }

    fn on_destroyed(&mut self, object: &SceneObject) {
        let tag = object.type_tag().as_str();
        debug!("destroyed: {tag} id {:?}", object.id());
        *self.live_counts.entry(tag.to_string()).or_insert(0) -= 1;
        if let Some(name) = object.name() {
            if self.named.get(name) == Some(&object.id()) {
                self.named.remove(name);
            }
        }
    }
}
