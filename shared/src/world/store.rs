use std::collections::BTreeMap;

use log::{debug, warn};

use super::{
    change_tracker::{ChangeRecord, ChangeTracker},
    object::{FieldSet, ObjectId, SceneObject, TypeTag},
};

/// Process-wide registry of the typed mutable objects making up the scene.
///
/// Owned by a coordinator, never a process global. The tracked mutators
/// (`register_created` / `record_changed` / `record_destroyed`) each append
/// one change record for the next drain; the `apply_*` entry points exist
/// for the receiving side, where replicated state must not re-enter the
/// tracker.
pub struct SceneStore {
    // BTreeMap so a full snapshot walks objects in id order
    objects: BTreeMap<ObjectId, SceneObject>,
    tracker: ChangeTracker,
    next_id: u64,
}

impl SceneStore {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            tracker: ChangeTracker::new(),
            next_id: 1,
        }
    }

    /// Hands out the next unused id. Ids are never reused within a session,
    /// including after destruction.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // Tracked mutators (authoring side)

    pub fn register_created(
        &mut self,
        id: ObjectId,
        type_tag: TypeTag,
        name: Option<String>,
        fields: FieldSet,
    ) {
        if self.objects.contains_key(&id) {
            warn!("scene store: object {id:?} registered twice, replacing");
        }
        debug!(
            "scene store: created {} {id:?}{}",
            type_tag.as_str(),
            name.as_deref()
                .map(|n| format!(" (name: {n})"))
                .unwrap_or_default()
        );
        // Keep the allocator ahead of externally chosen ids
        if id.to_u64() >= self.next_id {
            self.next_id = id.to_u64() + 1;
        }
        self.objects
            .insert(id, SceneObject::new(id, type_tag, name, fields));
        self.tracker.record_created(id);
    }

    pub fn record_changed(&mut self, id: ObjectId, fields: FieldSet) {
        let Some(object) = self.objects.get_mut(&id) else {
            warn!("scene store: change recorded for unknown object {id:?}");
            return;
        };
        object.merge_fields(fields);
        self.tracker.record_changed(id);
    }

    pub fn record_destroyed(&mut self, id: ObjectId) {
        if self.objects.remove(&id).is_none() {
            warn!("scene store: destroy recorded for unknown object {id:?}");
            return;
        }
        self.tracker.record_destroyed(id);
    }

    // Untracked mutators (replication apply side)

    pub(crate) fn apply_created(&mut self, object: SceneObject) {
        let id = object.id();
        if id.to_u64() >= self.next_id {
            self.next_id = id.to_u64() + 1;
        }
        self.objects.insert(id, object);
    }

    pub(crate) fn apply_changed(&mut self, id: ObjectId, fields: FieldSet) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.merge_fields(fields);
                true
            }
            None => false,
        }
    }

    pub(crate) fn apply_destroyed(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.objects.remove(&id)
    }

    // Lookup

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Walks the object table for a name match. Absence is an expected,
    /// checked case (the slave probes for its scene root exactly once), so
    /// this is a sentinel result rather than an error.
    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects
            .values()
            .find(|object| object.name() == Some(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // Change tracking

    pub fn drain_changes(&mut self) -> Vec<ChangeRecord> {
        self.tracker.drain()
    }

    pub fn clear_changes(&mut self) {
        self.tracker.clear();
    }

    pub fn pending_changes(&self) -> usize {
        self.tracker.len()
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}
