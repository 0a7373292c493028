use log::{debug, warn};

use lockview_serde::{ByteReader, ByteWriter, Serde, VarInt};

use crate::world::{
    object::{de_fields, ser_fields},
    ChangeKind, ObjectId, SceneObject, SceneStore,
};

use super::error::ReplicationError;

// Record kind tags on the wire
const KIND_CREATED: u8 = 0x00;
const KIND_CHANGED: u8 = 0x01;
const KIND_DESTROYED: u8 = 0x02;

/// Receives one call per applied record, dispatched on the record's kind.
///
/// The kind set is closed, so dispatch is a plain method per kind resolved
/// at compile time. `on_destroyed` sees the object before it leaves the
/// store.
pub trait ReplicationHandler {
    fn on_created(&mut self, _object: &SceneObject) {}
    fn on_changed(&mut self, _object: &SceneObject) {}
    fn on_destroyed(&mut self, _object: &SceneObject) {}
}

/// No-op handler for callers that only want the store updated.
impl ReplicationHandler for () {}

/// Serializes scene state for the wire and applies received blocks to a
/// local store.
///
/// Sending side: [`drain_and_serialize`](Self::drain_and_serialize) emits
/// either a full snapshot (init) or the drained ChangeSet (per frame).
/// Receiving side: [`apply`](Self::apply) replays a block in record order
/// against the local store and notifies a [`ReplicationHandler`].
///
/// Output is deterministic: a full snapshot walks objects in id order, and
/// fields are always written sorted by name, so serializing unchanged state
/// twice yields identical bytes.
pub struct ReplicationContext {
    records_sent: u64,
    records_applied: u64,
}

impl ReplicationContext {
    pub fn new() -> Self {
        Self {
            records_sent: 0,
            records_applied: 0,
        }
    }

    /// Serializes state out of `store`. With `full` set, every live object
    /// is written as a Created record and pending changes are left alone;
    /// otherwise the current ChangeSet is captured and cleared in one step
    /// and only its records are written.
    pub fn drain_and_serialize(&mut self, store: &mut SceneStore, full: bool) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        if full {
            VarInt::from_len(store.len()).ser(&mut writer);
            for object in store.iter() {
                writer.write_byte(KIND_CREATED);
                object.ser(&mut writer);
                self.records_sent += 1;
            }
            debug!("replication: serialized full snapshot, {} objects", store.len());
            return writer.to_bytes();
        }

        let records = store.drain_changes();
        VarInt::from_len(records.len()).ser(&mut writer);
        for record in &records {
            match record.kind {
                ChangeKind::Created => {
                    let Some(object) = store.get(record.id) else {
                        // Coalescing removes created+destroyed pairs, so a
                        // missing object here means a tracker bug
                        warn!("replication: created record for missing object {:?}", record.id);
                        continue;
                    };
                    writer.write_byte(KIND_CREATED);
                    object.ser(&mut writer);
                }
                ChangeKind::Changed => {
                    let Some(object) = store.get(record.id) else {
                        warn!("replication: changed record for missing object {:?}", record.id);
                        continue;
                    };
                    writer.write_byte(KIND_CHANGED);
                    record.id.ser(&mut writer);
                    ser_fields(object.fields(), &mut writer);
                }
                ChangeKind::Destroyed => {
                    writer.write_byte(KIND_DESTROYED);
                    record.id.ser(&mut writer);
                }
            }
            self.records_sent += 1;
        }
        debug!("replication: serialized diff, {} records", records.len());
        writer.to_bytes()
    }

    /// Replays a received block against `store`, dispatching each record to
    /// `handler`. Records apply strictly in serialization order; a record
    /// referencing an id the store has not seen is a hard error, never
    /// reordered. Returns the number of applied records.
    pub fn apply(
        &mut self,
        store: &mut SceneStore,
        bytes: &[u8],
        handler: &mut dyn ReplicationHandler,
    ) -> Result<usize, ReplicationError> {
        let mut reader = ByteReader::new(bytes);
        let count = VarInt::de(&mut reader)?.to_len();
        let mut applied = 0;

        for _ in 0..count {
            match reader.read_byte().map_err(ReplicationError::Serde)? {
                KIND_CREATED => {
                    let object = SceneObject::de(&mut reader)?;
                    let id = object.id();
                    if store.contains(id) {
                        return Err(ReplicationError::DuplicateObject(id));
                    }
                    store.apply_created(object);
                    // Unwrap-free: just inserted
                    if let Some(object) = store.get(id) {
                        handler.on_created(object);
                    }
                }
                KIND_CHANGED => {
                    let id = ObjectId::de(&mut reader)?;
                    let fields = de_fields(&mut reader)?;
                    if !store.apply_changed(id, fields) {
                        return Err(ReplicationError::UnknownObject(id));
                    }
                    if let Some(object) = store.get(id) {
                        handler.on_changed(object);
                    }
                }
                KIND_DESTROYED => {
                    let id = ObjectId::de(&mut reader)?;
                    if !store.contains(id) {
                        return Err(ReplicationError::UnknownObject(id));
                    }
                    if let Some(object) = store.get(id) {
                        handler.on_destroyed(object);
                    }
                    store.apply_destroyed(id);
                }
                other => return Err(ReplicationError::UnknownKind(other)),
            }
            applied += 1;
            self.records_applied += 1;
        }

        if !reader.is_exhausted() {
            return Err(ReplicationError::TrailingData(reader.remaining()));
        }

        debug!("replication: applied {applied} records");
        Ok(applied)
    }

    pub fn records_sent(&self) -> u64 {
        self.records_sent
    }

    pub fn records_applied(&self) -> u64 {
        self.records_applied
    }
}

impl Default for ReplicationContext {
    fn default() -> Self {
        Self::new()
    }
}
