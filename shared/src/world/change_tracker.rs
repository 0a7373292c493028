use std::collections::HashMap;

use log::warn;

use super::object::ObjectId;

/// What happened to an object since the last drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Changed,
    Destroyed,
}

/// One entry in the accumulated ChangeSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub id: ObjectId,
}

/// Accumulates Created/Changed/Destroyed records between drains.
///
/// Single-writer (store mutation hooks), single-reader (drain) by
/// construction of the single-threaded frame loop, so no locking. Within one
/// drain interval a Created record always precedes any other record for the
/// same id, and redundant records are coalesced:
///
/// - Changed after Created or Changed for the same id is dropped (the drain
///   serializes the object's current state anyway).
/// - Destroyed after Created in the same interval removes the pair; the
///   object never becomes visible remotely.
pub struct ChangeTracker {
    records: Vec<ChangeRecord>,
    recorded: HashMap<ObjectId, ChangeKind>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            recorded: HashMap::new(),
        }
    }

    pub fn record_created(&mut self, id: ObjectId) {
        if self.recorded.contains_key(&id) {
            warn!("change tracker: duplicate created record for object {id:?}");
            return;
        }
        self.records.push(ChangeRecord {
            kind: ChangeKind::Created,
            id,
        });
        self.recorded.insert(id, ChangeKind::Created);
    }

    pub fn record_changed(&mut self, id: ObjectId) {
        match self.recorded.get(&id) {
            None => {
                self.records.push(ChangeRecord {
                    kind: ChangeKind::Changed,
                    id,
                });
                self.recorded.insert(id, ChangeKind::Changed);
            }
            // Already queued; the drain picks up current state
            Some(ChangeKind::Created) | Some(ChangeKind::Changed) => {}
            Some(ChangeKind::Destroyed) => {
                warn!("change tracker: changed record for destroyed object {id:?}");
            }
        }
    }

    pub fn record_destroyed(&mut self, id: ObjectId) {
        match self.recorded.get(&id) {
            Some(ChangeKind::Created) => {
                // Created and destroyed within one interval: nothing to send
                self.records.retain(|record| record.id != id);
                self.recorded.remove(&id);
            }
            Some(ChangeKind::Changed) => {
                self.records.retain(|record| record.id != id);
                self.records.push(ChangeRecord {
                    kind: ChangeKind::Destroyed,
                    id,
                });
                self.recorded.insert(id, ChangeKind::Destroyed);
            }
            None => {
                self.records.push(ChangeRecord {
                    kind: ChangeKind::Destroyed,
                    id,
                });
                self.recorded.insert(id, ChangeKind::Destroyed);
            }
            Some(ChangeKind::Destroyed) => {}
        }
    }

    /// Captures and clears the ChangeSet as one step. No record is ever
    /// included in two drains.
    pub fn drain(&mut self) -> Vec<ChangeRecord> {
        self.recorded.clear();
        std::mem::take(&mut self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.recorded.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}
